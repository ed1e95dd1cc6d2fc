use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use fern::colors::{Color, ColoredLevelConfig};
use log::{info, warn, LevelFilter};

mod aggregate;
mod clockify;
mod config;
mod console;
mod error;
mod exclusion;
mod resolver;
mod sync_command;
mod time_entry;
mod wakatime;

use clockify::ClockifyClient;
use config::{Config, Credentials, Strategy};
use console::{ConsoleMarkdownList, ConsolePresenter};
use exclusion::Anchoring;
use sync_command::SyncCommand;
use wakatime::WakaTimeClient;

/// WakaTimeの作業時間をClockifyのtime entryとして登録するCLIアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run
/// $ cargo run -- --strategy raw-per-sample
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(
        long = "strategy",
        value_enum,
        default_value = "aggregate-per-day",
        help = "Upload one entry per project and day, or one per sample"
    )]
    strategy: Strategy,

    #[clap(
        long = "anchoring",
        value_enum,
        default_value = "full",
        help = "Match exclusion rules against the full project name or only its start"
    )]
    anchoring: Anchoring,

    #[clap(short = 'v', long = "verbose", help = "Show debug logs")]
    verbose: bool,
}

/// ログ出力を設定する。
fn setup_logger(level: LevelFilter) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .info(Color::Green)
        .warn(Color::Yellow)
        .error(Color::Red)
        .debug(Color::Blue);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(LevelFilter::Warn)
        .level_for(env!("CARGO_CRATE_NAME"), level)
        .chain(io::stderr())
        .apply()
        .context("Failed to set up logger")?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logger(if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    })?;

    let config = Config {
        strategy: args.strategy,
        anchoring: args.anchoring,
        ..Config::builtin()?
    };
    let credentials = Credentials::load().context("Failed to load credentials")?;

    let wakatime = WakaTimeClient::new(&config.wakatime_api_url, &credentials.wakatime_api_key);
    let clockify = ClockifyClient::new(&config.clockify_api_url, &credentials.clockify_api_key);

    let command = SyncCommand::new(&wakatime, &clockify);
    let report = command.run(&config).await.context("Failed to sync time entries")?;
    if report.is_success() {
        info!("Sync finished.");
    } else {
        warn!("Sync finished with failures.");
    }

    let mut stdout = io::stdout();
    let mut presenter = ConsoleMarkdownList::new(&mut stdout);
    presenter.show_report(&report)?;

    Ok(())
}
