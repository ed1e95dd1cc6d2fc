use std::env;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use serde::Deserialize;

use crate::exclusion::{Anchoring, ExclusionRule};

pub const WAKATIME_API_URL: &str = "https://wakatime.com/api/v1";
pub const CLOCKIFY_API_URL: &str = "https://api.clockify.me/api/v1";

const DATES: &[&str] = &[
    "2024-10-28",
    "2024-10-29",
    "2024-10-30",
    "2024-10-31",
    "2024-11-01",
    "2024-11-02",
    "2024-11-03",
];

const EXCLUDED_PATTERNS: &[&str] = &[
    ".*lab.*",
    ".*tema.*",
    ".*teme.*",
    ".*iocla.*",
    "proiect.*",
    ".*bootloader.*",
    ".*assignment.*",
];

const EXCLUDED_NAMES: &[&str] = &[
    "copilot",
    "didi",
    "device",
    "Unknown Project",
    "partial",
    "rust_os",
    "fizica",
    "Physics",
    "RustOS",
];

/// time entryのアップロード方法。
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Strategy {
    /// 日毎、プロジェクトごとに合計した1件を登録する。
    AggregatePerDay,
    /// 取得したサンプルを1件ずつ登録する。
    RawPerSample,
}

/// 登録先のworkspace, project, taskの名前。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetNames {
    pub workspace: String,
    pub project: String,
    pub task: String,
}

/// 1回の同期処理の設定。
#[derive(Clone, Debug)]
pub struct Config {
    pub dates: Vec<NaiveDate>,
    pub exclusions: Vec<ExclusionRule>,
    pub anchoring: Anchoring,
    pub target: TargetNames,
    pub strategy: Strategy,
    pub wakatime_api_url: String,
    pub clockify_api_url: String,
}

impl Config {
    /// 組み込みの日付、除外ルール、登録先で`Config`を作る。
    pub fn builtin() -> Result<Self> {
        let dates = DATES
            .iter()
            .map(|date| {
                NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .with_context(|| format!("Failed to parse date: {}", date))
            })
            .collect::<Result<Vec<_>>>()?;
        let exclusions = EXCLUDED_PATTERNS
            .iter()
            .map(|pattern| ExclusionRule::wildcard(pattern))
            .chain(EXCLUDED_NAMES.iter().map(|name| ExclusionRule::literal(name)))
            .collect();

        Ok(Self {
            dates,
            exclusions,
            anchoring: Anchoring::Full,
            target: TargetNames {
                workspace: "Mythical Network".to_string(),
                project: "Development".to_string(),
                task: "Light".to_string(),
            },
            strategy: Strategy::AggregatePerDay,
            wakatime_api_url: WAKATIME_API_URL.to_string(),
            clockify_api_url: CLOCKIFY_API_URL.to_string(),
        })
    }
}

/// 2つのサービスのAPIキー。
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub wakatime_api_key: String,
    pub clockify_api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("wakatime_api_key", &"***")
            .field("clockify_api_key", &"***")
            .finish()
    }
}

impl Credentials {
    /// APIキーを読み込む。
    ///
    /// 環境変数`WAKATIME_API_KEY`と`CLOCKIFY_API_KEY`が両方設定されていればそれを使い、
    /// そうでなければ設定ディレクトリの`wakaclock/credentials.json`を読む。
    pub fn load() -> Result<Self> {
        if let (Ok(wakatime_api_key), Ok(clockify_api_key)) =
            (env::var("WAKATIME_API_KEY"), env::var("CLOCKIFY_API_KEY"))
        {
            info!("Credentials loaded from environment.");
            return Ok(Self {
                wakatime_api_key,
                clockify_api_key,
            });
        }

        let path = credentials_path()?;
        let file = File::open(&path).with_context(|| {
            format!(
                "WAKATIME_API_KEY and CLOCKIFY_API_KEY must be set, or {} must exist",
                path.display()
            )
        })?;
        let credentials = Self::from_reader(file)
            .with_context(|| format!("Failed to read credentials: {}", path.display()))?;
        info!("Credentials loaded from {}.", path.display());

        Ok(credentials)
    }

    /// JSON形式の資格情報を読み込む。
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).context("Failed to parse credentials")
    }
}

fn credentials_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("Failed to find config directory")?;
    Ok(dir.join("wakaclock").join("credentials.json"))
}
