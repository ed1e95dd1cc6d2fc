use chrono::NaiveDate;
use log::{error, info, warn};

use crate::aggregate::{aggregate, retain_included};
use crate::clockify::ClockifyRepository;
use crate::config::{Config, Strategy};
use crate::error::SyncError;
use crate::exclusion::ExclusionFilter;
use crate::resolver::resolve_ids;
use crate::time_entry::{build_sample_entry, build_time_entry, TimeEntry};
use crate::wakatime::WakaTimeRepository;

/// 登録に失敗したtime entry。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFailure {
    pub date: NaiveDate,
    pub description: String,
    pub status: Option<u16>,
    pub body: String,
}

/// 作業時間の取得に失敗した日付。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchFailure {
    pub date: NaiveDate,
    pub reason: String,
}

/// 同期処理の結果。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub uploaded: usize,
    pub upload_failures: Vec<UploadFailure>,
    pub fetch_failures: Vec<FetchFailure>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.upload_failures.is_empty() && self.fetch_failures.is_empty()
    }
}

/// WakaTimeの作業時間をClockifyへ同期するコマンド。
pub struct SyncCommand<'a, W: WakaTimeRepository, C: ClockifyRepository> {
    wakatime: &'a W,
    clockify: &'a C,
}

impl<'a, W: WakaTimeRepository, C: ClockifyRepository> SyncCommand<'a, W, C> {
    /// 新しい`SyncCommand`を返す。
    ///
    /// # Arguments
    /// * `wakatime` - 作業時間を取得するリポジトリ
    /// * `clockify` - time entryを登録するリポジトリ
    pub fn new(wakatime: &'a W, clockify: &'a C) -> Self {
        Self { wakatime, clockify }
    }

    /// 同期処理を行う。
    ///
    /// 登録先のIDを解決できない場合はエラーを返し、何も登録しない。
    /// 日付ごとの取得失敗と、time entryごとの登録失敗は結果に記録して処理を続ける。
    ///
    /// # Arguments
    ///
    /// * `config` - 対象の日付、除外ルール、登録先
    pub async fn run(&self, config: &Config) -> anyhow::Result<SyncReport> {
        let filter = ExclusionFilter::new(&config.exclusions, config.anchoring)?;
        let ids = resolve_ids(self.clockify, &config.target).await?;

        let mut report = SyncReport::default();
        let date_count = config.dates.len();
        for (date_index, date) in config.dates.iter().enumerate() {
            let samples = match self.wakatime.read_durations(*date).await {
                Ok(samples) => samples,
                Err(err) => {
                    error!("Failed to fetch durations for {}: {}", date, err);
                    report.fetch_failures.push(FetchFailure {
                        date: *date,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let entries: Vec<TimeEntry> = match config.strategy {
                Strategy::AggregatePerDay => aggregate(&samples, &filter)
                    .iter()
                    .map(|total| {
                        build_time_entry(*date, &total.project, total.total_seconds as u64, &ids)
                    })
                    .collect(),
                Strategy::RawPerSample => retain_included(&samples, &filter)
                    .iter()
                    .map(|sample| build_sample_entry(*date, sample, &ids))
                    .collect(),
            };

            let entry_count = entries.len();
            for (entry_index, entry) in entries.into_iter().enumerate() {
                let progress = format!(
                    "{}/{} {}/{}",
                    date_index + 1,
                    date_count,
                    entry_index + 1,
                    entry_count
                );
                match self.clockify.create_time_entry(&ids.workspace_id, &entry).await {
                    Ok(()) => {
                        info!("{} {}: created", progress, entry.description);
                        report.uploaded += 1;
                    }
                    Err(err) => {
                        warn!("{} {}: {}", progress, entry.description, err);
                        let (status, body) = match err {
                            SyncError::UploadRejected { status, body } => (Some(status), body),
                            other => (None, other.to_string()),
                        };
                        report.upload_failures.push(UploadFailure {
                            date: *date,
                            description: entry.description,
                            status,
                            body,
                        });
                    }
                }
            }
        }

        Ok(report)
    }
}
