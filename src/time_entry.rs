use chrono::{DateTime, NaiveDate, SecondsFormat, TimeDelta};
use serde::Serialize;

use crate::aggregate::ActivitySample;

/// 登録先のworkspace, project, taskのID。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DestinationIds {
    pub workspace_id: String,
    pub project_id: String,
    pub task_id: String,
}

/// 登録先サービスに送信するtime entry。
///
/// `end`は時の値が24以上になることがあるため、文字列のまま保持する。
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub billable: bool,
    pub description: String,
    pub start: String,
    pub end: String,
    pub project_id: String,
    pub task_id: String,
}

/// 秒数を`HH:MM:SS`形式に変換する。
///
/// 日付をまたぐ場合も時の値は24以上のまま表示する。
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// 1日分の合計時間から、その日の00:00:00Zから始まるtime entryを作る。
///
/// # Arguments
///
/// * `date` - 対象の日付
/// * `project` - time entryの説明に使うプロジェクト名
/// * `total_seconds` - 合計時間(秒)
/// * `ids` - 登録先のID
pub fn build_time_entry(
    date: NaiveDate,
    project: &str,
    total_seconds: u64,
    ids: &DestinationIds,
) -> TimeEntry {
    let day = date.format("%Y-%m-%d");
    TimeEntry {
        billable: true,
        description: project.to_string(),
        start: format!("{}T00:00:00Z", day),
        end: format!("{}T{}Z", day, format_duration(total_seconds)),
        project_id: ids.project_id.clone(),
        task_id: ids.task_id.clone(),
    }
}

/// 1件のサンプルからtime entryを作る。
///
/// 開始時刻を持つサンプルはその時刻から作業時間分の区間とし、
/// 持たないサンプルは`build_time_entry`と同じく00:00:00Zからの区間とする。
/// 終了時刻が表現できない場合も00:00:00Zからの区間とする。
pub fn build_sample_entry(
    date: NaiveDate,
    sample: &ActivitySample,
    ids: &DestinationIds,
) -> TimeEntry {
    let seconds = sample.duration.max(0.0) as u64;
    let interval = sample.time.and_then(|time| {
        let start = DateTime::from_timestamp(time.trunc() as i64, 0)?;
        let delta = TimeDelta::try_seconds(i64::try_from(seconds).ok()?)?;
        let end = start.checked_add_signed(delta)?;
        Some((start, end))
    });

    match interval {
        Some((start, end)) => TimeEntry {
            billable: true,
            description: sample.project.clone(),
            start: start.to_rfc3339_opts(SecondsFormat::Secs, true),
            end: end.to_rfc3339_opts(SecondsFormat::Secs, true),
            project_id: ids.project_id.clone(),
            task_id: ids.task_id.clone(),
        },
        None => build_time_entry(date, &sample.project, seconds, ids),
    }
}
