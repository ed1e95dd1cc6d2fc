use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde::Deserialize;

use crate::aggregate::ActivitySample;
use crate::error::SyncError;

/// WakaTime APIのdurationsレスポンスをデシリアライズするための構造体。
#[derive(Debug, Deserialize)]
struct WakaTimeDurations {
    data: Vec<WakaTimeDuration>,
}

/// 1件のduration。
#[derive(Debug, Deserialize)]
struct WakaTimeDuration {
    project: String,
    duration: f64,
    time: Option<f64>,
}

/// 作業時間を取得するためのリポジトリ。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WakaTimeRepository {
    /// 指定された日付のプロジェクトごとの作業時間を取得する。
    ///
    /// # Arguments
    ///
    /// * `date` - 取得する日付
    async fn read_durations(&self, date: NaiveDate) -> Result<Vec<ActivitySample>, SyncError>;
}

/// WakaTime APIと通信するためのクライアント。
///
/// # Examples
///
/// ```
/// let client = WakaTimeClient::new("https://wakatime.com/api/v1", "waka_xxx");
/// let samples = client.read_durations(date).await.unwrap();
/// ```
pub struct WakaTimeClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl WakaTimeClient {
    /// 新しい`WakaTimeClient`を返す。
    pub fn new(api_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl WakaTimeRepository for WakaTimeClient {
    async fn read_durations(&self, date: NaiveDate) -> Result<Vec<ActivitySample>, SyncError> {
        let url = format!("{}/users/current/durations", self.api_url);
        debug!("GET {} date={}", url, date);

        let durations = self
            .client
            .get(&url)
            .query(&[
                ("date", date.format("%Y-%m-%d").to_string()),
                ("api_key", self.api_key.clone()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<WakaTimeDurations>()
            .await?;
        info!("{}: {} durations", date, durations.data.len());

        Ok(durations
            .data
            .into_iter()
            .map(|duration| ActivitySample {
                project: duration.project,
                duration: duration.duration,
                time: duration.time,
            })
            .collect())
    }
}
