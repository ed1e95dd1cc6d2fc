use async_trait::async_trait;
use log::debug;
#[cfg(test)]
use mockall::automock;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::SyncError;
use crate::time_entry::TimeEntry;

/// Clockify APIのworkspace, project, taskをデシリアライズするための構造体。
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct NamedResource {
    pub id: String,
    pub name: String,
}

/// 登録先サービスと通信するためのリポジトリ。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClockifyRepository {
    /// 参照可能なworkspaceの一覧を取得する。
    async fn read_workspaces(&self) -> Result<Vec<NamedResource>, SyncError>;

    /// workspaceに属するprojectの一覧を取得する。
    async fn read_projects(&self, workspace_id: &str) -> Result<Vec<NamedResource>, SyncError>;

    /// projectに属するtaskの一覧を取得する。
    async fn read_tasks(
        &self,
        workspace_id: &str,
        project_id: &str,
    ) -> Result<Vec<NamedResource>, SyncError>;

    /// time entryを登録する。
    ///
    /// 201以外のステータスは`SyncError::UploadRejected`として返す。
    async fn create_time_entry(
        &self,
        workspace_id: &str,
        entry: &TimeEntry,
    ) -> Result<(), SyncError>;
}

/// Clockify APIと通信するためのクライアント。
pub struct ClockifyClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl ClockifyClient {
    /// 新しい`ClockifyClient`を返す。
    ///
    /// # Arguments
    ///
    /// * `api_url` - APIのベースURL
    /// * `api_key` - `X-Api-Key`ヘッダーで送るAPIキー
    pub fn new(api_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("X-Api-Key", &self.api_key)
    }

    async fn read_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, SyncError> {
        let url = format!("{}{}", self.api_url, path);
        debug!("GET {}", url);

        let list = self
            .request(self.client.get(&url))
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<T>>()
            .await?;

        Ok(list)
    }
}

#[async_trait]
impl ClockifyRepository for ClockifyClient {
    async fn read_workspaces(&self) -> Result<Vec<NamedResource>, SyncError> {
        self.read_list("/workspaces").await
    }

    async fn read_projects(&self, workspace_id: &str) -> Result<Vec<NamedResource>, SyncError> {
        self.read_list(&format!("/workspaces/{}/projects", workspace_id)).await
    }

    async fn read_tasks(
        &self,
        workspace_id: &str,
        project_id: &str,
    ) -> Result<Vec<NamedResource>, SyncError> {
        self.read_list(&format!(
            "/workspaces/{}/projects/{}/tasks",
            workspace_id, project_id
        ))
        .await
    }

    async fn create_time_entry(
        &self,
        workspace_id: &str,
        entry: &TimeEntry,
    ) -> Result<(), SyncError> {
        let url = format!("{}/workspaces/{}/time-entries", self.api_url, workspace_id);
        debug!("POST {} {:?}", url, entry);

        let response = self
            .request(self.client.post(&url))
            .json(entry)
            .send()
            .await?;
        let status = response.status();
        if status == StatusCode::CREATED {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|err| format!("<unreadable body: {}>", err));
        Err(SyncError::UploadRejected {
            status: status.as_u16(),
            body,
        })
    }
}
