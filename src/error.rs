use thiserror::Error;

/// 同期処理中に発生するエラー。
#[derive(Debug, Error)]
pub enum SyncError {
    /// 通信の失敗、またはエラーステータスの応答。
    #[error("network error: {0}")]
    Network(String),

    /// レスポンスボディを解釈できなかった。
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// 名前に一致するworkspace, project, taskが存在しない。
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// time entryの登録が拒否された。
    #[error("upload rejected with status {status}: {body}")]
    UploadRejected { status: u16, body: String },
}

impl From<reqwest::Error> for SyncError {
    // URLにはクエリのAPIキーが含まれるため取り除く。
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_decode() {
            SyncError::InvalidResponse(err.to_string())
        } else {
            SyncError::Network(err.to_string())
        }
    }
}
