use std::io::Write;

use anyhow::{Context, Result};

use crate::sync_command::SyncReport;

/// Consoleに同期結果を表示するためのtrait。
pub trait ConsolePresenter {
    /// 同期結果を表示する。
    ///
    /// # Arguments
    ///
    /// * `report` - 表示する同期結果
    fn show_report(&mut self, report: &SyncReport) -> Result<()>;
}

/// 同期結果をMarkdownのlist形式で表示する。
pub struct ConsoleMarkdownList<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> ConsoleMarkdownList<'a, W> {
    /// 新しい`ConsoleMarkdownList`を返す。
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }
}

impl<'a, W: Write> ConsolePresenter for ConsoleMarkdownList<'a, W> {
    // 失敗は日付順に表示する。
    fn show_report(&mut self, report: &SyncReport) -> Result<()> {
        writeln!(
            self.writer,
            "- uploaded: {}, failed: {}",
            report.uploaded,
            report.upload_failures.len()
        )
        .context("Failed to write summary")?;

        let mut fetch_failures = report.fetch_failures.clone();
        fetch_failures.sort_by_key(|failure| failure.date);
        for failure in fetch_failures {
            writeln!(self.writer, "- {} fetch failed: {}", failure.date, failure.reason)
                .with_context(|| format!("Failed to write fetch failure: {:?}", failure))?;
        }

        let mut upload_failures = report.upload_failures.clone();
        upload_failures.sort_by_key(|failure| failure.date);
        for failure in upload_failures {
            let status = failure
                .status
                .map(|status| status.to_string())
                .unwrap_or_else(|| "error".to_string());
            writeln!(
                self.writer,
                "- {} {} [{}]: {}",
                failure.date, failure.description, status, failure.body
            )
            .with_context(|| format!("Failed to write upload failure: {:?}", failure))?;
        }

        Ok(())
    }
}
