use crate::domain::model::AuditRecord;
use crate::utils::error::{ExtractError, Result};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// 追加式 NDJSON 稽核日誌，跨請求共用
#[derive(Debug)]
pub struct AuditLogger {
    path: PathBuf,
    // 同一行一次寫完，避免交錯
    write_lock: Mutex<()>,
}

impl AuditLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn record(&self, record: &AuditRecord) -> Result<()> {
        let line = record.to_json_line()?;
        let audit_error = |source: std::io::Error| ExtractError::AuditError {
            path: self.path.clone(),
            source,
        };

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(audit_error)?;

        file.write_all(line.as_bytes()).await.map_err(audit_error)?;
        file.flush().await.map_err(audit_error)?;
        Ok(())
    }
}
