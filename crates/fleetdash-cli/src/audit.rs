//! Append-only JSON-lines audit trail of everything collected.

use std::path::PathBuf;

use chrono::Local;
use fleetdash_core::StoreResult;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One `StoreResult` per line, stamped with local wall-clock time. Appends
/// are serialized through a mutex so entries never interleave, even if the
/// run loop ever stops being sequential.
pub struct AuditLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl AuditLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Appends `result`. Audit failures are logged and swallowed: losing a
    /// log line must not lose the run.
    pub async fn append(&self, result: &StoreResult) {
        let _guard = self.lock.lock().await;
        if let Err(e) = self.append_inner(result).await {
            tracing::error!(path = %self.path.display(), error = %e, "could not write audit log entry");
        }
    }

    async fn append_inner(&self, result: &StoreResult) -> anyhow::Result<()> {
        let mut entry = serde_json::to_value(result)?;
        if let Value::Object(map) = &mut entry {
            map.insert(
                "timestamp".to_string(),
                Value::String(Local::now().format(TIMESTAMP_FORMAT).to_string()),
            );
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{entry}\n").as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "audit_test.rs"]
mod audit_test;
