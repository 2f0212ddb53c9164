use std::path::PathBuf;

use fleetdash_browser::DriverError;

/// Errors from the session layer.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("one-time-code secret is not valid base32: {0}")]
    OtpSecret(String),

    #[error("session still requires login after a completed login flow")]
    Verification,

    #[error("failed to write session snapshot to {path}: {source}")]
    SnapshotIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize session snapshot: {0}")]
    SnapshotSerialize(#[from] serde_json::Error),
}
