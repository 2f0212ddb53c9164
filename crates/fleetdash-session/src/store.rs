//! Snapshot persistence for the browser session.

use std::io::ErrorKind;
use std::path::PathBuf;

use fleetdash_browser::SessionSnapshot;

use crate::error::SessionError;

/// Loads and saves the serialized cookie jar at a fixed path.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the persisted snapshot. Anything unusable — missing file,
    /// unreadable file, unparsable JSON, or a snapshot with no cookies —
    /// reads as `None`, which the caller treats as "log in from scratch".
    #[must_use]
    pub fn load(&self) -> Option<SessionSnapshot> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no saved session snapshot");
                return None;
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "could not read session snapshot");
                return None;
            }
        };
        match serde_json::from_str::<SessionSnapshot>(&raw) {
            Ok(snapshot) if snapshot.is_usable() => Some(snapshot),
            Ok(_) => {
                tracing::warn!(path = %self.path.display(), "saved snapshot carries no cookies; ignoring");
                None
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "saved snapshot is unparsable; ignoring");
                None
            }
        }
    }

    /// Persists `snapshot`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SnapshotIo`] on filesystem failure and
    /// [`SessionError::SnapshotSerialize`] if the snapshot cannot be
    /// serialized.
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionError> {
        let body = serde_json::to_string_pretty(snapshot)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SessionError::SnapshotIo {
                path: self.path.clone(),
                source,
            })?;
        }
        std::fs::write(&self.path, body).map_err(|source| SessionError::SnapshotIo {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;
