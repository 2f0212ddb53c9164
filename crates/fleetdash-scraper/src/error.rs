use fleetdash_browser::DriverError;

/// Errors inside one extraction attempt. These never cross the extractor
/// boundary: the public API collapses them to `None` after logging and a
/// diagnostic screenshot.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("metrics API payload did not match the expected shape: {0}")]
    Payload(#[from] serde_json::Error),
}
