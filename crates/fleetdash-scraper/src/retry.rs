//! Fixed-delay retry around one extraction attempt.

use std::future::Future;
use std::time::Duration;

/// Runs `op` up to `max_attempts` times, sleeping `delay` between attempts,
/// and returns the first `Some`. `None` after the final attempt means the
/// caller should skip, never abort. `max_attempts` of zero still runs once.
pub async fn run_with_retries<T, F, Fut>(max_attempts: u32, delay: Duration, mut op: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let attempts = max_attempts.max(1);
    for attempt in 1..=attempts {
        if let Some(value) = op().await {
            return Some(value);
        }
        if attempt < attempts {
            tracing::warn!(attempt, max_attempts = attempts, "attempt produced nothing; retrying");
            tokio::time::sleep(delay).await;
        }
    }
    tracing::error!(max_attempts = attempts, "all attempts produced nothing");
    None
}
