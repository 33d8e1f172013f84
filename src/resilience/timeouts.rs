//! Timeout enforcement.
//!
//! Every network-bound call in the wallet goes through [`bounded`]; expiry is
//! reported as a recoverable error and never as an indefinite suspension.

use std::future::IntoFuture;
use std::time::Duration;

/// A bounded operation ran past its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedOut(pub Duration);

impl std::fmt::Display for TimedOut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timed out after {} seconds", self.0.as_secs())
    }
}

impl std::error::Error for TimedOut {}

/// Run `fut` to completion or until `limit` elapses.
pub async fn bounded<F: IntoFuture>(limit: Duration, fut: F) -> Result<F::Output, TimedOut> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| TimedOut(limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_expiry() {
        let result = bounded(Duration::from_secs(10), tokio::time::sleep(Duration::from_secs(60))).await;
        assert_eq!(result, Err(TimedOut(Duration::from_secs(10))));
        assert_eq!(TimedOut(Duration::from_secs(10)).to_string(), "timed out after 10 seconds");
    }

    #[tokio::test(start_paused = true)]
    async fn test_completes_within_limit() {
        let result = bounded(Duration::from_secs(10), async { 7 }).await;
        assert_eq!(result, Ok(7));
    }
}
