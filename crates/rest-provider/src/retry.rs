use std::time::Duration;

use backoff::ExponentialBackoff;
use reqwest::StatusCode;

/// Status classes worth retrying: rate limits and transient server
/// failures. Everything else is terminal for the call.
pub(crate) fn is_retryable_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503 | 504)
}

/// Bounded exponential backoff: 1s initial delay, 7x growth, give up
/// after two minutes.
pub(crate) fn policy() -> ExponentialBackoff {
    ExponentialBackoff {
        initial_interval: Duration::from_secs(1),
        multiplier: 7.0,
        max_interval: Duration::from_secs(60),
        max_elapsed_time: Some(Duration::from_secs(120)),
        ..ExponentialBackoff::default()
    }
}
