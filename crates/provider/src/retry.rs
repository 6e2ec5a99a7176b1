//! Canonical remote outcomes and the bounded retry schedule.

use std::time::Duration;

/// Outcome contract of the external secret-manager client.
///
/// The real SDK lives behind [`crate::RemoteSecretClient`]; these are the
/// only outcomes the adapter understands. Anything the SDK cannot express
/// in these terms belongs in `Other`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RemoteClientError {
    #[error("secret or version not found")]
    NotFound,
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("deadline exceeded: {0}")]
    DeadlineExceeded(String),
    #[error("rate limited")]
    RateLimited {
        /// Server-provided retry hint, when the response carried one.
        retry_after: Option<Duration>,
    },
    #[error("{0}")]
    Other(String),
}

/// Fixed backoff schedules. Not user-configurable; deterministic and
/// monotonically non-decreasing per class.
const NOT_FOUND_DELAYS: &[Duration] = &[Duration::from_millis(200)];
const SERVER_ERROR_DELAYS: &[Duration] = &[
    Duration::from_millis(200),
    Duration::from_millis(400),
    Duration::from_millis(800),
];
const RATE_LIMIT_DELAYS: &[Duration] = &[
    Duration::from_secs(1),
    Duration::from_secs(2),
    Duration::from_secs(4),
];

/// Delay before the next attempt, or `None` when the error class does not
/// retry (or its budget is spent). `attempt` is 1-based: the attempt that
/// just failed.
pub(crate) fn retry_delay(error: &RemoteClientError, attempt: u32) -> Option<Duration> {
    let index = attempt as usize - 1;
    match error {
        // a missing secret may be eventual consistency; give it one chance
        RemoteClientError::NotFound => NOT_FOUND_DELAYS.get(index).copied(),
        RemoteClientError::Unavailable(_) | RemoteClientError::DeadlineExceeded(_) => {
            SERVER_ERROR_DELAYS.get(index).copied()
        }
        RemoteClientError::RateLimited { retry_after } => {
            let base = RATE_LIMIT_DELAYS.get(index).copied()?;
            Some(retry_after.unwrap_or(base))
        }
        // auth, argument, and unknown errors never retry
        _ => None,
    }
}
