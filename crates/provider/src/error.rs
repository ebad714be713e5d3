use std::error::Error;

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The requested resource does not exist in the remote store.
    NotFound,
    /// The remote store is rate limiting the caller.
    RateLimited,
    /// The remote store could not be reached, or answered with a
    /// server-side failure.
    RemoteUnavailable,
}

impl ErrorKind {
    /// Returns whether re-invoking the same call later may succeed.
    #[inline]
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::RateLimited | ErrorKind::RemoteUnavailable)
    }
}

/// The error type for a resource provider.
///
/// Providers are expected to retry transient failures themselves (with
/// whatever backoff policy suits their transport) before surfacing an
/// error. An error reaching the caller is terminal for that call.
pub trait ProviderError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}
