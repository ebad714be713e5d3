use std::borrow::Cow;
use std::fmt::{self, Display};

use deskhand_provider::ProviderError;

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input provided to the operation was invalid.
    InvalidInput,
    /// The target resource does not exist.
    NotFound,
    /// A destructive operation was attempted without explicit
    /// confirmation. Recoverable by re-invoking with `confirm = true`.
    ConfirmationRequired,
    /// The resource provider is rate limited; retrying later may succeed.
    RateLimited,
    /// The resource provider could not complete the call; retrying later
    /// may succeed.
    RemoteUnavailable,
}

impl ErrorKind {
    /// Returns the wire name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::NotFound => "not_found",
            ErrorKind::ConfirmationRequired => "confirmation_required",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::RemoteUnavailable => "remote_unavailable",
        }
    }

    /// Returns whether re-invoking the same call unchanged may succeed.
    #[inline]
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::RateLimited | ErrorKind::RemoteUnavailable)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidInput => write!(f, "Invalid input"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::ConfirmationRequired => {
                write!(f, "Confirmation required")
            }
            ErrorKind::RateLimited => write!(f, "Rate limited"),
            ErrorKind::RemoteUnavailable => write!(f, "Remote unavailable"),
        }
    }
}

/// Describes an operation error.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Error {
    kind: ErrorKind,
    reason: Option<String>,
}

impl Error {
    /// Creates a new error with the `InvalidInput` kind.
    #[inline]
    pub fn invalid_input() -> Self {
        Self {
            kind: ErrorKind::InvalidInput,
            reason: None,
        }
    }

    /// Creates a new error with the `NotFound` kind.
    #[inline]
    pub fn not_found() -> Self {
        Self {
            kind: ErrorKind::NotFound,
            reason: None,
        }
    }

    /// Creates a new error with the `ConfirmationRequired` kind.
    #[inline]
    pub fn confirmation_required() -> Self {
        Self {
            kind: ErrorKind::ConfirmationRequired,
            reason: None,
        }
    }

    /// Converts a terminal provider error, preserving its kind.
    pub fn from_provider<E: ProviderError>(err: &E) -> Self {
        let kind = match err.kind() {
            deskhand_provider::ErrorKind::NotFound => ErrorKind::NotFound,
            deskhand_provider::ErrorKind::RateLimited => ErrorKind::RateLimited,
            deskhand_provider::ErrorKind::RemoteUnavailable => {
                ErrorKind::RemoteUnavailable
            }
        };
        Self {
            kind,
            reason: Some(err.to_string()),
        }
    }

    /// Attaches a reason to the error.
    #[inline]
    pub fn with_reason<S: Into<String>>(self, reason: S) -> Self {
        Self {
            kind: self.kind,
            reason: Some(reason.into()),
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the reason for the error.
    #[inline]
    pub fn reason(&self) -> Cow<'_, str> {
        match self.reason.as_deref() {
            Some(reason) => Cow::Borrowed(reason),
            None => Cow::Owned(format!("{}", self.kind)),
        }
    }
}
