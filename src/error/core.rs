//! Main error type for the bridge.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use super::{BackendStatus, ErrorKind, StatusCode};

/// The primary error type for bridge operations.
///
/// ```text
/// Error
/// ├── kind: ErrorKind          (category for matching)
/// ├── message: String          (human-readable description)
/// ├── status: Option           (status reported by the backend)
/// └── source: Option           (underlying cause)
/// ```
///
/// Whether an error aborts a builtin call or is handed back to policy code
/// as an [`ErrorRecord`](super::ErrorRecord) is decided by
/// [`is_hard_failure()`](Error::is_hard_failure).
///
/// ## Example
///
/// ```rust
/// use rego_spicedb::{Error, ErrorKind};
///
/// let err = Error::validation("subjectId not set");
/// assert_eq!(err.kind(), ErrorKind::Validation);
/// assert!(err.is_hard_failure());
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    status: Option<BackendStatus>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    /// Creates a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Creates an error from a kind with a default message.
    pub fn from_kind(kind: ErrorKind) -> Self {
        let message = match kind {
            ErrorKind::Decode => "malformed builtin arguments",
            ErrorKind::Validation => "invalid relationship tuple",
            ErrorKind::BackendUnavailable => "spicedb client not configured",
            ErrorKind::Transport => "backend call failed",
            ErrorKind::Backend => "backend reported an error",
            ErrorKind::Configuration => "invalid configuration",
            ErrorKind::Internal => "internal error",
        };
        Self::new(kind, message)
    }

    /// Returns the error kind for categorization.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the status reported by the backend, if any.
    #[inline]
    pub fn status(&self) -> Option<&BackendStatus> {
        self.status.as_ref()
    }

    /// Returns `true` if this error aborts the builtin call.
    ///
    /// Equivalent to `self.kind().is_hard_failure()`.
    #[inline]
    pub fn is_hard_failure(&self) -> bool {
        self.kind.is_hard_failure()
    }

    /// Attaches a backend status to this error.
    #[must_use]
    pub fn with_status(mut self, status: BackendStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the source error for this error.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Re-tags a transport failure observed while consuming a result stream
    /// as a backend failure. Other kinds are left alone.
    pub(crate) fn mid_stream(mut self) -> Self {
        if self.kind == ErrorKind::Transport {
            self.kind = ErrorKind::Backend;
        }
        self
    }

    // Convenience constructors

    /// Creates a decode error.
    pub fn decode(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Creates a backend-unavailable error.
    pub fn backend_unavailable() -> Self {
        Self::from_kind(ErrorKind::BackendUnavailable)
    }

    /// Creates a transport error from a backend status.
    pub fn transport(status: BackendStatus) -> Self {
        Self::new(ErrorKind::Transport, status.message().to_owned()).with_status(status)
    }

    /// Creates a backend error without a status.
    pub fn backend(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Backend, message)
    }

    /// Creates a transport error for an elapsed caller deadline.
    pub fn deadline_exceeded() -> Self {
        Self::transport(BackendStatus::new(
            StatusCode::DeadlineExceeded,
            "deadline exceeded before the backend call completed",
        ))
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::from_kind(kind)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::internal(format!("JSON error: {err}")).with_source(err)
    }
}

#[cfg(feature = "grpc")]
impl From<tonic::Status> for Error {
    fn from(status: tonic::Status) -> Self {
        let backend_status = BackendStatus::new(status.code().into(), status.message());
        Error::transport(backend_status).with_source(status)
    }
}

#[cfg(feature = "grpc")]
impl From<tonic::transport::Error> for Error {
    fn from(err: tonic::transport::Error) -> Self {
        Error::configuration(format!("failed to connect: {err}")).with_source(err)
    }
}
