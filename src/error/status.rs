//! Backend status codes.

use std::fmt;

/// A gRPC-style status code reported by the permission backend.
///
/// [`name()`](StatusCode::name) yields the symbolic name used as the `error`
/// field of an [`ErrorRecord`](super::ErrorRecord), e.g. `"PermissionDenied"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// Not an error.
    Ok,
    /// The operation was cancelled.
    Canceled,
    /// Unknown error.
    Unknown,
    /// The client specified an invalid argument.
    InvalidArgument,
    /// The deadline expired before the operation could complete.
    DeadlineExceeded,
    /// A requested entity was not found.
    NotFound,
    /// The entity that a client attempted to create already exists.
    AlreadyExists,
    /// The caller does not have permission to execute the operation.
    PermissionDenied,
    /// Some resource has been exhausted.
    ResourceExhausted,
    /// The system is not in a state required for the operation.
    FailedPrecondition,
    /// The operation was aborted.
    Aborted,
    /// The operation was attempted past the valid range.
    OutOfRange,
    /// The operation is not implemented by the backend.
    Unimplemented,
    /// Internal backend error.
    Internal,
    /// The backend is currently unavailable.
    Unavailable,
    /// Unrecoverable data loss or corruption.
    DataLoss,
    /// The request does not have valid authentication credentials.
    Unauthenticated,
}

impl StatusCode {
    /// Returns the symbolic name of the code.
    pub fn name(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Canceled => "Canceled",
            StatusCode::Unknown => "Unknown",
            StatusCode::InvalidArgument => "InvalidArgument",
            StatusCode::DeadlineExceeded => "DeadlineExceeded",
            StatusCode::NotFound => "NotFound",
            StatusCode::AlreadyExists => "AlreadyExists",
            StatusCode::PermissionDenied => "PermissionDenied",
            StatusCode::ResourceExhausted => "ResourceExhausted",
            StatusCode::FailedPrecondition => "FailedPrecondition",
            StatusCode::Aborted => "Aborted",
            StatusCode::OutOfRange => "OutOfRange",
            StatusCode::Unimplemented => "Unimplemented",
            StatusCode::Internal => "Internal",
            StatusCode::Unavailable => "Unavailable",
            StatusCode::DataLoss => "DataLoss",
            StatusCode::Unauthenticated => "Unauthenticated",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(feature = "grpc")]
impl From<tonic::Code> for StatusCode {
    fn from(code: tonic::Code) -> Self {
        use tonic::Code;
        match code {
            Code::Ok => StatusCode::Ok,
            Code::Cancelled => StatusCode::Canceled,
            Code::Unknown => StatusCode::Unknown,
            Code::InvalidArgument => StatusCode::InvalidArgument,
            Code::DeadlineExceeded => StatusCode::DeadlineExceeded,
            Code::NotFound => StatusCode::NotFound,
            Code::AlreadyExists => StatusCode::AlreadyExists,
            Code::PermissionDenied => StatusCode::PermissionDenied,
            Code::ResourceExhausted => StatusCode::ResourceExhausted,
            Code::FailedPrecondition => StatusCode::FailedPrecondition,
            Code::Aborted => StatusCode::Aborted,
            Code::OutOfRange => StatusCode::OutOfRange,
            Code::Unimplemented => StatusCode::Unimplemented,
            Code::Internal => StatusCode::Internal,
            Code::Unavailable => StatusCode::Unavailable,
            Code::DataLoss => StatusCode::DataLoss,
            Code::Unauthenticated => StatusCode::Unauthenticated,
        }
    }
}

/// A status (code + message) reported by the permission backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendStatus {
    code: StatusCode,
    message: String,
}

impl BackendStatus {
    /// Creates a new backend status.
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Returns the status code.
    #[inline]
    pub fn code(&self) -> StatusCode {
        self.code
    }

    /// Returns the status message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}
