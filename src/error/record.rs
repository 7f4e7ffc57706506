//! Error records returned to policy code.

use serde::{Deserialize, Serialize};

use super::Error;

/// Kind reported for failures that carry no backend status.
pub const GENERIC_ERROR_KIND: &str = "Error";

/// A failure rendered as data for policy code.
///
/// Encoded as `{"error": <kind>, "desc": <description>}`. The kind is the
/// symbolic name of the backend status code when the backend reported one,
/// and `"Error"` otherwise.
///
/// ```rust
/// use rego_spicedb::{BackendStatus, Error, ErrorRecord, StatusCode};
///
/// let err = Error::transport(BackendStatus::new(StatusCode::NotFound, "no such type"));
/// let record = ErrorRecord::from(&err);
/// assert_eq!(record.kind(), "NotFound");
/// assert_eq!(record.description(), "no such type");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    #[serde(rename = "error")]
    kind: String,
    #[serde(rename = "desc")]
    description: String,
}

impl ErrorRecord {
    /// Creates a record from its two fields.
    pub fn new(kind: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            description: description.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl From<&Error> for ErrorRecord {
    fn from(err: &Error) -> Self {
        match err.status() {
            Some(status) => ErrorRecord::new(status.code().name(), status.message()),
            None => ErrorRecord::new(GENERIC_ERROR_KIND, err.to_string()),
        }
    }
}
