//! ConsistencyToken (ZedToken) returned by the backend.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A token representing a point-in-time snapshot of the permission graph.
///
/// The backend returns one with every successful read or write. The bridge
/// never interprets it: it is copied into results as an opaque string.
/// For streamed responses only the first token observed is kept.
///
/// Serializes as a bare string:
///
/// ```rust
/// use rego_spicedb::ConsistencyToken;
///
/// let token = ConsistencyToken::new("GhUKEzE3MDAwMDAwMDAwMDAwMDAwMDA=");
/// let json = serde_json::to_string(&token).unwrap();
/// assert_eq!(json, "\"GhUKEzE3MDAwMDAwMDAwMDAwMDAwMDA=\"");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsistencyToken {
    value: String,
}

impl ConsistencyToken {
    /// Creates a new consistency token from a string value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns the raw token value.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns `true` if the token value is empty.
    ///
    /// An empty token means no snapshot was observed, e.g. a lookup that
    /// admitted no results.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl fmt::Display for ConsistencyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<String> for ConsistencyToken {
    fn from(value: String) -> Self {
        ConsistencyToken::new(value)
    }
}

impl From<&str> for ConsistencyToken {
    fn from(value: &str) -> Self {
        ConsistencyToken::new(value)
    }
}

impl AsRef<str> for ConsistencyToken {
    fn as_ref(&self) -> &str {
        &self.value
    }
}
