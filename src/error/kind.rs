//! Error kind enumeration for categorizing bridge errors.

/// Categorization of bridge errors.
///
/// The kinds split into two groups that the builtins treat differently:
///
/// | ErrorKind            | Surfaced as            | Cached |
/// |----------------------|------------------------|--------|
/// | `Decode`             | hard failure (`Err`)   | No     |
/// | `Validation`         | hard failure (`Err`)   | No     |
/// | `BackendUnavailable` | hard failure (`Err`)   | No     |
/// | `Configuration`      | hard failure (`Err`)   | No     |
/// | `Internal`           | hard failure (`Err`)   | No     |
/// | `Transport`          | `ErrorRecord` value    | No     |
/// | `Backend`            | `ErrorRecord` value    | No     |
///
/// Hard failures abort the policy evaluation because they indicate misuse or
/// misconfiguration. Transport and backend failures are business outcomes
/// that policy code can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An argument had the wrong type, or the wrong number of arguments
    /// was passed.
    #[error("decode error")]
    Decode,

    /// A relationship tuple is missing a mandatory field.
    #[error("validation error")]
    Validation,

    /// No backend client has been configured yet.
    #[error("backend unavailable")]
    BackendUnavailable,

    /// The backend RPC failed.
    ///
    /// Usually carries a [`BackendStatus`](super::BackendStatus).
    #[error("transport error")]
    Transport,

    /// The backend reported a failure while streaming results, or sent a
    /// response that is missing required fields.
    #[error("backend error")]
    Backend,

    /// Invalid plugin or bridge configuration.
    #[error("configuration error")]
    Configuration,

    /// Unexpected internal failure (e.g. a result could not be encoded).
    #[error("internal error")]
    Internal,
}

impl ErrorKind {
    /// Returns `true` if errors of this kind abort the builtin call instead
    /// of being returned to policy code as an error record.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rego_spicedb::ErrorKind;
    ///
    /// assert!(ErrorKind::Validation.is_hard_failure());
    /// assert!(!ErrorKind::Transport.is_hard_failure());
    /// ```
    #[inline]
    pub fn is_hard_failure(&self) -> bool {
        !matches!(self, ErrorKind::Transport | ErrorKind::Backend)
    }
}
