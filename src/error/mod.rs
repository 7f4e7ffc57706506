//! Error types for the bridge.
//!
//! - [`Error`]: every failure produced by the bridge
//! - [`ErrorRecord`]: a failure rendered as data for policy code
//!
//! ## Key Invariant
//!
//! Builtins return `Err(Error)` only for hard failures (bad arguments,
//! invalid tuples, no configured client). Failures reported by the backend
//! or the transport come back as `Ok(term)` where the term is an encoded
//! [`ErrorRecord`], so policy code can branch on them.

mod core;
mod kind;
mod record;
mod status;

pub use self::core::Error;
pub use kind::ErrorKind;
pub use record::{ErrorRecord, GENERIC_ERROR_KIND};
pub use status::{BackendStatus, StatusCode};

/// A specialized `Result` type for bridge operations.
pub type Result<T> = std::result::Result<T, Error>;
