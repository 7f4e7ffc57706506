//! Conversion between engine values and the bridge's typed arguments and
//! results.

mod args;
mod term;

pub use args::{
    CheckPermissionArgs, FilterArgs, LookupResourcesArgs, LookupSubjectsArgs, WriteArgs,
};
pub use term::Term;

use serde::Serialize;

use crate::{Error, error::Result};

/// Encodes a result value as a [`Term`].
///
/// The bridge's result types always encode; an error here means a
/// non-string map key or a similar serializer refusal.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Term> {
    serde_json::to_value(value)
        .map(Term::from)
        .map_err(|e| Error::internal(format!("failed to encode result: {e}")).with_source(e))
}
