//! Access to the configured backend client.
//!
//! The plugin lifecycle installs and clears the client; builtin calls only
//! read it through [`ClientAccessor`].

mod accessor;

pub use accessor::{ClientAccessor, ConfiguredClient};
