//! Prelude module for convenient imports.
//!
//! ```rust
//! use rego_spicedb::prelude::*;
//! ```
//!
//! This provides access to:
//! - The builtin façade and its context
//! - Client wiring and configuration
//! - Error types
//! - Common data types

pub use crate::{
    bridge::{Bridge, BuiltinContext},
    builtins::Builtin,
    cache::{MemoryCache, ResultCache},
    client::{ClientAccessor, ConfiguredClient},
    codec::Term,
    config::{BridgeConfig, PluginConfig, SchemaPrefix},
    error::{Error, ErrorKind, ErrorRecord, Result},
    transport::PermissionBackendClient,
    types::{CallContext, ConsistencyToken, RelationshipTuple},
};

#[cfg(feature = "grpc")]
pub use crate::{
    plugin::{PluginState, SpiceDbPlugin},
    transport::GrpcBackend,
};
