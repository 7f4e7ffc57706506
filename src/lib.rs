//! # rego-spicedb
//!
//! SpiceDB builtins for Rego policy engines.
//!
//! Policy code gets six functions over a relationship-based permission
//! service:
//!
//! | Builtin | Operands |
//! |---------|----------|
//! | `spicedb.check_permission` | resourceType, resourceId, permission, subjectType, subjectId |
//! | `spicedb.lookup_resources` | resourceType, permission, subjectType, subjectId |
//! | `spicedb.lookup_subjects` | resourceType, resourceId, permission, subjectType |
//! | `spicedb.read_relationships` | resourceType, resourceId, relation, subjectType, subjectId |
//! | `spicedb.write_relationships` | creates, touches, deletes |
//! | `spicedb.delete_relationships` | resourceType, resourceId, relation, subjectType, subjectId |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rego_spicedb::prelude::*;
//!
//! let plugin = SpiceDbPlugin::from_json(br#"{"endpoint": "spicedb:50051", "insecure": true, "token": "sk"}"#)?;
//! plugin.start()?;
//! let bridge = plugin.bridge(BridgeConfig::default());
//!
//! // For every evaluation:
//! let cache = MemoryCache::new();
//! let ctx = BuiltinContext::new(&cache);
//! let result = bridge.call("spicedb.check_permission", &ctx, &args).await?;
//! ```
//!
//! ## Key Concepts
//!
//! - **Errors as data**: a failing backend call returns
//!   `{"error": "<status code>", "desc": "<message>"}` so policies can
//!   branch on it. Malformed operands, invalid tuples and a missing client
//!   are `Err`.
//! - **Caching**: successful results are cached per evaluation through
//!   [`ResultCache`]. Writes are never cached.
//! - **Schema prefix**: every object type sent to SpiceDB is prefixed and
//!   every type read back is stripped.
//!
//! ## Features
//!
//! - `grpc` (default): [`GrpcBackend`] and [`SpiceDbPlugin`] via tonic

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod cache;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod types;

// Builtins
mod bridge;
mod builtins;

// Transport layer
pub mod transport;

// Plugin lifecycle
#[cfg(feature = "grpc")]
#[cfg_attr(docsrs, doc(cfg(feature = "grpc")))]
mod plugin;

// Testing utilities
pub mod testing;

// Prelude for convenient imports
pub mod prelude;

// Re-export main types at crate root for convenience
pub use bridge::{Bridge, BuiltinContext};
pub use builtins::Builtin;
pub use cache::{CacheKey, MemoryCache, NoopCache, OperationKind, ResultCache};
pub use client::{ClientAccessor, ConfiguredClient};
pub use codec::Term;
pub use config::{BridgeConfig, PluginConfig, SchemaPrefix};
pub use error::{BackendStatus, Error, ErrorKind, ErrorRecord, StatusCode};
pub use transport::PermissionBackendClient;
pub use types::{
    CallContext, ConsistencyToken, LookupPermissionship, ObjectReference, Permissionship,
    Relationship, RelationshipFilter, RelationshipTuple, RelationshipUpdate, SubjectFilter,
    SubjectReference, UpdateOperation,
};

#[cfg(feature = "grpc")]
pub use plugin::{PluginState, SpiceDbPlugin};
#[cfg(feature = "grpc")]
pub use transport::GrpcBackend;
