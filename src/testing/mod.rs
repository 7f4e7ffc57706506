//! Testing utilities.
//!
//! [`MockBackend`] stands in for SpiceDB so the bridge can be exercised
//! without a network:
//!
//! ```rust
//! use std::sync::Arc;
//! use rego_spicedb::prelude::*;
//! use rego_spicedb::testing::{MockBackend, RecordedCall};
//!
//! # tokio_test::block_on(async {
//! let backend = Arc::new(MockBackend::new());
//! let bridge = Bridge::new(ClientAccessor::with_client(ConfiguredClient::new(
//!     backend.clone(),
//!     SchemaPrefix::new("app/"),
//! )));
//!
//! let cache = MemoryCache::new();
//! let ctx = BuiltinContext::new(&cache);
//! let args = ["document", "", "", "", ""].map(Term::from);
//! bridge.read_relationships(&ctx, &args).await?;
//!
//! match &backend.calls()[0] {
//!     RecordedCall::ReadRelationships(request) => {
//!         assert_eq!(request.relationship_filter.resource_type.as_deref(), Some("app/document"));
//!     },
//!     other => panic!("unexpected call {:?}", other),
//! }
//! # Ok::<(), rego_spicedb::Error>(())
//! # }).unwrap();
//! ```

mod mock_backend;

pub use mock_backend::{MockBackend, RecordedCall};
