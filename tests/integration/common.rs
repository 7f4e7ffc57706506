//! Shared fixtures for the integration tests.

use std::sync::{Arc, Once};

use rego_spicedb::testing::MockBackend;
use rego_spicedb::{
    Bridge, BridgeConfig, ClientAccessor, ConfiguredClient, ErrorRecord, RelationshipTuple,
    SchemaPrefix, Term,
};

static TRACING: Once = Once::new();

/// Installs a test subscriber honoring `RUST_LOG`, once per process.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A bridge wired to a mock backend.
pub struct Fixture {
    pub backend: Arc<MockBackend>,
    pub bridge: Bridge,
}

impl Fixture {
    /// Creates a fixture with no schema prefix.
    pub fn new() -> Self {
        Self::with_prefix("")
    }

    /// Creates a fixture whose client carries `prefix`.
    pub fn with_prefix(prefix: &str) -> Self {
        Self::with_config(prefix, BridgeConfig::default())
    }

    /// Creates a fixture with an explicit bridge configuration.
    pub fn with_config(prefix: &str, config: BridgeConfig) -> Self {
        init_tracing();
        let backend = Arc::new(MockBackend::new());
        let accessor = ClientAccessor::with_client(ConfiguredClient::new(
            backend.clone(),
            SchemaPrefix::new(prefix),
        ));
        Self {
            backend,
            bridge: Bridge::with_config(accessor, config),
        }
    }

    /// Stores `resource_type:resource_id#relation@subject_type:subject_id`
    /// as the backend sees it.
    pub fn relate(
        &self,
        resource_type: &str,
        resource_id: &str,
        relation: &str,
        subject_type: &str,
        subject_id: &str,
    ) {
        self.backend.add_relationship(RelationshipTuple::new(
            resource_type,
            resource_id,
            relation,
            subject_type,
            subject_id,
        ));
    }
}

/// Turns string operands into terms.
pub fn args<const N: usize>(values: [&str; N]) -> Vec<Term> {
    values.into_iter().map(Term::from).collect()
}

/// Encodes a tuple the way policy code writes one.
pub fn tuple_term(tuple: &RelationshipTuple) -> Term {
    Term::from(serde_json::to_value(tuple).unwrap_or_default())
}

/// Returns the string at `field`.
pub fn str_field<'a>(term: &'a Term, field: &str) -> Option<&'a str> {
    term.get(field).and_then(Term::as_str)
}

/// Returns the strings in the collection at `field`.
pub fn strings(term: &Term, field: &str) -> Vec<String> {
    term.get(field)
        .and_then(Term::as_collection)
        .unwrap_or_default()
        .iter()
        .filter_map(Term::as_str)
        .map(str::to_owned)
        .collect()
}

/// Reads `term` back as an error record, if it is one.
pub fn error_record(term: &Term) -> Option<ErrorRecord> {
    serde_json::from_value(term.to_json()).ok()
}
