//! Dispatch by builtin name and the plugin lifecycle.

use std::sync::Arc;

use rego_spicedb::testing::MockBackend;
use rego_spicedb::{
    Builtin, BuiltinContext, ConfiguredClient, ErrorKind, MemoryCache, PluginConfig, PluginState,
    RelationshipTuple, SchemaPrefix, SpiceDbPlugin, Term,
};

use crate::common::{Fixture, args, error_record, init_tracing, strings, tuple_term};

#[tokio::test]
async fn test_call_dispatches_every_builtin() {
    let fixture = Fixture::new();
    fixture.relate("document", "1", "viewer", "user", "ann");
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);
    let ann = RelationshipTuple::new("document", "1", "viewer", "user", "ann");

    let operands = |builtin: Builtin| -> Vec<Term> {
        match builtin {
            Builtin::CheckPermission => args(["document", "1", "viewer", "user", "ann"]),
            Builtin::LookupResources => args(["document", "viewer", "user", "ann"]),
            Builtin::LookupSubjects => args(["document", "1", "viewer", "user"]),
            Builtin::WriteRelationships => vec![
                Term::Array(vec![]),
                Term::Array(vec![tuple_term(&ann)]),
                Term::Array(vec![]),
            ],
            Builtin::ReadRelationships | Builtin::DeleteRelationships => {
                args(["document", "1", "", "", ""])
            },
        }
    };

    for builtin in Builtin::ALL {
        let args = operands(builtin);
        assert_eq!(args.len(), builtin.arity(), "{builtin}");
        let result = fixture.bridge.call(builtin.name(), &ctx, &args).await.unwrap();
        assert_eq!(result.get("result"), Some(&Term::Bool(true)), "{builtin}: {result}");
    }

    assert_eq!(fixture.backend.request_count(), 6);
    assert!(fixture.backend.relationships().is_empty());
}

#[tokio::test]
async fn test_call_rejects_wrong_arity() {
    let fixture = Fixture::new();
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let err = fixture
        .bridge
        .call("spicedb.lookup_resources", &ctx, &args(["document", "viewer", "user"]))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
    assert_eq!(err.message(), "spicedb.lookup_resources: expected 4 operands, got 3");
}

#[tokio::test]
async fn test_swapped_client_is_used_by_later_calls() {
    let fixture = Fixture::new();
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let replacement = Arc::new(MockBackend::new());
    replacement.add_relationship(RelationshipTuple::new(
        "v2/document",
        "9",
        "viewer",
        "v2/user",
        "ann",
    ));
    let previous = fixture.bridge.accessor().install(ConfiguredClient::new(
        replacement.clone(),
        SchemaPrefix::new("v2/"),
    ));
    assert!(previous.is_some());

    let result = fixture
        .bridge
        .call("spicedb.lookup_resources", &ctx, &args(["document", "viewer", "user", "ann"]))
        .await
        .unwrap();

    assert_eq!(strings(&result, "resourceIds"), ["9"]);
    assert_eq!(fixture.backend.request_count(), 0);
    assert_eq!(replacement.request_count(), 1);
}

#[tokio::test]
async fn test_plugin_lifecycle_drives_bridge() {
    init_tracing();
    let plugin = SpiceDbPlugin::new(
        PluginConfig::builder()
            .endpoint("127.0.0.1:1")
            .insecure(true)
            .build(),
    );
    let bridge = plugin.bridge(Default::default());
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);
    let check = args(["document", "1", "viewer", "user", "ann"]);

    let err = bridge
        .call("spicedb.check_permission", &ctx, &check)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BackendUnavailable);

    plugin.start().unwrap();
    assert_eq!(plugin.state(), PluginState::Ok);

    // Nothing listens on port 1: the failure comes back as data.
    let result = bridge.call("spicedb.check_permission", &ctx, &check).await.unwrap();
    assert!(error_record(&result).is_some(), "{result}");
    assert!(cache.is_empty());

    plugin.stop();
    let err = bridge
        .call("spicedb.check_permission", &ctx, &check)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BackendUnavailable);
}

#[test]
fn test_plugin_config_from_host_json() {
    let plugin = SpiceDbPlugin::from_json(
        br#"{"endpoint": "spicedb:50051", "token": "secret", "insecure": true, "schemaprefix": "tenant/"}"#,
    )
    .unwrap();

    let config = plugin.config();
    assert_eq!(config.endpoint, "spicedb:50051");
    assert!(config.insecure);
    assert_eq!(config.schema_prefix().as_str(), "tenant/");
    assert!(!format!("{config:?}").contains("secret"));
}
