//! `spicedb.check_permission` end to end.

use std::time::Duration;

use rego_spicedb::testing::RecordedCall;
use rego_spicedb::transport::CheckPermissionRequest;
use rego_spicedb::{
    BridgeConfig, BuiltinContext, CallContext, ErrorKind, MemoryCache, NoopCache,
    ObjectReference, StatusCode, SubjectReference, Term,
};

use crate::common::{Fixture, args, error_record, str_field};

#[tokio::test]
async fn test_check_granted_and_denied() {
    let fixture = Fixture::new();
    fixture.relate("document", "1", "viewer", "user", "ann");
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let granted = fixture
        .bridge
        .check_permission(&ctx, &args(["document", "1", "viewer", "user", "ann"]))
        .await
        .unwrap();
    assert_eq!(granted.get("result"), Some(&Term::Bool(true)));
    assert_eq!(str_field(&granted, "lookedUpAt"), Some("mock-token-0"));

    let denied = fixture
        .bridge
        .check_permission(&ctx, &args(["document", "1", "viewer", "user", "bob"]))
        .await
        .unwrap();
    assert_eq!(denied.get("result"), Some(&Term::Bool(false)));
}

#[tokio::test]
async fn test_check_served_from_cache() {
    let fixture = Fixture::new();
    fixture.relate("document", "1", "viewer", "user", "ann");
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);
    let operands = args(["document", "1", "viewer", "user", "ann"]);

    let first = fixture.bridge.check_permission(&ctx, &operands).await.unwrap();
    let second = fixture.bridge.check_permission(&ctx, &operands).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(fixture.backend.request_count(), 1);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_check_without_cache_calls_backend_each_time() {
    let fixture = Fixture::new();
    let cache = NoopCache;
    let ctx = BuiltinContext::new(&cache);
    let operands = args(["document", "1", "viewer", "user", "ann"]);

    fixture.bridge.check_permission(&ctx, &operands).await.unwrap();
    fixture.bridge.check_permission(&ctx, &operands).await.unwrap();

    assert_eq!(fixture.backend.request_count(), 2);
}

#[tokio::test]
async fn test_check_applies_schema_prefix() {
    let fixture = Fixture::with_prefix("tenant1/");
    fixture.relate("tenant1/document", "1", "viewer", "tenant1/user", "ann");
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let result = fixture
        .bridge
        .check_permission(&ctx, &args(["document", "1", "viewer", "user", "ann"]))
        .await
        .unwrap();
    assert_eq!(result.get("result"), Some(&Term::Bool(true)));

    assert_eq!(
        fixture.backend.calls(),
        vec![RecordedCall::CheckPermission(CheckPermissionRequest {
            resource: ObjectReference::new("tenant1/document", "1"),
            permission: "viewer".into(),
            subject: SubjectReference::new("tenant1/user", "ann"),
        })]
    );
}

#[tokio::test]
async fn test_backend_failure_is_returned_as_data_and_not_cached() {
    let fixture = Fixture::new();
    fixture.backend.set_status_failure(StatusCode::Unavailable, "connection refused");
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);
    let operands = args(["document", "1", "viewer", "user", "ann"]);

    let failed = fixture.bridge.check_permission(&ctx, &operands).await.unwrap();
    let record = error_record(&failed).unwrap();
    assert_eq!(record.kind(), "Unavailable");
    assert_eq!(record.description(), "connection refused");
    assert!(cache.is_empty());

    let retried = fixture.bridge.check_permission(&ctx, &operands).await.unwrap();
    assert_eq!(retried.get("result"), Some(&Term::Bool(false)));
    assert_eq!(fixture.backend.request_count(), 2);
}

#[tokio::test]
async fn test_decode_errors_make_no_backend_call() {
    let fixture = Fixture::new();
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let err = fixture
        .bridge
        .check_permission(&ctx, &args(["document", "1", "viewer", "user"]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);

    let mut operands = args(["document", "1", "viewer", "user", "ann"]);
    operands[1] = Term::from(serde_json::json!(1));
    let err = fixture.bridge.check_permission(&ctx, &operands).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(err.message().contains("resourceId"), "{}", err.message());

    assert_eq!(fixture.backend.request_count(), 0);
}

#[tokio::test]
async fn test_deadline_exceeded_is_returned_as_data() {
    let fixture = Fixture::new();
    fixture.backend.set_delay(Duration::from_secs(2));
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache)
        .with_call(CallContext::with_timeout(Duration::from_millis(20)));

    let result = fixture
        .bridge
        .check_permission(&ctx, &args(["document", "1", "viewer", "user", "ann"]))
        .await
        .unwrap();

    let record = error_record(&result).unwrap();
    assert_eq!(record.kind(), "DeadlineExceeded");
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_default_timeout_applies_without_caller_deadline() {
    let config = BridgeConfig::builder()
        .default_timeout(Duration::from_millis(20))
        .build();
    let fixture = Fixture::with_config("", config);
    fixture.backend.set_delay(Duration::from_secs(2));
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let result = fixture
        .bridge
        .check_permission(&ctx, &args(["document", "1", "viewer", "user", "ann"]))
        .await
        .unwrap();

    assert_eq!(error_record(&result).unwrap().kind(), "DeadlineExceeded");
}

#[tokio::test]
async fn test_unbounded_default_timeout_does_not_limit_calls() {
    let config = BridgeConfig::builder().default_timeout(Duration::MAX).build();
    let fixture = Fixture::with_config("", config);
    fixture.relate("document", "1", "viewer", "user", "ann");
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let result = fixture
        .bridge
        .check_permission(&ctx, &args(["document", "1", "viewer", "user", "ann"]))
        .await
        .unwrap();

    assert_eq!(result.get("result"), Some(&Term::Bool(true)));
}
