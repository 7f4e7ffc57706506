//! `spicedb.lookup_resources` and `spicedb.lookup_subjects` end to end.

use rego_spicedb::testing::RecordedCall;
use rego_spicedb::transport::{
    LookupResourcesRequest, LookupResourcesResponse, LookupSubjectsRequest,
    LookupSubjectsResponse,
};
use rego_spicedb::{
    BackendStatus, BuiltinContext, ConsistencyToken, Error, LookupPermissionship, MemoryCache,
    ObjectReference, StatusCode, SubjectReference, Term,
};

use crate::common::{Fixture, args, error_record, str_field, strings};

fn resource(id: &str, token: &str, permissionship: LookupPermissionship) -> LookupResourcesResponse {
    LookupResourcesResponse {
        looked_up_at: Some(ConsistencyToken::new(token)),
        resource_object_id: id.into(),
        permissionship,
    }
}

fn subject(id: &str, token: &str, permissionship: LookupPermissionship) -> LookupSubjectsResponse {
    LookupSubjectsResponse {
        looked_up_at: Some(ConsistencyToken::new(token)),
        subject_object_id: id.into(),
        permissionship,
    }
}

#[tokio::test]
async fn test_lookup_resources_from_store() {
    let fixture = Fixture::with_prefix("app/");
    fixture.relate("app/document", "1", "viewer", "app/user", "ann");
    fixture.relate("app/document", "2", "viewer", "app/user", "ann");
    fixture.relate("app/document", "3", "viewer", "app/user", "bob");
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let result = fixture
        .bridge
        .lookup_resources(&ctx, &args(["document", "viewer", "user", "ann"]))
        .await
        .unwrap();

    assert_eq!(result.get("result"), Some(&Term::Bool(true)));
    assert_eq!(strings(&result, "resourceIds"), ["1", "2"]);
    assert_eq!(str_field(&result, "lookedUpAt"), Some("mock-token-0"));
    assert_eq!(str_field(&result, "resourceType"), Some("document"));
    assert_eq!(str_field(&result, "permission"), Some("viewer"));
    assert_eq!(str_field(&result, "subjectType"), Some("user"));
    assert_eq!(str_field(&result, "subjectId"), Some("ann"));

    assert_eq!(
        fixture.backend.calls(),
        vec![RecordedCall::LookupResources(LookupResourcesRequest {
            resource_object_type: "app/document".into(),
            permission: "viewer".into(),
            subject: SubjectReference::new("app/user", "ann"),
        })]
    );
}

#[tokio::test]
async fn test_lookup_resources_keeps_only_definite_grants() {
    let fixture = Fixture::new();
    fixture.backend.script_lookup_resources(vec![
        Ok(resource("a", "t1", LookupPermissionship::ConditionalPermission)),
        Ok(resource("b", "t2", LookupPermissionship::HasPermission)),
        Ok(resource("c", "t3", LookupPermissionship::Unspecified)),
        Ok(resource("d", "t4", LookupPermissionship::HasPermission)),
    ]);
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let result = fixture
        .bridge
        .lookup_resources(&ctx, &args(["document", "viewer", "user", "ann"]))
        .await
        .unwrap();

    assert_eq!(strings(&result, "resourceIds"), ["b", "d"]);
    assert_eq!(str_field(&result, "lookedUpAt"), Some("t2"));
}

#[tokio::test]
async fn test_lookup_resources_empty_stream() {
    let fixture = Fixture::new();
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let result = fixture
        .bridge
        .lookup_resources(&ctx, &args(["document", "viewer", "user", "ann"]))
        .await
        .unwrap();

    assert_eq!(result.get("result"), Some(&Term::Bool(true)));
    assert!(strings(&result, "resourceIds").is_empty());
    assert_eq!(str_field(&result, "lookedUpAt"), Some(""));
}

#[tokio::test]
async fn test_lookup_resources_mid_stream_error_discards_results() {
    let fixture = Fixture::new();
    fixture.backend.script_lookup_resources(vec![
        Ok(resource("a", "t1", LookupPermissionship::HasPermission)),
        Err(Error::transport(BackendStatus::new(StatusCode::Unavailable, "stream reset"))),
        Ok(resource("b", "t1", LookupPermissionship::HasPermission)),
    ]);
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);
    let operands = args(["document", "viewer", "user", "ann"]);

    let failed = fixture.bridge.lookup_resources(&ctx, &operands).await.unwrap();
    let record = error_record(&failed).unwrap();
    assert_eq!(record.kind(), "Unavailable");
    assert_eq!(record.description(), "stream reset");
    assert!(failed.get("resourceIds").is_none());
    assert!(cache.is_empty());

    fixture.bridge.lookup_resources(&ctx, &operands).await.unwrap();
    assert_eq!(fixture.backend.request_count(), 2);
}

#[tokio::test]
async fn test_lookup_resources_cached_per_query() {
    let fixture = Fixture::new();
    fixture.relate("document", "1", "viewer", "user", "ann");
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let first = fixture
        .bridge
        .lookup_resources(&ctx, &args(["document", "viewer", "user", "ann"]))
        .await
        .unwrap();
    let again = fixture
        .bridge
        .lookup_resources(&ctx, &args(["document", "viewer", "user", "ann"]))
        .await
        .unwrap();
    fixture
        .bridge
        .lookup_resources(&ctx, &args(["document", "viewer", "user", "bob"]))
        .await
        .unwrap();

    assert_eq!(first, again);
    assert_eq!(fixture.backend.request_count(), 2);
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn test_lookup_subjects_from_store() {
    let fixture = Fixture::with_prefix("app/");
    fixture.relate("app/document", "1", "viewer", "app/user", "ann");
    fixture.relate("app/document", "1", "viewer", "app/user", "bob");
    fixture.relate("app/document", "1", "viewer", "app/group", "eng");
    fixture.relate("app/document", "2", "viewer", "app/user", "cat");
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let result = fixture
        .bridge
        .lookup_subjects(&ctx, &args(["document", "1", "viewer", "user"]))
        .await
        .unwrap();

    assert_eq!(strings(&result, "subjectIds"), ["ann", "bob"]);
    assert_eq!(str_field(&result, "resourceType"), Some("document"));
    assert_eq!(str_field(&result, "resourceId"), Some("1"));
    assert_eq!(str_field(&result, "permission"), Some("viewer"));
    assert_eq!(str_field(&result, "subjectType"), Some("user"));

    assert_eq!(
        fixture.backend.calls(),
        vec![RecordedCall::LookupSubjects(LookupSubjectsRequest {
            resource: ObjectReference::new("app/document", "1"),
            permission: "viewer".into(),
            subject_object_type: "app/user".into(),
        })]
    );
}

#[tokio::test]
async fn test_lookup_subjects_keeps_only_definite_grants() {
    let fixture = Fixture::new();
    fixture.backend.script_lookup_subjects(vec![
        Ok(subject("ann", "t1", LookupPermissionship::HasPermission)),
        Ok(subject("bob", "t1", LookupPermissionship::ConditionalPermission)),
    ]);
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let result = fixture
        .bridge
        .lookup_subjects(&ctx, &args(["document", "1", "viewer", "user"]))
        .await
        .unwrap();

    assert_eq!(strings(&result, "subjectIds"), ["ann"]);
    assert_eq!(str_field(&result, "lookedUpAt"), Some("t1"));
}

#[tokio::test]
async fn test_lookup_subjects_initial_error_is_data() {
    let fixture = Fixture::new();
    fixture
        .backend
        .set_status_failure(StatusCode::FailedPrecondition, "object definition `doc` not found");
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let result = fixture
        .bridge
        .lookup_subjects(&ctx, &args(["doc", "1", "viewer", "user"]))
        .await
        .unwrap();

    let record = error_record(&result).unwrap();
    assert_eq!(record.kind(), "FailedPrecondition");
    assert!(cache.is_empty());
}
