//! Reading, writing and deleting relationships end to end.

use rego_spicedb::testing::RecordedCall;
use rego_spicedb::transport::{ReadRelationshipsResponse, WriteRelationshipsRequest};
use rego_spicedb::{
    BackendStatus, BridgeConfig, BuiltinContext, ConsistencyToken, Error, ErrorKind, MemoryCache,
    ObjectReference, Relationship, RelationshipTuple, StatusCode, SubjectReference, Term,
    UpdateOperation,
};
use serde_json::json;

use crate::common::{Fixture, args, error_record, str_field, tuple_term};

fn tuples(items: &[RelationshipTuple]) -> Term {
    Term::Array(items.iter().map(tuple_term).collect())
}

fn read_tuples(term: &Term) -> Vec<RelationshipTuple> {
    serde_json::from_value(term.get("relationships").unwrap().to_json()).unwrap()
}

fn doc_viewer(doc: &str, user: &str) -> RelationshipTuple {
    RelationshipTuple::new("document", doc, "viewer", "user", user)
}

#[tokio::test]
async fn test_read_strips_prefix() {
    let fixture = Fixture::with_prefix("app/");
    fixture.relate("app/document", "1", "viewer", "app/user", "ann");
    fixture.relate("app/document", "1", "editor", "app/user", "bob");
    fixture.relate("app/folder", "f", "viewer", "app/user", "ann");
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let result = fixture
        .bridge
        .read_relationships(&ctx, &args(["document", "1", "", "", ""]))
        .await
        .unwrap();

    assert_eq!(result.get("result"), Some(&Term::Bool(true)));
    assert_eq!(str_field(&result, "lookedUpAt"), Some("mock-token-0"));
    assert_eq!(
        read_tuples(&result),
        vec![
            doc_viewer("1", "ann"),
            RelationshipTuple::new("document", "1", "editor", "user", "bob"),
        ]
    );
}

#[tokio::test]
async fn test_read_filters_on_subject() {
    let fixture = Fixture::new();
    fixture.relate("document", "1", "viewer", "user", "ann");
    fixture.relate("document", "2", "viewer", "user", "ann");
    fixture.relate("document", "2", "viewer", "user", "bob");
    fixture.relate("document", "3", "viewer", "group", "ann");
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let result = fixture
        .bridge
        .read_relationships(&ctx, &args(["document", "", "viewer", "user", "ann"]))
        .await
        .unwrap();

    assert_eq!(read_tuples(&result), vec![doc_viewer("1", "ann"), doc_viewer("2", "ann")]);
}

#[tokio::test]
async fn test_read_nothing_is_empty_list() {
    let fixture = Fixture::new();
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let result = fixture
        .bridge
        .read_relationships(&ctx, &args(["document", "", "", "", ""]))
        .await
        .unwrap();

    assert_eq!(result.get("relationships"), Some(&Term::Array(vec![])));
    assert_eq!(str_field(&result, "lookedUpAt"), Some(""));
}

#[tokio::test]
async fn test_read_keeps_every_streamed_element() {
    let fixture = Fixture::new();
    let relationship = |doc: &str| ReadRelationshipsResponse {
        read_at: Some(ConsistencyToken::new("t9")),
        relationship: Relationship::new(
            ObjectReference::new("document", doc),
            "viewer",
            SubjectReference::new("user", "ann"),
        ),
    };
    fixture.backend.script_read_relationships(vec![
        Ok(relationship("1")),
        Ok(relationship("1")),
        Ok(relationship("2")),
    ]);
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let result = fixture
        .bridge
        .read_relationships(&ctx, &args(["document", "", "", "", ""]))
        .await
        .unwrap();

    assert_eq!(read_tuples(&result).len(), 3);
    assert_eq!(str_field(&result, "lookedUpAt"), Some("t9"));
}

#[tokio::test]
async fn test_read_mid_stream_error() {
    let fixture = Fixture::new();
    fixture.backend.script_read_relationships(vec![Err(Error::transport(BackendStatus::new(
        StatusCode::Internal,
        "datastore failure",
    )))]);
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let result = fixture
        .bridge
        .read_relationships(&ctx, &args(["document", "", "", "", ""]))
        .await
        .unwrap();

    let record = error_record(&result).unwrap();
    assert_eq!(record.kind(), "Internal");
    assert_eq!(record.description(), "datastore failure");
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_write_sends_one_ordered_request() {
    let fixture = Fixture::with_prefix("app/");
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let creates = [doc_viewer("c1", "ann"), doc_viewer("c2", "ann")];
    let touches = [doc_viewer("t1", "bob")];
    let deletes = [doc_viewer("d1", "cat"), doc_viewer("d2", "cat"), doc_viewer("d3", "cat")];

    let result = fixture
        .bridge
        .write_relationships(&ctx, &[tuples(&creates), tuples(&touches), tuples(&deletes)])
        .await
        .unwrap();

    assert_eq!(result.get("result"), Some(&Term::Bool(true)));
    assert_eq!(str_field(&result, "writtenAt"), Some("mock-token-1"));

    let calls = fixture.backend.calls();
    assert_eq!(calls.len(), 1);
    let RecordedCall::WriteRelationships(WriteRelationshipsRequest { updates }) = &calls[0] else {
        unreachable!("expected a write, got {:?}", calls[0]);
    };

    let operations: Vec<_> = updates.iter().map(|u| u.operation).collect();
    assert_eq!(
        operations,
        [
            UpdateOperation::Create,
            UpdateOperation::Create,
            UpdateOperation::Touch,
            UpdateOperation::Delete,
            UpdateOperation::Delete,
            UpdateOperation::Delete,
        ]
    );
    let ids: Vec<_> = updates.iter().map(|u| u.relationship.resource.object_id.as_str()).collect();
    assert_eq!(ids, ["c1", "c2", "t1", "d1", "d2", "d3"]);
    assert!(
        updates
            .iter()
            .all(|u| u.relationship.resource.object_type == "app/document"
                && u.relationship.subject.object.object_type == "app/user")
    );

    assert_eq!(fixture.backend.relationships().len(), 3);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_write_accepts_sets() {
    let fixture = Fixture::new();
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let creates = Term::Set(vec![tuple_term(&doc_viewer("1", "ann"))]);
    fixture
        .bridge
        .write_relationships(&ctx, &[creates, Term::Set(vec![]), Term::Array(vec![])])
        .await
        .unwrap();

    assert_eq!(fixture.backend.relationships().len(), 1);
}

#[tokio::test]
async fn test_write_missing_field_makes_no_backend_call() {
    let fixture = Fixture::new();
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let incomplete = Term::from(json!({
        "resourceType": "document",
        "resourceId": "1",
        "relationship": "viewer",
        "subjectType": "user",
    }));
    let err = fixture
        .bridge
        .write_relationships(
            &ctx,
            &[tuples(&[doc_viewer("1", "ann")]), Term::Array(vec![]), Term::Array(vec![incomplete])],
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.message(), "subjectId not set: deletes[0]");
    assert_eq!(fixture.backend.request_count(), 0);
}

#[tokio::test]
async fn test_write_rejects_non_object_elements() {
    let fixture = Fixture::new();
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let err = fixture
        .bridge
        .write_relationships(
            &ctx,
            &[
                Term::Array(vec![Term::from("document:1#viewer@user:ann")]),
                Term::Array(vec![]),
                Term::Array(vec![]),
            ],
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
    assert_eq!(fixture.backend.request_count(), 0);
}

#[tokio::test]
async fn test_write_is_never_cached() {
    let fixture = Fixture::new();
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);
    let operands = [Term::Array(vec![]), tuples(&[doc_viewer("1", "ann")]), Term::Array(vec![])];

    let first = fixture.bridge.write_relationships(&ctx, &operands).await.unwrap();
    let second = fixture.bridge.write_relationships(&ctx, &operands).await.unwrap();

    assert_eq!(fixture.backend.request_count(), 2);
    assert_ne!(first, second);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_write_conflict_is_data() {
    let fixture = Fixture::new();
    fixture.relate("document", "1", "viewer", "user", "ann");
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let result = fixture
        .bridge
        .write_relationships(
            &ctx,
            &[tuples(&[doc_viewer("1", "ann")]), Term::Array(vec![]), Term::Array(vec![])],
        )
        .await
        .unwrap();

    assert_eq!(error_record(&result).unwrap().kind(), "AlreadyExists");
}

#[tokio::test]
async fn test_delete_removes_matching() {
    let fixture = Fixture::with_prefix("app/");
    fixture.relate("app/document", "1", "viewer", "app/user", "ann");
    fixture.relate("app/document", "1", "editor", "app/user", "ann");
    fixture.relate("app/document", "2", "viewer", "app/user", "ann");
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);

    let result = fixture
        .bridge
        .delete_relationships(&ctx, &args(["document", "1", "", "", ""]))
        .await
        .unwrap();

    assert_eq!(result.get("result"), Some(&Term::Bool(true)));
    assert_eq!(str_field(&result, "deletedAt"), Some("mock-token-1"));
    assert_eq!(
        fixture.backend.relationships(),
        vec![Relationship::new(
            ObjectReference::new("app/document", "2"),
            "viewer",
            SubjectReference::new("app/user", "ann"),
        )]
    );
}

#[tokio::test]
async fn test_delete_not_cached_by_default() {
    let fixture = Fixture::new();
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);
    let operands = args(["document", "1", "", "", ""]);

    fixture.bridge.delete_relationships(&ctx, &operands).await.unwrap();
    fixture.bridge.delete_relationships(&ctx, &operands).await.unwrap();

    assert_eq!(fixture.backend.request_count(), 2);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_delete_cached_when_enabled() {
    let config = BridgeConfig::builder().cache_deletes(true).build();
    let fixture = Fixture::with_config("", config);
    let cache = MemoryCache::new();
    let ctx = BuiltinContext::new(&cache);
    let operands = args(["document", "1", "", "", ""]);

    let first = fixture.bridge.delete_relationships(&ctx, &operands).await.unwrap();
    let second = fixture.bridge.delete_relationships(&ctx, &operands).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(fixture.backend.request_count(), 1);
    assert_eq!(cache.len(), 1);
}
