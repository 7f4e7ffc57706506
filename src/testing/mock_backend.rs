//! In-memory backend for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::stream;
use parking_lot::{Mutex, RwLock};

use crate::Error;
use crate::error::{BackendStatus, StatusCode};
use crate::transport::{
    CheckPermissionRequest, CheckPermissionResponse, DeleteRelationshipsRequest,
    DeleteRelationshipsResponse, LookupResourcesRequest, LookupResourcesResponse,
    LookupSubjectsRequest, LookupSubjectsResponse, PermissionBackendClient,
    ReadRelationshipsRequest, ReadRelationshipsResponse, ResponseStream,
    WriteRelationshipsRequest, WriteRelationshipsResponse,
};
use crate::types::{
    CallContext, ConsistencyToken, LookupPermissionship, ObjectReference, Permissionship,
    Relationship, RelationshipTuple, SubjectReference, UpdateOperation,
};

/// A request received by [`MockBackend`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    /// `CheckPermission`
    CheckPermission(CheckPermissionRequest),
    /// `LookupResources`
    LookupResources(LookupResourcesRequest),
    /// `LookupSubjects`
    LookupSubjects(LookupSubjectsRequest),
    /// `ReadRelationships`
    ReadRelationships(ReadRelationshipsRequest),
    /// `WriteRelationships`
    WriteRelationships(WriteRelationshipsRequest),
    /// `DeleteRelationships`
    DeleteRelationships(DeleteRelationshipsRequest),
}

type Script<T> = Mutex<VecDeque<Vec<Result<T, Error>>>>;

/// In-memory [`PermissionBackendClient`].
///
/// Answers from a flat relationship store: a check succeeds when the exact
/// relationship `resource#permission@subject` exists, without evaluating a
/// schema. Names are stored as the backend sees them, so with a schema
/// prefix configured the stored types must carry it.
///
/// Streamed responses can be scripted per call, including elements that
/// carry other permission flags and errors in the middle of a stream.
/// Every request is counted and recorded.
///
/// ```rust
/// use rego_spicedb::testing::MockBackend;
/// use rego_spicedb::RelationshipTuple;
///
/// let backend = MockBackend::new();
/// backend.add_relationship(RelationshipTuple::new("document", "1", "viewer", "user", "ann"));
/// assert_eq!(backend.relationships().len(), 1);
/// assert_eq!(backend.request_count(), 0);
/// ```
#[derive(Default)]
pub struct MockBackend {
    relationships: RwLock<Vec<Relationship>>,
    revision: AtomicU64,
    request_count: AtomicU64,
    failure: RwLock<Option<Error>>,
    delay: RwLock<Option<Duration>>,
    calls: RwLock<Vec<RecordedCall>>,
    lookup_resources_script: Script<LookupResourcesResponse>,
    lookup_subjects_script: Script<LookupSubjectsResponse>,
    read_relationships_script: Script<ReadRelationshipsResponse>,
}

impl MockBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a relationship, using the tuple's names verbatim.
    pub fn add_relationship(&self, tuple: RelationshipTuple) {
        self.add(Relationship::new(
            ObjectReference::new(tuple.resource_type, tuple.resource_id),
            tuple.relationship,
            SubjectReference::new(tuple.subject_type, tuple.subject_id),
        ));
    }

    /// Adds a relationship.
    pub fn add(&self, relationship: Relationship) {
        let mut relationships = self.relationships.write();
        if !relationships.contains(&relationship) {
            relationships.push(relationship);
        }
    }

    /// Returns the stored relationships.
    pub fn relationships(&self) -> Vec<Relationship> {
        self.relationships.read().clone()
    }

    /// Removes every stored relationship.
    pub fn clear_relationships(&self) {
        self.relationships.write().clear();
    }

    /// Fails the next request with `error`.
    pub fn set_failure(&self, error: Error) {
        *self.failure.write() = Some(error);
    }

    /// Fails the next request with a backend status.
    pub fn set_status_failure(&self, code: StatusCode, message: &str) {
        self.set_failure(Error::transport(BackendStatus::new(code, message)));
    }

    /// Clears a pending failure.
    pub fn clear_failure(&self) {
        *self.failure.write() = None;
    }

    /// Delays every response by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.write() = Some(delay);
    }

    /// Serves the next `LookupResources` call from `elements`.
    pub fn script_lookup_resources(&self, elements: Vec<Result<LookupResourcesResponse, Error>>) {
        self.lookup_resources_script.lock().push_back(elements);
    }

    /// Serves the next `LookupSubjects` call from `elements`.
    pub fn script_lookup_subjects(&self, elements: Vec<Result<LookupSubjectsResponse, Error>>) {
        self.lookup_subjects_script.lock().push_back(elements);
    }

    /// Serves the next `ReadRelationships` call from `elements`.
    pub fn script_read_relationships(
        &self,
        elements: Vec<Result<ReadRelationshipsResponse, Error>>,
    ) {
        self.read_relationships_script.lock().push_back(elements);
    }

    /// Returns the number of requests received.
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Returns the requests received, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().clone()
    }

    /// Returns the token the next read would carry.
    pub fn current_token(&self) -> ConsistencyToken {
        ConsistencyToken::new(format!("mock-token-{}", self.revision.load(Ordering::Relaxed)))
    }

    async fn begin(&self, call: RecordedCall) -> Result<(), Error> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        self.calls.write().push(call);

        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.failure.write().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn bump_revision(&self) -> ConsistencyToken {
        let revision = self.revision.fetch_add(1, Ordering::Relaxed) + 1;
        ConsistencyToken::new(format!("mock-token-{revision}"))
    }
}

fn boxed<T: Send + 'static>(elements: Vec<Result<T, Error>>) -> ResponseStream<T> {
    Box::pin(stream::iter(elements))
}

#[async_trait::async_trait]
impl PermissionBackendClient for MockBackend {
    async fn check_permission(
        &self,
        _ctx: &CallContext,
        request: CheckPermissionRequest,
    ) -> Result<CheckPermissionResponse, Error> {
        self.begin(RecordedCall::CheckPermission(request.clone())).await?;

        let granted = self.relationships.read().iter().any(|rel| {
            rel.resource == request.resource
                && rel.relation == request.permission
                && rel.subject.object == request.subject.object
        });

        Ok(CheckPermissionResponse {
            checked_at: Some(self.current_token()),
            permissionship: if granted {
                Permissionship::HasPermission
            } else {
                Permissionship::NoPermission
            },
        })
    }

    async fn lookup_resources(
        &self,
        _ctx: &CallContext,
        request: LookupResourcesRequest,
    ) -> Result<ResponseStream<LookupResourcesResponse>, Error> {
        self.begin(RecordedCall::LookupResources(request.clone())).await?;
        if let Some(script) = self.lookup_resources_script.lock().pop_front() {
            return Ok(boxed(script));
        }

        let token = self.current_token();
        let elements = self
            .relationships
            .read()
            .iter()
            .filter(|rel| {
                rel.resource.object_type == request.resource_object_type
                    && rel.relation == request.permission
                    && rel.subject.object == request.subject.object
            })
            .map(|rel| {
                Ok(LookupResourcesResponse {
                    looked_up_at: Some(token.clone()),
                    resource_object_id: rel.resource.object_id.clone(),
                    permissionship: LookupPermissionship::HasPermission,
                })
            })
            .collect();
        Ok(boxed(elements))
    }

    async fn lookup_subjects(
        &self,
        _ctx: &CallContext,
        request: LookupSubjectsRequest,
    ) -> Result<ResponseStream<LookupSubjectsResponse>, Error> {
        self.begin(RecordedCall::LookupSubjects(request.clone())).await?;
        if let Some(script) = self.lookup_subjects_script.lock().pop_front() {
            return Ok(boxed(script));
        }

        let token = self.current_token();
        let elements = self
            .relationships
            .read()
            .iter()
            .filter(|rel| {
                rel.resource == request.resource
                    && rel.relation == request.permission
                    && rel.subject.object.object_type == request.subject_object_type
            })
            .map(|rel| {
                Ok(LookupSubjectsResponse {
                    looked_up_at: Some(token.clone()),
                    subject_object_id: rel.subject.object.object_id.clone(),
                    permissionship: LookupPermissionship::HasPermission,
                })
            })
            .collect();
        Ok(boxed(elements))
    }

    async fn read_relationships(
        &self,
        _ctx: &CallContext,
        request: ReadRelationshipsRequest,
    ) -> Result<ResponseStream<ReadRelationshipsResponse>, Error> {
        self.begin(RecordedCall::ReadRelationships(request.clone())).await?;
        if let Some(script) = self.read_relationships_script.lock().pop_front() {
            return Ok(boxed(script));
        }

        let token = self.current_token();
        let elements = self
            .relationships
            .read()
            .iter()
            .filter(|rel| request.relationship_filter.matches(rel))
            .map(|rel| {
                Ok(ReadRelationshipsResponse {
                    read_at: Some(token.clone()),
                    relationship: rel.clone(),
                })
            })
            .collect();
        Ok(boxed(elements))
    }

    async fn write_relationships(
        &self,
        _ctx: &CallContext,
        request: WriteRelationshipsRequest,
    ) -> Result<WriteRelationshipsResponse, Error> {
        self.begin(RecordedCall::WriteRelationships(request.clone())).await?;

        let mut relationships = self.relationships.write();
        let mut next = relationships.clone();
        for update in request.updates {
            let exists = next.contains(&update.relationship);
            match update.operation {
                UpdateOperation::Create if exists => {
                    return Err(Error::transport(BackendStatus::new(
                        StatusCode::AlreadyExists,
                        format!("relationship {} already exists", update.relationship),
                    )));
                },
                UpdateOperation::Create | UpdateOperation::Touch => {
                    if !exists {
                        next.push(update.relationship);
                    }
                },
                UpdateOperation::Delete => next.retain(|rel| *rel != update.relationship),
            }
        }
        *relationships = next;

        Ok(WriteRelationshipsResponse {
            written_at: Some(self.bump_revision()),
        })
    }

    async fn delete_relationships(
        &self,
        _ctx: &CallContext,
        request: DeleteRelationshipsRequest,
    ) -> Result<DeleteRelationshipsResponse, Error> {
        self.begin(RecordedCall::DeleteRelationships(request.clone())).await?;

        self.relationships
            .write()
            .retain(|rel| !request.relationship_filter.matches(rel));

        Ok(DeleteRelationshipsResponse {
            deleted_at: Some(self.bump_revision()),
        })
    }
}
