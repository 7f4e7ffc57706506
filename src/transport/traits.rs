//! Backend client trait and the request/response types it exchanges.
//!
//! Requests carry backend-facing names: object types are already prefixed
//! by the request builders. Responses carry them exactly as the backend
//! returned them.

use std::pin::Pin;

use futures::Stream;

use crate::types::{
    CallContext, ConsistencyToken, LookupPermissionship, ObjectReference, Permissionship,
    Relationship, RelationshipFilter, RelationshipUpdate, SubjectReference,
};
use crate::Error;

/// A stream of server-streamed response elements.
///
/// An `Err` item ends the useful part of the stream.
pub type ResponseStream<T> = Pin<Box<dyn Stream<Item = Result<T, Error>> + Send>>;

/// Client for a SpiceDB-compatible permissions service.
///
/// Implemented over gRPC by [`GrpcBackend`](crate::transport::GrpcBackend)
/// and in memory by [`MockBackend`](crate::testing::MockBackend). Every
/// method receives the caller's [`CallContext`] so implementations can
/// forward its deadline.
#[async_trait::async_trait]
pub trait PermissionBackendClient: Send + Sync {
    /// Checks whether a subject has a permission on a resource.
    async fn check_permission(
        &self,
        ctx: &CallContext,
        request: CheckPermissionRequest,
    ) -> Result<CheckPermissionResponse, Error>;

    /// Streams the resources of a type on which a subject has a permission.
    async fn lookup_resources(
        &self,
        ctx: &CallContext,
        request: LookupResourcesRequest,
    ) -> Result<ResponseStream<LookupResourcesResponse>, Error>;

    /// Streams the subjects of a type that have a permission on a resource.
    async fn lookup_subjects(
        &self,
        ctx: &CallContext,
        request: LookupSubjectsRequest,
    ) -> Result<ResponseStream<LookupSubjectsResponse>, Error>;

    /// Streams the relationships matching a filter.
    async fn read_relationships(
        &self,
        ctx: &CallContext,
        request: ReadRelationshipsRequest,
    ) -> Result<ResponseStream<ReadRelationshipsResponse>, Error>;

    /// Applies relationship updates atomically.
    async fn write_relationships(
        &self,
        ctx: &CallContext,
        request: WriteRelationshipsRequest,
    ) -> Result<WriteRelationshipsResponse, Error>;

    /// Deletes every relationship matching a filter.
    async fn delete_relationships(
        &self,
        ctx: &CallContext,
        request: DeleteRelationshipsRequest,
    ) -> Result<DeleteRelationshipsResponse, Error>;
}

/// Request for [`PermissionBackendClient::check_permission`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckPermissionRequest {
    /// Resource to check.
    pub resource: ObjectReference,
    /// Permission name.
    pub permission: String,
    /// Subject to check.
    pub subject: SubjectReference,
}

/// Response of [`PermissionBackendClient::check_permission`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckPermissionResponse {
    /// Snapshot the check was evaluated at.
    pub checked_at: Option<ConsistencyToken>,
    /// Outcome.
    pub permissionship: Permissionship,
}

/// Request for [`PermissionBackendClient::lookup_resources`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResourcesRequest {
    /// Type of the resources to find.
    pub resource_object_type: String,
    /// Permission name.
    pub permission: String,
    /// Subject whose access is looked up.
    pub subject: SubjectReference,
}

/// One element of a lookup-resources stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupResourcesResponse {
    /// Snapshot the lookup was evaluated at.
    pub looked_up_at: Option<ConsistencyToken>,
    /// Id of the resource found.
    pub resource_object_id: String,
    /// Permission flag of this element.
    pub permissionship: LookupPermissionship,
}

/// Request for [`PermissionBackendClient::lookup_subjects`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupSubjectsRequest {
    /// Resource whose subjects are looked up.
    pub resource: ObjectReference,
    /// Permission name.
    pub permission: String,
    /// Type of the subjects to find.
    pub subject_object_type: String,
}

/// One element of a lookup-subjects stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupSubjectsResponse {
    /// Snapshot the lookup was evaluated at.
    pub looked_up_at: Option<ConsistencyToken>,
    /// Id of the subject found.
    pub subject_object_id: String,
    /// Permission flag of this element.
    pub permissionship: LookupPermissionship,
}

/// Request for [`PermissionBackendClient::read_relationships`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRelationshipsRequest {
    /// Relationships to read.
    pub relationship_filter: RelationshipFilter,
}

/// One element of a read-relationships stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRelationshipsResponse {
    /// Snapshot the read was evaluated at.
    pub read_at: Option<ConsistencyToken>,
    /// The relationship read.
    pub relationship: Relationship,
}

/// Request for [`PermissionBackendClient::write_relationships`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteRelationshipsRequest {
    /// Updates, applied in order.
    pub updates: Vec<RelationshipUpdate>,
}

/// Response of [`PermissionBackendClient::write_relationships`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteRelationshipsResponse {
    /// Snapshot containing the write.
    pub written_at: Option<ConsistencyToken>,
}

/// Request for [`PermissionBackendClient::delete_relationships`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRelationshipsRequest {
    /// Relationships to delete.
    pub relationship_filter: RelationshipFilter,
}

/// Response of [`PermissionBackendClient::delete_relationships`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteRelationshipsResponse {
    /// Snapshot containing the delete.
    pub deleted_at: Option<ConsistencyToken>,
}
