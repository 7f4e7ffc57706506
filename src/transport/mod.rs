//! Backend transport.
//!
//! - [`PermissionBackendClient`]: the six RPCs the bridge issues
//! - [`GrpcBackend`]: tonic client for `authzed.api.v1.PermissionsService`
//!   (feature `grpc`, on by default)
//!
//! An in-memory implementation for tests lives in
//! [`testing`](crate::testing).

mod traits;

#[cfg(feature = "grpc")]
mod grpc;

#[cfg(feature = "grpc")]
mod proto;

pub use traits::{
    CheckPermissionRequest, CheckPermissionResponse, DeleteRelationshipsRequest,
    DeleteRelationshipsResponse, LookupResourcesRequest, LookupResourcesResponse,
    LookupSubjectsRequest, LookupSubjectsResponse, PermissionBackendClient,
    ReadRelationshipsRequest, ReadRelationshipsResponse, ResponseStream,
    WriteRelationshipsRequest, WriteRelationshipsResponse,
};

#[cfg(feature = "grpc")]
pub use grpc::GrpcBackend;
