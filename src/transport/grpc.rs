//! gRPC backend speaking `authzed.api.v1.PermissionsService` via tonic.

use std::fmt;

use futures::StreamExt;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

use super::proto::{
    self, check_permission_response, permissions_service_client::PermissionsServiceClient,
    relationship_update,
};
use super::traits::{
    CheckPermissionRequest, CheckPermissionResponse, DeleteRelationshipsRequest,
    DeleteRelationshipsResponse, LookupResourcesRequest, LookupResourcesResponse,
    LookupSubjectsRequest, LookupSubjectsResponse, PermissionBackendClient,
    ReadRelationshipsRequest, ReadRelationshipsResponse, ResponseStream,
    WriteRelationshipsRequest, WriteRelationshipsResponse,
};
use crate::config::PluginConfig;
use crate::types::{
    CallContext, ConsistencyToken, LookupPermissionship, ObjectReference, Permissionship,
    Relationship, RelationshipFilter, RelationshipUpdate, SubjectFilter, SubjectReference,
    UpdateOperation,
};
use crate::{Error, error::Result};

/// [`PermissionBackendClient`] over a tonic channel.
///
/// The channel is established eagerly by [`connect`](Self::connect); the
/// client is cheap to clone and shares the underlying HTTP/2 connection.
///
/// ```no_run
/// use rego_spicedb::{GrpcBackend, PluginConfig};
///
/// # async fn run() -> Result<(), rego_spicedb::Error> {
/// let config = PluginConfig::builder()
///     .endpoint("localhost:50051")
///     .insecure(true)
///     .token("sk_dev")
///     .build();
/// let backend = GrpcBackend::connect(&config).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GrpcBackend {
    client: PermissionsServiceClient<Channel>,
    authorization: Option<MetadataValue<Ascii>>,
}

impl GrpcBackend {
    /// Connects to the endpoint named by `config`.
    ///
    /// Without an explicit scheme the endpoint is dialed over `https`, or
    /// `http` when `insecure` is set. TLS uses the system trust roots.
    pub async fn connect(config: &PluginConfig) -> Result<Self> {
        let (endpoint, authorization) = prepare(config)?;
        let channel = endpoint.connect().await?;
        tracing::debug!(endpoint = %endpoint.uri(), insecure = config.insecure, "connected to spicedb");
        Ok(Self::from_channel(channel, authorization))
    }

    /// Like [`connect`](Self::connect), but defers dialing until the first
    /// request. Must be called within a tokio runtime.
    pub fn connect_lazy(config: &PluginConfig) -> Result<Self> {
        let (endpoint, authorization) = prepare(config)?;
        Ok(Self::from_channel(endpoint.connect_lazy(), authorization))
    }

    fn from_channel(channel: Channel, authorization: Option<MetadataValue<Ascii>>) -> Self {
        Self {
            client: PermissionsServiceClient::new(channel),
            authorization,
        }
    }

    /// Builds a request carrying the bearer token and the remaining time of
    /// the caller's deadline.
    fn make_request<T>(&self, ctx: &CallContext, msg: T) -> tonic::Request<T> {
        let mut request = tonic::Request::new(msg);
        if let Some(value) = &self.authorization {
            request.metadata_mut().insert("authorization", value.clone());
        }
        if let Some(remaining) = ctx.remaining() {
            request.set_timeout(remaining);
        }
        request
    }
}

impl fmt::Debug for GrpcBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrpcBackend")
            .field("authorization", &self.authorization.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

fn prepare(config: &PluginConfig) -> Result<(Endpoint, Option<MetadataValue<Ascii>>)> {
    config.validate()?;

    let uri = endpoint_uri(&config.endpoint, config.insecure);
    let mut endpoint = Endpoint::from_shared(uri.clone())
        .map_err(|e| Error::configuration(format!("invalid endpoint {uri}: {e}")))?;
    if !config.insecure {
        endpoint = endpoint.tls_config(ClientTlsConfig::new().with_native_roots())?;
    }

    Ok((endpoint, bearer(&config.token)?))
}

fn endpoint_uri(endpoint: &str, insecure: bool) -> String {
    if endpoint.contains("://") {
        endpoint.to_owned()
    } else if insecure {
        format!("http://{endpoint}")
    } else {
        format!("https://{endpoint}")
    }
}

fn bearer(token: &str) -> Result<Option<MetadataValue<Ascii>>> {
    if token.is_empty() {
        return Ok(None);
    }
    format!("Bearer {token}")
        .parse()
        .map(Some)
        .map_err(|e: tonic::metadata::errors::InvalidMetadataValue| {
            Error::configuration(format!("invalid token for authorization header: {e}"))
        })
}

#[async_trait::async_trait]
impl PermissionBackendClient for GrpcBackend {
    async fn check_permission(
        &self,
        ctx: &CallContext,
        request: CheckPermissionRequest,
    ) -> Result<CheckPermissionResponse> {
        let msg = proto::CheckPermissionRequest {
            resource: Some(request.resource.into()),
            permission: request.permission,
            subject: Some(request.subject.into()),
        };
        let response = self
            .client
            .clone()
            .check_permission(self.make_request(ctx, msg))
            .await?
            .into_inner();

        Ok(CheckPermissionResponse {
            permissionship: response.permissionship().into(),
            checked_at: token(response.checked_at),
        })
    }

    async fn lookup_resources(
        &self,
        ctx: &CallContext,
        request: LookupResourcesRequest,
    ) -> Result<ResponseStream<LookupResourcesResponse>> {
        let msg = proto::LookupResourcesRequest {
            resource_object_type: request.resource_object_type,
            permission: request.permission,
            subject: Some(request.subject.into()),
        };
        let stream = self
            .client
            .clone()
            .lookup_resources(self.make_request(ctx, msg))
            .await?
            .into_inner();

        Ok(Box::pin(stream.map(|item| -> Result<LookupResourcesResponse> {
            let item = item?;
            Ok(LookupResourcesResponse {
                permissionship: item.permissionship().into(),
                resource_object_id: item.resource_object_id,
                looked_up_at: token(item.looked_up_at),
            })
        })))
    }

    async fn lookup_subjects(
        &self,
        ctx: &CallContext,
        request: LookupSubjectsRequest,
    ) -> Result<ResponseStream<LookupSubjectsResponse>> {
        let msg = proto::LookupSubjectsRequest {
            resource: Some(request.resource.into()),
            permission: request.permission,
            subject_object_type: request.subject_object_type,
        };
        let stream = self
            .client
            .clone()
            .lookup_subjects(self.make_request(ctx, msg))
            .await?
            .into_inner();

        Ok(Box::pin(stream.map(|item| item.map(resolve_subject).map_err(Error::from))))
    }

    async fn read_relationships(
        &self,
        ctx: &CallContext,
        request: ReadRelationshipsRequest,
    ) -> Result<ResponseStream<ReadRelationshipsResponse>> {
        let msg = proto::ReadRelationshipsRequest {
            relationship_filter: Some(request.relationship_filter.into()),
        };
        let stream = self
            .client
            .clone()
            .read_relationships(self.make_request(ctx, msg))
            .await?
            .into_inner();

        Ok(Box::pin(stream.map(|item| -> Result<ReadRelationshipsResponse> {
            let item = item?;
            let relationship = item
                .relationship
                .ok_or_else(|| Error::backend("read response without relationship"))?
                .try_into()?;
            Ok(ReadRelationshipsResponse {
                read_at: token(item.read_at),
                relationship,
            })
        })))
    }

    async fn write_relationships(
        &self,
        ctx: &CallContext,
        request: WriteRelationshipsRequest,
    ) -> Result<WriteRelationshipsResponse> {
        let msg = proto::WriteRelationshipsRequest {
            updates: request.updates.into_iter().map(Into::into).collect(),
        };
        let response = self
            .client
            .clone()
            .write_relationships(self.make_request(ctx, msg))
            .await?
            .into_inner();

        Ok(WriteRelationshipsResponse {
            written_at: token(response.written_at),
        })
    }

    async fn delete_relationships(
        &self,
        ctx: &CallContext,
        request: DeleteRelationshipsRequest,
    ) -> Result<DeleteRelationshipsResponse> {
        let msg = proto::DeleteRelationshipsRequest {
            relationship_filter: Some(request.relationship_filter.into()),
        };
        let response = self
            .client
            .clone()
            .delete_relationships(self.make_request(ctx, msg))
            .await?
            .into_inner();

        Ok(DeleteRelationshipsResponse {
            deleted_at: token(response.deleted_at),
        })
    }
}

// Conversions between domain types and protobuf messages

fn token(token: Option<proto::ZedToken>) -> Option<ConsistencyToken> {
    token
        .map(|t| ConsistencyToken::new(t.token))
        .filter(|t| !t.is_empty())
}

/// Prefers the resolved subject; older servers only fill the flat fields.
#[allow(deprecated)]
fn resolve_subject(item: proto::LookupSubjectsResponse) -> LookupSubjectsResponse {
    let legacy_permissionship = item.permissionship();
    let looked_up_at = token(item.looked_up_at);
    match item.subject {
        Some(subject) => LookupSubjectsResponse {
            permissionship: subject.permissionship().into(),
            subject_object_id: subject.subject_object_id,
            looked_up_at,
        },
        None => LookupSubjectsResponse {
            permissionship: legacy_permissionship.into(),
            subject_object_id: item.subject_object_id,
            looked_up_at,
        },
    }
}

impl From<ObjectReference> for proto::ObjectReference {
    fn from(reference: ObjectReference) -> Self {
        Self {
            object_type: reference.object_type,
            object_id: reference.object_id,
        }
    }
}

impl From<SubjectReference> for proto::SubjectReference {
    fn from(subject: SubjectReference) -> Self {
        Self {
            object: Some(subject.object.into()),
            optional_relation: subject.optional_relation.unwrap_or_default(),
        }
    }
}

impl From<SubjectFilter> for proto::SubjectFilter {
    fn from(filter: SubjectFilter) -> Self {
        Self {
            subject_type: filter.subject_type,
            optional_subject_id: filter.optional_subject_id.unwrap_or_default(),
            optional_relation: None,
        }
    }
}

impl From<RelationshipFilter> for proto::RelationshipFilter {
    fn from(filter: RelationshipFilter) -> Self {
        Self {
            resource_type: filter.resource_type.unwrap_or_default(),
            optional_resource_id: filter.optional_resource_id.unwrap_or_default(),
            optional_relation: filter.optional_relation.unwrap_or_default(),
            optional_subject_filter: filter.optional_subject_filter.map(Into::into),
        }
    }
}

impl From<Relationship> for proto::Relationship {
    fn from(relationship: Relationship) -> Self {
        Self {
            resource: Some(relationship.resource.into()),
            relation: relationship.relation,
            subject: Some(relationship.subject.into()),
        }
    }
}

impl From<RelationshipUpdate> for proto::RelationshipUpdate {
    fn from(update: RelationshipUpdate) -> Self {
        let operation = match update.operation {
            UpdateOperation::Create => relationship_update::Operation::Create,
            UpdateOperation::Touch => relationship_update::Operation::Touch,
            UpdateOperation::Delete => relationship_update::Operation::Delete,
        };
        Self {
            operation: operation as i32,
            relationship: Some(update.relationship.into()),
        }
    }
}

impl TryFrom<proto::Relationship> for Relationship {
    type Error = Error;

    fn try_from(relationship: proto::Relationship) -> Result<Self> {
        let resource = relationship
            .resource
            .ok_or_else(|| Error::backend("relationship without resource"))?;
        let subject = relationship
            .subject
            .ok_or_else(|| Error::backend("relationship without subject"))?;
        let subject_object = subject
            .object
            .ok_or_else(|| Error::backend("relationship subject without object"))?;

        let mut subject_ref =
            SubjectReference::new(subject_object.object_type, subject_object.object_id);
        if !subject.optional_relation.is_empty() {
            subject_ref = subject_ref.with_relation(subject.optional_relation);
        }

        Ok(Relationship::new(
            ObjectReference::new(resource.object_type, resource.object_id),
            relationship.relation,
            subject_ref,
        ))
    }
}

impl From<check_permission_response::Permissionship> for Permissionship {
    fn from(value: check_permission_response::Permissionship) -> Self {
        use check_permission_response::Permissionship as P;
        match value {
            P::Unspecified => Permissionship::Unspecified,
            P::NoPermission => Permissionship::NoPermission,
            P::HasPermission => Permissionship::HasPermission,
            P::ConditionalPermission => Permissionship::ConditionalPermission,
        }
    }
}

impl From<proto::LookupPermissionship> for LookupPermissionship {
    fn from(value: proto::LookupPermissionship) -> Self {
        match value {
            proto::LookupPermissionship::Unspecified => LookupPermissionship::Unspecified,
            proto::LookupPermissionship::HasPermission => LookupPermissionship::HasPermission,
            proto::LookupPermissionship::ConditionalPermission => {
                LookupPermissionship::ConditionalPermission
            },
        }
    }
}
