//! The builtin façade.
//!
//! Every builtin follows the same flow: decode the operands, consult the
//! result cache, take the configured client, build the backend request,
//! call the backend under the caller's deadline, reduce the response and
//! encode it. Successful results are cached (writes never are, deletes
//! only when [`BridgeConfig::cache_deletes`] is set). Backend failures come
//! back as an `{"error", "desc"}` object instead of an `Err`.

mod reduce;
mod requests;
mod results;

use std::future::Future;

use serde::Serialize;

use self::reduce::reduce_stream;
use self::results::{
    CheckPermissionResult, DeleteRelationshipsResult, LookupResourcesResult,
    LookupSubjectsResult, ReadRelationshipsResult, WriteRelationshipsResult,
};
use crate::cache::{CacheKey, OperationKind, ResultCache};
use crate::client::ClientAccessor;
use crate::codec::{
    self, CheckPermissionArgs, FilterArgs, LookupResourcesArgs, LookupSubjectsArgs, Term,
    WriteArgs,
};
use crate::config::{BridgeConfig, SchemaPrefix};
use crate::types::{CallContext, Relationship, RelationshipTuple};
use crate::{Error, ErrorRecord, error::Result};

/// Per-evaluation context handed to every builtin call.
///
/// ```rust
/// use rego_spicedb::{BuiltinContext, CallContext, MemoryCache};
/// use std::time::Duration;
///
/// let cache = MemoryCache::new();
/// let ctx = BuiltinContext::new(&cache)
///     .with_call(CallContext::with_timeout(Duration::from_secs(1)));
/// assert!(ctx.call().deadline().is_some());
/// ```
#[derive(Clone, Copy)]
pub struct BuiltinContext<'a> {
    cache: &'a dyn ResultCache,
    call: CallContext,
}

impl<'a> BuiltinContext<'a> {
    /// Creates a context over the evaluation's cache, without a deadline.
    pub fn new(cache: &'a dyn ResultCache) -> Self {
        Self {
            cache,
            call: CallContext::new(),
        }
    }

    /// Sets the call context (deadline).
    #[must_use]
    pub fn with_call(mut self, call: CallContext) -> Self {
        self.call = call;
        self
    }

    /// Returns the result cache.
    #[inline]
    pub fn cache(&self) -> &'a dyn ResultCache {
        self.cache
    }

    /// Returns the call context.
    #[inline]
    pub fn call(&self) -> &CallContext {
        &self.call
    }
}

/// Entry point for the six SpiceDB builtins.
///
/// `Bridge` is cheap to clone; clones share the client accessor.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use rego_spicedb::prelude::*;
/// use rego_spicedb::testing::MockBackend;
///
/// # tokio_test::block_on(async {
/// let backend = Arc::new(MockBackend::new());
/// backend.add_relationship(RelationshipTuple::new("document", "1", "viewer", "user", "ann"));
///
/// let accessor = ClientAccessor::with_client(ConfiguredClient::new(backend, SchemaPrefix::default()));
/// let bridge = Bridge::new(accessor);
///
/// let cache = MemoryCache::new();
/// let ctx = BuiltinContext::new(&cache);
/// let result = bridge
///     .check_permission(&ctx, &["document".into(), "1".into(), "viewer".into(), "user".into(), "ann".into()])
///     .await?;
/// assert_eq!(result.get("result"), Some(&Term::Bool(true)));
/// # Ok::<(), rego_spicedb::Error>(())
/// # }).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Bridge {
    accessor: ClientAccessor,
    config: BridgeConfig,
}

impl Bridge {
    /// Creates a bridge with the default configuration.
    pub fn new(accessor: ClientAccessor) -> Self {
        Self::with_config(accessor, BridgeConfig::default())
    }

    /// Creates a bridge with an explicit configuration.
    pub fn with_config(accessor: ClientAccessor, config: BridgeConfig) -> Self {
        Self { accessor, config }
    }

    /// Returns the client accessor.
    pub fn accessor(&self) -> &ClientAccessor {
        &self.accessor
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// `spicedb.check_permission(resourceType, resourceId, permission,
    /// subjectType, subjectId)`
    ///
    /// Returns `{result, lookedUpAt}`; `result` is `true` only for a
    /// definite grant.
    pub async fn check_permission(&self, ctx: &BuiltinContext<'_>, args: &[Term]) -> Result<Term> {
        let args = CheckPermissionArgs::decode(args)?;
        let key = args.cache_key();
        if let Some(hit) = cached(ctx, &key) {
            return Ok(hit);
        }

        let configured = self.accessor.require()?;
        let call = self.call_context(ctx);
        let outcome = bounded(OperationKind::CheckPermission, &call, async {
            let request = requests::check_permission(&args, configured.prefix());
            let response = configured.client().check_permission(&call, request).await?;
            Ok::<_, Error>(CheckPermissionResult {
                result: response.permissionship.is_granted(),
                looked_up_at: response.checked_at.unwrap_or_default(),
            })
        })
        .await;

        settle(ctx, OperationKind::CheckPermission, Some(key), outcome)
    }

    /// `spicedb.lookup_resources(resourceType, permission, subjectType,
    /// subjectId)`
    ///
    /// Returns the ids of the resources the subject definitely has the
    /// permission on, with the query echoed back.
    pub async fn lookup_resources(&self, ctx: &BuiltinContext<'_>, args: &[Term]) -> Result<Term> {
        let args = LookupResourcesArgs::decode(args)?;
        let key = args.cache_key();
        if let Some(hit) = cached(ctx, &key) {
            return Ok(hit);
        }

        let configured = self.accessor.require()?;
        let call = self.call_context(ctx);
        let outcome = bounded(OperationKind::LookupResources, &call, async {
            let request = requests::lookup_resources(&args, configured.prefix());
            let stream = configured.client().lookup_resources(&call, request).await?;
            let reduced = reduce_stream(
                stream,
                |element| element.permissionship.is_granted(),
                |element| (element.resource_object_id, element.looked_up_at),
            )
            .await?;
            Ok::<_, Error>(LookupResourcesResult {
                result: true,
                looked_up_at: reduced.token.unwrap_or_default(),
                resource_ids: reduced.items,
                resource_type: args.resource_type.clone(),
                permission: args.permission.clone(),
                subject_type: args.subject_type.clone(),
                subject_id: args.subject_id.clone(),
            })
        })
        .await;

        settle(ctx, OperationKind::LookupResources, Some(key), outcome)
    }

    /// `spicedb.lookup_subjects(resourceType, resourceId, permission,
    /// subjectType)`
    ///
    /// Returns the ids of the subjects that definitely have the permission
    /// on the resource, with the query echoed back.
    pub async fn lookup_subjects(&self, ctx: &BuiltinContext<'_>, args: &[Term]) -> Result<Term> {
        let args = LookupSubjectsArgs::decode(args)?;
        let key = args.cache_key();
        if let Some(hit) = cached(ctx, &key) {
            return Ok(hit);
        }

        let configured = self.accessor.require()?;
        let call = self.call_context(ctx);
        let outcome = bounded(OperationKind::LookupSubjects, &call, async {
            let request = requests::lookup_subjects(&args, configured.prefix());
            let stream = configured.client().lookup_subjects(&call, request).await?;
            let reduced = reduce_stream(
                stream,
                |element| element.permissionship.is_granted(),
                |element| (element.subject_object_id, element.looked_up_at),
            )
            .await?;
            Ok::<_, Error>(LookupSubjectsResult {
                result: true,
                looked_up_at: reduced.token.unwrap_or_default(),
                subject_ids: reduced.items,
                resource_type: args.resource_type.clone(),
                resource_id: args.resource_id.clone(),
                permission: args.permission.clone(),
                subject_type: args.subject_type.clone(),
            })
        })
        .await;

        settle(ctx, OperationKind::LookupSubjects, Some(key), outcome)
    }

    /// `spicedb.read_relationships(resourceType, resourceId, relation,
    /// subjectType, subjectId)`
    ///
    /// Empty operands leave their filter dimension unconstrained. Returns
    /// every matching relationship as a tuple object.
    pub async fn read_relationships(&self, ctx: &BuiltinContext<'_>, args: &[Term]) -> Result<Term> {
        let args = FilterArgs::decode(OperationKind::ReadRelationships, args)?;
        let key = args.cache_key(OperationKind::ReadRelationships);
        if let Some(hit) = cached(ctx, &key) {
            return Ok(hit);
        }

        let configured = self.accessor.require()?;
        let call = self.call_context(ctx);
        let outcome = bounded(OperationKind::ReadRelationships, &call, async {
            let prefix = configured.prefix();
            let request = requests::read_relationships(&args, prefix);
            let stream = configured.client().read_relationships(&call, request).await?;
            let reduced = reduce_stream(
                stream,
                |_| true,
                |element| (to_tuple(&element.relationship, prefix), element.read_at),
            )
            .await?;
            Ok::<_, Error>(ReadRelationshipsResult {
                result: true,
                looked_up_at: reduced.token.unwrap_or_default(),
                relationships: reduced.items,
            })
        })
        .await;

        settle(ctx, OperationKind::ReadRelationships, Some(key), outcome)
    }

    /// `spicedb.write_relationships(creates, touches, deletes)`
    ///
    /// Each operand is an array or set of tuple objects. All updates go to
    /// the backend in one request, creates first, then touches, then
    /// deletes. Never cached.
    pub async fn write_relationships(&self, ctx: &BuiltinContext<'_>, args: &[Term]) -> Result<Term> {
        let args = WriteArgs::decode(args)?;

        let configured = self.accessor.require()?;
        let request = requests::write_relationships(&args, configured.prefix())?;
        let call = self.call_context(ctx);
        let outcome = bounded(OperationKind::WriteRelationships, &call, async {
            let response = configured.client().write_relationships(&call, request).await?;
            Ok::<_, Error>(WriteRelationshipsResult {
                result: true,
                written_at: response.written_at.unwrap_or_default(),
            })
        })
        .await;

        settle(ctx, OperationKind::WriteRelationships, None, outcome)
    }

    /// `spicedb.delete_relationships(resourceType, resourceId, relation,
    /// subjectType, subjectId)`
    ///
    /// Deletes every relationship matching the filter built the same way
    /// as for [`read_relationships`](Self::read_relationships).
    pub async fn delete_relationships(
        &self,
        ctx: &BuiltinContext<'_>,
        args: &[Term],
    ) -> Result<Term> {
        let args = FilterArgs::decode(OperationKind::DeleteRelationships, args)?;
        let key = self
            .config
            .cache_deletes
            .then(|| args.cache_key(OperationKind::DeleteRelationships));
        if let Some(hit) = key.as_ref().and_then(|key| cached(ctx, key)) {
            return Ok(hit);
        }

        let configured = self.accessor.require()?;
        let call = self.call_context(ctx);
        let outcome = bounded(OperationKind::DeleteRelationships, &call, async {
            let request = requests::delete_relationships(&args, configured.prefix());
            let response = configured.client().delete_relationships(&call, request).await?;
            Ok::<_, Error>(DeleteRelationshipsResult {
                result: true,
                deleted_at: response.deleted_at.unwrap_or_default(),
            })
        })
        .await;

        settle(ctx, OperationKind::DeleteRelationships, key, outcome)
    }

    fn call_context(&self, ctx: &BuiltinContext<'_>) -> CallContext {
        ctx.call().or_timeout(self.config.default_timeout)
    }
}

fn cached(ctx: &BuiltinContext<'_>, key: &CacheKey) -> Option<Term> {
    let hit = ctx.cache().get(key);
    if hit.is_some() {
        tracing::trace!(key = %key, "builtin result served from cache");
    }
    hit
}

/// Runs `fut` until it completes or the call's deadline passes.
async fn bounded<T, F>(kind: OperationKind, call: &CallContext, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tracing::debug!(builtin = %kind, deadline = ?call.remaining(), "calling backend");
    match call.deadline() {
        Some(deadline) => tokio::time::timeout_at(deadline.into(), fut)
            .await
            .unwrap_or_else(|_| Err(Error::deadline_exceeded())),
        None => fut.await,
    }
}

/// Turns the outcome of a backend call into the builtin's return value.
fn settle<T: Serialize>(
    ctx: &BuiltinContext<'_>,
    kind: OperationKind,
    key: Option<CacheKey>,
    outcome: Result<T>,
) -> Result<Term> {
    match outcome {
        Ok(result) => {
            let term = codec::encode(&result)?;
            if let Some(key) = key {
                tracing::debug!(builtin = %kind, key = %key, "caching builtin result");
                ctx.cache().put(key, term.clone());
            }
            Ok(term)
        },
        Err(err) if err.is_hard_failure() => Err(err),
        Err(err) => {
            let record = ErrorRecord::from(&err);
            tracing::warn!(
                builtin = %kind,
                kind = record.kind(),
                error = %err,
                "backend call failed"
            );
            codec::encode(&record)
        },
    }
}

fn to_tuple(relationship: &Relationship, prefix: &SchemaPrefix) -> RelationshipTuple {
    RelationshipTuple::new(
        prefix.strip(&relationship.resource.object_type),
        &relationship.resource.object_id,
        &relationship.relation,
        prefix.strip(&relationship.subject.object.object_type),
        &relationship.subject.object.object_id,
    )
}
