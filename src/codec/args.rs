//! Decoding of builtin operands into typed arguments.

use super::Term;
use crate::cache::{CacheKey, OperationKind};
use crate::types::RelationshipTuple;
use crate::{Error, error::Result};

/// Positional operands of one builtin call.
struct Operands<'a> {
    kind: OperationKind,
    args: &'a [Term],
}

impl<'a> Operands<'a> {
    fn new(kind: OperationKind, args: &'a [Term], arity: usize) -> Result<Self> {
        if args.len() != arity {
            let got = args.len();
            return Err(Error::decode(format!(
                "spicedb.{kind}: expected {arity} operands, got {got}"
            )));
        }
        Ok(Self { kind, args })
    }

    fn string(&self, index: usize, name: &str) -> Result<String> {
        let (kind, position) = (self.kind, index + 1);
        let term = &self.args[index];
        term.as_str().map(str::to_owned).ok_or_else(|| {
            let got = term.type_name();
            Error::decode(format!(
                "spicedb.{kind}: operand {position} ({name}) must be string, got {got}"
            ))
        })
    }

    /// Normalizes an array or set of tuple objects into one ordered sequence.
    fn tuples(&self, index: usize, name: &str) -> Result<Vec<RelationshipTuple>> {
        let (kind, position) = (self.kind, index + 1);
        let term = &self.args[index];
        let items = term.as_collection().ok_or_else(|| {
            let got = term.type_name();
            Error::decode(format!(
                "spicedb.{kind}: operand {position} ({name}) must be array or set, got {got}"
            ))
        })?;

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                if item.as_object().is_none() {
                    let got = item.type_name();
                    return Err(Error::decode(format!(
                        "spicedb.{kind}: {name}[{i}] must be object, got {got}"
                    )));
                }
                serde_json::from_value(item.to_json()).map_err(|e| {
                    Error::decode(format!("spicedb.{kind}: {name}[{i}]: {e}")).with_source(e)
                })
            })
            .collect()
    }
}

/// Operands of `spicedb.check_permission`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckPermissionArgs {
    /// Resource type.
    pub resource_type: String,
    /// Resource id.
    pub resource_id: String,
    /// Permission to check.
    pub permission: String,
    /// Subject type.
    pub subject_type: String,
    /// Subject id.
    pub subject_id: String,
}

impl CheckPermissionArgs {
    /// Decodes `(resourceType, resourceId, permission, subjectType, subjectId)`.
    pub fn decode(args: &[Term]) -> Result<Self> {
        let ops = Operands::new(OperationKind::CheckPermission, args, 5)?;
        Ok(Self {
            resource_type: ops.string(0, "resourceType")?,
            resource_id: ops.string(1, "resourceId")?,
            permission: ops.string(2, "permission")?,
            subject_type: ops.string(3, "subjectType")?,
            subject_id: ops.string(4, "subjectId")?,
        })
    }

    /// Returns the cache key over all five operands.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(
            OperationKind::CheckPermission,
            [
                &self.resource_type,
                &self.resource_id,
                &self.permission,
                &self.subject_type,
                &self.subject_id,
            ],
        )
    }
}

/// Operands of `spicedb.lookup_resources`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResourcesArgs {
    /// Type of the resources to find.
    pub resource_type: String,
    /// Permission the subject must have.
    pub permission: String,
    /// Subject type.
    pub subject_type: String,
    /// Subject id.
    pub subject_id: String,
}

impl LookupResourcesArgs {
    /// Decodes `(resourceType, permission, subjectType, subjectId)`.
    pub fn decode(args: &[Term]) -> Result<Self> {
        let ops = Operands::new(OperationKind::LookupResources, args, 4)?;
        Ok(Self {
            resource_type: ops.string(0, "resourceType")?,
            permission: ops.string(1, "permission")?,
            subject_type: ops.string(2, "subjectType")?,
            subject_id: ops.string(3, "subjectId")?,
        })
    }

    /// Returns the cache key over all four operands.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(
            OperationKind::LookupResources,
            [
                &self.resource_type,
                &self.permission,
                &self.subject_type,
                &self.subject_id,
            ],
        )
    }
}

/// Operands of `spicedb.lookup_subjects`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupSubjectsArgs {
    /// Resource type.
    pub resource_type: String,
    /// Resource id.
    pub resource_id: String,
    /// Permission the subjects must have.
    pub permission: String,
    /// Type of the subjects to find.
    pub subject_type: String,
}

impl LookupSubjectsArgs {
    /// Decodes `(resourceType, resourceId, permission, subjectType)`.
    pub fn decode(args: &[Term]) -> Result<Self> {
        let ops = Operands::new(OperationKind::LookupSubjects, args, 4)?;
        Ok(Self {
            resource_type: ops.string(0, "resourceType")?,
            resource_id: ops.string(1, "resourceId")?,
            permission: ops.string(2, "permission")?,
            subject_type: ops.string(3, "subjectType")?,
        })
    }

    /// Returns the cache key over all four operands.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(
            OperationKind::LookupSubjects,
            [
                &self.resource_type,
                &self.resource_id,
                &self.permission,
                &self.subject_type,
            ],
        )
    }
}

/// Operands of `spicedb.read_relationships` and
/// `spicedb.delete_relationships`.
///
/// Empty strings leave the matching filter dimension unconstrained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterArgs {
    /// Resource type.
    pub resource_type: String,
    /// Resource id.
    pub resource_id: String,
    /// Relation name.
    pub relation: String,
    /// Subject type.
    pub subject_type: String,
    /// Subject id.
    pub subject_id: String,
}

impl FilterArgs {
    /// Decodes `(resourceType, resourceId, relation, subjectType, subjectId)`
    /// for the given operation.
    pub fn decode(kind: OperationKind, args: &[Term]) -> Result<Self> {
        let ops = Operands::new(kind, args, 5)?;
        Ok(Self {
            resource_type: ops.string(0, "resourceType")?,
            resource_id: ops.string(1, "resourceId")?,
            relation: ops.string(2, "relation")?,
            subject_type: ops.string(3, "subjectType")?,
            subject_id: ops.string(4, "subjectId")?,
        })
    }

    /// Returns the cache key over all five operands.
    pub fn cache_key(&self, kind: OperationKind) -> CacheKey {
        CacheKey::new(
            kind,
            [
                &self.resource_type,
                &self.resource_id,
                &self.relation,
                &self.subject_type,
                &self.subject_id,
            ],
        )
    }
}

/// Operands of `spicedb.write_relationships`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteArgs {
    /// Tuples to create.
    pub creates: Vec<RelationshipTuple>,
    /// Tuples to create or replace.
    pub touches: Vec<RelationshipTuple>,
    /// Tuples to delete.
    pub deletes: Vec<RelationshipTuple>,
}

impl WriteArgs {
    /// Decodes `(creates, touches, deletes)`; each is an array or a set of
    /// tuple objects.
    pub fn decode(args: &[Term]) -> Result<Self> {
        let ops = Operands::new(OperationKind::WriteRelationships, args, 3)?;
        Ok(Self {
            creates: ops.tuples(0, "creates")?,
            touches: ops.tuples(1, "touches")?,
            deletes: ops.tuples(2, "deletes")?,
        })
    }

    /// Total number of updates.
    pub fn len(&self) -> usize {
        self.creates.len() + self.touches.len() + self.deletes.len()
    }

    /// Returns `true` if there is nothing to write.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
