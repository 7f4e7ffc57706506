//! Construction of backend requests from decoded builtin arguments.
//!
//! Every object type leaving the bridge gets the schema prefix.

use crate::codec::{
    CheckPermissionArgs, FilterArgs, LookupResourcesArgs, LookupSubjectsArgs, WriteArgs,
};
use crate::config::SchemaPrefix;
use crate::transport::{
    CheckPermissionRequest, DeleteRelationshipsRequest, LookupResourcesRequest,
    LookupSubjectsRequest, ReadRelationshipsRequest, WriteRelationshipsRequest,
};
use crate::types::{
    ObjectReference, Relationship, RelationshipFilter, RelationshipTuple, RelationshipUpdate,
    SubjectFilter, SubjectReference, UpdateOperation,
};
use crate::{Error, error::Result};

pub(crate) fn check_permission(
    args: &CheckPermissionArgs,
    prefix: &SchemaPrefix,
) -> CheckPermissionRequest {
    CheckPermissionRequest {
        resource: ObjectReference::new(prefix.apply(&args.resource_type), &args.resource_id),
        permission: args.permission.clone(),
        subject: SubjectReference::new(prefix.apply(&args.subject_type), &args.subject_id),
    }
}

pub(crate) fn lookup_resources(
    args: &LookupResourcesArgs,
    prefix: &SchemaPrefix,
) -> LookupResourcesRequest {
    LookupResourcesRequest {
        resource_object_type: prefix.apply(&args.resource_type),
        permission: args.permission.clone(),
        subject: SubjectReference::new(prefix.apply(&args.subject_type), &args.subject_id),
    }
}

pub(crate) fn lookup_subjects(
    args: &LookupSubjectsArgs,
    prefix: &SchemaPrefix,
) -> LookupSubjectsRequest {
    LookupSubjectsRequest {
        resource: ObjectReference::new(prefix.apply(&args.resource_type), &args.resource_id),
        permission: args.permission.clone(),
        subject_object_type: prefix.apply(&args.subject_type),
    }
}

pub(crate) fn read_relationships(
    args: &FilterArgs,
    prefix: &SchemaPrefix,
) -> ReadRelationshipsRequest {
    ReadRelationshipsRequest {
        relationship_filter: relationship_filter(args, prefix),
    }
}

pub(crate) fn delete_relationships(
    args: &FilterArgs,
    prefix: &SchemaPrefix,
) -> DeleteRelationshipsRequest {
    DeleteRelationshipsRequest {
        relationship_filter: relationship_filter(args, prefix),
    }
}

/// Builds a filter that constrains only the non-empty dimensions.
///
/// A subject id without a subject type is ignored: the backend cannot
/// filter on an id alone.
fn relationship_filter(args: &FilterArgs, prefix: &SchemaPrefix) -> RelationshipFilter {
    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_owned());

    let optional_subject_filter = (!args.subject_type.is_empty()).then(|| SubjectFilter {
        subject_type: prefix.apply(&args.subject_type),
        optional_subject_id: non_empty(&args.subject_id),
    });

    RelationshipFilter {
        resource_type: (!args.resource_type.is_empty()).then(|| prefix.apply(&args.resource_type)),
        optional_resource_id: non_empty(&args.resource_id),
        optional_relation: non_empty(&args.relation),
        optional_subject_filter,
    }
}

/// Validates every tuple and concatenates creates, touches and deletes, in
/// that order, into one write request.
pub(crate) fn write_relationships(
    args: &WriteArgs,
    prefix: &SchemaPrefix,
) -> Result<WriteRelationshipsRequest> {
    let groups = [
        ("creates", UpdateOperation::Create, &args.creates),
        ("touches", UpdateOperation::Touch, &args.touches),
        ("deletes", UpdateOperation::Delete, &args.deletes),
    ];

    let mut updates = Vec::with_capacity(args.len());
    for (name, operation, tuples) in groups {
        for (index, tuple) in tuples.iter().enumerate() {
            if let Some(field) = tuple.missing_field() {
                return Err(Error::validation(format!("{field} not set: {name}[{index}]")));
            }
            updates.push(RelationshipUpdate {
                operation,
                relationship: relationship(tuple, prefix),
            });
        }
    }

    Ok(WriteRelationshipsRequest { updates })
}

fn relationship(tuple: &RelationshipTuple, prefix: &SchemaPrefix) -> Relationship {
    Relationship::new(
        ObjectReference::new(prefix.apply(&tuple.resource_type), &tuple.resource_id),
        &tuple.relationship,
        SubjectReference::new(prefix.apply(&tuple.subject_type), &tuple.subject_id),
    )
}
