//! Relationships, relationship updates and relationship filters.

use std::fmt;

use super::{ObjectReference, SubjectReference};

/// An edge in the permission graph: `resource#relation@subject`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relationship {
    /// The resource the relation is defined on.
    pub resource: ObjectReference,
    /// The relation name, e.g. `"viewer"`.
    pub relation: String,
    /// The subject the resource is related to.
    pub subject: SubjectReference,
}

impl Relationship {
    /// Creates a new relationship.
    pub fn new(
        resource: ObjectReference,
        relation: impl Into<String>,
        subject: SubjectReference,
    ) -> Self {
        Self {
            resource,
            relation: relation.into(),
            subject,
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.resource, self.relation, self.subject)
    }
}

/// The kind of change a [`RelationshipUpdate`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateOperation {
    /// Create the relationship; fails if it already exists.
    Create,
    /// Create or replace the relationship.
    Touch,
    /// Delete the relationship.
    Delete,
}

impl fmt::Display for UpdateOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateOperation::Create => f.write_str("create"),
            UpdateOperation::Touch => f.write_str("touch"),
            UpdateOperation::Delete => f.write_str("delete"),
        }
    }
}

/// One entry of a write request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipUpdate {
    /// What to do with the relationship.
    pub operation: UpdateOperation,
    /// The relationship to change.
    pub relationship: Relationship,
}

/// Narrows a relationship filter to subjects of a type, optionally a
/// single subject id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubjectFilter {
    /// Subject type (prefixed).
    pub subject_type: String,
    /// Optional subject id.
    pub optional_subject_id: Option<String>,
}

/// Selects relationships for read and delete requests.
///
/// Every `None` dimension is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RelationshipFilter {
    /// Resource type (prefixed).
    pub resource_type: Option<String>,
    /// Resource id.
    pub optional_resource_id: Option<String>,
    /// Relation name.
    pub optional_relation: Option<String>,
    /// Subject constraint.
    pub optional_subject_filter: Option<SubjectFilter>,
}

impl RelationshipFilter {
    /// Returns `true` if `relationship` satisfies every constrained
    /// dimension of this filter.
    pub fn matches(&self, relationship: &Relationship) -> bool {
        let resource = &relationship.resource;
        let subject = &relationship.subject.object;

        let resource_match = self
            .resource_type
            .as_deref()
            .is_none_or(|t| resource.object_type == t)
            && self
                .optional_resource_id
                .as_deref()
                .is_none_or(|id| resource.object_id == id);
        let relation_match = self
            .optional_relation
            .as_deref()
            .is_none_or(|r| relationship.relation == r);
        let subject_match = self.optional_subject_filter.as_ref().is_none_or(|filter| {
            subject.object_type == filter.subject_type
                && filter
                    .optional_subject_id
                    .as_deref()
                    .is_none_or(|id| subject.object_id == id)
        });

        resource_match && relation_match && subject_match
    }
}
