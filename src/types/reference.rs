//! Object and subject references.

use std::fmt;

/// A reference to a concrete object in the permission graph.
///
/// As sent to the backend, `object_type` already carries the schema prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectReference {
    /// The object type, e.g. `"document"` or `"tenant1/document"`.
    pub object_type: String,
    /// The object id, e.g. `"42"`.
    pub object_id: String,
}

impl ObjectReference {
    /// Creates a new object reference.
    pub fn new(object_type: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            object_id: object_id.into(),
        }
    }
}

impl fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.object_id)
    }
}

/// A reference to a subject: an object, optionally narrowed to a relation
/// (a subject set such as `group:eng#member`).
///
/// The builtins always produce direct subjects; the relation is kept so that
/// relationships read back from the backend round-trip faithfully.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubjectReference {
    /// The subject object.
    pub object: ObjectReference,
    /// Optional relation on the subject object.
    pub optional_relation: Option<String>,
}

impl SubjectReference {
    /// Creates a direct subject reference.
    pub fn new(object_type: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            object: ObjectReference::new(object_type, object_id),
            optional_relation: None,
        }
    }

    /// Narrows the subject to a relation.
    #[must_use]
    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.optional_relation = Some(relation.into());
        self
    }
}

impl fmt::Display for SubjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.object)?;
        if let Some(relation) = &self.optional_relation {
            write!(f, "#{relation}")?;
        }
        Ok(())
    }
}
