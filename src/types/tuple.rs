//! Flat relationship tuples as seen by policy code.

use serde::{Deserialize, Serialize};

/// A relationship in the flat shape policy code reads and writes:
///
/// ```json
/// {"resourceType": "document", "resourceId": "42", "relationship": "viewer",
///  "subjectType": "user", "subjectId": "alice"}
/// ```
///
/// Type names are unprefixed. When decoding, absent fields become empty
/// strings so that validation can name the missing field; fields that are
/// present must be strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelationshipTuple {
    /// Resource type.
    pub resource_type: String,
    /// Resource id.
    pub resource_id: String,
    /// Relation name.
    pub relationship: String,
    /// Subject type.
    pub subject_type: String,
    /// Subject id.
    pub subject_id: String,
}

impl RelationshipTuple {
    /// Creates a tuple from its five fields.
    pub fn new(
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        relationship: impl Into<String>,
        subject_type: impl Into<String>,
        subject_id: impl Into<String>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            relationship: relationship.into(),
            subject_type: subject_type.into(),
            subject_id: subject_id.into(),
        }
    }

    /// Returns the name of the first empty field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("resourceType", &self.resource_type),
            ("resourceId", &self.resource_id),
            ("relationship", &self.relationship),
            ("subjectType", &self.subject_type),
            ("subjectId", &self.subject_id),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
    }
}
