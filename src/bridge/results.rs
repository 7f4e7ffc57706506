//! Success results of the six builtins, in the shape policy code reads.
//!
//! Type names are unprefixed. An absent token encodes as `""`.

use serde::Serialize;

use crate::types::{ConsistencyToken, RelationshipTuple};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckPermissionResult {
    pub result: bool,
    pub looked_up_at: ConsistencyToken,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LookupResourcesResult {
    pub result: bool,
    pub looked_up_at: ConsistencyToken,
    pub resource_ids: Vec<String>,
    pub resource_type: String,
    pub permission: String,
    pub subject_type: String,
    pub subject_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LookupSubjectsResult {
    pub result: bool,
    pub looked_up_at: ConsistencyToken,
    pub subject_ids: Vec<String>,
    pub resource_type: String,
    pub resource_id: String,
    pub permission: String,
    pub subject_type: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReadRelationshipsResult {
    pub result: bool,
    pub looked_up_at: ConsistencyToken,
    pub relationships: Vec<RelationshipTuple>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WriteRelationshipsResult {
    pub result: bool,
    pub written_at: ConsistencyToken,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteRelationshipsResult {
    pub result: bool,
    pub deleted_at: ConsistencyToken,
}
