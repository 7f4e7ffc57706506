//! Core types shared by the bridge and the backend clients.
//!
//! - [`ObjectReference`] / [`SubjectReference`]: nodes of the permission graph
//! - [`Relationship`], [`RelationshipUpdate`], [`RelationshipFilter`]: edges
//!   and the requests that select or change them
//! - [`RelationshipTuple`]: the flat tuple shape used by policy code
//! - [`ConsistencyToken`]: snapshot token returned by the backend
//! - [`CallContext`]: per-call deadline
//! - [`Permissionship`] / [`LookupPermissionship`]: permission flags

mod consistency;
mod context;
mod permissionship;
mod reference;
mod relationship;
mod tuple;

pub use consistency::ConsistencyToken;
pub use context::CallContext;
pub use permissionship::{LookupPermissionship, Permissionship};
pub use reference::{ObjectReference, SubjectReference};
pub use relationship::{
    Relationship, RelationshipFilter, RelationshipUpdate, SubjectFilter, UpdateOperation,
};
pub use tuple::RelationshipTuple;
