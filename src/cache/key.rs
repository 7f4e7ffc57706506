//! Typed cache keys.

use std::fmt;

/// The six bridge operations, used to keep cache keys of different
/// operations apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationKind {
    /// `check_permission`
    CheckPermission,
    /// `lookup_resources`
    LookupResources,
    /// `lookup_subjects`
    LookupSubjects,
    /// `read_relationships`
    ReadRelationships,
    /// `write_relationships`
    WriteRelationships,
    /// `delete_relationships`
    DeleteRelationships,
}

impl OperationKind {
    /// Returns the operation name without the `spicedb.` namespace.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::CheckPermission => "check_permission",
            OperationKind::LookupResources => "lookup_resources",
            OperationKind::LookupSubjects => "lookup_subjects",
            OperationKind::ReadRelationships => "read_relationships",
            OperationKind::WriteRelationships => "write_relationships",
            OperationKind::DeleteRelationships => "delete_relationships",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of a cached builtin result: the operation plus its ordered argument
/// fields.
///
/// Keys compare structurally, so two keys are equal only when the
/// operation and every field match. Hosts whose cache wants string keys can
/// use [`canonical()`](CacheKey::canonical), which length-prefixes each
/// field and is therefore injective as well.
///
/// ```rust
/// use rego_spicedb::{CacheKey, OperationKind};
///
/// let a = CacheKey::new(OperationKind::CheckPermission, ["ab", "c"]);
/// let b = CacheKey::new(OperationKind::CheckPermission, ["a", "bc"]);
/// assert_ne!(a, b);
/// assert_ne!(a.canonical(), b.canonical());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    kind: OperationKind,
    fields: Vec<String>,
}

impl CacheKey {
    /// Creates a key from an operation and its argument fields.
    pub fn new<I, S>(kind: OperationKind, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the operation.
    #[inline]
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Returns the argument fields in order.
    #[inline]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns an unambiguous string form: `kind` followed by
    /// `:<byte length>:<field>` for each field.
    pub fn canonical(&self) -> String {
        let mut out = String::from(self.kind.as_str());
        for field in &self.fields {
            out.push(':');
            out.push_str(&field.len().to_string());
            out.push(':');
            out.push_str(field);
        }
        out
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.fields.join(", "))
    }
}
