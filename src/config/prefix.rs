//! Schema prefix applied to object type names.

use std::fmt;

/// String prepended to every object type sent to the backend and stripped
/// from every object type received from it.
///
/// SpiceDB schemas are often namespaced (`tenant1/document`); policy code
/// keeps using the bare names.
///
/// ```rust
/// use rego_spicedb::SchemaPrefix;
///
/// let prefix = SchemaPrefix::new("tenant1/");
/// assert_eq!(prefix.apply("document"), "tenant1/document");
/// assert_eq!(prefix.strip("tenant1/document"), "document");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SchemaPrefix(String);

impl SchemaPrefix {
    /// Creates a prefix. An empty string disables the transform.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    /// Returns the raw prefix.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefixes a type name for the backend.
    pub fn apply(&self, object_type: &str) -> String {
        format!("{}{object_type}", self.0)
    }

    /// Removes the prefix from a type name received from the backend.
    ///
    /// Names without the prefix are returned unchanged.
    pub fn strip<'a>(&self, object_type: &'a str) -> &'a str {
        object_type.strip_prefix(self.0.as_str()).unwrap_or(object_type)
    }
}

impl fmt::Display for SchemaPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
