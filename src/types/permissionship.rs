//! Permission flags carried by check and lookup responses.

/// Outcome of a permission check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Permissionship {
    /// The backend did not say.
    #[default]
    Unspecified,
    /// The subject does not have the permission.
    NoPermission,
    /// The subject has the permission.
    HasPermission,
    /// The permission depends on caveat context that was not supplied.
    ConditionalPermission,
}

impl Permissionship {
    /// Returns `true` only for [`Permissionship::HasPermission`].
    ///
    /// Conditional permission is not a grant.
    #[inline]
    pub fn is_granted(&self) -> bool {
        matches!(self, Permissionship::HasPermission)
    }
}

/// Permission flag attached to each element of a lookup stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LookupPermissionship {
    /// The backend did not say.
    #[default]
    Unspecified,
    /// The element is granted.
    HasPermission,
    /// The element is granted only under caveat context.
    ConditionalPermission,
}

impl LookupPermissionship {
    /// Returns `true` only for [`LookupPermissionship::HasPermission`].
    #[inline]
    pub fn is_granted(&self) -> bool {
        matches!(self, LookupPermissionship::HasPermission)
    }
}
