//! Registry of the builtins the bridge provides.

use std::fmt;
use std::str::FromStr;

use crate::bridge::{Bridge, BuiltinContext};
use crate::cache::OperationKind;
use crate::codec::Term;
use crate::{Error, error::Result};

/// One of the six `spicedb.*` builtins.
///
/// Hosts iterate [`Builtin::ALL`] to register the functions and dispatch
/// calls through [`Bridge::call`].
///
/// ```rust
/// use rego_spicedb::Builtin;
///
/// let builtin: Builtin = "spicedb.lookup_subjects".parse()?;
/// assert_eq!(builtin.arity(), 4);
/// assert!(!builtin.is_nondeterministic());
/// # Ok::<(), rego_spicedb::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `spicedb.check_permission`
    CheckPermission,
    /// `spicedb.lookup_resources`
    LookupResources,
    /// `spicedb.lookup_subjects`
    LookupSubjects,
    /// `spicedb.read_relationships`
    ReadRelationships,
    /// `spicedb.write_relationships`
    WriteRelationships,
    /// `spicedb.delete_relationships`
    DeleteRelationships,
}

impl Builtin {
    /// Every builtin, in registration order.
    pub const ALL: [Builtin; 6] = [
        Builtin::CheckPermission,
        Builtin::LookupResources,
        Builtin::LookupSubjects,
        Builtin::WriteRelationships,
        Builtin::ReadRelationships,
        Builtin::DeleteRelationships,
    ];

    /// Returns the name policy code calls the builtin by.
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::CheckPermission => "spicedb.check_permission",
            Builtin::LookupResources => "spicedb.lookup_resources",
            Builtin::LookupSubjects => "spicedb.lookup_subjects",
            Builtin::ReadRelationships => "spicedb.read_relationships",
            Builtin::WriteRelationships => "spicedb.write_relationships",
            Builtin::DeleteRelationships => "spicedb.delete_relationships",
        }
    }

    /// Returns the number of operands.
    pub fn arity(&self) -> usize {
        match self {
            Builtin::CheckPermission => 5,
            Builtin::LookupResources | Builtin::LookupSubjects => 4,
            Builtin::ReadRelationships | Builtin::DeleteRelationships => 5,
            Builtin::WriteRelationships => 3,
        }
    }

    /// Returns `true` for builtins whose result may differ between two
    /// calls with the same operands within one evaluation.
    ///
    /// Permission checks observe concurrent writes; writes change state.
    pub fn is_nondeterministic(&self) -> bool {
        matches!(self, Builtin::CheckPermission | Builtin::WriteRelationships)
    }

    /// Returns the operation this builtin performs.
    pub fn operation(&self) -> OperationKind {
        match self {
            Builtin::CheckPermission => OperationKind::CheckPermission,
            Builtin::LookupResources => OperationKind::LookupResources,
            Builtin::LookupSubjects => OperationKind::LookupSubjects,
            Builtin::ReadRelationships => OperationKind::ReadRelationships,
            Builtin::WriteRelationships => OperationKind::WriteRelationships,
            Builtin::DeleteRelationships => OperationKind::DeleteRelationships,
        }
    }

    /// Looks a builtin up by its registered name.
    pub fn from_name(name: &str) -> Option<Builtin> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Builtin {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Builtin::from_name(name).ok_or_else(|| Error::decode(format!("unknown builtin {name}")))
    }
}

impl Bridge {
    /// Invokes a builtin by its registered name.
    ///
    /// An unknown name is a decode error.
    pub async fn call(&self, name: &str, ctx: &BuiltinContext<'_>, args: &[Term]) -> Result<Term> {
        match name.parse::<Builtin>()? {
            Builtin::CheckPermission => self.check_permission(ctx, args).await,
            Builtin::LookupResources => self.lookup_resources(ctx, args).await,
            Builtin::LookupSubjects => self.lookup_subjects(ctx, args).await,
            Builtin::ReadRelationships => self.read_relationships(ctx, args).await,
            Builtin::WriteRelationships => self.write_relationships(ctx, args).await,
            Builtin::DeleteRelationships => self.delete_relationships(ctx, args).await,
        }
    }
}
