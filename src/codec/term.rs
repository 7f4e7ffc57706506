//! Engine-native values exchanged with the policy engine.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A policy value as the host engine passes it to a builtin.
///
/// Sets keep their stored order; objects are key-ordered so that encoding
/// a term is deterministic.
///
/// ```rust
/// use rego_spicedb::Term;
///
/// let term = Term::from(serde_json::json!({"b": 1, "a": [true, null]}));
/// assert_eq!(serde_json::to_string(&term)?, r#"{"a":[true,null],"b":1}"#);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Term {
    /// `null`
    #[default]
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Any number.
    Number(serde_json::Number),
    /// A string.
    String(String),
    /// An ordered array.
    Array(Vec<Term>),
    /// A set, in the engine's stored order.
    Set(Vec<Term>),
    /// An object with string keys.
    Object(BTreeMap<String, Term>),
}

impl Term {
    /// Returns the engine's name for this value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Term::Null => "null",
            Term::Bool(_) => "boolean",
            Term::Number(_) => "number",
            Term::String(_) => "string",
            Term::Array(_) => "array",
            Term::Set(_) => "set",
            Term::Object(_) => "object",
        }
    }

    /// Returns the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Term::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements of an array or a set.
    pub fn as_collection(&self) -> Option<&[Term]> {
        match self {
            Term::Array(items) | Term::Set(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the fields of an object.
    pub fn as_object(&self) -> Option<&BTreeMap<String, Term>> {
        match self {
            Term::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Returns a field of an object.
    pub fn get(&self, key: &str) -> Option<&Term> {
        self.as_object().and_then(|fields| fields.get(key))
    }

    /// Converts to JSON. Sets become arrays.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Term::Null => serde_json::Value::Null,
            Term::Bool(b) => serde_json::Value::Bool(*b),
            Term::Number(n) => serde_json::Value::Number(n.clone()),
            Term::String(s) => serde_json::Value::String(s.clone()),
            Term::Array(items) | Term::Set(items) => {
                serde_json::Value::Array(items.iter().map(Term::to_json).collect())
            },
            Term::Object(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Term::Null => serializer.serialize_unit(),
            Term::Bool(b) => serializer.serialize_bool(*b),
            Term::Number(n) => n.serialize(serializer),
            Term::String(s) => serializer.serialize_str(s),
            Term::Array(items) | Term::Set(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            },
            Term::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            },
        }
    }
}

impl From<serde_json::Value> for Term {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Term::Null,
            serde_json::Value::Bool(b) => Term::Bool(b),
            serde_json::Value::Number(n) => Term::Number(n),
            serde_json::Value::String(s) => Term::String(s),
            serde_json::Value::Array(items) => {
                Term::Array(items.into_iter().map(Term::from).collect())
            },
            serde_json::Value::Object(fields) => Term::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Term::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Term {
    fn from(s: &str) -> Self {
        Term::String(s.to_owned())
    }
}

impl From<String> for Term {
    fn from(s: String) -> Self {
        Term::String(s)
    }
}

impl From<bool> for Term {
    fn from(b: bool) -> Self {
        Term::Bool(b)
    }
}

impl From<Vec<Term>> for Term {
    fn from(items: Vec<Term>) -> Self {
        Term::Array(items)
    }
}
