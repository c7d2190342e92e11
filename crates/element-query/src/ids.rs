//! Identifier types understood by the query engine.
//!
//! Canonical identifiers are small copyable newtypes. Callers may also
//! refer to categories and classes by their shorthand names; [`Ident`]
//! carries either form until coercion resolves it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a single element in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(pub i64);

/// Identifier of an element category.
///
/// Built-in host categories use negative values (e.g. `-2000011` for walls).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub i64);

/// Identifier of an element class in the element model's namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClassId(pub u32);

/// Identifier of a view, used to scope a collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ViewId(pub i64);

/// Identifier of a parameter carried by elements.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParameterId(pub String);

impl ParameterId {
    pub fn new(name: impl Into<String>) -> Self {
        ParameterId(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParameterId {
    fn from(s: &str) -> Self {
        ParameterId(s.to_string())
    }
}

impl From<String> for ParameterId {
    fn from(s: String) -> Self {
        ParameterId(s)
    }
}

/// Either a canonical identifier or a shorthand name awaiting resolution.
///
/// Only the coercion step inspects which form is held; everything after it
/// works with resolved identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ident<T> {
    /// Canonical identifier.
    Resolved(T),
    /// Human-friendly name, e.g. `"OST_Walls"` or `"WallType"`.
    Named(String),
}

/// Category given by id or by name.
pub type CategoryRef = Ident<CategoryId>;

/// Class given by id or by name.
pub type ClassRef = Ident<ClassId>;

impl<T> Ident<T> {
    /// Returns the shorthand name, if this identifier is not resolved yet.
    pub fn name(&self) -> Option<&str> {
        match self {
            Ident::Named(name) => Some(name),
            Ident::Resolved(_) => None,
        }
    }
}

impl<T> From<&str> for Ident<T> {
    fn from(s: &str) -> Self {
        Ident::Named(s.to_string())
    }
}

impl<T> From<String> for Ident<T> {
    fn from(s: String) -> Self {
        Ident::Named(s)
    }
}

impl From<CategoryId> for CategoryRef {
    fn from(id: CategoryId) -> Self {
        Ident::Resolved(id)
    }
}

impl From<ClassId> for ClassRef {
    fn from(id: ClassId) -> Self {
        Ident::Resolved(id)
    }
}
