//! Resolution of category and class shorthands.
//!
//! Callers may name categories (`"OST_Walls"`) and classes (`"WallType"`)
//! instead of passing identifiers. [`coerce`] resolves every shorthand
//! against a [`Resolver`] and yields the typed [`Restriction`]s the chain
//! applies. It reads the criteria and never changes them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::chain::Restriction;
use crate::criteria::{Criteria, Criterion, CriterionName};
use crate::error::{QueryError, Result};
use crate::ids::{CategoryId, ClassId, Ident};

/// Prefix carried by built-in category names.
pub const CATEGORY_PREFIX: &str = "OST_";

/// Name lookups for categories and classes.
pub trait Resolver {
    /// Resolves a category name.
    fn category(&self, name: &str) -> Option<CategoryId>;

    /// Resolves a class name in the element model's namespace.
    fn class(&self, name: &str) -> Option<ClassId>;
}

/// Map-backed [`Resolver`].
///
/// Category lookups also try the name with [`CATEGORY_PREFIX`] added, so
/// `"Walls"` finds `"OST_Walls"`.
///
/// ```
/// use element_query::{CategoryId, ClassId, Registry, Resolver};
///
/// let registry = Registry::new()
///     .with_category("OST_Walls", CategoryId(-2000011))
///     .with_class("WallType", ClassId(12));
///
/// assert_eq!(registry.category("Walls"), Some(CategoryId(-2000011)));
/// assert_eq!(registry.class("WallType"), Some(ClassId(12)));
/// assert_eq!(registry.class("Door"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Registry {
    categories: BTreeMap<String, CategoryId>,
    classes: BTreeMap<String, ClassId>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Registry::default()
    }

    /// Registers a category name.
    pub fn with_category(mut self, name: impl Into<String>, id: CategoryId) -> Self {
        self.categories.insert(name.into(), id);
        self
    }

    /// Registers a class name.
    pub fn with_class(mut self, name: impl Into<String>, id: ClassId) -> Self {
        self.classes.insert(name.into(), id);
        self
    }
}

impl Resolver for Registry {
    fn category(&self, name: &str) -> Option<CategoryId> {
        self.categories.get(name).copied().or_else(|| {
            if name.starts_with(CATEGORY_PREFIX) {
                None
            } else {
                self.categories
                    .get(&format!("{CATEGORY_PREFIX}{name}"))
                    .copied()
            }
        })
    }

    fn class(&self, name: &str) -> Option<ClassId> {
        self.classes.get(name).copied()
    }
}

fn resolve<T: Copy>(
    ident: &Ident<T>,
    criterion: CriterionName,
    lookup: impl FnOnce(&str) -> Option<T>,
) -> Result<T> {
    match ident {
        Ident::Resolved(id) => Ok(*id),
        Ident::Named(name) => lookup(name).ok_or_else(|| QueryError::UnknownIdentifier {
            criterion: criterion.as_str(),
            name: name.clone(),
        }),
    }
}

/// Resolves shorthands and converts criteria into restrictions, keeping
/// their order.
///
/// Fails with [`QueryError::UnknownIdentifier`] on the first name the
/// resolver does not know.
pub fn coerce<'a>(criteria: &'a Criteria, resolver: &dyn Resolver) -> Result<Vec<Restriction<'a>>> {
    criteria
        .iter()
        .map(|criterion| {
            Ok(match criterion {
                Criterion::OfClass(class) => Restriction::OfClass(resolve(
                    class,
                    CriterionName::OfClass,
                    |n| resolver.class(n),
                )?),
                Criterion::OfCategory(category) => Restriction::OfCategory(resolve(
                    category,
                    CriterionName::OfCategory,
                    |n| resolver.category(n),
                )?),
                Criterion::IsElement(toggle) => Restriction::IsElement(*toggle),
                Criterion::IsElementType(toggle) => Restriction::IsElementType(*toggle),
                Criterion::IsViewIndependent(toggle) => Restriction::IsViewIndependent(*toggle),
                Criterion::ParameterFilter(rule) => Restriction::ParameterFilter(rule.predicate()),
            })
        })
        .collect()
}
