//! Named selection criteria and their accumulation.
//!
//! A [`Criteria`] holds at most one [`Criterion`] per [`CriterionName`],
//! in first-insertion order. Setting a name again overwrites its value in
//! place, so the chaining order stays stable across merges.
//!
//! # Example
//!
//! ```
//! use element_query::{CategoryId, Criteria, CriterionName};
//!
//! let criteria = Criteria::new()
//!     .of_category("OST_Walls")
//!     .is_element_type(true)
//!     .of_category(CategoryId(-2000011));
//!
//! assert_eq!(criteria.len(), 2);
//! let names: Vec<_> = criteria.iter().map(|c| c.name()).collect();
//! assert_eq!(names, [CriterionName::OfCategory, CriterionName::IsElementType]);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{QueryError, Result};
use crate::ids::{CategoryId, CategoryRef, ClassId, ClassRef, Ident};
use crate::parameter::ParameterRule;

/// The fixed vocabulary of criterion names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CriterionName {
    OfClass,
    OfCategory,
    IsElement,
    IsElementType,
    IsViewIndependent,
    ParameterFilter,
}

impl CriterionName {
    pub const ALL: [CriterionName; 6] = [
        CriterionName::OfClass,
        CriterionName::OfCategory,
        CriterionName::IsElement,
        CriterionName::IsElementType,
        CriterionName::IsViewIndependent,
        CriterionName::ParameterFilter,
    ];

    /// Returns the keyword naming this criterion.
    pub fn as_str(self) -> &'static str {
        match self {
            CriterionName::OfClass => "of_class",
            CriterionName::OfCategory => "of_category",
            CriterionName::IsElement => "is_element",
            CriterionName::IsElementType => "is_element_type",
            CriterionName::IsViewIndependent => "is_view_independent",
            CriterionName::ParameterFilter => "parameter_filter",
        }
    }
}

impl fmt::Display for CriterionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CriterionName {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        CriterionName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| QueryError::UnsupportedFilter(s.to_string()))
    }
}

/// One selection criterion with its value.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Restrict to a class.
    OfClass(ClassRef),
    /// Restrict to a category.
    OfCategory(CategoryRef),
    /// `true` keeps only instances.
    IsElement(bool),
    /// `true` keeps only type definitions.
    IsElementType(bool),
    /// `true` keeps only view-independent elements.
    IsViewIndependent(bool),
    /// Keep elements passing a parameter rule.
    ParameterFilter(ParameterRule),
}

impl Criterion {
    pub fn name(&self) -> CriterionName {
        match self {
            Criterion::OfClass(_) => CriterionName::OfClass,
            Criterion::OfCategory(_) => CriterionName::OfCategory,
            Criterion::IsElement(_) => CriterionName::IsElement,
            Criterion::IsElementType(_) => CriterionName::IsElementType,
            Criterion::IsViewIndependent(_) => CriterionName::IsViewIndependent,
            Criterion::ParameterFilter(_) => CriterionName::ParameterFilter,
        }
    }

    /// Builds a criterion from a keyword and an untyped value.
    ///
    /// Fails with [`QueryError::UnsupportedFilter`] for unknown keywords and
    /// with [`QueryError::InvalidCriterionValue`] when the value kind does
    /// not suit the criterion.
    pub fn from_named(name: &str, value: CriterionValue) -> Result<Self> {
        let name: CriterionName = name.parse()?;
        let invalid = |expected| QueryError::InvalidCriterionValue {
            criterion: name.as_str(),
            expected,
        };

        match (name, value) {
            (CriterionName::OfClass, CriterionValue::Name(n)) => Ok(Criterion::OfClass(n.into())),
            (CriterionName::OfClass, CriterionValue::Id(id)) => u32::try_from(id)
                .map(|id| Criterion::OfClass(ClassId(id).into()))
                .map_err(|_| invalid("a class id in u32 range")),
            (CriterionName::OfClass, _) => Err(invalid("a class name or id")),

            (CriterionName::OfCategory, CriterionValue::Name(n)) => {
                Ok(Criterion::OfCategory(n.into()))
            }
            (CriterionName::OfCategory, CriterionValue::Id(id)) => {
                Ok(Criterion::OfCategory(CategoryId(id).into()))
            }
            (CriterionName::OfCategory, _) => Err(invalid("a category name or id")),

            (CriterionName::IsElement, CriterionValue::Bool(b)) => Ok(Criterion::IsElement(b)),
            (CriterionName::IsElementType, CriterionValue::Bool(b)) => {
                Ok(Criterion::IsElementType(b))
            }
            (CriterionName::IsViewIndependent, CriterionValue::Bool(b)) => {
                Ok(Criterion::IsViewIndependent(b))
            }
            (CriterionName::IsElement, _)
            | (CriterionName::IsElementType, _)
            | (CriterionName::IsViewIndependent, _) => Err(invalid("a boolean")),

            (CriterionName::ParameterFilter, CriterionValue::Rule(rule)) => {
                Ok(Criterion::ParameterFilter(*rule))
            }
            (CriterionName::ParameterFilter, _) => Err(invalid("a parameter rule")),
        }
    }
}

/// Untyped criterion value for keyword-style input.
#[derive(Debug, Clone, PartialEq)]
pub enum CriterionValue {
    /// Shorthand name of a category or class.
    Name(String),
    /// Raw category or class identifier.
    Id(i64),
    /// Boolean toggle.
    Bool(bool),
    /// Parameter rule.
    Rule(Box<ParameterRule>),
}

impl From<&str> for CriterionValue {
    fn from(s: &str) -> Self {
        CriterionValue::Name(s.to_string())
    }
}

impl From<String> for CriterionValue {
    fn from(s: String) -> Self {
        CriterionValue::Name(s)
    }
}

impl From<i64> for CriterionValue {
    fn from(id: i64) -> Self {
        CriterionValue::Id(id)
    }
}

impl From<i32> for CriterionValue {
    fn from(id: i32) -> Self {
        CriterionValue::Id(id as i64)
    }
}

impl From<CategoryId> for CriterionValue {
    fn from(id: CategoryId) -> Self {
        CriterionValue::Id(id.0)
    }
}

impl From<ClassId> for CriterionValue {
    fn from(id: ClassId) -> Self {
        CriterionValue::Id(id.0 as i64)
    }
}

impl From<bool> for CriterionValue {
    fn from(b: bool) -> Self {
        CriterionValue::Bool(b)
    }
}

impl From<ParameterRule> for CriterionValue {
    fn from(rule: ParameterRule) -> Self {
        CriterionValue::Rule(Box::new(rule))
    }
}

/// Ordered set of criteria, one per name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    entries: Vec<Criterion>,
}

impl Criteria {
    /// Creates an empty criteria set.
    /// Creates an empty set of criteria.
    pub fn new() -> Self {
        Criteria::default()
    }

    /// Builds criteria from keyword/value pairs.
    ///
    /// The first unsupported keyword or ill-typed value aborts the whole
    /// conversion.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<CriterionValue>,
    {
        pairs
            .into_iter()
            .try_fold(Criteria::new(), |criteria, (name, value)| {
                Ok(criteria.with(Criterion::from_named(name.as_ref(), value.into())?))
            })
    }

    // ========================================================================
    // Builders
    // ========================================================================

    /// Sets a criterion, replacing any value already held for its name.
    pub fn with(mut self, criterion: Criterion) -> Self {
        self.set(criterion);
        self
    }

    /// Restricts to a class, by id or name.
    pub fn of_class(self, class: impl Into<ClassRef>) -> Self {
        self.with(Criterion::OfClass(class.into()))
    }

    /// Restricts to a category, by id or name.
    pub fn of_category(self, category: impl Into<CategoryRef>) -> Self {
        self.with(Criterion::OfCategory(category.into()))
    }

    /// Keeps only instances when `toggle` is `true`.
    pub fn is_element(self, toggle: bool) -> Self {
        self.with(Criterion::IsElement(toggle))
    }

    /// Keeps only type definitions when `toggle` is `true`.
    pub fn is_element_type(self, toggle: bool) -> Self {
        self.with(Criterion::IsElementType(toggle))
    }

    /// Keeps only elements not owned by a view when `toggle` is `true`.
    pub fn is_view_independent(self, toggle: bool) -> Self {
        self.with(Criterion::IsViewIndependent(toggle))
    }

    /// Restricts to elements passing `rule`.
    pub fn parameter_filter(self, rule: ParameterRule) -> Self {
        self.with(Criterion::ParameterFilter(rule))
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Sets a criterion in place; an existing value for the same name is
    /// overwritten without moving.
    pub fn set(&mut self, criterion: Criterion) {
        let name = criterion.name();
        match self.entries.iter_mut().find(|c| c.name() == name) {
            Some(slot) => *slot = criterion,
            None => self.entries.push(criterion),
        }
    }

    /// Merges `other` into this set; `other` wins on shared names.
    pub fn merge(&mut self, other: Criteria) {
        for criterion in other.entries {
            self.set(criterion);
        }
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the criterion held for `name`, if any.
    pub fn get(&self, name: CriterionName) -> Option<&Criterion> {
        self.entries.iter().find(|c| c.name() == name)
    }

    pub fn contains(&self, name: CriterionName) -> bool {
        self.get(name).is_some()
    }

    /// Number of criteria held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Criterion> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Criteria {
    type Item = &'a Criterion;
    type IntoIter = std::slice::Iter<'a, Criterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<Criterion> for Criteria {
    fn from_iter<I: IntoIterator<Item = Criterion>>(iter: I) -> Self {
        let mut criteria = Criteria::new();
        for criterion in iter {
            criteria.set(criterion);
        }
        criteria
    }
}

impl From<Criterion> for Criteria {
    fn from(criterion: Criterion) -> Self {
        Criteria::new().with(criterion)
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::OfClass(class) => match class {
                Ident::Resolved(id) => write!(f, "of_class={}", id.0),
                Ident::Named(n) => write!(f, "of_class={n:?}"),
            },
            Criterion::OfCategory(category) => match category {
                Ident::Resolved(id) => write!(f, "of_category={}", id.0),
                Ident::Named(n) => write!(f, "of_category={n:?}"),
            },
            Criterion::IsElement(b) => write!(f, "is_element={b}"),
            Criterion::IsElementType(b) => write!(f, "is_element_type={b}"),
            Criterion::IsViewIndependent(b) => write!(f, "is_view_independent={b}"),
            Criterion::ParameterFilter(rule) => write!(
                f,
                "parameter_filter={} {}{}",
                rule.parameter_id(),
                if rule.is_negated() { "not " } else { "" },
                rule.comparator()
            ),
        }
    }
}
