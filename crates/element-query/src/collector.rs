//! The stateful collector.
//!
//! A [`Collector`] accumulates criteria across calls and keeps the elements
//! matching all of them. Each successful [`Collector::filter`] re-runs the
//! full accumulated criteria against a fresh query handle and replaces the
//! stored elements; a failed call leaves the collector exactly as it was.
//!
//! # Example
//!
//! ```
//! use element_query::{
//!     CategoryId, ClassId, Collector, Criteria, MemoryElement, MemoryStore, Registry,
//! };
//!
//! let registry = Registry::new()
//!     .with_category("OST_Walls", CategoryId(-2000011))
//!     .with_class("Wall", ClassId(1))
//!     .with_class("WallType", ClassId(2));
//!
//! let store = MemoryStore::new(registry)
//!     .with_element(MemoryElement::instance(1, ClassId(1)).category(CategoryId(-2000011)))
//!     .with_element(MemoryElement::instance(2, ClassId(1)).category(CategoryId(-2000011)))
//!     .with_element(MemoryElement::type_definition(3, ClassId(2)).category(CategoryId(-2000011)));
//!
//! let mut walls = Collector::new(&store);
//! walls.filter(Criteria::new().of_category("OST_Walls")).unwrap();
//! assert_eq!(walls.len(), 3);
//!
//! // Further calls narrow the accumulated criteria.
//! walls.filter(Criteria::new().is_element_type(true)).unwrap();
//! assert_eq!(walls.len(), 1);
//! assert_eq!(walls.first().map(|e| e.id().0), Some(3));
//! ```

use std::fmt;

use tracing::debug;

use crate::chain::chain;
use crate::coerce::coerce;
use crate::criteria::{Criteria, CriterionValue};
use crate::engine::{ElementStore, QueryHandle};
use crate::error::Result;
use crate::ids::ViewId;

/// Element type produced by a store's handles.
pub type ElementOf<S> = <<S as ElementStore>::Handle as QueryHandle>::Element;

/// Accumulates criteria and holds the elements matching all of them.
pub struct Collector<'s, S: ElementStore> {
    store: &'s S,
    scope: Option<ViewId>,
    criteria: Criteria,
    elements: Vec<ElementOf<S>>,
}

impl<'s, S: ElementStore> Collector<'s, S> {
    /// Creates an empty collector over the whole document.
    pub fn new(store: &'s S) -> Self {
        Collector {
            store,
            scope: None,
            criteria: Criteria::new(),
            elements: Vec::new(),
        }
    }

    /// Creates an empty collector over the elements visible in `view`.
    pub fn in_view(store: &'s S, view: ViewId) -> Self {
        Collector {
            scope: Some(view),
            ..Collector::new(store)
        }
    }

    /// Creates a collector and applies `criteria` immediately.
    pub fn with_criteria(store: &'s S, criteria: impl Into<Criteria>) -> Result<Self> {
        let mut collector = Collector::new(store);
        collector.filter(criteria)?;
        Ok(collector)
    }

    /// Creates a collector scoped to `view` and applies `criteria`
    /// immediately.
    pub fn in_view_with_criteria(
        store: &'s S,
        view: ViewId,
        criteria: impl Into<Criteria>,
    ) -> Result<Self> {
        let mut collector = Collector::in_view(store, view);
        collector.filter(criteria)?;
        Ok(collector)
    }

    // ========================================================================
    // Filtering
    // ========================================================================

    /// Adds `criteria` to the accumulated set and re-runs the query.
    ///
    /// New values replace old ones for the same criterion. On error nothing
    /// changes. An empty `criteria` is a no-op.
    pub fn filter(&mut self, criteria: impl Into<Criteria>) -> Result<&mut Self> {
        let criteria = criteria.into();
        if criteria.is_empty() {
            return Ok(self);
        }

        let mut merged = self.criteria.clone();
        merged.merge(criteria);
        let elements = self.run(&merged)?;

        self.criteria = merged;
        self.elements = elements;
        Ok(self)
    }

    /// Keyword-style [`Collector::filter`].
    ///
    /// Unsupported keywords fail before the query engine is touched.
    pub fn filter_pairs<I, K, V>(&mut self, pairs: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<CriterionValue>,
    {
        let criteria = Criteria::from_pairs(pairs)?;
        self.filter(criteria)
    }

    /// Re-runs the accumulated criteria against the store's current state.
    pub fn refresh(&mut self) -> Result<&mut Self> {
        self.elements = self.run(&self.criteria)?;
        Ok(self)
    }

    fn run(&self, criteria: &Criteria) -> Result<Vec<ElementOf<S>>> {
        let restrictions = coerce(criteria, self.store.resolver())?;
        let handle = chain(self.store.collect(self.scope)?, &restrictions)?;
        let elements = handle.enumerate()?;
        debug!(
            scope = ?self.scope,
            criteria = criteria.len(),
            elements = elements.len(),
            "collected elements"
        );
        Ok(elements)
    }

    // ========================================================================
    // Results
    // ========================================================================

    /// The first collected element, in the engine's enumeration order.
    pub fn first(&self) -> Option<&ElementOf<S>> {
        self.elements.first()
    }

    /// Returns `true` if no element is collected.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of collected elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> &[ElementOf<S>] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ElementOf<S>> {
        self.elements.iter()
    }

    pub fn into_elements(self) -> Vec<ElementOf<S>> {
        self.elements
    }

    /// The accumulated criteria.
    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// The view this collector is scoped to, if any.
    pub fn scope(&self) -> Option<ViewId> {
        self.scope
    }
}

impl<'a, 's, S: ElementStore> IntoIterator for &'a Collector<'s, S> {
    type Item = &'a ElementOf<S>;
    type IntoIter = std::slice::Iter<'a, ElementOf<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<S: ElementStore> fmt::Debug for Collector<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let criteria: Vec<String> = self.criteria.iter().map(|c| c.to_string()).collect();
        f.debug_struct("Collector")
            .field("scope", &self.scope)
            .field("criteria", &criteria)
            .field("elements", &self.elements.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::coerce::{Registry, Resolver};
    use crate::error::QueryError;
    use crate::ids::{CategoryId, ClassId};
    use crate::memory::{MemoryElement, MemoryQuery, MemoryStore};
    use crate::parameter::ParameterRule;
    use crate::rule::ElementParameterFilter;

    const WALLS: CategoryId = CategoryId(-2000011);
    const DOORS: CategoryId = CategoryId(-2000023);
    const WALL: ClassId = ClassId(1);
    const WALL_TYPE: ClassId = ClassId(2);
    const FAMILY_INSTANCE: ClassId = ClassId(3);

    fn store() -> MemoryStore {
        let registry = Registry::new()
            .with_category("OST_Walls", WALLS)
            .with_category("OST_Doors", DOORS)
            .with_class("Wall", WALL)
            .with_class("WallType", WALL_TYPE)
            .with_class("FamilyInstance", FAMILY_INSTANCE);

        MemoryStore::new(registry)
            .with_element(
                MemoryElement::instance(1, WALL)
                    .category(WALLS)
                    .param("Height", 12.0),
            )
            .with_element(
                MemoryElement::instance(2, WALL)
                    .category(WALLS)
                    .param("Height", 8.0),
            )
            .with_element(MemoryElement::type_definition(3, WALL_TYPE).category(WALLS))
            .with_element(MemoryElement::instance(4, FAMILY_INSTANCE).category(DOORS))
    }

    fn ids(collector: &Collector<'_, MemoryStore>) -> Vec<i64> {
        collector.iter().map(|e| e.id().0).collect()
    }

    /// Memory store whose handles fail at a chosen engine step.
    struct FlakyStore {
        inner: MemoryStore,
        fail_on: Cell<Option<&'static str>>,
    }

    impl FlakyStore {
        fn new(inner: MemoryStore) -> Self {
            FlakyStore {
                inner,
                fail_on: Cell::new(None),
            }
        }
    }

    struct FlakyQuery {
        inner: MemoryQuery,
        fail_on: Option<&'static str>,
    }

    fn engine_failure(step: &str) -> QueryError {
        QueryError::engine(format!("{step} failed"))
    }

    impl FlakyQuery {
        fn step(
            self,
            name: &'static str,
            restrict: impl FnOnce(MemoryQuery) -> Result<MemoryQuery>,
        ) -> Result<Self> {
            if self.fail_on == Some(name) {
                return Err(engine_failure(name));
            }
            Ok(FlakyQuery {
                inner: restrict(self.inner)?,
                fail_on: self.fail_on,
            })
        }
    }

    impl QueryHandle for FlakyQuery {
        type Element = MemoryElement;

        fn restrict_to_class(self, class: ClassId) -> Result<Self> {
            self.step("class", |q| q.restrict_to_class(class))
        }

        fn restrict_to_category(self, category: CategoryId) -> Result<Self> {
            self.step("category", |q| q.restrict_to_category(category))
        }

        fn restrict_to_non_type_instances(self) -> Result<Self> {
            self.step("non_type_instances", |q| q.restrict_to_non_type_instances())
        }

        fn restrict_to_type_definitions(self) -> Result<Self> {
            self.step("type_definitions", |q| q.restrict_to_type_definitions())
        }

        fn restrict_to_view_independent(self) -> Result<Self> {
            self.step("view_independent", |q| q.restrict_to_view_independent())
        }

        fn restrict_to_predicate(self, predicate: &ElementParameterFilter) -> Result<Self> {
            self.step("predicate", |q| q.restrict_to_predicate(predicate))
        }

        fn enumerate(&self) -> Result<Vec<MemoryElement>> {
            if self.fail_on == Some("enumerate") {
                return Err(engine_failure("enumerate"));
            }
            self.inner.enumerate()
        }
    }

    impl ElementStore for FlakyStore {
        type Handle = FlakyQuery;

        fn collect(&self, scope: Option<ViewId>) -> Result<FlakyQuery> {
            let fail_on = self.fail_on.get();
            if fail_on == Some("collect") {
                return Err(engine_failure("collect"));
            }
            Ok(FlakyQuery {
                inner: self.inner.collect(scope)?,
                fail_on,
            })
        }

        fn resolver(&self) -> &dyn Resolver {
            self.inner.resolver()
        }
    }

    #[test]
    fn new_collector_is_empty() {
        let store = store();
        let collector = Collector::new(&store);
        assert!(collector.is_empty());
        assert_eq!(collector.len(), 0);
        assert!(collector.first().is_none());
        assert!(collector.criteria().is_empty());
        assert_eq!(collector.scope(), None);
    }

    #[test]
    fn filter_collects_matches() {
        let store = store();
        let mut collector = Collector::new(&store);
        collector
            .filter(Criteria::new().of_category("OST_Walls").is_element(true))
            .unwrap();
        assert_eq!(ids(&collector), [1, 2]);
        assert!(!collector.is_empty());
    }

    #[test]
    fn filter_returns_self_for_chaining() {
        let store = store();
        let mut collector = Collector::new(&store);
        let len = collector
            .filter(Criteria::new().of_category("OST_Walls"))
            .unwrap()
            .filter(Criteria::new().is_element_type(true))
            .unwrap()
            .len();
        assert_eq!(len, 1);
        assert_eq!(collector.criteria().len(), 2);
    }

    #[test]
    fn with_criteria_applies_immediately() {
        let store = store();
        let collector =
            Collector::with_criteria(&store, Criteria::new().of_class("FamilyInstance")).unwrap();
        assert_eq!(ids(&collector), [4]);
    }

    #[test]
    fn newer_values_replace_older_ones() {
        let store = store();
        let mut collector = Collector::new(&store);
        collector.filter(Criteria::new().of_category("OST_Walls")).unwrap();
        collector.filter(Criteria::new().of_category("OST_Doors")).unwrap();
        assert_eq!(ids(&collector), [4]);
        assert_eq!(collector.criteria().len(), 1);
    }

    #[test]
    fn empty_filter_is_a_no_op() {
        let store = store();
        let mut collector = Collector::new(&store);
        collector.filter(Criteria::new().of_class("Wall")).unwrap();
        let before = ids(&collector);

        collector.filter(Criteria::new()).unwrap();
        assert_eq!(ids(&collector), before);
        assert_eq!(collector.criteria().len(), 1);
    }

    #[test]
    fn failed_filter_keeps_previous_state() {
        let store = store();
        let mut collector = Collector::new(&store);
        collector.filter(Criteria::new().of_category("OST_Walls")).unwrap();

        let err = collector
            .filter(Criteria::new().is_element(true).of_class("Floor"))
            .unwrap_err();
        assert!(matches!(err, QueryError::UnknownIdentifier { .. }));
        assert_eq!(ids(&collector), [1, 2, 3]);
        assert_eq!(collector.criteria().len(), 1);
    }

    #[test]
    fn filter_pairs_rejects_unknown_keys_atomically() {
        let store = store();
        let mut collector = Collector::new(&store);
        collector
            .filter_pairs([("of_category", CriterionValue::from("OST_Walls"))])
            .unwrap();

        let err = collector
            .filter_pairs([
                ("is_element", CriterionValue::from(true)),
                ("bogus_key", CriterionValue::from(1)),
            ])
            .unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedFilter(_)));
        assert_eq!(ids(&collector), [1, 2, 3]);
        assert_eq!(collector.criteria().len(), 1);
    }

    #[test]
    fn parameter_rules_filter_elements() {
        let store = store();
        let rule = ParameterRule::builder("Height").greater(10.0).build().unwrap();
        let collector = Collector::with_criteria(&store, Criteria::new().parameter_filter(rule))
            .unwrap();
        assert_eq!(ids(&collector), [1]);
    }

    #[test]
    fn engine_errors_keep_previous_state() {
        let flaky = FlakyStore::new(store());
        let mut collector = Collector::new(&flaky);
        collector.filter(Criteria::new().of_category("OST_Walls")).unwrap();

        let before: Vec<i64> = collector.iter().map(|e| e.id().0).collect();
        let criteria = collector.criteria().clone();
        assert_eq!(before, [1, 2, 3]);

        for step in [
            "collect",
            "category",
            "non_type_instances",
            "view_independent",
            "predicate",
            "enumerate",
        ] {
            flaky.fail_on.set(Some(step));
            let rule = ParameterRule::builder("Height").greater(10.0).build().unwrap();
            let err = collector
                .filter(
                    Criteria::new()
                        .is_element(true)
                        .is_view_independent(true)
                        .parameter_filter(rule),
                )
                .unwrap_err();

            assert!(matches!(err, QueryError::Engine(_)), "step {step}: {err}");
            let after: Vec<i64> = collector.iter().map(|e| e.id().0).collect();
            assert_eq!(after, before, "step {step}");
            assert_eq!(collector.criteria(), &criteria, "step {step}");
        }

        flaky.fail_on.set(None);
        collector.filter(Criteria::new().is_element(true)).unwrap();
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn failed_refresh_keeps_elements() {
        let flaky = FlakyStore::new(store());
        let mut collector =
            Collector::with_criteria(&flaky, Criteria::new().of_class("WallType")).unwrap();
        assert_eq!(collector.len(), 1);

        flaky.fail_on.set(Some("class"));
        let err = collector.refresh().unwrap_err();
        assert!(matches!(err, QueryError::Engine(_)));
        assert_eq!(collector.first().map(|e| e.id().0), Some(3));
    }

    #[test]
    fn in_view_with_criteria_scopes_and_filters() {
        let registry = Registry::new().with_class("Wall", WALL);
        let store = MemoryStore::new(registry)
            .with_element(MemoryElement::instance(1, WALL).visible_in(ViewId(10)))
            .with_element(MemoryElement::instance(2, WALL).owned_by(ViewId(10)))
            .with_element(MemoryElement::instance(3, WALL).visible_in(ViewId(20)));

        let collector = Collector::in_view_with_criteria(
            &store,
            ViewId(10),
            Criteria::new().of_class("Wall").is_view_independent(true),
        )
        .unwrap();
        assert_eq!(ids(&collector), [1]);
        assert_eq!(collector.scope(), Some(ViewId(10)));
    }

    #[test]
    fn view_scope_limits_search_space() {
        let registry = Registry::new().with_class("Wall", WALL);
        let store = MemoryStore::new(registry)
            .with_element(MemoryElement::instance(1, WALL).visible_in(ViewId(10)))
            .with_element(MemoryElement::instance(2, WALL).visible_in(ViewId(20)));

        let mut collector = Collector::in_view(&store, ViewId(20));
        collector.filter(Criteria::new().of_class("Wall")).unwrap();
        assert_eq!(ids(&collector), [2]);
        assert_eq!(collector.scope(), Some(ViewId(20)));
    }

    #[test]
    fn refresh_sees_store_changes() {
        let store = store();
        let mut collector =
            Collector::with_criteria(&store, Criteria::new().of_category("OST_Doors")).unwrap();
        assert_eq!(collector.len(), 1);

        store.insert(MemoryElement::instance(5, FAMILY_INSTANCE).category(DOORS));
        assert_eq!(collector.len(), 1);

        collector.refresh().unwrap();
        assert_eq!(ids(&collector), [4, 5]);
    }

    #[test]
    fn iteration_and_debug() {
        let store = store();
        let collector =
            Collector::with_criteria(&store, Criteria::new().of_category("OST_Walls")).unwrap();

        let mut seen = Vec::new();
        for element in &collector {
            seen.push(element.id().0);
        }
        assert_eq!(seen, [1, 2, 3]);

        let rendered = format!("{collector:?}");
        assert!(rendered.contains("elements: 3"));
        assert!(rendered.contains("of_category"));

        let elements = collector.into_elements();
        assert_eq!(elements.len(), 3);
    }
}
