//! In-memory element store.
//!
//! [`MemoryStore`] implements the engine contract over a plain list of
//! [`MemoryElement`]s. A [`MemoryQuery`] starts from a snapshot of the
//! elements in scope; each restriction retains a subset, and enumeration
//! clones the survivors in insertion order.
//!
//! The element list sits behind a `RefCell` so the store can change while
//! collectors borrow it, the way a host document changes between queries.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::coerce::{Registry, Resolver};
use crate::engine::{ElementStore, Parameterized, QueryHandle};
use crate::error::Result;
use crate::ids::{CategoryId, ClassId, ElementId, ParameterId, ViewId};
use crate::rule::ElementParameterFilter;
use crate::value::{ParamValue, Value};

/// A stored element.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryElement {
    id: ElementId,
    class: ClassId,
    category: Option<CategoryId>,
    is_type: bool,
    owner_view: Option<ViewId>,
    visible_in: Vec<ViewId>,
    parameters: BTreeMap<ParameterId, ParamValue>,
}

impl MemoryElement {
    fn new(id: i64, class: ClassId, is_type: bool) -> Self {
        MemoryElement {
            id: ElementId(id),
            class,
            category: None,
            is_type,
            owner_view: None,
            visible_in: Vec::new(),
            parameters: BTreeMap::new(),
        }
    }

    /// An element instance.
    pub fn instance(id: i64, class: ClassId) -> Self {
        Self::new(id, class, false)
    }

    /// A type definition.
    pub fn type_definition(id: i64, class: ClassId) -> Self {
        Self::new(id, class, true)
    }

    /// Assigns a category.
    pub fn category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    /// Makes this element view-specific, owned by (and visible in) `view`.
    pub fn owned_by(mut self, view: ViewId) -> Self {
        self.owner_view = Some(view);
        self.visible_in(view)
    }

    pub fn visible_in(mut self, view: ViewId) -> Self {
        if !self.visible_in.contains(&view) {
            self.visible_in.push(view);
        }
        self
    }

    /// Sets a parameter value.
    pub fn param(mut self, id: impl Into<ParameterId>, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(id.into(), value.into());
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn class(&self) -> ClassId {
        self.class
    }

    pub fn category_id(&self) -> Option<CategoryId> {
        self.category
    }

    pub fn is_type(&self) -> bool {
        self.is_type
    }

    pub fn owner_view(&self) -> Option<ViewId> {
        self.owner_view
    }

    pub fn is_visible_in(&self, view: ViewId) -> bool {
        self.visible_in.contains(&view)
    }
}

impl Parameterized for MemoryElement {
    fn parameter(&self, id: &ParameterId) -> Value<'_> {
        self.parameters
            .get(id)
            .map_or(Value::None, ParamValue::as_value)
    }
}

/// Element store backed by a `Vec`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    registry: Registry,
    elements: RefCell<Vec<MemoryElement>>,
}

impl MemoryStore {
    /// Creates an empty store resolving names through `registry`.
    pub fn new(registry: Registry) -> Self {
        MemoryStore {
            registry,
            elements: RefCell::new(Vec::new()),
        }
    }

    /// Builder form of [`MemoryStore::insert`].
    pub fn with_element(self, element: MemoryElement) -> Self {
        self.insert(element);
        self
    }

    /// Appends an element.
    pub fn insert(&self, element: MemoryElement) {
        self.elements.borrow_mut().push(element);
    }

    /// Removes an element, returning it if it was present.
    pub fn remove(&self, id: ElementId) -> Option<MemoryElement> {
        let mut elements = self.elements.borrow_mut();
        let pos = elements.iter().position(|e| e.id == id)?;
        Some(elements.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.borrow().is_empty()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl ElementStore for MemoryStore {
    type Handle = MemoryQuery;

    fn collect(&self, scope: Option<ViewId>) -> Result<Self::Handle> {
        let elements = self
            .elements
            .borrow()
            .iter()
            .filter(|e| scope.map_or(true, |view| e.is_visible_in(view)))
            .cloned()
            .collect();
        Ok(MemoryQuery { elements })
    }

    fn resolver(&self) -> &dyn Resolver {
        &self.registry
    }
}

/// Query handle over a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryQuery {
    elements: Vec<MemoryElement>,
}

impl MemoryQuery {
    fn retain(mut self, keep: impl FnMut(&MemoryElement) -> bool) -> Result<Self> {
        self.elements.retain(keep);
        Ok(self)
    }
}

impl QueryHandle for MemoryQuery {
    type Element = MemoryElement;

    fn restrict_to_class(self, class: ClassId) -> Result<Self> {
        self.retain(|e| e.class == class)
    }

    fn restrict_to_category(self, category: CategoryId) -> Result<Self> {
        self.retain(|e| e.category == Some(category))
    }

    fn restrict_to_non_type_instances(self) -> Result<Self> {
        self.retain(|e| !e.is_type)
    }

    fn restrict_to_type_definitions(self) -> Result<Self> {
        self.retain(|e| e.is_type)
    }

    fn restrict_to_view_independent(self) -> Result<Self> {
        self.retain(|e| e.owner_view.is_none())
    }

    fn restrict_to_predicate(self, predicate: &ElementParameterFilter) -> Result<Self> {
        self.retain(|e| predicate.evaluate(e))
    }

    fn enumerate(&self) -> Result<Vec<MemoryElement>> {
        Ok(self.elements.clone())
    }
}
