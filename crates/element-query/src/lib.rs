//! Element Query - fluent filtered-element collection over typed design-element stores.
//!
//! A design document (a CAD/BIM model) holds a large graph of typed
//! elements. Its query engine narrows a query one procedural restriction at a
//! time. This crate lets callers state *what* they want instead:
//!
//! - A [`Collector`] accumulates [`Criteria`] and keeps the matching elements
//! - Category and class criteria accept shorthand names (`"OST_Walls"`,
//!   `"WallType"`), resolved through a [`Resolver`]
//! - Boolean toggles restrict when `true` and are ignored when `false`
//! - A [`ParameterRule`] compiles one parameter comparison into the predicate
//!   the engine consumes
//!
//! # Quick Start
//!
//! ```rust
//! use element_query::{
//!     CategoryId, ClassId, Collector, Criteria, MemoryElement, MemoryStore, ParameterRule,
//!     Registry,
//! };
//!
//! let registry = Registry::new()
//!     .with_category("OST_Walls", CategoryId(-2000011))
//!     .with_class("Wall", ClassId(1));
//!
//! let store = MemoryStore::new(registry)
//!     .with_element(
//!         MemoryElement::instance(1, ClassId(1))
//!             .category(CategoryId(-2000011))
//!             .param("Height", 12.0),
//!     )
//!     .with_element(
//!         MemoryElement::instance(2, ClassId(1))
//!             .category(CategoryId(-2000011))
//!             .param("Height", 8.0),
//!     );
//!
//! let tall = ParameterRule::builder("Height").greater(10.0).build().unwrap();
//!
//! let mut walls = Collector::new(&store);
//! walls
//!     .filter(
//!         Criteria::new()
//!             .of_category("Walls")
//!             .is_element(true)
//!             .parameter_filter(tall),
//!     )
//!     .unwrap();
//!
//! assert_eq!(walls.len(), 1);
//! assert_eq!(walls.first().map(|e| e.id().0), Some(1));
//! ```
//!
//! # Criteria
//!
//! | Keyword | Value | Engine operation |
//! |---------|-------|------------------|
//! | `of_class` | class id or name | `restrict_to_class` |
//! | `of_category` | category id or name | `restrict_to_category` |
//! | `is_element` | bool | `restrict_to_non_type_instances` when `true` |
//! | `is_element_type` | bool | `restrict_to_type_definitions` when `true` |
//! | `is_view_independent` | bool | `restrict_to_view_independent` when `true` |
//! | `parameter_filter` | [`ParameterRule`] | `restrict_to_predicate` |
//!
//! Criteria combine with AND only. Any other keyword is rejected with
//! [`QueryError::UnsupportedFilter`].

mod chain;
mod coerce;
mod collector;
mod comparator;
mod config;
mod criteria;
mod engine;
mod error;
mod ids;
mod memory;
mod parameter;
mod rule;
mod value;

// Re-export public API
pub use chain::{chain, Restriction};
pub use coerce::{coerce, Registry, Resolver, CATEGORY_PREFIX};
pub use collector::{Collector, ElementOf};
pub use comparator::{Comparator, UnknownComparator};
pub use config::{RuleDefaults, CASE_SENSITIVE, FLOAT_PRECISION};
pub use criteria::{Criteria, Criterion, CriterionName, CriterionValue};
pub use engine::{ElementStore, Parameterized, QueryHandle};
pub use error::{EngineError, QueryError, Result};
pub use ids::{CategoryId, CategoryRef, ClassId, ClassRef, ElementId, Ident, ParameterId, ViewId};
pub use memory::{MemoryElement, MemoryQuery, MemoryStore};
pub use parameter::{ConditionValue, ParameterRule, ParameterRuleBuilder};
pub use rule::{ElementParameterFilter, FilterRule, Modifier, RuleConstructor, RuleFactory};
pub use value::{compare_within, Operand, ParamValue, Value};
