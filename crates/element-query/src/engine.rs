//! The query-engine contract a collector runs against.
//!
//! An [`ElementStore`] hands out [`QueryHandle`]s. Each restriction consumes
//! the handle and returns a narrower one; [`QueryHandle::enumerate`]
//! materializes whatever is left. [`Parameterized`] is the element-side
//! accessor used by engines that evaluate predicates in process.

use crate::coerce::Resolver;
use crate::error::Result;
use crate::ids::{CategoryId, ClassId, ParameterId, ViewId};
use crate::rule::ElementParameterFilter;
use crate::value::Value;

/// A document of elements that can be queried.
pub trait ElementStore {
    /// Handle type threaded through the restriction chain.
    type Handle: QueryHandle;

    /// Starts a query over the whole document, or over the elements
    /// visible in one view.
    fn collect(&self, scope: Option<ViewId>) -> Result<Self::Handle>;

    /// Name registries used to resolve category and class shorthands.
    fn resolver(&self) -> &dyn Resolver;
}

/// An intermediate, narrowed query.
///
/// Restrictions of this kind commute: applying the same set in any order
/// yields the same elements.
pub trait QueryHandle: Sized {
    /// Element type produced by [`QueryHandle::enumerate`].
    type Element;

    /// Keeps elements of the given class.
    fn restrict_to_class(self, class: ClassId) -> Result<Self>;

    /// Keeps elements of the given category.
    fn restrict_to_category(self, category: CategoryId) -> Result<Self>;

    /// Keeps instances, dropping type definitions.
    fn restrict_to_non_type_instances(self) -> Result<Self>;

    /// Keeps type definitions, dropping instances.
    fn restrict_to_type_definitions(self) -> Result<Self>;

    /// Keeps elements not owned by any view.
    fn restrict_to_view_independent(self) -> Result<Self>;

    /// Keeps elements passing a parameter predicate.
    fn restrict_to_predicate(self, predicate: &ElementParameterFilter) -> Result<Self>;

    /// Materializes the remaining elements in the engine's natural order.
    fn enumerate(&self) -> Result<Vec<Self::Element>>;
}

/// Types exposing parameter values to rule evaluation.
///
/// # Example
///
/// ```
/// use element_query::{ParameterId, Parameterized, Value};
///
/// struct Room {
///     name: String,
///     area: f64,
/// }
///
/// impl Parameterized for Room {
///     fn parameter(&self, id: &ParameterId) -> Value<'_> {
///         match id.as_str() {
///             "Name" => Value::Text(&self.name),
///             "Area" => Value::Double(self.area),
///             _ => Value::None,
///         }
///     }
/// }
///
/// let room = Room { name: "Lobby".into(), area: 42.0 };
/// assert_eq!(room.parameter(&"Name".into()), Value::Text("Lobby"));
/// ```
pub trait Parameterized {
    /// Returns the value of a parameter, or [`Value::None`] if the element
    /// does not carry it.
    fn parameter(&self, id: &ParameterId) -> Value<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sheet {
        number: String,
        revision: i64,
    }

    impl Parameterized for Sheet {
        fn parameter(&self, id: &ParameterId) -> Value<'_> {
            match id.as_str() {
                "Sheet Number" => Value::Text(&self.number),
                "Revision" => Value::Integer(self.revision),
                _ => Value::None,
            }
        }
    }

    #[test]
    fn parameterized_manual_impl() {
        let sheet = Sheet {
            number: "A-101".to_string(),
            revision: 3,
        };

        assert_eq!(
            sheet.parameter(&ParameterId::from("Sheet Number")),
            Value::Text("A-101")
        );
        assert_eq!(
            sheet.parameter(&ParameterId::from("Revision")),
            Value::Integer(3)
        );
        assert_eq!(sheet.parameter(&ParameterId::from("Unknown")), Value::None);
    }
}
