//! Folding resolved criteria into a query handle.
//!
//! Every [`Restriction`] maps to exactly one [`QueryHandle`] operation.
//! [`chain`] applies them in order, threading the narrowed handle from one
//! step to the next.

use tracing::trace;

use crate::criteria::CriterionName;
use crate::engine::QueryHandle;
use crate::error::Result;
use crate::ids::{CategoryId, ClassId};
use crate::rule::ElementParameterFilter;

/// A criterion with every shorthand resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Restriction<'a> {
    OfClass(ClassId),
    OfCategory(CategoryId),
    IsElement(bool),
    IsElementType(bool),
    IsViewIndependent(bool),
    ParameterFilter(&'a ElementParameterFilter),
}

impl Restriction<'_> {
    pub fn name(&self) -> CriterionName {
        match self {
            Restriction::OfClass(_) => CriterionName::OfClass,
            Restriction::OfCategory(_) => CriterionName::OfCategory,
            Restriction::IsElement(_) => CriterionName::IsElement,
            Restriction::IsElementType(_) => CriterionName::IsElementType,
            Restriction::IsViewIndependent(_) => CriterionName::IsViewIndependent,
            Restriction::ParameterFilter(_) => CriterionName::ParameterFilter,
        }
    }

    /// Applies this restriction to `handle`.
    ///
    /// A toggle set to `false` applies nothing and returns the handle as is.
    pub fn apply<H: QueryHandle>(&self, handle: H) -> Result<H> {
        match *self {
            Restriction::OfClass(class) => handle.restrict_to_class(class),
            Restriction::OfCategory(category) => handle.restrict_to_category(category),
            Restriction::IsElement(true) => handle.restrict_to_non_type_instances(),
            Restriction::IsElementType(true) => handle.restrict_to_type_definitions(),
            Restriction::IsViewIndependent(true) => handle.restrict_to_view_independent(),
            Restriction::IsElement(false)
            | Restriction::IsElementType(false)
            | Restriction::IsViewIndependent(false) => Ok(handle),
            Restriction::ParameterFilter(predicate) => handle.restrict_to_predicate(predicate),
        }
    }
}

/// Applies `restrictions` to `handle` in order and returns the final handle.
///
/// The first engine error stops the fold; the caller only ever sees the
/// final handle or the error.
pub fn chain<H: QueryHandle>(handle: H, restrictions: &[Restriction<'_>]) -> Result<H> {
    restrictions.iter().try_fold(handle, |handle, restriction| {
        trace!(criterion = %restriction.name(), ?restriction, "applying restriction");
        restriction.apply(handle)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::parameter::ParameterRule;

    /// Handle that records the operations applied to it.
    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<String>,
        fail_on: Option<&'static str>,
    }

    impl Recorder {
        fn push(mut self, call: String) -> Result<Self> {
            if self.fail_on.is_some_and(|f| call.starts_with(f)) {
                return Err(QueryError::engine(format!("rejected {call}")));
            }
            self.calls.push(call);
            Ok(self)
        }
    }

    impl QueryHandle for Recorder {
        type Element = String;

        fn restrict_to_class(self, class: ClassId) -> Result<Self> {
            self.push(format!("OfClass({})", class.0))
        }

        fn restrict_to_category(self, category: CategoryId) -> Result<Self> {
            self.push(format!("OfCategory({})", category.0))
        }

        fn restrict_to_non_type_instances(self) -> Result<Self> {
            self.push("WhereElementIsNotElementType".to_string())
        }

        fn restrict_to_type_definitions(self) -> Result<Self> {
            self.push("WhereElementIsElementType".to_string())
        }

        fn restrict_to_view_independent(self) -> Result<Self> {
            self.push("WhereElementIsViewIndependent".to_string())
        }

        fn restrict_to_predicate(self, predicate: &ElementParameterFilter) -> Result<Self> {
            self.push(format!("WherePasses({})", predicate.rule().parameter()))
        }

        fn enumerate(&self) -> Result<Vec<String>> {
            Ok(self.calls.clone())
        }
    }

    #[test]
    fn applies_each_restriction_in_order() {
        let rule = ParameterRule::builder("Height").greater(3.0).build().unwrap();
        let restrictions = [
            Restriction::OfClass(ClassId(2)),
            Restriction::OfCategory(CategoryId(-2000011)),
            Restriction::IsElementType(true),
            Restriction::ParameterFilter(rule.predicate()),
        ];

        let handle = chain(Recorder::default(), &restrictions).unwrap();
        assert_eq!(
            handle.enumerate().unwrap(),
            [
                "OfClass(2)",
                "OfCategory(-2000011)",
                "WhereElementIsElementType",
                "WherePasses(Height)",
            ]
        );
    }

    #[test]
    fn false_toggles_apply_nothing() {
        let restrictions = [
            Restriction::IsElement(false),
            Restriction::IsElementType(false),
            Restriction::IsViewIndependent(false),
        ];
        let handle = chain(Recorder::default(), &restrictions).unwrap();
        assert!(handle.calls.is_empty());
    }

    #[test]
    fn true_toggles_apply_their_operation() {
        let restrictions = [
            Restriction::IsElement(true),
            Restriction::IsViewIndependent(true),
        ];
        let handle = chain(Recorder::default(), &restrictions).unwrap();
        assert_eq!(
            handle.calls,
            ["WhereElementIsNotElementType", "WhereElementIsViewIndependent"]
        );
    }

    #[test]
    fn empty_chain_returns_handle_unchanged() {
        let handle = chain(Recorder::default(), &[]).unwrap();
        assert!(handle.calls.is_empty());
    }

    #[test]
    fn engine_errors_propagate() {
        let handle = Recorder {
            fail_on: Some("OfCategory"),
            ..Recorder::default()
        };
        let restrictions = [
            Restriction::OfClass(ClassId(1)),
            Restriction::OfCategory(CategoryId(-1)),
        ];
        let err = chain(handle, &restrictions).unwrap_err();
        assert!(matches!(err, QueryError::Engine(_)));
    }
}
