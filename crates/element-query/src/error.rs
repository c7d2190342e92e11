//! Error types for the element-query crate.

use thiserror::Error;

use crate::comparator::Comparator;

/// Boxed error raised by a query engine implementation.
pub type EngineError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur when building criteria or running a collector.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A category or class shorthand name could not be resolved.
    #[error("unknown identifier for '{criterion}': '{name}'")]
    UnknownIdentifier {
        criterion: &'static str,
        name: String,
    },

    /// Criterion name is not part of the supported vocabulary.
    #[error("collector filter rule does not exist: {0}")]
    UnsupportedFilter(String),

    /// Criterion value has the wrong kind for its name.
    #[error("criterion '{criterion}' expects {expected}")]
    InvalidCriterionValue {
        criterion: &'static str,
        expected: &'static str,
    },

    /// A parameter rule was built without any comparator.
    #[error("parameter rule on '{parameter}' has no comparator")]
    MissingComparator { parameter: String },

    /// A parameter rule was given more than one comparator.
    #[error("parameter rule on '{parameter}' has several comparators: {comparators:?}")]
    AmbiguousRule {
        parameter: String,
        comparators: Vec<Comparator>,
    },

    /// Operand kind is not accepted by the comparator.
    #[error("comparator '{comparator}' does not accept {operand} operands")]
    InvalidOperand {
        comparator: Comparator,
        operand: &'static str,
    },

    /// A rule modifier condition has the wrong value kind.
    #[error("condition '{key}' expects {expected}")]
    InvalidCondition {
        key: &'static str,
        expected: &'static str,
    },

    /// Failure reported by the underlying query engine.
    #[error("query engine error: {0}")]
    Engine(#[source] EngineError),
}

impl QueryError {
    /// Wraps an engine failure so it can be propagated through the chain.
    pub fn engine(err: impl Into<EngineError>) -> Self {
        QueryError::Engine(err.into())
    }
}

/// Result type for element-query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
