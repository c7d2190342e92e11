//! Low-level comparison rules and the predicate consumed by the query engine.
//!
//! A [`FilterRule`] compares one parameter against one operand. The
//! [`RuleFactory`] has one constructor per [`Comparator`]; an
//! [`ElementParameterFilter`] wraps a rule with its negation flag and is the
//! only form the filter chain hands to the engine.

use crate::comparator::Comparator;
use crate::engine::Parameterized;
use crate::error::{QueryError, Result};
use crate::ids::ParameterId;
use crate::value::{compare_within, Operand, Value};

/// Comparator-specific construction argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modifier {
    /// No extra argument (integer operands).
    None,
    /// Case sensitivity of a text comparison.
    CaseSensitive(bool),
    /// Tolerance of a floating-point comparison.
    Tolerance(f64),
}

/// A single parameter comparison, as built by the [`RuleFactory`].
#[derive(Debug, Clone, PartialEq)]
pub enum FilterRule {
    /// Text comparison.
    Text {
        parameter: ParameterId,
        comparator: Comparator,
        value: String,
        case_sensitive: bool,
    },
    /// Integer comparison.
    Integer {
        parameter: ParameterId,
        comparator: Comparator,
        value: i64,
    },
    /// Floating-point comparison; values closer than `tolerance` are equal.
    Double {
        parameter: ParameterId,
        comparator: Comparator,
        value: f64,
        tolerance: f64,
    },
}

impl FilterRule {
    /// The parameter this rule reads.
    pub fn parameter(&self) -> &ParameterId {
        match self {
            FilterRule::Text { parameter, .. }
            | FilterRule::Integer { parameter, .. }
            | FilterRule::Double { parameter, .. } => parameter,
        }
    }

    /// The comparison this rule performs.
    pub fn comparator(&self) -> Comparator {
        match self {
            FilterRule::Text { comparator, .. }
            | FilterRule::Integer { comparator, .. }
            | FilterRule::Double { comparator, .. } => *comparator,
        }
    }

    /// Evaluates this rule against a parameter value.
    ///
    /// Missing values and kind mismatches never match. Integer rules accept
    /// double values and the reverse, comparing as `f64`.
    pub fn matches(&self, value: &Value<'_>) -> bool {
        match (self, value) {
            (
                FilterRule::Text {
                    comparator,
                    value: pattern,
                    case_sensitive,
                    ..
                },
                Value::Text(s),
            ) => match_text(*comparator, s, pattern, *case_sensitive),

            (
                FilterRule::Integer {
                    comparator,
                    value: clause,
                    ..
                },
                Value::Integer(field),
            ) => comparator.eval_ordering(field.cmp(clause)),

            (
                FilterRule::Integer {
                    comparator,
                    value: clause,
                    ..
                },
                Value::Double(field),
            ) => field
                .partial_cmp(&(*clause as f64))
                .is_some_and(|ord| comparator.eval_ordering(ord)),

            (
                FilterRule::Double {
                    comparator,
                    value: clause,
                    tolerance,
                    ..
                },
                field,
            ) => match field.as_f64() {
                Some(field) => compare_within(field, *clause, *tolerance)
                    .is_some_and(|ord| comparator.eval_ordering(ord)),
                None => false,
            },

            _ => false,
        }
    }
}

fn match_text(comparator: Comparator, field: &str, pattern: &str, case_sensitive: bool) -> bool {
    let (field, pattern) = if case_sensitive {
        (field.to_string(), pattern.to_string())
    } else {
        (field.to_lowercase(), pattern.to_lowercase())
    };
    match comparator {
        Comparator::Equals => field == pattern,
        Comparator::Contains => field.contains(&pattern),
        Comparator::Begins => field.starts_with(&pattern),
        Comparator::Ends => field.ends_with(&pattern),
        ordered => ordered.eval_ordering(field.as_str().cmp(pattern.as_str())),
    }
}

/// Signature shared by every rule constructor.
pub type RuleConstructor = fn(ParameterId, Operand, Modifier) -> Result<FilterRule>;

/// Builds low-level rules, one constructor per comparator.
pub struct RuleFactory;

impl RuleFactory {
    /// Returns the constructor for a comparator.
    pub fn constructor(comparator: Comparator) -> RuleConstructor {
        match comparator {
            Comparator::Equals => Self::create_equals_rule,
            Comparator::Contains => Self::create_contains_rule,
            Comparator::Begins => Self::create_begins_with_rule,
            Comparator::Ends => Self::create_ends_with_rule,
            Comparator::Greater => Self::create_greater_rule,
            Comparator::GreaterEqual => Self::create_greater_or_equal_rule,
            Comparator::Less => Self::create_less_rule,
            Comparator::LessEqual => Self::create_less_or_equal_rule,
        }
    }

    /// Creates an equality rule.
    pub fn create_equals_rule(
        parameter: ParameterId,
        operand: Operand,
        modifier: Modifier,
    ) -> Result<FilterRule> {
        build(Comparator::Equals, parameter, operand, modifier)
    }

    /// Creates a substring rule. Text operands only.
    pub fn create_contains_rule(
        parameter: ParameterId,
        operand: Operand,
        modifier: Modifier,
    ) -> Result<FilterRule> {
        build(Comparator::Contains, parameter, operand, modifier)
    }

    /// Creates a prefix rule. Text operands only.
    pub fn create_begins_with_rule(
        parameter: ParameterId,
        operand: Operand,
        modifier: Modifier,
    ) -> Result<FilterRule> {
        build(Comparator::Begins, parameter, operand, modifier)
    }

    /// Creates a suffix rule. Text operands only.
    pub fn create_ends_with_rule(
        parameter: ParameterId,
        operand: Operand,
        modifier: Modifier,
    ) -> Result<FilterRule> {
        build(Comparator::Ends, parameter, operand, modifier)
    }

    /// Creates a strictly-greater rule.
    pub fn create_greater_rule(
        parameter: ParameterId,
        operand: Operand,
        modifier: Modifier,
    ) -> Result<FilterRule> {
        build(Comparator::Greater, parameter, operand, modifier)
    }

    /// Creates a greater-or-equal rule.
    pub fn create_greater_or_equal_rule(
        parameter: ParameterId,
        operand: Operand,
        modifier: Modifier,
    ) -> Result<FilterRule> {
        build(Comparator::GreaterEqual, parameter, operand, modifier)
    }

    /// Creates a strictly-less rule.
    pub fn create_less_rule(
        parameter: ParameterId,
        operand: Operand,
        modifier: Modifier,
    ) -> Result<FilterRule> {
        build(Comparator::Less, parameter, operand, modifier)
    }

    /// Creates a less-or-equal rule.
    pub fn create_less_or_equal_rule(
        parameter: ParameterId,
        operand: Operand,
        modifier: Modifier,
    ) -> Result<FilterRule> {
        build(Comparator::LessEqual, parameter, operand, modifier)
    }
}

fn build(
    comparator: Comparator,
    parameter: ParameterId,
    operand: Operand,
    modifier: Modifier,
) -> Result<FilterRule> {
    if comparator.is_text_only() && !matches!(operand, Operand::Text(_)) {
        return Err(QueryError::InvalidOperand {
            comparator,
            operand: operand.kind(),
        });
    }

    let rule = match operand {
        Operand::Text(value) => FilterRule::Text {
            parameter,
            comparator,
            value,
            case_sensitive: match modifier {
                Modifier::CaseSensitive(flag) => flag,
                _ => true,
            },
        },
        Operand::Integer(value) => FilterRule::Integer {
            parameter,
            comparator,
            value,
        },
        Operand::Double(value) => FilterRule::Double {
            parameter,
            comparator,
            value,
            tolerance: match modifier {
                Modifier::Tolerance(tolerance) => tolerance,
                _ => 0.0,
            },
        },
    };
    Ok(rule)
}

/// Predicate handed to [`QueryHandle::restrict_to_predicate`](crate::QueryHandle::restrict_to_predicate).
///
/// Engines evaluate it through [`ElementParameterFilter::evaluate`] or read
/// the wrapped rule to translate it into their own representation.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementParameterFilter {
    rule: FilterRule,
    inverted: bool,
}

impl ElementParameterFilter {
    /// Wraps `rule`, optionally inverting it.
    pub fn new(rule: FilterRule, inverted: bool) -> Self {
        ElementParameterFilter { rule, inverted }
    }

    /// The wrapped rule.
    pub fn rule(&self) -> &FilterRule {
        &self.rule
    }

    /// Returns `true` if the match sense is inverted.
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Returns `true` if the element passes this predicate.
    ///
    /// An inverted predicate passes every element the rule rejects,
    /// including elements that lack the parameter.
    pub fn evaluate<E: Parameterized + ?Sized>(&self, element: &E) -> bool {
        let value = element.parameter(self.rule.parameter());
        self.rule.matches(&value) != self.inverted
    }
}
