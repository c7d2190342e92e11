//! Parameter rules: one parameter, one comparison, compiled once.
//!
//! A [`ParameterRule`] records how it was asked for (parameter, comparator,
//! operand, modifiers) and carries the [`ElementParameterFilter`] compiled
//! from it. The filter chain only ever reads the compiled predicate.
//!
//! # Example
//!
//! ```
//! use element_query::{Comparator, ParameterRule};
//!
//! let rule = ParameterRule::builder("Height").greater(10.0).build().unwrap();
//! assert_eq!(rule.comparator(), Comparator::Greater);
//! assert!(!rule.is_negated());
//!
//! let rule = ParameterRule::builder("Type Name")
//!     .contains("wall")
//!     .case_sensitive(false)
//!     .negated(true)
//!     .build()
//!     .unwrap();
//! assert!(rule.is_negated());
//! ```

use tracing::{debug, warn};

use crate::comparator::Comparator;
use crate::config::RuleDefaults;
use crate::error::{QueryError, Result};
use crate::ids::ParameterId;
use crate::rule::{ElementParameterFilter, Modifier, RuleFactory};
use crate::value::Operand;

/// Immutable single-parameter comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRule {
    parameter_id: ParameterId,
    comparator: Comparator,
    operand: Operand,
    case_sensitive: bool,
    precision: f64,
    negated: bool,
    predicate: ElementParameterFilter,
}

impl ParameterRule {
    /// Starts a rule on `parameter` with the default modifiers.
    pub fn builder(parameter: impl Into<ParameterId>) -> ParameterRuleBuilder {
        Self::builder_with(parameter, &RuleDefaults::default())
    }

    /// Starts a rule on `parameter` with configured defaults.
    pub fn builder_with(
        parameter: impl Into<ParameterId>,
        defaults: &RuleDefaults,
    ) -> ParameterRuleBuilder {
        ParameterRuleBuilder {
            parameter_id: parameter.into(),
            conditions: Vec::new(),
            case_sensitive: defaults.case_sensitive,
            precision: defaults.precision,
            negated: false,
        }
    }

    /// Builds a rule with a single comparator and default modifiers.
    pub fn new(
        parameter: impl Into<ParameterId>,
        comparator: Comparator,
        operand: impl Into<Operand>,
    ) -> Result<Self> {
        Self::builder(parameter).condition(comparator, operand).build()
    }

    /// Builds a rule from named conditions.
    ///
    /// Recognized keys are the comparator names (`equals`, `contains`,
    /// `begins`, `ends`, `greater`, `greater_equal`, `less`, `less_equal`)
    /// and the modifiers `case_sensitive`, `precision` and `reverse`
    /// (alias `negated`). Other keys are ignored.
    ///
    /// ```
    /// use element_query::{Comparator, ConditionValue, ParameterRule};
    ///
    /// let rule = ParameterRule::from_conditions(
    ///     "Type Name",
    ///     [
    ///         ("equals", ConditionValue::from("Wall 1")),
    ///         ("case_sensitive", ConditionValue::from(false)),
    ///     ],
    /// )
    /// .unwrap();
    /// assert_eq!(rule.comparator(), Comparator::Equals);
    /// assert!(!rule.case_sensitive());
    /// ```
    pub fn from_conditions<I, K>(parameter: impl Into<ParameterId>, conditions: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, ConditionValue)>,
        K: AsRef<str>,
    {
        let mut builder = Self::builder(parameter);
        for (key, value) in conditions {
            let key = key.as_ref();
            if let Ok(comparator) = key.parse::<Comparator>() {
                builder = builder.condition(comparator, value.into_operand(comparator)?);
                continue;
            }
            builder = match key {
                "case_sensitive" => builder.case_sensitive(value.into_flag("case_sensitive")?),
                "precision" => builder.precision(value.into_precision()?),
                "reverse" | "negated" => builder.negated(value.into_flag("reverse")?),
                other => {
                    warn!(
                        parameter = %builder.parameter_id,
                        condition = other,
                        "ignoring unrecognized rule condition"
                    );
                    builder
                }
            };
        }
        builder.build()
    }

    /// The parameter this rule reads.
    pub fn parameter_id(&self) -> &ParameterId {
        &self.parameter_id
    }

    /// The comparison applied.
    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    /// The value compared against.
    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    /// Whether text comparison is case sensitive.
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Tolerance used for floating-point comparison.
    pub fn precision(&self) -> f64 {
        self.precision
    }

    /// Returns `true` if the match sense is inverted.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// The compiled predicate handed to the query engine.
    pub fn predicate(&self) -> &ElementParameterFilter {
        &self.predicate
    }
}

/// Fluent builder for [`ParameterRule`].
#[derive(Debug, Clone)]
pub struct ParameterRuleBuilder {
    parameter_id: ParameterId,
    conditions: Vec<(Comparator, Operand)>,
    case_sensitive: bool,
    precision: f64,
    negated: bool,
}

impl ParameterRuleBuilder {
    /// Adds a comparison. A rule accepts exactly one.
    pub fn condition(mut self, comparator: Comparator, operand: impl Into<Operand>) -> Self {
        self.conditions.push((comparator, operand.into()));
        self
    }

    pub fn equals(self, operand: impl Into<Operand>) -> Self {
        self.condition(Comparator::Equals, operand)
    }

    pub fn contains(self, operand: &str) -> Self {
        self.condition(Comparator::Contains, operand)
    }

    pub fn begins(self, operand: &str) -> Self {
        self.condition(Comparator::Begins, operand)
    }

    pub fn ends(self, operand: &str) -> Self {
        self.condition(Comparator::Ends, operand)
    }

    pub fn greater(self, operand: impl Into<Operand>) -> Self {
        self.condition(Comparator::Greater, operand)
    }

    pub fn greater_equal(self, operand: impl Into<Operand>) -> Self {
        self.condition(Comparator::GreaterEqual, operand)
    }

    pub fn less(self, operand: impl Into<Operand>) -> Self {
        self.condition(Comparator::Less, operand)
    }

    pub fn less_equal(self, operand: impl Into<Operand>) -> Self {
        self.condition(Comparator::LessEqual, operand)
    }

    /// Case sensitivity of text comparisons.
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Tolerance of floating-point comparisons.
    pub fn precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    /// Inverts the match sense of the rule.
    pub fn negated(mut self, negated: bool) -> Self {
        self.negated = negated;
        self
    }

    /// Compiles the rule.
    ///
    /// Fails when no comparator or more than one comparator was given, or
    /// when the operand kind does not suit the comparator.
    pub fn build(self) -> Result<ParameterRule> {
        let ParameterRuleBuilder {
            parameter_id,
            mut conditions,
            case_sensitive,
            precision,
            negated,
        } = self;

        if conditions.len() > 1 {
            return Err(QueryError::AmbiguousRule {
                parameter: parameter_id.to_string(),
                comparators: conditions.iter().map(|(c, _)| *c).collect(),
            });
        }
        let Some((comparator, operand)) = conditions.pop() else {
            return Err(QueryError::MissingComparator {
                parameter: parameter_id.to_string(),
            });
        };

        let modifier = match operand {
            Operand::Text(_) => Modifier::CaseSensitive(case_sensitive),
            Operand::Double(_) => Modifier::Tolerance(precision),
            Operand::Integer(_) => Modifier::None,
        };
        let constructor = RuleFactory::constructor(comparator);
        let rule = constructor(parameter_id.clone(), operand.clone(), modifier)?;
        debug!(
            parameter = %parameter_id,
            %comparator,
            ?operand,
            ?modifier,
            negated,
            "compiled parameter rule"
        );

        Ok(ParameterRule {
            parameter_id,
            comparator,
            operand,
            case_sensitive,
            precision,
            negated,
            predicate: ElementParameterFilter::new(rule, negated),
        })
    }
}

/// Value of a named rule condition.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    Text(String),
    Integer(i64),
    Double(f64),
    Bool(bool),
}

impl ConditionValue {
    fn into_operand(self, comparator: Comparator) -> Result<Operand> {
        match self {
            ConditionValue::Text(s) => Ok(Operand::Text(s)),
            ConditionValue::Integer(n) => Ok(Operand::Integer(n)),
            ConditionValue::Double(n) => Ok(Operand::Double(n)),
            ConditionValue::Bool(_) => Err(QueryError::InvalidOperand {
                comparator,
                operand: "boolean",
            }),
        }
    }

    fn into_flag(self, key: &'static str) -> Result<bool> {
        match self {
            ConditionValue::Bool(flag) => Ok(flag),
            _ => Err(QueryError::InvalidCondition {
                key,
                expected: "a boolean",
            }),
        }
    }

    fn into_precision(self) -> Result<f64> {
        match self {
            ConditionValue::Double(n) => Ok(n),
            ConditionValue::Integer(n) => Ok(n as f64),
            _ => Err(QueryError::InvalidCondition {
                key: "precision",
                expected: "a number",
            }),
        }
    }
}

impl From<&str> for ConditionValue {
    fn from(s: &str) -> Self {
        ConditionValue::Text(s.to_string())
    }
}

impl From<String> for ConditionValue {
    fn from(s: String) -> Self {
        ConditionValue::Text(s)
    }
}

impl From<i64> for ConditionValue {
    fn from(n: i64) -> Self {
        ConditionValue::Integer(n)
    }
}

impl From<i32> for ConditionValue {
    fn from(n: i32) -> Self {
        ConditionValue::Integer(n as i64)
    }
}

impl From<f64> for ConditionValue {
    fn from(n: f64) -> Self {
        ConditionValue::Double(n)
    }
}

impl From<bool> for ConditionValue {
    fn from(b: bool) -> Self {
        ConditionValue::Bool(b)
    }
}
