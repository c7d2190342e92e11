//! Comparison operators for parameter rules.
//!
//! The [`Comparator`] enum defines the supported comparisons. Text-only
//! comparators (`Contains`, `Begins`, `Ends`) have no numeric form.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Comparison operator of a parameter rule.
///
/// Operators are grouped by the operands they support:
/// - **Universal**: `Equals`, `Greater`, `GreaterEqual`, `Less`, `LessEqual`
/// - **Text only**: `Contains`, `Begins`, `Ends`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// Equal (within tolerance for doubles).
    Equals,
    /// Text contains substring.
    Contains,
    /// Text begins with prefix.
    Begins,
    /// Text ends with suffix.
    Ends,
    /// Greater than.
    Greater,
    /// Greater than or equal.
    GreaterEqual,
    /// Less than.
    Less,
    /// Less than or equal.
    LessEqual,
}

impl Comparator {
    /// All comparators, in declaration order.
    pub const ALL: [Comparator; 8] = [
        Comparator::Equals,
        Comparator::Contains,
        Comparator::Begins,
        Comparator::Ends,
        Comparator::Greater,
        Comparator::GreaterEqual,
        Comparator::Less,
        Comparator::LessEqual,
    ];

    /// Returns `true` if this comparator only accepts text operands.
    pub fn is_text_only(self) -> bool {
        matches!(
            self,
            Comparator::Contains | Comparator::Begins | Comparator::Ends
        )
    }

    /// Evaluates an ordering-based comparison.
    ///
    /// Text-only comparators never match an ordering.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Comparator::Equals => ordering == Ordering::Equal,
            Comparator::Greater => ordering == Ordering::Greater,
            Comparator::GreaterEqual => ordering != Ordering::Less,
            Comparator::Less => ordering == Ordering::Less,
            Comparator::LessEqual => ordering != Ordering::Greater,
            Comparator::Contains | Comparator::Begins | Comparator::Ends => false,
        }
    }

    /// Returns the condition key naming this comparator.
    pub fn as_str(self) -> &'static str {
        match self {
            Comparator::Equals => "equals",
            Comparator::Contains => "contains",
            Comparator::Begins => "begins",
            Comparator::Ends => "ends",
            Comparator::Greater => "greater",
            Comparator::GreaterEqual => "greater_equal",
            Comparator::Less => "less",
            Comparator::LessEqual => "less_equal",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a condition key does not name a comparator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownComparator;

impl FromStr for Comparator {
    type Err = UnknownComparator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Comparator::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(UnknownComparator)
    }
}
