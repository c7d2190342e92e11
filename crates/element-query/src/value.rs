//! Parameter value types.
//!
//! [`Value`] is the runtime value of a parameter borrowed from an element,
//! [`ParamValue`] is its owned counterpart, and [`Operand`] is the right-hand
//! side of a comparison rule.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Runtime parameter value, borrowed from the element.
///
/// # Example
///
/// ```
/// use element_query::{ParameterId, Parameterized, Value};
///
/// struct Door {
///     mark: String,
///     width: f64,
/// }
///
/// impl Parameterized for Door {
///     fn parameter(&self, id: &ParameterId) -> Value<'_> {
///         match id.as_str() {
///             "Mark" => Value::Text(&self.mark),
///             "Width" => Value::Double(self.width),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// Text value (borrowed).
    Text(&'a str),
    /// Integer value.
    Integer(i64),
    /// Floating-point value.
    Double(f64),
    /// Parameter missing or without a value.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Extracts the text value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts a numeric value as `f64`, if present.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }
}

/// Owned parameter value, as stored on an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Integer(i64),
    Double(f64),
    Text(String),
}

impl ParamValue {
    /// Borrows this value for comparison.
    pub fn as_value(&self) -> Value<'_> {
        match self {
            ParamValue::Text(s) => Value::Text(s),
            ParamValue::Integer(n) => Value::Integer(*n),
            ParamValue::Double(n) => Value::Double(*n),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Integer(n)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Integer(n as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Double(n)
    }
}

/// Right-hand side of a parameter comparison.
///
/// The operand kind selects which low-level rule is built: text operands
/// produce case-aware string rules, doubles produce tolerance-aware rules.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Text(String),
    Integer(i64),
    Double(f64),
}

impl Operand {
    /// Returns the operand kind name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Operand::Text(_) => "text",
            Operand::Integer(_) => "integer",
            Operand::Double(_) => "double",
        }
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Operand::Text(s.to_string())
    }
}

impl From<String> for Operand {
    fn from(s: String) -> Self {
        Operand::Text(s)
    }
}

impl From<i32> for Operand {
    fn from(n: i32) -> Self {
        Operand::Integer(n as i64)
    }
}

impl From<i64> for Operand {
    fn from(n: i64) -> Self {
        Operand::Integer(n)
    }
}

impl From<u32> for Operand {
    fn from(n: u32) -> Self {
        Operand::Integer(n as i64)
    }
}

impl From<f32> for Operand {
    fn from(n: f32) -> Self {
        Operand::Double(n as f64)
    }
}

impl From<f64> for Operand {
    fn from(n: f64) -> Self {
        Operand::Double(n)
    }
}

/// Compares two floating-point values, treating them as equal when they
/// differ by no more than `tolerance`.
pub fn compare_within(a: f64, b: f64, tolerance: f64) -> Option<Ordering> {
    if a.is_nan() || b.is_nan() {
        return None;
    }
    if (a - b).abs() <= tolerance {
        Some(Ordering::Equal)
    } else {
        a.partial_cmp(&b)
    }
}
