//! Defaults applied when building parameter rules.

use serde::{Deserialize, Serialize};

/// Tolerance used for floating-point comparisons unless overridden
/// (1/768 of a foot, i.e. 1/64 inch).
pub const FLOAT_PRECISION: f64 = 0.0013020833333333;

/// Whether text comparisons are case sensitive unless overridden.
pub const CASE_SENSITIVE: bool = true;

/// Rule-building defaults.
///
/// Deserializes from partial documents; missing keys keep their defaults.
///
/// ```
/// use element_query::RuleDefaults;
///
/// let defaults = RuleDefaults::default().with_case_sensitive(false);
/// assert!(!defaults.case_sensitive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleDefaults {
    /// Case sensitivity for text comparisons.
    pub case_sensitive: bool,
    /// Tolerance for floating-point comparisons.
    pub precision: f64,
}

impl Default for RuleDefaults {
    fn default() -> Self {
        RuleDefaults {
            case_sensitive: CASE_SENSITIVE,
            precision: FLOAT_PRECISION,
        }
    }
}

impl RuleDefaults {
    /// Sets the default case sensitivity.
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Sets the default floating-point tolerance.
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let defaults = RuleDefaults::default();
        assert!(defaults.case_sensitive);
        assert_eq!(defaults.precision, FLOAT_PRECISION);
    }

    #[test]
    fn builders() {
        let defaults = RuleDefaults::default()
            .with_case_sensitive(false)
            .with_precision(0.5);
        assert!(!defaults.case_sensitive);
        assert_eq!(defaults.precision, 0.5);
    }

    #[test]
    fn deserializes_partial_documents() {
        let defaults: RuleDefaults = serde_json::from_str(r#"{"precision": 0.5}"#).unwrap();
        assert!(defaults.case_sensitive);
        assert_eq!(defaults.precision, 0.5);

        let defaults: RuleDefaults =
            serde_json::from_str(r#"{"case_sensitive": false}"#).unwrap();
        assert!(!defaults.case_sensitive);
        assert_eq!(defaults.precision, FLOAT_PRECISION);

        let empty: RuleDefaults = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, RuleDefaults::default());
    }
}
