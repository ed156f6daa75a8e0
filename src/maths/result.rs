//! Operation result record
//!
//! `OperationResult` is what the maths endpoint serialises. The computed
//! value and the error message are two variants of one `Outcome`, so a
//! record can never carry both or neither.

use serde::{Serialize, Serializer};

/// Largest integer a double represents exactly (2^53 - 1)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Non-finite values, emitted as JSON strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Special {
    NaN,
    Infinity,
    NegInfinity,
}

impl Special {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NaN => "NaN",
            Self::Infinity => "Infinity",
            Self::NegInfinity => "-Infinity",
        }
    }
}

/// Computed value of an operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OpValue {
    Number(f64),
    Bool(bool),
    Special(Special),
}

impl OpValue {
    /// Wrap a double, moving non-finite values to their `Special` form
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            Self::Special(Special::NaN)
        } else if value == f64::INFINITY {
            Self::Special(Special::Infinity)
        } else if value == f64::NEG_INFINITY {
            Self::Special(Special::NegInfinity)
        } else {
            Self::Number(value)
        }
    }
}

impl Serialize for OpValue {
    #[allow(clippy::cast_possible_truncation)]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            // Integral doubles print as `120`, not `120.0`
            Self::Number(v) if v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(v as i64)
            }
            Self::Number(v) => serializer.serialize_f64(v),
            Self::Bool(b) => serializer.serialize_bool(b),
            Self::Special(s) => serializer.serialize_str(s.as_str()),
        }
    }
}

/// Either the computed value or the validation message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Value(OpValue),
    Error(String),
}

/// Result record for one maths request
///
/// Operands are echoed exactly as received and omitted when the request
/// did not carry them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationResult {
    pub op: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl OperationResult {
    /// Result of a two-operand operation
    pub fn binary(op: &'static str, x: Option<&str>, y: Option<&str>, outcome: Outcome) -> Self {
        Self {
            op,
            x: x.map(ToString::to_string),
            y: y.map(ToString::to_string),
            n: None,
            outcome,
        }
    }

    /// Result of a single-operand operation
    pub fn unary(op: &'static str, n: Option<&str>, outcome: Outcome) -> Self {
        Self {
            op,
            x: None,
            y: None,
            n: n.map(ToString::to_string),
            outcome,
        }
    }

    pub const fn value(&self) -> Option<&OpValue> {
        match &self.outcome {
            Outcome::Value(v) => Some(v),
            Outcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Value(_) => None,
            Outcome::Error(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integral_numbers_serialize_without_fraction() {
        assert_eq!(serde_json::to_value(OpValue::Number(120.0)).unwrap(), json!(120));
        assert_eq!(serde_json::to_string(&OpValue::Number(-0.0)).unwrap(), "0");
        assert_eq!(serde_json::to_string(&OpValue::Number(2.5)).unwrap(), "2.5");
        assert_eq!(serde_json::to_string(&OpValue::Number(1e300)).unwrap(), "1e+300");
    }

    #[test]
    fn test_large_finite_values_serialize_as_floats() {
        // 25! is past 2^53, so it goes out in exponent form
        let value = crate::maths::ops::factorial(25);
        let json = serde_json::to_value(value).unwrap();
        assert!(json.is_f64());
        let expected = 1.551_121_004_333_098_6e25;
        let actual = json.as_f64().unwrap();
        assert!((actual - expected).abs() / expected < 1e-12, "{actual}");
        assert!(serde_json::to_string(&value).unwrap().contains('e'));
    }

    #[test]
    fn test_special_values_serialize_as_strings() {
        assert_eq!(serde_json::to_string(&OpValue::from_f64(f64::NAN)).unwrap(), r#""NaN""#);
        assert_eq!(
            serde_json::to_string(&OpValue::from_f64(f64::INFINITY)).unwrap(),
            r#""Infinity""#
        );
        assert_eq!(
            serde_json::to_string(&OpValue::from_f64(f64::NEG_INFINITY)).unwrap(),
            r#""-Infinity""#
        );
        assert_eq!(serde_json::to_string(&OpValue::Bool(true)).unwrap(), "true");
    }

    #[test]
    fn test_success_record_shape() {
        let result = OperationResult::binary(
            "+",
            Some("1"),
            Some("2"),
            Outcome::Value(OpValue::Number(3.0)),
        );
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "op": "+", "x": "1", "y": "2", "value": 3 })
        );
        assert!(result.error().is_none());
    }

    #[test]
    fn test_error_record_omits_value_and_absent_operands() {
        let result = OperationResult::unary("!", None, Outcome::Error("bad n".to_string()));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "op": "!", "error": "bad n" })
        );
        assert!(result.value().is_none());
        assert_eq!(result.error(), Some("bad n"));
    }
}
