//! Failure values of unknown shape and message extraction.
//!
//! Failures reach the classifier from sources that share no error type: the
//! network client, the OS, the crypto library, the storage layer, or a JSON
//! payload relayed from elsewhere. [`Failure`] is the closed set of shapes the
//! classifier accepts, and [`Failure::message`] reduces any of them to one string.

use std::error::Error as StdError;

use serde_json::{Map, Value};

/// A failure value of unknown shape.
///
/// The variant is chosen by ordered capability checks when the value is
/// converted: native errors first, then plain strings, then structured
/// objects carrying a `message` field, then everything else.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// A native error; holds its display text.
    Native(String),
    /// A plain string.
    Text(String),
    /// A JSON object that has a `message` field.
    Structured(Map<String, Value>),
    /// Any other value (null, numbers, booleans, arrays, objects without `message`).
    Other(Value),
}

impl Failure {
    /// Wraps any native error.
    pub fn from_error(error: &(dyn StdError + 'static)) -> Self {
        Failure::Native(error.to_string())
    }

    /// Parses `input` as a JSON document; input that is not JSON is kept as text.
    pub fn from_json(input: &str) -> Self {
        match serde_json::from_str::<Value>(input) {
            Ok(value) => Failure::from(value),
            Err(_) => Failure::Text(input.to_string()),
        }
    }

    /// Extracts the single string the classifier matches against.
    pub fn message(&self) -> String {
        match self {
            Failure::Native(message) | Failure::Text(message) => message.clone(),
            Failure::Structured(fields) => fields
                .get("message")
                .map(coerce_to_string)
                .unwrap_or_else(|| "undefined".to_string()),
            Failure::Other(value) => coerce_to_string(value),
        }
    }
}

impl From<&str> for Failure {
    fn from(text: &str) -> Self {
        Failure::Text(text.to_string())
    }
}

impl From<String> for Failure {
    fn from(text: String) -> Self {
        Failure::Text(text)
    }
}

impl From<&String> for Failure {
    fn from(text: &String) -> Self {
        Failure::Text(text.clone())
    }
}

impl From<Value> for Failure {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Failure::Text(text),
            Value::Object(fields) if fields.contains_key("message") => Failure::Structured(fields),
            other => Failure::Other(other),
        }
    }
}

impl From<&Value> for Failure {
    fn from(value: &Value) -> Self {
        Failure::from(value.clone())
    }
}

impl From<std::io::Error> for Failure {
    fn from(error: std::io::Error) -> Self {
        Failure::Native(error.to_string())
    }
}

impl From<Box<dyn StdError + Send + Sync>> for Failure {
    fn from(error: Box<dyn StdError + Send + Sync>) -> Self {
        Failure::Native(error.to_string())
    }
}

impl From<&Failure> for Failure {
    fn from(failure: &Failure) -> Self {
        failure.clone()
    }
}

macro_rules! failure_from_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Failure {
                fn from(value: $ty) -> Self {
                    Failure::Other(Value::from(value))
                }
            }
        )*
    };
}

failure_from_primitive!(bool, i32, i64, u32, u64);

impl From<f64> for Failure {
    fn from(value: f64) -> Self {
        // JSON has no NaN or infinities; keep their text form instead of null.
        if value.is_finite() {
            Failure::Other(Value::from(value))
        } else {
            Failure::Other(Value::String(format_float(value)))
        }
    }
}

/// Converts a JSON value to text the way a dynamic-language `String(value)` would.
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => {
            if number.is_i64() || number.is_u64() {
                number.to_string()
            } else {
                number.as_f64().map(format_float).unwrap_or_else(|| number.to_string())
            }
        }
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => coerce_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Formats a float like `Number.prototype.toString`: shortest round-trip
/// digits, positional between 1e-6 and 1e21, exponent form outside.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "1.2345e3".
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let k = digits.len() as i32;
    let n = exponent + 1;

    let body = if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int_part, frac_part) = digits.split_at(n as usize);
        format!("{}.{}", int_part, frac_part)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let sign = if n - 1 < 0 { '-' } else { '+' };
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", lead, sign, (n - 1).abs())
        } else {
            format!("{}.{}e{}{}", lead, rest, sign, (n - 1).abs())
        }
    };

    if value < 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct HandshakeError;

    impl std::fmt::Display for HandshakeError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "Network handshake aborted")
        }
    }

    impl StdError for HandshakeError {}

    #[test]
    fn test_native_error_uses_display() {
        let failure = Failure::from_error(&HandshakeError);
        assert_eq!(failure, Failure::Native("Network handshake aborted".to_string()));
        assert_eq!(failure.message(), "Network handshake aborted");
    }

    #[test]
    fn test_io_error_is_native() {
        let error = std::io::Error::new(std::io::ErrorKind::Other, "disk write failed");
        let failure = Failure::from(error);
        assert!(matches!(failure, Failure::Native(_)));
        assert_eq!(failure.message(), "disk write failed");
    }

    #[test]
    fn test_boxed_error_is_native() {
        let error: Box<dyn StdError + Send + Sync> = "offline".into();
        assert_eq!(Failure::from(error).message(), "offline");
    }

    #[test]
    fn test_plain_string_unchanged() {
        let failure = Failure::from("  401 unauthorized\n");
        assert_eq!(failure.message(), "  401 unauthorized\n");
    }

    #[test]
    fn test_json_string_is_text() {
        assert_eq!(Failure::from(json!("plain")), Failure::Text("plain".to_string()));
    }

    #[test]
    fn test_object_with_message_is_structured() {
        let failure = Failure::from(json!({ "message": "invalid PEM key", "status": 500 }));
        assert!(matches!(failure, Failure::Structured(_)));
        assert_eq!(failure.message(), "invalid PEM key");
    }

    #[test]
    fn test_structured_message_is_coerced() {
        assert_eq!(Failure::from(json!({ "message": 401 })).message(), "401");
        assert_eq!(Failure::from(json!({ "message": null })).message(), "null");
        assert_eq!(Failure::from(json!({ "message": true })).message(), "true");
        assert_eq!(
            Failure::from(json!({ "message": { "inner": "x" } })).message(),
            "[object Object]"
        );
    }

    #[test]
    fn test_object_without_message_is_other() {
        let failure = Failure::from(json!({ "error": "timeout" }));
        assert!(matches!(failure, Failure::Other(_)));
        assert_eq!(failure.message(), "[object Object]");
    }

    #[test]
    fn test_primitives_fall_back_to_string_form() {
        assert_eq!(Failure::from(42).message(), "42");
        assert_eq!(Failure::from(-7i64).message(), "-7");
        assert_eq!(Failure::from(false).message(), "false");
        assert_eq!(Failure::from(Value::Null).message(), "null");
    }

    #[test]
    fn test_float_formatting() {
        assert_eq!(Failure::from(1.0).message(), "1");
        assert_eq!(Failure::from(-0.0).message(), "0");
        assert_eq!(Failure::from(2.5).message(), "2.5");
        assert_eq!(Failure::from(-123.456).message(), "-123.456");
        assert_eq!(Failure::from(0.1).message(), "0.1");
    }

    #[test]
    fn test_non_finite_floats_keep_their_names() {
        assert_eq!(Failure::from(f64::NAN).message(), "NaN");
        assert_eq!(Failure::from(f64::INFINITY).message(), "Infinity");
        assert_eq!(Failure::from(f64::NEG_INFINITY).message(), "-Infinity");
    }

    #[test]
    fn test_large_floats_use_exponent_form() {
        assert_eq!(Failure::from(1e21).message(), "1e+21");
        assert_eq!(Failure::from(1.5e300).message(), "1.5e+300");
        assert_eq!(Failure::from(-2e22).message(), "-2e+22");
        assert_eq!(Failure::from(1e20).message(), "100000000000000000000");
    }

    #[test]
    fn test_small_floats_use_exponent_form() {
        assert_eq!(Failure::from(1e-7).message(), "1e-7");
        assert_eq!(Failure::from(2.5e-8).message(), "2.5e-8");
        assert_eq!(Failure::from(0.000001).message(), "0.000001");
        assert_eq!(Failure::from(0.00000123).message(), "0.00000123");
    }

    #[test]
    fn test_json_document_floats_use_exponent_form() {
        let message = Failure::from_json("1e300").message();
        assert_eq!(message, "1e+300");
        assert_eq!(Failure::from_json(r#"{"message": 1e-9}"#).message(), "1e-9");
    }

    #[test]
    fn test_array_joins_elements() {
        let failure = Failure::from(json!(["read", null, 3, ["a", "b"]]));
        assert_eq!(failure.message(), "read,,3,a,b");
    }

    #[test]
    fn test_from_json_parses_documents() {
        assert_eq!(Failure::from_json("42").message(), "42");
        assert_eq!(
            Failure::from_json(r#"{"message":"file missing"}"#).message(),
            "file missing"
        );
    }

    #[test]
    fn test_from_json_keeps_invalid_input_as_text() {
        let failure = Failure::from_json("Network request failed");
        assert_eq!(failure, Failure::Text("Network request failed".to_string()));
    }
}
