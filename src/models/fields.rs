//! Decoders for listing fields that the search endpoint may send either as
//! native JSON values or as strings. Anything else, `null` included, is a
//! malformed listing.

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

fn invalid<E: de::Error>(expected: &str, found: &Value) -> E {
    E::custom(format!("expected {}, got {}", expected, found))
}

pub fn f64_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(num) => num.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number
        .filter(|n| n.is_finite())
        .ok_or_else(|| invalid("a number", &value))
}

pub fn u64_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(num) => num.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    number.ok_or_else(|| invalid("a non-negative integer", &value))
}

pub fn i64_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(num) => num.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    number.ok_or_else(|| invalid("an integer", &value))
}

/// `true`/`false`, `0`/`1`, or those spelled as strings.
pub fn bool_or_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let flag = match &value {
        Value::Bool(b) => Some(*b),
        Value::Number(num) => match num.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    };
    flag.ok_or_else(|| invalid("a boolean or 0/1", &value))
}
