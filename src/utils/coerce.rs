//! Lenient `deserialize_with` helpers for client-supplied ids and counters.
//!
//! Clients send ids as numbers or strings and counters as strings or
//! numbers; these normalize them the same way regardless of JSON type.

use serde::de::{Deserializer, Error};
use serde::Deserialize;
use serde_json::Value;

fn to_string(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(if flag { "True" } else { "False" }.to_string()),
        _ => None,
    }
}

fn to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(float_to_integer)),
        Value::String(text) => text.trim().parse().ok(),
        Value::Bool(flag) => Some(i64::from(*flag)),
        _ => None,
    }
}

/// Truncates toward zero. Values that would not fit an `i64` are rejected
/// rather than saturated.
fn float_to_integer(float: f64) -> Option<i64> {
    const UPPER: f64 = 9_223_372_036_854_775_808.0; // 2^63
    (float.is_finite() && float >= -UPPER && float < UPPER).then(|| float.trunc() as i64)
}

fn to_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|n| n != 0.0),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    to_string(value).ok_or_else(|| D::Error::custom("expected a string or number"))
}

/// Like [`string`], but an empty or blank id is an error. Ids become map
/// keys in the stored document and must not be empty.
pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let id = string(deserializer)?;
    if id.trim().is_empty() {
        return Err(D::Error::custom("id must not be empty"));
    }
    Ok(id)
}

pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => to_string(value)
            .map(Some)
            .ok_or_else(|| D::Error::custom("expected a string or number")),
    }
}

pub fn integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    to_integer(&value).ok_or_else(|| D::Error::custom(format!("expected an integer, got {value}")))
}

pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    to_flag(&value).ok_or_else(|| D::Error::custom(format!("expected a boolean flag, got {value}")))
}

pub fn opt_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => to_flag(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected a boolean flag, got {value}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(deserialize_with = "string")]
        id: String,
        #[serde(deserialize_with = "integer")]
        count: i64,
        #[serde(default, deserialize_with = "opt_flag")]
        active: Option<bool>,
        #[serde(default, deserialize_with = "opt_string")]
        wait: Option<String>,
    }

    fn parse(value: Value) -> Result<Body, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn test_numbers_become_strings() {
        let parsed = parse(json!({ "id": 7, "count": 1, "wait": 15 })).unwrap();
        assert_eq!(parsed.id, "7");
        assert_eq!(parsed.wait.as_deref(), Some("15"));
        assert_eq!(parsed.active, None);
    }

    #[test]
    fn test_integer_coercion() {
        assert_eq!(parse(json!({ "id": "Q", "count": " 12 " })).unwrap().count, 12);
        assert_eq!(parse(json!({ "id": "Q", "count": 4.9 })).unwrap().count, 4);
        assert_eq!(parse(json!({ "id": "Q", "count": true })).unwrap().count, 1);
        assert!(parse(json!({ "id": "Q", "count": "abc" })).is_err());
        assert!(parse(json!({ "id": "Q" })).is_err());
    }

    #[test]
    fn test_out_of_range_counts_are_rejected() {
        assert!(parse(json!({ "id": "Q", "count": 1e30 })).is_err());
        assert!(parse(json!({ "id": "Q", "count": -1e30 })).is_err());
        assert!(parse(json!({ "id": "Q", "count": 18_000_000_000_000_000_000u64 })).is_err());
        assert!(parse(json!({ "id": "Q", "count": "99999999999999999999" })).is_err());
        assert_eq!(parse(json!({ "id": "Q", "count": -2.5 })).unwrap().count, -2);
    }

    #[derive(Debug, Deserialize)]
    struct Keyed {
        #[serde(deserialize_with = "id")]
        id: String,
    }

    #[test]
    fn test_blank_ids_are_rejected() {
        let keyed: Keyed = serde_json::from_value(json!({ "id": 0 })).unwrap();
        assert_eq!(keyed.id, "0");
        assert!(serde_json::from_value::<Keyed>(json!({ "id": "" })).is_err());
        assert!(serde_json::from_value::<Keyed>(json!({ "id": "   " })).is_err());
    }

    #[test]
    fn test_flag_coercion() {
        let parsed = parse(json!({ "id": "Q", "count": 0, "active": "true" })).unwrap();
        assert_eq!(parsed.active, Some(true));
        let parsed = parse(json!({ "id": "Q", "count": 0, "active": 0 })).unwrap();
        assert_eq!(parsed.active, Some(false));
        assert!(parse(json!({ "id": "Q", "count": 0, "active": "maybe" })).is_err());
    }

    #[test]
    fn test_objects_are_not_ids() {
        assert!(parse(json!({ "id": { "nested": 1 }, "count": 1 })).is_err());
    }
}
