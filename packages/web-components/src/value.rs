//! Value Coercion
//!
//! Property values are `serde_json::Value`s. This module owns the one set of
//! coercion rules shared by the reactive manager, attribute sync and the
//! component host, so every write path agrees on what `"false"` means.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

/// Declared property type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropType {
    String,
    Number,
    Boolean,
    Object,
}

impl PropType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropType::String => "string",
            PropType::Number => "number",
            PropType::Boolean => "boolean",
            PropType::Object => "object",
        }
    }
}

impl fmt::Display for PropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(PropType::String),
            "number" => Ok(PropType::Number),
            "boolean" => Ok(PropType::Boolean),
            "object" => Ok(PropType::Object),
            other => Err(format!("unknown property type \"{}\"", other)),
        }
    }
}

/// `true`, `"true"`, `""` and non-zero numbers are true. Everything else
/// scalar is false; arrays and objects are true.
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true" || s.is_empty(),
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan()),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `Number()` semantics. `None` stands for NaN.
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    // Rust also accepts "inf" and "nan", which Number() does not
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Store a number, keeping integral values as integers so `5` prints as `5`.
/// Non-finite results have no JSON form and become `null`.
pub fn number_value(n: f64) -> Value {
    if !n.is_finite() {
        return Value::Null;
    }
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return Value::from(n as i64);
    }
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

/// `String(value)` with `null` as the empty string
pub fn display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        },
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

/// Coerce a value written to a typed property
pub fn convert_value_to_type(value: Value, prop_type: Option<PropType>) -> Value {
    let Some(prop_type) = prop_type else {
        return value;
    };
    match prop_type {
        PropType::Boolean => Value::Bool(to_boolean(&value)),
        _ if value.is_null() => Value::Null,
        PropType::String => match value {
            Value::String(_) => value,
            other => Value::String(display_string(&other)),
        },
        PropType::Number => to_number(&value).map_or(Value::Null, number_value),
        PropType::Object => match value {
            Value::String(s) => serde_json::from_str(&s).unwrap_or(Value::String(s)),
            other => other,
        },
    }
}

/// Attribute text to property value. Booleans are presence-based, except
/// that the literal `"false"` reads as false.
pub fn attribute_to_value(attribute: Option<&str>, prop_type: Option<PropType>) -> Value {
    match (prop_type, attribute) {
        (Some(PropType::Boolean), None) => Value::Bool(false),
        (Some(PropType::Boolean), Some(raw)) => Value::Bool(raw != "false"),
        (_, None) => Value::Null,
        (Some(PropType::Number), Some(raw)) => parse_number(raw).map_or(Value::Null, number_value),
        (Some(PropType::Object), Some(raw)) => {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        }
        (Some(PropType::String) | None, Some(raw)) => Value::String(raw.to_string()),
    }
}

/// Property value to attribute text. `None` means the attribute is removed.
pub fn property_to_attribute(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some(String::new()),
        other => Some(display_string(other)),
    }
}
