//! JSON bridge
//!
//! Converts JSON text into tag-tree values. The reverse direction goes
//! through the untagged `Serialize` impl on `Value`.

use crate::error::{RegionError, Result};

use super::{Compound, Value};

/// Parse text holding a JSON object into a compound
///
/// Empty (or whitespace-only) text yields an empty compound. The whole
/// input is converted before anything is returned, so a failure never
/// produces a partial result.
pub fn parse_compound(text: &str) -> Result<Compound> {
    if text.trim().is_empty() {
        return Ok(Compound::new());
    }
    let parsed: serde_json::Value = serde_json::from_str(text)?;
    match parsed {
        serde_json::Value::Object(map) => compound_from_json(map),
        other => Err(RegionError::Parse(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Convert a JSON object into a compound
pub fn compound_from_json(map: serde_json::Map<String, serde_json::Value>) -> Result<Compound> {
    map.into_iter()
        .map(|(k, v)| -> Result<(String, Value)> {
            let value = from_json(v).map_err(|e| match e {
                RegionError::InvalidArgument(msg) => {
                    RegionError::InvalidArgument(format!("field '{}': {}", k, msg))
                }
                other => other,
            })?;
            Ok((k, value))
        })
        .collect()
}

/// Convert one JSON value
///
/// Booleans become bytes, integers become `Int` when they fit and `Long`
/// otherwise, other numbers become `Double`. `null` has no tag-tree
/// representation and is rejected.
pub fn from_json(value: serde_json::Value) -> Result<Value> {
    match value {
        serde_json::Value::Null => Err(RegionError::InvalidArgument(
            "null cannot be stored as NBT".to_string(),
        )),
        serde_json::Value::Bool(b) => Ok(Value::Byte(i8::from(b))),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(match i32::try_from(i) {
                    Ok(small) => Value::Int(small),
                    Err(_) => Value::Long(i),
                })
            } else {
                n.as_f64()
                    .map(Value::Double)
                    .ok_or_else(|| RegionError::Parse(format!("unrepresentable number {}", n)))
            }
        }
        serde_json::Value::String(s) => Ok(Value::String(s)),
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(from_json)
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        serde_json::Value::Object(map) => compound_from_json(map).map(Value::Compound),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
