//! Payload to query-string encoding for `GET` and `DELETE`

use serde::Serialize;
use serde_json::Value;

use crate::errors::ClientError;

/// Flatten a payload into `(key, value)` pairs
///
/// Nulls are skipped, arrays repeat their key, and nested objects are sent
/// as JSON text. The payload itself must serialize to an object (or null).
pub fn encode_query<P: Serialize + ?Sized>(payload: &P) -> Result<Vec<(String, String)>, ClientError> {
    let value = serde_json::to_value(payload)
        .map_err(|e| ClientError::Usage(format!("cannot encode query: {e}")))?;

    let object = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Object(object) => object,
        other => {
            return Err(ClientError::Usage(format!(
                "query payload must be an object, got {}",
                kind(&other)
            )))
        }
    };

    let mut pairs = Vec::new();
    for (key, value) in object {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                pairs.extend(items.into_iter().filter_map(scalar).map(|item| (key.clone(), item)))
            }
            other => {
                if let Some(item) = scalar(other) {
                    pairs.push((key, item));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
