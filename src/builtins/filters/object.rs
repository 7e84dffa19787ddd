/// Filters operating on mappings
use serde_json::value::{Map, Value};

use crate::errors::Result;

/// Returns the keys of a mapping, in iteration order
pub fn keys(value: &Value, _: &[Value]) -> Result<Value> {
    let map = try_get_value!("keys", "value", Map<String, Value>, value);
    Ok(Value::Array(map.into_iter().map(|(k, _)| Value::String(k)).collect()))
}

/// Returns the values of a mapping, in iteration order
pub fn values(value: &Value, _: &[Value]) -> Result<Value> {
    let map = try_get_value!("values", "value", Map<String, Value>, value);
    Ok(Value::Array(map.into_iter().map(|(_, v)| v).collect()))
}
