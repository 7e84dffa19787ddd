/// Filters operating on array
use serde_json::value::{to_value, Value};

use crate::context::ValueRender;
use crate::errors::Result;

/// Returns the first value of an array
/// If the array is empty, returns empty string
pub fn first(value: &Value, _: &[Value]) -> Result<Value> {
    let mut arr = try_get_value!("first", "value", Vec<Value>, value);

    if arr.is_empty() {
        Ok(to_value("").unwrap())
    } else {
        Ok(arr.swap_remove(0))
    }
}

/// Returns the last value of an array
/// If the array is empty, returns empty string
pub fn last(value: &Value, _: &[Value]) -> Result<Value> {
    let mut arr = try_get_value!("last", "value", Vec<Value>, value);

    Ok(arr.pop().unwrap_or_else(|| to_value("").unwrap()))
}

/// Joins all values in the array by the first argument,
/// defaulting to an empty string
pub fn join(value: &Value, args: &[Value]) -> Result<Value> {
    let arr = try_get_value!("join", "value", Vec<Value>, value);
    let sep = try_get_arg!("join", "sep", String, args, 0).unwrap_or_default();

    // Convert all the values to strings before we join them together.
    let rendered = arr.iter().map(|v| v.render()).collect::<Vec<_>>();
    Ok(to_value(rendered.join(&sep)).unwrap())
}
