/// Filters operating on numbers
#[cfg(feature = "humansize")]
use humansize::{format_size, BINARY, WINDOWS};
use serde_json::value::{to_value, Value};

use crate::coercion::{loose_numeric, Numeric};
use crate::errors::{Error, Result};

fn get_numeric(filter: &str, value: &Value) -> Result<Numeric> {
    loose_numeric(value).ok_or_else(|| {
        Error::msg(format!("Filter `{}` was used on a value that isn't a number: `{}`", filter, value))
    })
}

/// Returns the absolute value of the argument.
pub fn abs(value: &Value, _: &[Value]) -> Result<Value> {
    match get_numeric("abs", value)? {
        Numeric::Int(i) => Ok(to_value(i.saturating_abs()).unwrap()),
        Numeric::Float(f) => Ok(Numeric::Float(f.abs()).into_value()),
    }
}

/// Rounds to the nearest number with `precision` decimals, defaulting to `0`
/// which rounds to an integer.
pub fn round(value: &Value, args: &[Value]) -> Result<Value> {
    let num = get_numeric("round", value)?.as_f64();
    let precision = try_get_arg!("round", "precision", i32, args, 0).unwrap_or(0);

    if precision <= 0 {
        let multiplier = 10.0_f64.powi(-precision);
        let rounded = (num / multiplier).round() * multiplier;
        if rounded.abs() < i64::MAX as f64 {
            return Ok(to_value(rounded as i64).unwrap());
        }
        return Ok(Numeric::Float(rounded).into_value());
    }

    let multiplier = 10.0_f64.powi(precision);
    Ok(Numeric::Float((multiplier * num).round() / multiplier).into_value())
}

/// Returns a human-readable file size (i.e. '110 MB') from an integer.
/// A truthy first argument switches to binary units (`MiB`).
#[cfg(feature = "humansize")]
pub fn filesizeformat(value: &Value, args: &[Value]) -> Result<Value> {
    let num = try_get_value!("filesizeformat", "value", usize, value);
    let binary = try_get_arg!("filesizeformat", "binary", bool, args, 0).unwrap_or(false);
    let format = if binary { BINARY } else { WINDOWS };
    Ok(to_value(format_size(num, format)).unwrap())
}
