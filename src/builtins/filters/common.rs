/// Filters operating on multiple types
#[cfg(feature = "chrono")]
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::value::{to_value, Value};

use crate::context::ValueTruthy;
use crate::errors::{Error, Result};

/// Returns the number of items in an array or an object, or characters in a string.
pub fn length(value: &Value, _: &[Value]) -> Result<Value> {
    match value {
        Value::Array(arr) => Ok(to_value(arr.len()).unwrap()),
        Value::Object(m) => Ok(to_value(m.len()).unwrap()),
        Value::String(s) => Ok(to_value(s.chars().count()).unwrap()),
        _ => Err(Error::msg(
            "Filter `length` was used on a value that isn't an array, an object, or a string.",
        )),
    }
}

/// Returns a reversed string or array.
pub fn reverse(value: &Value, _: &[Value]) -> Result<Value> {
    match value {
        Value::Array(arr) => {
            let mut rev = arr.clone();
            rev.reverse();
            Ok(Value::Array(rev))
        }
        Value::String(s) => Ok(to_value(s.chars().rev().collect::<String>()).unwrap()),
        _ => Err(Error::msg(format!(
            "Filter `reverse` received an incorrect type for arg `value`: \
             got `{}` but expected Array|String",
            value
        ))),
    }
}

/// Encodes a value of any type into json, optionally `pretty`-printed
/// when the first argument is truthy.
pub fn json_encode(value: &Value, args: &[Value]) -> Result<Value> {
    let pretty = args.first().map(|v| v.is_truthy()).unwrap_or(false);

    if pretty {
        to_value(serde_json::to_string_pretty(value)?).map_err(Error::json)
    } else {
        to_value(serde_json::to_string(value)?).map_err(Error::json)
    }
}

/// Replaces null and empty strings by the first argument
pub fn default(value: &Value, args: &[Value]) -> Result<Value> {
    let fallback = match args.first() {
        Some(val) => val,
        None => return Err(Error::msg("Filter `default` expected an arg called `value`")),
    };

    match value {
        Value::Null => Ok(fallback.clone()),
        Value::String(s) if s.is_empty() => Ok(fallback.clone()),
        _ => Ok(value.clone()),
    }
}

/// Returns a formatted time according to the given `format` argument.
/// `format` defaults to the ISO 8601 `YYYY-MM-DD` format.
///
/// Input can be an i64 timestamp (seconds since epoch) or an RFC3339 string
#[cfg(feature = "chrono")]
pub fn date(value: &Value, args: &[Value]) -> Result<Value> {
    let format = try_get_arg!("date", "format", String, args, 0).unwrap_or_else(|| "%Y-%m-%d".to_string());

    let formatted = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => match Utc.timestamp_opt(i, 0).single() {
                Some(dt) => dt.format(&format),
                None => return Err(Error::msg(format!("Filter `date` received an out of range timestamp: {}", i))),
            },
            None => {
                return Err(Error::msg(format!("Filter `date` was invoked on a float: {}", n)))
            }
        },
        Value::String(s) => {
            if s.contains('T') {
                match s.parse::<DateTime<FixedOffset>>() {
                    Ok(val) => val.format(&format),
                    Err(_) => match s.parse::<NaiveDateTime>() {
                        Ok(val) => val.format(&format),
                        Err(_) => {
                            return Err(Error::msg(format!(
                                "Error parsing `{:?}` as rfc3339 date or naive datetime",
                                s
                            )));
                        }
                    },
                }
            } else {
                match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    Ok(val) => val.format(&format),
                    Err(_) => {
                        return Err(Error::msg(format!("Error parsing `{:?}` as YYYY-MM-DD date", s)));
                    }
                }
            }
        }
        _ => {
            return Err(Error::msg(format!(
                "Filter `date` received an incorrect type for arg `value`: \
                 got `{}` but expected i64|String",
                value
            )));
        }
    };

    Ok(Value::String(formatted.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn length_of_each_kind() {
        assert_eq!(length(&json!([1, 2, 3]), &[]).unwrap(), json!(3));
        assert_eq!(length(&json!({"a": 1}), &[]).unwrap(), json!(1));
        assert_eq!(length(&json!("日本語"), &[]).unwrap(), json!(3));
        assert!(length(&json!(1), &[]).is_err());
    }

    #[test]
    fn reverse_string_and_array() {
        assert_eq!(reverse(&json!("Hello"), &[]).unwrap(), json!("olleH"));
        assert_eq!(reverse(&json!([1, 2, 3]), &[]).unwrap(), json!([3, 2, 1]));
        assert!(reverse(&json!(null), &[]).is_err());
    }

    #[test]
    fn json_encode_compact_and_pretty() {
        let value = json!({"key": [1, 2]});
        assert_eq!(json_encode(&value, &[]).unwrap(), json!("{\"key\":[1,2]}"));
        assert_eq!(
            json_encode(&value, &[json!(true)]).unwrap(),
            json!("{\n  \"key\": [\n    1,\n    2\n  ]\n}")
        );
    }

    #[test]
    fn default_only_replaces_nothing() {
        assert_eq!(default(&json!(null), &[json!("n/a")]).unwrap(), json!("n/a"));
        assert_eq!(default(&json!(""), &[json!(0)]).unwrap(), json!(0));
        assert_eq!(default(&json!(0), &[json!("n/a")]).unwrap(), json!(0));
        assert!(default(&json!(null), &[]).is_err());
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn date_default() {
        assert_eq!(date(&json!(1482720453), &[]).unwrap(), json!("2016-12-26"));
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn date_custom_format() {
        assert_eq!(
            date(&json!(1482720453), &[json!("%Y-%m-%d %H:%M")]).unwrap(),
            json!("2016-12-26 02:47")
        );
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn date_rfc3339() {
        let dt = "1996-12-19T16:39:57-08:00";
        assert_eq!(date(&json!(dt), &[json!("%Y-%m-%d %z")]).unwrap(), json!("1996-12-19 -0800"));
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn date_yyyy_mm_dd() {
        assert_eq!(
            date(&json!("2017-03-05"), &[json!("%a, %d %b %Y")]).unwrap(),
            json!("Sun, 05 Mar 2017")
        );
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn date_rejects_garbage() {
        assert!(date(&json!("not a date"), &[]).is_err());
        assert!(date(&json!(1.5), &[]).is_err());
    }
}
