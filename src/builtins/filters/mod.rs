use std::borrow::Cow;

use serde_json::value::Value;

use crate::context::ValueRender;
use crate::errors::{Error, Result};

pub mod array;
pub mod common;
pub mod number;
pub mod object;
pub mod string;

/// The filter function type definition.
///
/// `value` is what is piped into the filter, `args` the positional
/// arguments written between the parentheses, already evaluated.
pub trait Filter: Sync + Send {
    /// The filter function type definition
    fn filter(&self, value: &Value, args: &[Value]) -> Result<Value>;

    /// Whether the current filter's output should be treated as safe, defaults to `false`
    fn is_safe(&self) -> bool {
        false
    }
}

impl<F> Filter for F
where
    F: Fn(&Value, &[Value]) -> Result<Value> + Sync + Send,
{
    fn filter(&self, value: &Value, args: &[Value]) -> Result<Value> {
        self(value, args)
    }
}

/// The `raw` filter: passes its input through and marks it as safe
pub struct Raw;

impl Filter for Raw {
    fn filter(&self, value: &Value, _: &[Value]) -> Result<Value> {
        Ok(value.clone())
    }

    fn is_safe(&self) -> bool {
        true
    }
}

/// Strings as they are, numbers in their display form
pub(crate) fn get_string<'a>(filter: &str, var: &str, value: &'a Value) -> Result<Cow<'a, str>> {
    match *value {
        Value::String(_) | Value::Number(_) => Ok(value.render()),
        _ => Err(Error::msg(format!(
            "Filter `{}` received an incorrect type for arg `{}`: got `{}` but expected a String",
            filter, var, value
        ))),
    }
}
