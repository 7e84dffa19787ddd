//! The `value|filter|filter(arg, "arg")` part of a directive.
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::builtins::filters::Filter;
use crate::coercion::parse_numeric;
use crate::context::ValueRender;
use crate::errors::{Error, Result};
use crate::utils::{split_quoted, unquote};

/// A string that is output as-is, bypassing the escaping policy
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct RawValue(String);

impl RawValue {
    pub fn new(s: impl Into<String>) -> RawValue {
        RawValue(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What comes out of a pipeline
#[derive(Clone, Debug, PartialEq)]
pub enum Piped {
    Value(Value),
    Raw(RawValue),
}

impl Piped {
    pub fn into_value(self) -> Value {
        match self {
            Piped::Value(v) => v,
            Piped::Raw(r) => Value::String(r.into_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Arg<'a> {
    Literal(Value),
    /// Looked up in the data when the filter runs
    Path(&'a str),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FilterCall<'a> {
    pub name: &'a str,
    pub args: Vec<Arg<'a>>,
}

fn parse_arg(input: &str) -> Arg<'_> {
    let input = input.trim();
    if let Some(s) = unquote(input) {
        return Arg::Literal(Value::String(s));
    }
    match parse_numeric(input) {
        Some(n) => Arg::Literal(n.into_value()),
        None => Arg::Path(input),
    }
}

/// Parses `name` or `name(arg1, arg2)`
pub fn parse_filter_call(input: &str) -> FilterCall<'_> {
    let input = input.trim();
    let (name, inner) = match input.find('(') {
        Some(open) => {
            let inner = &input[open + 1..];
            (input[..open].trim(), inner.strip_suffix(')').unwrap_or(inner))
        }
        None => (input, ""),
    };

    let args = if inner.trim().is_empty() {
        Vec::new()
    } else {
        split_quoted(",", inner, None).into_iter().map(parse_arg).collect()
    };

    FilterCall { name, args }
}

/// Runs `value` through each filter in order.
///
/// The output is raw when the last filter applied is safe.
pub fn apply_filters<F>(
    value: Value,
    calls: &[FilterCall<'_>],
    filters: &HashMap<String, Arc<dyn Filter>>,
    resolve: F,
) -> Result<Piped>
where
    F: Fn(&str) -> Result<Value>,
{
    let mut value = value;
    let mut safe = false;

    for call in calls {
        let filter = filters.get(call.name).ok_or_else(|| Error::function_not_found(call.name))?;

        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(match *arg {
                Arg::Literal(ref v) => v.clone(),
                Arg::Path(path) => resolve(path)?,
            });
        }

        value = filter.filter(&value, &args)?;
        safe = filter.is_safe();
    }

    if safe {
        Ok(Piped::Raw(RawValue::new(value.render())))
    } else {
        Ok(Piped::Value(value))
    }
}
