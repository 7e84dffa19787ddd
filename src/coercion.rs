//! Loose value coercions shared by the comparison and arithmetic operators.
//!
//! Numbers and numeric-looking strings are interchangeable: `"3" == 3`,
//! `"10" > "9"` and `"2" + 2 == 4`. Everything else falls back to its
//! string form or its truthiness.
use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::{Number, Value};

use crate::context::{render_number, ValueTruthy};
use crate::errors::{Error, Result};

/// A number as seen by the operators, keeping integers exact as long as possible
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    pub fn as_f64(self) -> f64 {
        match self {
            Numeric::Int(i) => i as f64,
            Numeric::Float(f) => f,
        }
    }

    /// Drops the fractional part, saturating floats outside the `i64` range
    pub fn truncate(self) -> i64 {
        match self {
            Numeric::Int(i) => i,
            Numeric::Float(f) => f as i64,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Numeric::Int(i) => Value::from(i),
            Numeric::Float(f) => float_value(f),
        }
    }
}

/// JSON has no representation for infinities and NaN, those become their textual form
fn float_value(f: f64) -> Value {
    match Number::from_f64(f) {
        Some(n) => Value::Number(n),
        None if f.is_nan() => Value::String("NAN".to_string()),
        None if f > 0.0 => Value::String("INF".to_string()),
        None => Value::String("-INF".to_string()),
    }
}

/// Parses a numeric string: optional surrounding whitespace, an optional sign,
/// digits with at most one decimal point and an optional exponent.
pub fn parse_numeric(input: &str) -> Option<Numeric> {
    let trimmed = input.trim_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b');
    let bytes = trimmed.as_bytes();
    let len = bytes.len();
    let mut i = 0;

    if i < len && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < len && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    let mut is_float = false;

    if i < len && bytes[i] == b'.' {
        is_float = true;
        i += 1;
        let frac_start = i;
        while i < len && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return None;
    }

    if i < len && (bytes[i] == b'e' || bytes[i] == b'E') {
        is_float = true;
        i += 1;
        if i < len && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < len && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return None;
        }
    }
    if i != len {
        return None;
    }

    if !is_float {
        if let Ok(n) = trimmed.parse::<i64>() {
            return Some(Numeric::Int(n));
        }
    }
    trimmed.parse::<f64>().ok().map(Numeric::Float)
}

/// Numbers and numeric strings, `None` for everything else
pub fn loose_numeric(value: &Value) -> Option<Numeric> {
    match *value {
        Value::Number(ref n) => match n.as_i64() {
            Some(i) => Some(Numeric::Int(i)),
            None => n.as_f64().map(Numeric::Float),
        },
        Value::String(ref s) => parse_numeric(s),
        _ => None,
    }
}

/// Operand of `-`, `*`, `/` and `%`: anything non-numeric counts as zero
fn arithmetic_operand(value: &Value) -> Numeric {
    loose_numeric(value).unwrap_or(Numeric::Int(0))
}

/// The string a value turns into when concatenated
pub fn string_form(value: &Value) -> Cow<'_, str> {
    match *value {
        Value::String(ref s) => Cow::Borrowed(s),
        Value::Number(ref n) => Cow::Owned(render_number(n)),
        Value::Bool(true) => Cow::Borrowed("1"),
        _ => Cow::Borrowed(""),
    }
}

/// Numeric addition when both sides are numeric, string concatenation otherwise
pub fn add(left: &Value, right: &Value) -> Value {
    match (loose_numeric(left), loose_numeric(right)) {
        (Some(Numeric::Int(a)), Some(Numeric::Int(b))) => match a.checked_add(b) {
            Some(sum) => Value::from(sum),
            None => float_value(a as f64 + b as f64),
        },
        (Some(a), Some(b)) => float_value(a.as_f64() + b.as_f64()),
        _ => {
            let mut joined = string_form(left).into_owned();
            joined.push_str(&string_form(right));
            Value::String(joined)
        }
    }
}

pub fn subtract(left: &Value, right: &Value) -> Value {
    match (arithmetic_operand(left), arithmetic_operand(right)) {
        (Numeric::Int(a), Numeric::Int(b)) => match a.checked_sub(b) {
            Some(diff) => Value::from(diff),
            None => float_value(a as f64 - b as f64),
        },
        (a, b) => float_value(a.as_f64() - b.as_f64()),
    }
}

pub fn multiply(left: &Value, right: &Value) -> Value {
    match (arithmetic_operand(left), arithmetic_operand(right)) {
        (Numeric::Int(a), Numeric::Int(b)) => match a.checked_mul(b) {
            Some(product) => Value::from(product),
            None => float_value(a as f64 * b as f64),
        },
        (a, b) => float_value(a.as_f64() * b.as_f64()),
    }
}

/// Integer result when both sides are integers dividing evenly, float otherwise
pub fn divide(left: &Value, right: &Value) -> Result<Value> {
    let divisor = arithmetic_operand(right);
    if divisor.as_f64() == 0.0 {
        return Err(Error::division_by_zero());
    }

    match (arithmetic_operand(left), divisor) {
        (Numeric::Int(a), Numeric::Int(b)) if a.checked_rem(b) == Some(0) => match a.checked_div(b) {
            Some(quotient) => Ok(Value::from(quotient)),
            None => Ok(float_value(a as f64 / b as f64)),
        },
        (a, b) => Ok(float_value(a.as_f64() / b.as_f64())),
    }
}

/// Integer modulo of both operands truncated towards zero
pub fn modulo(left: &Value, right: &Value) -> Result<Value> {
    let divisor = arithmetic_operand(right).truncate();
    if divisor == 0 {
        return Err(Error::modulo_by_zero());
    }
    let dividend = arithmetic_operand(left).truncate();

    Ok(Value::from(dividend.checked_rem(divisor).unwrap_or(0)))
}

fn numeric_cmp(left: Numeric, right: Numeric) -> Option<Ordering> {
    match (left, right) {
        (Numeric::Int(a), Numeric::Int(b)) => Some(a.cmp(&b)),
        (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
    }
}

/// Orders two values the loose way. `None` means they can't be compared,
/// which makes every comparison operator except `!=` false.
pub fn loose_compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Null, Value::String(s)) => Some("".cmp(s.as_str())),
        (Value::String(s), Value::Null) => Some(s.as_str().cmp("")),
        (Value::Bool(_), _) | (_, Value::Bool(_)) | (Value::Null, _) | (_, Value::Null) => {
            Some(left.is_truthy().cmp(&right.is_truthy()))
        }
        (Value::Array(a), Value::Array(b)) => {
            if a.len() != b.len() {
                return Some(a.len().cmp(&b.len()));
            }
            for (x, y) in a.iter().zip(b) {
                match loose_compare(x, y)? {
                    Ordering::Equal => continue,
                    other => return Some(other),
                }
            }
            Some(Ordering::Equal)
        }
        (Value::Object(a), Value::Object(b)) => {
            if a.len() != b.len() {
                return Some(a.len().cmp(&b.len()));
            }
            for (key, x) in a {
                match loose_compare(x, b.get(key)?)? {
                    Ordering::Equal => continue,
                    other => return Some(other),
                }
            }
            Some(Ordering::Equal)
        }
        (Value::Array(_), _) | (Value::Object(_), _) => Some(Ordering::Greater),
        (_, Value::Array(_)) | (_, Value::Object(_)) => Some(Ordering::Less),
        _ => match (loose_numeric(left), loose_numeric(right)) {
            (Some(a), Some(b)) => numeric_cmp(a, b),
            _ => Some(string_form(left).cmp(&string_form(right))),
        },
    }
}

pub fn loose_eq(left: &Value, right: &Value) -> bool {
    loose_compare(left, right) == Some(Ordering::Equal)
}
