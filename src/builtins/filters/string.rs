/// Filters operating on string
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::value::{to_value, Value};
use unic_segment::GraphemeIndices;

#[cfg(feature = "urlencode")]
use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::builtins::filters::get_string;
use crate::errors::{Error, Result};
use crate::utils;

/// https://url.spec.whatwg.org/#fragment-percent-encode-set
#[cfg(feature = "urlencode")]
const FRAGMENT_ENCODE_SET: &AsciiSet =
    &percent_encoding::CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');

/// https://url.spec.whatwg.org/#path-percent-encode-set
#[cfg(feature = "urlencode")]
const PATH_ENCODE_SET: &AsciiSet = &FRAGMENT_ENCODE_SET.add(b'#').add(b'?').add(b'{').add(b'}');

/// Path characters plus the ones with a meaning in query strings, `/` excepted
#[cfg(feature = "urlencode")]
const QUERY_ENCODE_SET: &AsciiSet = &PATH_ENCODE_SET
    .add(b':')
    .add(b';')
    .add(b'=')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'|')
    .add(b'!')
    .add(b'$')
    .add(b'&')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'*')
    .add(b'+')
    .add(b',');

lazy_static! {
    static ref STRIPTAGS_RE: Regex = Regex::new(r"(<!--.*?-->|<[^>]*>)").unwrap();
    static ref WORDS_RE: Regex = Regex::new(r"\b(?P<first>[\w'])(?P<rest>[\w']*)\b").unwrap();
}

/// Convert a value to uppercase.
pub fn upper(value: &Value, _: &[Value]) -> Result<Value> {
    let s = get_string("upper", "value", value)?;

    Ok(to_value(s.to_uppercase()).unwrap())
}

/// Convert a value to lowercase.
pub fn lower(value: &Value, _: &[Value]) -> Result<Value> {
    let s = get_string("lower", "value", value)?;

    Ok(to_value(s.to_lowercase()).unwrap())
}

/// Strip leading and trailing whitespace.
pub fn trim(value: &Value, _: &[Value]) -> Result<Value> {
    let s = get_string("trim", "value", value)?;

    Ok(to_value(s.trim()).unwrap())
}

/// Truncates a string to the indicated length (in graphemes, default 255),
/// appending `end` (default `…`) when something was cut.
pub fn truncate(value: &Value, args: &[Value]) -> Result<Value> {
    let s = get_string("truncate", "value", value)?;
    let length = try_get_arg!("truncate", "length", usize, args, 0).unwrap_or(255);
    let end = try_get_arg!("truncate", "end", String, args, 1).unwrap_or_else(|| "…".to_string());

    let graphemes = GraphemeIndices::new(&s).collect::<Vec<(usize, &str)>>();

    // Nothing to truncate?
    if length >= graphemes.len() {
        return Ok(to_value(&s).unwrap());
    }

    let result = s[..graphemes[length].0].to_string() + &end;
    Ok(to_value(result).unwrap())
}

/// Replaces every occurrence of the first argument by the second one
pub fn replace(value: &Value, args: &[Value]) -> Result<Value> {
    let s = get_string("replace", "value", value)?;

    let from = match try_get_arg!("replace", "from", String, args, 0) {
        Some(from) => from,
        None => return Err(Error::msg("Filter `replace` expected a first argument `from`")),
    };
    let to = match try_get_arg!("replace", "to", String, args, 1) {
        Some(to) => to,
        None => return Err(Error::msg("Filter `replace` expected a second argument `to`")),
    };

    Ok(to_value(s.replace(&from, &to)).unwrap())
}

/// First letter of the string is uppercase rest is lowercase
pub fn capitalize(value: &Value, _: &[Value]) -> Result<Value> {
    let s = get_string("capitalize", "value", value)?;
    let mut chars = s.chars();
    match chars.next() {
        None => Ok(to_value("").unwrap()),
        Some(f) => {
            let res = f.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase();
            Ok(to_value(res).unwrap())
        }
    }
}

/// Percent-encodes reserved URI characters
#[cfg(feature = "urlencode")]
pub fn urlencode(value: &Value, _: &[Value]) -> Result<Value> {
    let s = get_string("urlencode", "value", value)?;
    let encoded = percent_encode(s.as_bytes(), QUERY_ENCODE_SET).to_string();
    Ok(Value::String(encoded))
}

/// Percent-encodes all non-alphanumeric characters
#[cfg(feature = "urlencode")]
pub fn urlencode_strict(value: &Value, _: &[Value]) -> Result<Value> {
    let s = get_string("urlencode_strict", "value", value)?;
    let encoded = percent_encode(s.as_bytes(), NON_ALPHANUMERIC).to_string();
    Ok(Value::String(encoded))
}

/// Transform a string into a slug
#[cfg(feature = "slug")]
pub fn slugify(value: &Value, _: &[Value]) -> Result<Value> {
    let s = get_string("slugify", "value", value)?;
    Ok(to_value(slug::slugify(s)).unwrap())
}

/// Capitalizes each word in the string
pub fn title(value: &Value, _: &[Value]) -> Result<Value> {
    let s = get_string("title", "value", value)?;

    Ok(to_value(WORDS_RE.replace_all(&s, |caps: &Captures| {
        let first = caps["first"].to_uppercase();
        let rest = caps["rest"].to_lowercase();
        format!("{}{}", first, rest)
    }))
    .unwrap())
}

/// Removes html tags from string
pub fn striptags(value: &Value, _: &[Value]) -> Result<Value> {
    let s = get_string("striptags", "value", value)?;
    Ok(to_value(STRIPTAGS_RE.replace_all(&s, "")).unwrap())
}

/// Returns the given text with all special HTML characters encoded
pub fn escape_html(value: &Value, _: &[Value]) -> Result<Value> {
    let s = get_string("escape", "value", value)?;
    Ok(Value::String(utils::escape_html(&s)))
}
