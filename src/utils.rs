/// Escape HTML following the same rules as PHP's `htmlspecialchars` with quotes.
///
/// ```text
/// & --> &amp;
/// < --> &lt;
/// > --> &gt;
/// " --> &quot;
/// ' --> &#039;
/// ```
#[inline]
pub fn escape_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len() * 2);
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#039;"),
            _ => output.push(c),
        }
    }

    // Not using shrink_to_fit() on purpose
    output
}

/// Splits `text` on `separator` like `splitn`, except that:
///
/// - separators inside a double quoted run are ignored, a backslash escaping the next char
/// - when splitting on `|`, a `||` is kept as is in the current segment so the logical
///   OR survives filter-pipe splitting
///
/// `limit` bounds the number of segments, the last one holding the remainder.
pub fn split_quoted<'a>(separator: &str, text: &'a str, limit: Option<usize>) -> Vec<&'a str> {
    let bytes = text.as_bytes();
    let sep = separator.as_bytes();
    let keep_double_pipe = separator == "|";
    let mut parts = Vec::new();

    if sep.is_empty() {
        return vec![text];
    }

    let mut start = 0;
    let mut i = 0;
    let mut in_quotes = false;
    while i < bytes.len() {
        if limit.map_or(false, |l| parts.len() + 1 >= l) {
            break;
        }

        let b = bytes[i];
        if in_quotes {
            match b {
                b'\\' => i += 2,
                b'"' => {
                    in_quotes = false;
                    i += 1;
                }
                _ => i += 1,
            }
            continue;
        }

        if b == b'"' {
            in_quotes = true;
            i += 1;
        } else if keep_double_pipe && bytes[i..].starts_with(b"||") {
            i += 2;
        } else if bytes[i..].starts_with(sep) {
            parts.push(&text[start..i]);
            i += sep.len();
            start = i;
        } else {
            i += 1;
        }
    }
    parts.push(&text[start..]);

    parts
}

/// Turns `"a \"quoted\" word"` into `a "quoted" word`.
/// Returns `None` if `input` isn't wrapped in double quotes.
pub fn unquote(input: &str) -> Option<String> {
    if input.len() < 2 || !input.starts_with('"') || !input.ends_with('"') {
        return None;
    }

    let mut output = String::with_capacity(input.len() - 2);
    let mut chars = input[1..input.len() - 1].chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                output.push(escaped);
            }
        } else {
            output.push(c);
        }
    }
    Some(output)
}

#[cfg(test)]
mod tests {
    use super::{escape_html, split_quoted, unquote};

    #[test]
    fn test_escape_html() {
        let tests = vec![
            (r"", ""),
            (r"a&b", "a&amp;b"),
            (r"<a", "&lt;a"),
            (r">a", "&gt;a"),
            (r#"""#, "&quot;"),
            (r#"'"#, "&#039;"),
            (r#"1/0"#, "1/0"),
            (r#"大阪"#, "大阪"),
        ];
        for (input, expected) in tests {
            assert_eq!(escape_html(input), expected);
        }
        let empty = String::new();
        assert_eq!(escape_html(&empty), empty);
    }

    #[test]
    fn split_like_splitn() {
        assert_eq!(split_quoted(",", "a,b,c", None), vec!["a", "b", "c"]);
        assert_eq!(split_quoted(",", "a,b,c", Some(2)), vec!["a", "b,c"]);
        assert_eq!(split_quoted(":", "i:k:items:more", Some(3)), vec!["i", "k", "items:more"]);
        assert_eq!(split_quoted(",", "", None), vec![""]);
        assert_eq!(split_quoted(",", "a,", None), vec!["a", ""]);
        assert_eq!(split_quoted("}}", "name}} tail }}", Some(2)), vec!["name", " tail }}"]);
    }

    #[test]
    fn split_ignores_quoted_separators() {
        assert_eq!(
            split_quoted("|", r#"date|format("a|b")|upper"#, None),
            vec!["date", r#"format("a|b")"#, "upper"]
        );
        assert_eq!(
            split_quoted("}}", r#"x|f("}}")}} after"#, Some(2)),
            vec![r#"x|f("}}")"#, " after"]
        );
        assert_eq!(
            split_quoted(",", r#""a \", b", c"#, None),
            vec![r#""a \", b""#, " c"]
        );
    }

    #[test]
    fn split_keeps_double_pipe() {
        assert_eq!(split_quoted("|", "a || b|upper", None), vec!["a || b", "upper"]);
        assert_eq!(split_quoted("|", "a||b", None), vec!["a||b"]);
    }

    #[test]
    fn split_handles_multibyte_text() {
        assert_eq!(split_quoted(",", "é,\"ü,\\é\",ß", None), vec!["é", "\"ü,\\é\"", "ß"]);
    }

    #[test]
    fn unquote_strings() {
        assert_eq!(unquote(r#""hello""#), Some("hello".to_string()));
        assert_eq!(unquote(r#""say \"hi\"""#), Some(r#"say "hi""#.to_string()));
        assert_eq!(unquote(r#""""#), Some(String::new()));
        assert_eq!(unquote("hello"), None);
        assert_eq!(unquote("\""), None);
    }
}
