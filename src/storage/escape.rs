//! Character-reference escaping for GML text
//!
//! GML strings are delimited by `"` and the format is line oriented, so the
//! writer must escape quotes, `&` and control characters. Strict readers also
//! expect pure ASCII input. Two levels of escaping are provided:
//!
//! - [`escape_markup`]: structural characters only; non-ASCII stays literal.
//!   This is what gets written to disk.
//! - [`encode`]: everything outside printable ASCII, so the output is pure
//!   ASCII.
//!
//! [`decode`] is total and reverses both: `decode(&encode(s)) == s` and
//! `decode(&escape_markup(s)) == s` for every string `s`. [`ascii_safe`] is
//! the per-line pre-pass applied to GML text before parsing; it leaves
//! existing references alone.

use std::borrow::Cow;
use std::fmt::Write;

fn needs_markup_escape(c: char) -> bool {
    c == '&' || c == '"' || c.is_ascii_control()
}

fn push_ref(out: &mut String, c: char) {
    // Writing to a String cannot fail
    let _ = write!(out, "&#{};", u32::from(c));
}

fn escape_where(text: &str, pred: impl Fn(char) -> bool) -> Cow<'_, str> {
    if !text.chars().any(&pred) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if pred(c) {
            push_ref(&mut out, c);
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Escape `&`, `"` and ASCII control characters as numeric references
#[must_use]
pub fn escape_markup(text: &str) -> Cow<'_, str> {
    escape_where(text, needs_markup_escape)
}

/// Replace every non-ASCII character with a numeric reference
///
/// Existing references and structural characters are untouched, so this can
/// run over whole GML lines.
#[must_use]
pub fn ascii_safe(line: &str) -> Cow<'_, str> {
    escape_where(line, |c| !c.is_ascii())
}

/// Escape to pure ASCII (structural characters and non-ASCII)
#[must_use]
pub fn encode(text: &str) -> String {
    escape_where(text, |c| needs_markup_escape(c) || !c.is_ascii()).into_owned()
}

/// Decode numeric (`&#233;`, `&#xE9;`) and XML named character references
///
/// Anything that is not a well-formed reference is kept verbatim.
#[must_use]
pub fn decode(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match parse_reference(tail) {
            Some((c, consumed)) => {
                out.push(c);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Parse a reference at the start of `s` (which begins with `&`)
fn parse_reference(s: &str) -> Option<(char, usize)> {
    let end = s[1..].find(';')? + 1;
    let body = &s[1..end];
    let c = if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None if !num.is_empty() && num.bytes().all(|b| b.is_ascii_digit()) => {
                num.parse().ok()?
            }
            None => return None,
        };
        char::from_u32(code)?
    } else {
        match body {
            "amp" => '&',
            "quot" => '"',
            "lt" => '<',
            "gt" => '>',
            "apos" => '\'',
            _ => return None,
        }
    };
    Some((c, end + 1))
}
