//! Reads one MAL expression from a source string.
//!
//! The core entry point, [`read_str`], returns the parsed value together
//! with whatever text follows it — it does not itself decide whether
//! trailing input is an error. [`read`] layers the REPL/script policy
//! (whole input must be consumed, barring trailing whitespace/comments) on
//! top; `read-string` instead calls `read_str` directly and discards the
//! remainder, per §4.2.

use std::collections::HashMap;

use crate::value::{MapKey, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderError {
    pub message: String,
    pub line: usize,
    pub col: usize,
}

impl std::fmt::Display for ReaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.message, self.line, self.col)
    }
}

fn position(original: &str, remaining: &str) -> (usize, usize) {
    let consumed = original.len() - remaining.len();
    let consumed_str = &original[..consumed];
    let line = consumed_str.matches('\n').count() + 1;
    let col = match consumed_str.rfind('\n') {
        Some(idx) => consumed_str[idx + 1..].chars().count() + 1,
        None => consumed_str.chars().count() + 1,
    };
    (line, col)
}

fn err_at(original: &str, at: &str, message: impl Into<String>) -> ReaderError {
    let (line, col) = position(original, at);
    ReaderError {
        message: message.into(),
        line,
        col,
    }
}

fn skip_ws(mut input: &str) -> &str {
    loop {
        let after_ws = input.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        if after_ws.starts_with(';') {
            input = match after_ws.find('\n') {
                Some(i) => &after_ws[i..],
                None => "",
            };
            continue;
        }
        return after_ws;
    }
}

fn is_symbol_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '[' | ']' | '{' | '}' | '(' | ')' | '\'' | '"' | '`' | ',' | ';'
        )
}

fn scan_symbol(input: &str) -> Option<usize> {
    let mut len = 0;
    for c in input.chars() {
        if is_symbol_char(c) {
            len += c.len_utf8();
        } else {
            break;
        }
    }
    if len > 0 {
        Some(len)
    } else {
        None
    }
}

/// Length of a number token, honoring the grammar's `0` / `0+` quirk: a run
/// of one or more `0` characters is a complete number token (so `00` parses
/// as the integer `0`), while any other digit run must not start with `0`.
fn scan_number(input: &str) -> Option<usize> {
    let neg = input.starts_with('-');
    let i = if neg { 1 } else { 0 };
    let rest = &input[i..];
    let first = rest.chars().next()?;
    if !first.is_ascii_digit() {
        return None;
    }
    if first == '0' {
        let zero_len = rest.chars().take_while(|c| *c == '0').count();
        Some(i + zero_len)
    } else {
        let digit_len = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        Some(i + digit_len)
    }
}

/// Reads one expression. Returns the value and whatever text follows it,
/// without judging whether that remainder is acceptable.
pub fn read_str(input: &str) -> Result<(Value, &str), ReaderError> {
    parse_form(input, input)
}

/// Reads one expression and requires the rest of the input to be only
/// whitespace/comments. This is the policy the REPL and script loader use.
pub fn read(input: &str) -> Result<Value, ReaderError> {
    let (value, rest) = read_str(input)?;
    let trailing = skip_ws(rest);
    if !trailing.is_empty() {
        return Err(err_at(
            input,
            trailing,
            format!(
                "unexpected trailing input: '{}'",
                trailing.chars().next().unwrap()
            ),
        ));
    }
    Ok(value)
}

fn parse_form<'a>(original: &str, input: &'a str) -> Result<(Value, &'a str), ReaderError> {
    let input = skip_ws(input);
    let c = match input.chars().next() {
        Some(c) => c,
        None => return Err(err_at(original, input, "unexpected end of input")),
    };
    match c {
        '(' => {
            let (items, rest) = parse_seq(original, input, '(', ')')?;
            Ok((Value::List(items), rest))
        }
        '[' => {
            let (items, rest) = parse_seq(original, input, '[', ']')?;
            Ok((Value::Vector(items), rest))
        }
        '{' => parse_hashmap(original, input),
        ')' | ']' | '}' => Err(err_at(original, input, format!("unexpected token '{}'", c))),
        '"' => parse_string(original, input),
        '\'' => parse_macro(original, input, 1, "quote"),
        '`' => parse_macro(original, input, 1, "quasiquote"),
        '~' if input.starts_with("~@") => parse_macro(original, input, 2, "splice-unquote"),
        '~' => parse_macro(original, input, 1, "unquote"),
        '@' => parse_macro(original, input, 1, "deref"),
        '^' => parse_with_meta(original, input),
        _ => parse_atom(original, input),
    }
}

fn parse_macro<'a>(
    original: &str,
    input: &'a str,
    prefix_len: usize,
    form: &str,
) -> Result<(Value, &'a str), ReaderError> {
    let rest = &input[prefix_len..];
    let (inner, rest) = parse_form(original, rest)?;
    Ok((Value::List(vec![Value::Symbol(form.to_string()), inner]), rest))
}

/// `^m x` -> `(with-meta x m)` — note the argument swap against surface order.
fn parse_with_meta<'a>(original: &str, input: &'a str) -> Result<(Value, &'a str), ReaderError> {
    let rest = &input[1..];
    let (meta, rest) = parse_form(original, rest)?;
    let (target, rest) = parse_form(original, rest)?;
    Ok((
        Value::List(vec![Value::Symbol("with-meta".to_string()), target, meta]),
        rest,
    ))
}

fn parse_seq<'a>(
    original: &str,
    input: &'a str,
    open: char,
    close: char,
) -> Result<(Vec<Value>, &'a str), ReaderError> {
    let mut rest = &input[open.len_utf8()..];
    let mut items = Vec::new();
    loop {
        let after_ws = skip_ws(rest);
        if after_ws.is_empty() {
            return Err(err_at(original, after_ws, "unexpected end of input"));
        }
        if after_ws.starts_with(close) {
            return Ok((items, &after_ws[close.len_utf8()..]));
        }
        let (value, new_rest) = parse_form(original, after_ws)?;
        items.push(value);
        rest = new_rest;
    }
}

fn parse_hashmap<'a>(original: &str, input: &'a str) -> Result<(Value, &'a str), ReaderError> {
    let (items, rest) = parse_seq(original, input, '{', '}')?;
    if items.len() % 2 != 0 {
        return Err(err_at(
            original,
            input,
            "malformed hash-map: odd number of entries",
        ));
    }
    let mut map = HashMap::new();
    let mut it = items.into_iter();
    while let Some(key) = it.next() {
        let value = it.next().expect("even length checked above");
        let map_key = match key {
            Value::String(s) => MapKey::Str(s),
            Value::Keyword(k) => MapKey::Keyword(k),
            other => {
                return Err(err_at(
                    original,
                    input,
                    format!(
                        "malformed hash-map: key must be a string or keyword, got {}",
                        other.type_name()
                    ),
                ))
            }
        };
        map.insert(map_key, value);
    }
    Ok((Value::HashMap(map), rest))
}

fn parse_string<'a>(original: &str, input: &'a str) -> Result<(Value, &'a str), ReaderError> {
    let mut chars = input.char_indices();
    chars.next(); // opening quote
    let mut out = String::new();
    loop {
        match chars.next() {
            None => return Err(err_at(original, "", "unbalanced string")),
            Some((idx, '"')) => return Ok((Value::String(out), &input[idx + 1..])),
            Some((_, '\\')) => match chars.next() {
                None => return Err(err_at(original, "", "unbalanced string")),
                Some((_, 'n')) => out.push('\n'),
                Some((_, '"')) => out.push('"'),
                Some((_, '\\')) => out.push('\\'),
                Some((_, other)) => {
                    out.push('\\');
                    out.push(other);
                }
            },
            Some((_, c)) => out.push(c),
        }
    }
}

fn parse_atom<'a>(original: &str, input: &'a str) -> Result<(Value, &'a str), ReaderError> {
    if let Some(rest) = input.strip_prefix(':') {
        return match scan_symbol(rest) {
            Some(len) => Ok((Value::Keyword(rest[..len].to_string()), &rest[len..])),
            None => Err(err_at(original, input, "unexpected token ':'")),
        };
    }

    let num_len = scan_number(input);
    let sym_len = scan_symbol(input);
    let use_symbol = match (num_len, sym_len) {
        (Some(n), Some(s)) => s > n,
        (None, Some(_)) => true,
        (Some(_), None) => false,
        (None, None) => {
            return Err(err_at(
                original,
                input,
                format!("unexpected token '{}'", input.chars().next().unwrap()),
            ))
        }
    };

    if use_symbol {
        let len = sym_len.unwrap();
        let text = &input[..len];
        let value = match text {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            "nil" => Value::Nil,
            _ => Value::Symbol(text.to_string()),
        };
        Ok((value, &input[len..]))
    } else {
        let len = num_len.unwrap();
        let text = &input[..len];
        let n: i64 = text.parse().unwrap_or(0);
        Ok((Value::Number(n), &input[len..]))
    }
}
