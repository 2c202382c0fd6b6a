//! Constraint expression tokenizer
//!
//! A constraint expression is the part of a shorthand after the first `|`:
//!
//! ```text
//! minimum=1 maximum=65535 | default=8080 description='Service port'
//! ```
//!
//! Tokens are separated by whitespace, except inside single or double quotes
//! (backslash escapes the next character) and inside `{}`/`[]` nesting, so
//! JSON literals and quoted text containing spaces or pipes stay whole.

/// Split a constraint expression into whitespace-separated tokens.
///
/// Never fails; an empty expression yields no tokens.
pub fn tokenize_constraints(expr: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut depth = 0usize;

    for c in expr.chars() {
        if let Some(q) = quote {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                quote = Some(c);
                current.push(c);
            }
            '{' | '[' => {
                depth += 1;
                current.push(c);
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Split `value` on `sep`, ignoring separators inside quotes.
///
/// Items are trimmed and empty items dropped: `"a, b",c` gives `["\"a, b\"", "c"]`.
pub fn split_respecting_quotes(value: &str, sep: char) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    let mut flush = |current: &mut String| {
        let trimmed = current.trim();
        if !trimmed.is_empty() {
            items.push(trimmed.to_string());
        }
        current.clear();
    };

    for c in value.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                current.push(c);
            }
            None if c == sep => flush(&mut current),
            None => current.push(c),
        }
    }
    flush(&mut current);

    items
}

/// Remove surrounding quotes from a token value.
///
/// `"..."` follows double-quoted escaping (`\n`, `\"`, `é`, ...); a value
/// with an invalid escape is returned unchanged. `'...'` follows YAML
/// single-quote rules, where `''` stands for one `'`. Anything else is returned
/// as is.
pub fn unquote_if_needed(value: &str) -> String {
    if value.len() >= 2 {
        if let Some(inner) = value
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            if let Some(unescaped) = unescape_double_quoted(inner) {
                return unescaped;
            }
        } else if let Some(inner) = value
            .strip_prefix('\'')
            .and_then(|rest| rest.strip_suffix('\''))
        {
            return inner.replace("''", "'");
        }
    }
    value.to_string()
}

fn unescape_double_quoted(inner: &str) -> Option<String> {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return None,
            '\\' => {}
            c => {
                out.push(c);
                continue;
            }
        }

        let escaped = match chars.next()? {
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{0B}',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            'x' => hex_escape(&mut chars, 2)?,
            'u' => hex_escape(&mut chars, 4)?,
            'U' => hex_escape(&mut chars, 8)?,
            d @ '0'..='7' => {
                let mut code = d.to_digit(8)?;
                for _ in 0..2 {
                    code = code * 8 + chars.next()?.to_digit(8)?;
                }
                if code > 0xFF {
                    return None;
                }
                char::from_u32(code)?
            }
            _ => return None,
        };
        out.push(escaped);
    }

    Some(out)
}

fn hex_escape(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let mut code = 0u32;
    for _ in 0..digits {
        code = code.checked_mul(16)? + chars.next()?.to_digit(16)?;
    }
    char::from_u32(code)
}
