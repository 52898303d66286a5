//! Rule pattern normalization
//!
//! A pattern that starts with an ASCII letter is a method name and is
//! anchored as `^pattern$`. The body is not escaped, so `get.*` still
//! matches `getName`. Anything else is a delimited regular expression such
//! as `/^get/i`: the first character is the delimiter and trailing
//! characters after the closing delimiter are modifiers.

use regex::Regex;

use crate::error::{AopError, Result};

/// A compiled method-name matcher
#[derive(Debug, Clone)]
pub struct RulePattern {
    raw: String,
    regex: Option<Regex>,
}

impl RulePattern {
    /// Normalize and compile `raw`.
    ///
    /// A pattern that fails to compile is kept but never matches.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let regex = match compile(&raw) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::warn!("Rule pattern will never match: {}", e);
                None
            }
        };
        Self { raw, regex }
    }

    /// The pattern as registered
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the pattern compiled
    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }

    /// Test a method name against the pattern
    pub fn is_match(&self, method: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(method))
    }
}

/// Whether `raw` is treated as a plain method name
pub fn is_plain_name(raw: &str) -> bool {
    raw.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}

/// Normalize `raw` into the regex source it will be compiled from
pub fn normalize(raw: &str) -> Result<String> {
    if is_plain_name(raw) {
        return Ok(format!("^{}$", raw));
    }
    parse_delimited(raw)
}

/// Normalize and compile `raw`
pub fn compile(raw: &str) -> Result<Regex> {
    let source = normalize(raw)?;
    Regex::new(&source).map_err(|source| AopError::PatternCompile {
        pattern: raw.to_string(),
        source,
    })
}

fn closing_delimiter(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        '<' => '>',
        other => other,
    }
}

/// Byte offset of the first unescaped closing delimiter in `rest`.
///
/// Bracket-style delimiters nest, so `((a)|b)` closes at the last `)`.
fn find_closing(rest: &str, open: char, close: char) -> Option<usize> {
    let nests = open != close;
    let mut depth = 0usize;
    let mut chars = rest.char_indices();
    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == close {
            if depth == 0 {
                return Some(i);
            }
            depth -= 1;
        } else if nests && c == open {
            depth += 1;
        }
    }
    None
}

fn parse_delimited(raw: &str) -> Result<String> {
    let invalid = |reason: &str| AopError::InvalidPattern {
        pattern: raw.to_string(),
        reason: reason.to_string(),
    };

    let open = raw.chars().next().ok_or_else(|| invalid("empty pattern"))?;
    if open.is_alphanumeric() || open == '\\' || open.is_whitespace() {
        return Err(invalid("delimiter must not be alphanumeric, backslash or whitespace"));
    }

    let close = closing_delimiter(open);
    let rest = &raw[open.len_utf8()..];
    let end = find_closing(rest, open, close).ok_or_else(|| invalid("no ending delimiter"))?;
    let body = &rest[..end];
    let modifiers = &rest[end + close.len_utf8()..];

    let mut flags = String::new();
    let mut anchored = false;
    for m in modifiers.chars() {
        match m {
            'i' | 'm' | 's' | 'x' | 'U' => {
                if !flags.contains(m) {
                    flags.push(m);
                }
            }
            'A' => anchored = true,
            // Unicode is always on; `$` already matches only at the very end
            'u' | 'D' => {}
            '\n' | '\r' | ' ' => {}
            other => return Err(invalid(&format!("unknown modifier '{}'", other))),
        }
    }

    let mut source = String::new();
    if !flags.is_empty() {
        source.push_str(&format!("(?{})", flags));
    }
    if anchored {
        source.push_str(&format!("^(?:{})", body));
    } else {
        source.push_str(body);
    }
    Ok(source)
}
