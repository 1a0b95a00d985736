//! Redis-style glob patterns for key enumeration.
//!
//! Supports `*`, `?`, `[abc]`, `[^abc]`, `[a-z]` and `\` escapes, the same
//! subset `SCAN MATCH` understands, so the in-memory backend invalidates
//! exactly the keys Redis would.

use regex::Regex;

/// A compiled key pattern.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    regex: Regex,
}

impl KeyPattern {
    /// Compiles a glob. Returns `None` for patterns that cannot be expressed
    /// (e.g. an unterminated character class).
    pub fn new(glob: &str) -> Option<Self> {
        let mut out = String::with_capacity(glob.len() * 2 + 8);
        out.push_str("(?s)^");

        let mut chars = glob.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '*' => out.push_str(".*"),
                '?' => out.push('.'),
                '\\' => {
                    let escaped = chars.next()?;
                    out.push_str(&regex::escape(&escaped.to_string()));
                }
                '[' => {
                    out.push('[');
                    if chars.peek() == Some(&'^') {
                        chars.next();
                        out.push('^');
                    }
                    let mut closed = false;
                    let mut empty = true;
                    while let Some(inner) = chars.next() {
                        match inner {
                            ']' if !empty => {
                                closed = true;
                                break;
                            }
                            '\\' => {
                                let escaped = chars.next()?;
                                out.push_str(&regex::escape(&escaped.to_string()));
                            }
                            '-' if !empty => out.push('-'),
                            '[' | ']' | '&' | '~' | '-' | '^' => {
                                out.push('\\');
                                out.push(inner);
                            }
                            other => out.push(other),
                        }
                        empty = false;
                    }
                    if !closed {
                        return None;
                    }
                    out.push(']');
                }
                other => out.push_str(&regex::escape(&other.to_string())),
            }
        }

        out.push('$');
        Regex::new(&out).ok().map(|regex| Self { regex })
    }

    /// Returns true if `key` matches the whole pattern.
    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}
