//! Segmentation of raw SLICES text into atomic tokens.
//!
//! Three fixed rules are tried in priority order at every scan position:
//!
//! 1. element symbol: one ASCII uppercase letter, optionally followed by one lowercase letter;
//! 2. number: a maximal run of ASCII digits;
//! 3. bond descriptor: exactly three characters drawn from `+`, `-` and `o`.
//!
//! A position where no rule applies is skipped one byte at a time. Skipped characters never
//! show up in the output and never cause an error. Every rule only consumes ASCII bytes, so
//! span offsets always fall on UTF-8 character boundaries.

use serde::{Deserialize, Serialize};

/// Textual description of the segmentation rules, stored in persisted records.
pub const PATTERN: &str = r"[A-Z][a-z]?|\d+|[+\-o]{3}";

/// A recognised token and its half-open byte range `[start, end)` in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenSpan {
    /// Token text, identical to `source[start..end]`.
    pub token: String,
    /// Byte offset of the first byte.
    pub start: usize,
    /// Byte offset one past the last byte.
    pub end: usize,
}

impl TokenSpan {
    /// Creates a new span.
    #[must_use]
    pub fn new<S: Into<String>>(token: S, start: usize, end: usize) -> Self {
        Self {
            token: token.into(),
            start,
            end,
        }
    }

    /// Length of the span in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Spans produced by [`pre_tokenize`] are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The rule class that recognised a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Element symbol such as `Ga` or `S`.
    Element,
    /// Decimal site index such as `0` or `12`.
    Number,
    /// Three-character bond descriptor such as `--o`.
    BondDescriptor,
}

/// Rules in the order they are attempted.
const RULES: [TokenKind; 3] = [
    TokenKind::Element,
    TokenKind::Number,
    TokenKind::BondDescriptor,
];

fn is_bond_char(byte: u8) -> bool {
    matches!(byte, b'+' | b'-' | b'o')
}

impl TokenKind {
    /// Returns the number of bytes this rule consumes at `pos`, or `None` when its
    /// precondition does not hold there.
    fn consume(self, bytes: &[u8], pos: usize) -> Option<usize> {
        let first = *bytes.get(pos)?;
        match self {
            Self::Element => {
                if !first.is_ascii_uppercase() {
                    return None;
                }
                match bytes.get(pos + 1) {
                    Some(next) if next.is_ascii_lowercase() => Some(2),
                    _ => Some(1),
                }
            }
            Self::Number => {
                if !first.is_ascii_digit() {
                    return None;
                }
                let run = bytes[pos..]
                    .iter()
                    .take_while(|byte| byte.is_ascii_digit())
                    .count();
                Some(run)
            }
            Self::BondDescriptor => {
                let window = bytes.get(pos..pos + 3)?;
                window.iter().all(|&byte| is_bond_char(byte)).then_some(3)
            }
        }
    }

    /// Classifies a complete token string, returning `None` for anything the segmenter
    /// would not emit as a single token (special tokens included).
    #[must_use]
    pub fn classify(token: &str) -> Option<Self> {
        let bytes = token.as_bytes();
        RULES
            .iter()
            .copied()
            .find(|rule| rule.consume(bytes, 0) == Some(bytes.len()))
    }
}

/// Splits `text` into token spans using the fixed rule set.
#[must_use]
pub fn pre_tokenize(text: &str) -> Vec<TokenSpan> {
    let bytes = text.as_bytes();
    let mut spans = Vec::with_capacity(bytes.len() / 2);
    let mut pos = 0usize;
    while pos < bytes.len() {
        let matched = RULES.iter().find_map(|rule| rule.consume(bytes, pos));
        match matched {
            Some(len) => {
                let end = pos + len;
                spans.push(TokenSpan::new(&text[pos..end], pos, end));
                pos = end;
            }
            None => pos += 1,
        }
    }
    spans
}
