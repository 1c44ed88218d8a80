//! Routing pattern front end
//!
//! Registration runs three stages over a pattern such as
//! `/articles(/page/:page)(.:format)`:
//! - `scanner` turns the text into [`PatternToken`]s (total, never fails)
//! - `validator` checks the token stream structurally
//! - `compiler` merges the validated tokens into a routing graph
//!
//! Scanning and validation are pure; only the compiler mutates a graph.

use std::fmt;

pub(crate) mod compiler;
pub mod scanner;
pub mod validator;

// Re-export commonly used functions
pub use scanner::{tokenize_pattern, PatternScanner};
pub use validator::validate;

/// A lexical unit of the registration grammar
///
/// Equality and hashing are structural on (variant, payload), so
/// `Literal(".")` is never equal to `Dot`.
///
/// # Examples
///
/// ```
/// use deeplink_router::pattern::{tokenize_pattern, PatternToken};
///
/// let tokens = tokenize_pattern("/:page(.:format)");
/// assert_eq!(tokens[1], PatternToken::Symbol("page".to_string()));
/// assert_eq!(tokens[2], PatternToken::LParen);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternToken {
    /// `/`
    Slash,
    /// `.`
    Dot,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// Plain text, may embed `.` (e.g. `sprockets.js`)
    Literal(String),
    /// `:name` placeholder, carries the name without the colon
    Symbol(String),
    /// `*name` globbing placeholder, carries the name without the star
    Star(String),
}

/// Canonical text of a token: exactly the characters it was scanned from
impl fmt::Display for PatternToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternToken::Slash => f.write_str("/"),
            PatternToken::Dot => f.write_str("."),
            PatternToken::LParen => f.write_str("("),
            PatternToken::RParen => f.write_str(")"),
            PatternToken::Literal(value) => f.write_str(value),
            PatternToken::Symbol(name) => write!(f, ":{}", name),
            PatternToken::Star(name) => write!(f, "*{}", name),
        }
    }
}

/// Concatenates the canonical text of `tokens`
///
/// Used for error context (`after` fields) and for round-tripping a scan.
///
/// # Examples
///
/// ```
/// use deeplink_router::pattern::{render, tokenize_pattern};
///
/// let pattern = "/sprockets.js(.:format)";
/// assert_eq!(render(&tokenize_pattern(pattern)), pattern);
/// ```
pub fn render(tokens: &[PatternToken]) -> String {
    tokens.iter().map(ToString::to_string).collect()
}
