//! Path scanning for incoming URLs
//!
//! All functions are **pure**: given same input, always produce same output with no side effects.
//!
//! The alphabet is smaller than the pattern grammar: only `/`, `.` and
//! literal text. Both separators always split, so a path literal never
//! embeds a dot. Percent-decoding is left to parameter extraction.

use std::fmt;

use crate::graph::RouteEdge;

/// A lexical unit of an incoming URL path
///
/// # Examples
///
/// ```
/// use deeplink_router::path::{tokenize_path, PathToken};
///
/// assert_eq!(
///     tokenize_path("/page.json"),
///     vec![
///         PathToken::Slash,
///         PathToken::Literal("page".to_string()),
///         PathToken::Dot,
///         PathToken::Literal("json".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathToken {
    Slash,
    Dot,
    Literal(String),
}

impl fmt::Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathToken::Slash => f.write_str("/"),
            PathToken::Dot => f.write_str("."),
            PathToken::Literal(value) => f.write_str(value),
        }
    }
}

/// Every path token corresponds to exactly one exact-match edge
impl From<PathToken> for RouteEdge {
    fn from(token: PathToken) -> Self {
        match token {
            PathToken::Slash => RouteEdge::Slash,
            PathToken::Dot => RouteEdge::Dot,
            PathToken::Literal(value) => RouteEdge::Literal(value),
        }
    }
}

/// Lazy scanner over a URL path
///
/// # Performance
///
/// - O(n) where n is path length
/// - One allocation per literal token, none for separators
#[derive(Debug, Clone)]
pub struct PathScanner<'a> {
    rest: &'a str,
}

impl<'a> PathScanner<'a> {
    pub fn new(path: &'a str) -> Self {
        Self { rest: path }
    }

    pub fn is_eof(&self) -> bool {
        self.rest.is_empty()
    }
}

impl<'a> Iterator for PathScanner<'a> {
    type Item = PathToken;

    fn next(&mut self) -> Option<Self::Item> {
        let token = match self.rest.chars().next()? {
            '/' => PathToken::Slash,
            '.' => PathToken::Dot,
            _ => {
                let len = self.rest.find(&['/', '.'][..]).unwrap_or(self.rest.len());
                let (literal, rest) = self.rest.split_at(len);
                self.rest = rest;
                return Some(PathToken::Literal(literal.to_string()));
            }
        };
        self.rest = &self.rest[1..];
        Some(token)
    }
}

/// Scans a whole path eagerly (pure function)
///
/// # Examples
///
/// ```
/// use deeplink_router::path::{tokenize_path, PathToken};
///
/// assert!(tokenize_path("").is_empty());
/// assert_eq!(tokenize_path("//"), vec![PathToken::Slash, PathToken::Slash]);
/// ```
pub fn tokenize_path(path: &str) -> Vec<PathToken> {
    PathScanner::new(path).collect()
}
