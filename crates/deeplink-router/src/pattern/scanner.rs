//! Pattern scanner
//!
//! Pure lexer for the registration grammar. Scanning is total: any text
//! produces a token stream, structural problems are left to the validator.

use super::PatternToken;

/// Characters that end a fragment
///
/// `.` is absent, so literals such as `sprockets.js` stay whole.
/// `*` ends a fragment so a misplaced glob (`/body*`) becomes its own token.
fn is_fragment_boundary(c: char) -> bool {
    matches!(c, '/' | '(' | ')' | '*')
}

/// Lazy, single-pass scanner over a routing pattern
///
/// Borrows the pattern and yields owned tokens left to right. Not
/// restartable; scan again from the text if another pass is needed.
///
/// # Examples
///
/// ```
/// use deeplink_router::pattern::{PatternScanner, PatternToken};
///
/// let tokens: Vec<PatternToken> = PatternScanner::new("/docs/*path").collect();
/// assert_eq!(
///     tokens,
///     vec![
///         PatternToken::Slash,
///         PatternToken::Literal("docs".to_string()),
///         PatternToken::Slash,
///         PatternToken::Star("path".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct PatternScanner<'a> {
    rest: &'a str,
}

impl<'a> PatternScanner<'a> {
    pub fn new(pattern: &'a str) -> Self {
        Self { rest: pattern }
    }

    /// True once every character has been consumed
    pub fn is_eof(&self) -> bool {
        self.rest.is_empty()
    }
}

impl<'a> Iterator for PatternScanner<'a> {
    type Item = PatternToken;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;

        let single = match first {
            '/' => Some(PatternToken::Slash),
            '.' => Some(PatternToken::Dot),
            '(' => Some(PatternToken::LParen),
            ')' => Some(PatternToken::RParen),
            _ => None,
        };
        if let Some(token) = single {
            self.rest = &self.rest[1..];
            return Some(token);
        }

        // The leading character always belongs to the fragment, even `*`.
        let lead = first.len_utf8();
        let len = self.rest[lead..]
            .find(is_fragment_boundary)
            .map_or(self.rest.len(), |offset| lead + offset);
        let (fragment, rest) = self.rest.split_at(len);
        self.rest = rest;

        Some(match first {
            ':' => PatternToken::Symbol(fragment[1..].to_string()),
            '*' => PatternToken::Star(fragment[1..].to_string()),
            _ => PatternToken::Literal(fragment.to_string()),
        })
    }
}

/// Scans a whole pattern eagerly
///
/// # Examples
///
/// ```
/// use deeplink_router::pattern::{tokenize_pattern, PatternToken};
///
/// let tokens = tokenize_pattern("(.:format)");
/// assert_eq!(
///     tokens,
///     vec![
///         PatternToken::LParen,
///         PatternToken::Dot,
///         PatternToken::Symbol("format".to_string()),
///         PatternToken::RParen,
///     ]
/// );
/// ```
pub fn tokenize_pattern(pattern: &str) -> Vec<PatternToken> {
    PatternScanner::new(pattern).collect()
}
