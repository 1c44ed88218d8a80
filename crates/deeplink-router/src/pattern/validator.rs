//! Structural validation of scanned patterns
//!
//! One full pass over the token stream, run before any graph mutation.

use super::PatternToken;
use crate::error::PatternRegisterError;

/// Validates a scanned pattern (pure function)
///
/// # Rules (checked left to right)
///
/// 1. The stream must not be empty → `Empty`
/// 2. It must start with `/` → `MissingPrefixSlash`
/// 3. `*name` must directly follow `/` → `InvalidGlobbing`
/// 4. `:name` must directly follow `/` or `.` → `InvalidSymbol`
/// 5. `)` must close an open `(` → `UnexpectedToken`
/// 6. Every `(` must be closed by the end → `UnbalancedParenthesis`
///
/// Errors that point at a token carry the rendered text of everything
/// before it.
///
/// # Examples
///
/// ```
/// use deeplink_router::pattern::{tokenize_pattern, validate};
/// use deeplink_router::PatternRegisterError;
///
/// assert!(validate(&tokenize_pattern("/valid/(/foo/:foo)")).is_ok());
/// assert_eq!(
///     validate(&tokenize_pattern("/invalid)/foo/:foo(")),
///     Err(PatternRegisterError::UnexpectedToken { after: "/invalid".to_string() })
/// );
/// ```
pub fn validate(tokens: &[PatternToken]) -> Result<(), PatternRegisterError> {
    match tokens.first() {
        None => return Err(PatternRegisterError::Empty),
        Some(PatternToken::Slash) => {}
        Some(_) => return Err(PatternRegisterError::MissingPrefixSlash),
    }

    let mut depth: usize = 0;
    let mut rendered = String::new();
    let mut previous: Option<&PatternToken> = None;

    for token in tokens {
        match token {
            PatternToken::Star(globbing) if !matches!(previous, Some(PatternToken::Slash)) => {
                return Err(PatternRegisterError::InvalidGlobbing {
                    globbing: globbing.clone(),
                    after: rendered,
                });
            }
            PatternToken::Symbol(symbol)
                if !matches!(previous, Some(PatternToken::Slash | PatternToken::Dot)) =>
            {
                return Err(PatternRegisterError::InvalidSymbol {
                    symbol: symbol.clone(),
                    after: rendered,
                });
            }
            PatternToken::LParen => depth += 1,
            PatternToken::RParen => match depth.checked_sub(1) {
                Some(closed) => depth = closed,
                None => return Err(PatternRegisterError::UnexpectedToken { after: rendered }),
            },
            _ => {}
        }

        rendered.push_str(&token.to_string());
        previous = Some(token);
    }

    if depth == 0 {
        Ok(())
    } else {
        Err(PatternRegisterError::UnbalancedParenthesis)
    }
}
