use thiserror::Error;

/// Registration errors for routing patterns
///
/// Every variant is raised before the live routing graph is touched, so a
/// rejected pattern never leaves partially merged edges behind.
///
/// The `after` fields carry the canonical text of every token that precedes
/// the offending one, which is enough to point at the exact position:
///
/// ```
/// use deeplink_router::{PatternRegisterError, RouterCore};
///
/// let mut core = RouterCore::new();
/// let err = core.register("/slash/:id*name").unwrap_err();
/// assert_eq!(
///     err,
///     PatternRegisterError::InvalidGlobbing {
///         globbing: "name".to_string(),
///         after: "/slash/:id".to_string(),
///     }
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternRegisterError {
    /// The pattern produced no tokens at all
    #[error("routing pattern is empty")]
    Empty,

    /// The first token is not `/`
    #[error("routing pattern must start with '/'")]
    MissingPrefixSlash,

    /// `*name` appears somewhere other than right after `/`
    #[error("globbing '*{globbing}' must follow '/' (after \"{after}\")")]
    InvalidGlobbing { globbing: String, after: String },

    /// `:name` appears somewhere other than right after `/` or `.`
    #[error("symbol ':{symbol}' must follow '/' or '.' (after \"{after}\")")]
    InvalidSymbol { symbol: String, after: String },

    /// Opening and closing parentheses do not pair up
    #[error("unbalanced parenthesis in routing pattern")]
    UnbalancedParenthesis,

    /// A token that the grammar does not allow at this position
    #[error("unexpected token after \"{after}\"")]
    UnexpectedToken { after: String },

    /// An optional group opened on a vertex that already branches
    #[error("optional group is ambiguous with an already registered route")]
    AmbiguousOptionalPattern,
}
