//! Trie matcher
//!
//! One deterministic pass over the path tokens, no backtracking. At every
//! vertex an exact edge is tried first; only a literal token may fall back
//! to the parameter edge.
//!
//! Literals are compared against exact edges in percent-decoded form, so
//! `/caf%C3%A9` reaches the edge registered as `café`. Decoding happens per
//! token, after the path was split, so `%2F` never acts as a separator.

use std::borrow::Cow;
use std::collections::HashMap;

use tracing::trace;

use crate::graph::{RouteEdge, RoutingGraph};
use crate::path::{PathScanner, PathToken};

/// Result of matching a path against the routing graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRoute<I> {
    /// Identifier of the pattern that owns the terminal vertex
    pub pattern_identifier: I,
    /// Captured parameters (name → decoded text)
    pub parameters: HashMap<String, String>,
}

/// Walks paths over a borrowed [`RoutingGraph`]
///
/// # Examples
///
/// ```
/// use deeplink_router::{Matcher, RouterCore};
///
/// let mut core = RouterCore::new();
/// core.register("/band/:band_id/product").unwrap();
///
/// let matched = Matcher::new(core.graph()).match_path("/band/20/product").unwrap();
/// assert_eq!(matched.parameters.get("band_id"), Some(&"20".to_string()));
/// assert!(Matcher::new(core.graph()).match_path("/band/21").is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a, I> {
    graph: &'a RoutingGraph<I>,
    decode_parameters: bool,
}

impl<'a, I: Clone> Matcher<'a, I> {
    pub fn new(graph: &'a RoutingGraph<I>) -> Self {
        Self {
            graph,
            decode_parameters: true,
        }
    }

    /// Keep captured text percent-encoded instead of decoding it
    pub fn with_decoding(mut self, decode_parameters: bool) -> Self {
        self.decode_parameters = decode_parameters;
        self
    }

    /// Matches an already extracted URL path (no scheme, host or query)
    pub fn match_path(&self, path: &str) -> Option<MatchedRoute<I>> {
        self.match_tokens(PathScanner::new(path))
    }

    /// Matches a token stream; an empty stream never matches
    pub fn match_tokens<T>(&self, tokens: T) -> Option<MatchedRoute<I>>
    where
        T: IntoIterator<Item = PathToken>,
    {
        let mut tokens = tokens.into_iter().peekable();
        tokens.peek()?;

        let mut current = self.graph.root();
        let mut parameters = HashMap::new();

        for token in tokens {
            let text = match token {
                PathToken::Literal(text) => text,
                // Separators have no parameter fallback.
                separator => {
                    let Some(next) = self.graph.next(current, &RouteEdge::from(separator)) else {
                        trace!("no transition for separator");
                        return None;
                    };
                    current = next;
                    continue;
                }
            };

            let exact = RouteEdge::Literal(decode_literal(&text));
            if let Some(next) = self.graph.next(current, &exact) {
                current = next;
                continue;
            }

            let Some(parameter) = self.graph.parameter(current) else {
                trace!(literal = %text, "no transition for literal");
                return None;
            };
            parameters.insert(parameter.name().to_string(), self.decode(&text));
            current = parameter.target();
        }

        let pattern_identifier = self.graph.vertex(current).pattern_identifier()?.clone();
        Some(MatchedRoute {
            pattern_identifier,
            parameters,
        })
    }

    /// Percent-decodes a capture; undecodable text degrades to `""`
    fn decode(&self, text: &str) -> String {
        if !self.decode_parameters {
            return text.to_string();
        }
        urlencoding::decode(text)
            .map(Cow::into_owned)
            .unwrap_or_default()
    }
}

/// Decoded form used for exact-edge lookup; undecodable text is kept as-is
fn decode_literal(text: &str) -> String {
    urlencoding::decode(text)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| text.to_string())
}
