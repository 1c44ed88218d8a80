//! Registration and matching over one shared routing graph
//!
//! `register` takes `&mut self` and `match_path` takes `&self`, so the
//! borrow checker already enforces one registrar or many matchers. Share a
//! `RouterCore` across threads behind `Arc<RwLock<_>>` when registration
//! continues after startup.

use std::fmt;

use anyhow::Context;
use tracing::{debug, warn};

use crate::config::{Config, RouterConfig};
use crate::error::PatternRegisterError;
use crate::graph::RoutingGraph;
use crate::matcher::{MatchedRoute, Matcher};
use crate::pattern::compiler::PatternCompiler;
use crate::pattern::{tokenize_pattern, validate};

/// The routing trie plus its registration pipeline
///
/// Patterns are scanned, validated, then compiled into a staged copy of
/// the graph. The copy replaces the live graph only when compilation
/// succeeds, so a rejected pattern leaves no partial edges behind.
///
/// # Examples
///
/// ```
/// use deeplink_router::RouterCore;
///
/// let mut core = RouterCore::new();
/// core.register("/articles(/page/:page(/per_page/:per_page))(/sort/:sort)(.:format)")
///     .unwrap();
///
/// let matched = core.match_path("/articles/page/2/sort/recent.json").unwrap();
/// assert_eq!(matched.parameters.get("page"), Some(&"2".to_string()));
/// assert_eq!(matched.parameters.get("sort"), Some(&"recent".to_string()));
/// assert_eq!(matched.parameters.get("format"), Some(&"json".to_string()));
/// assert!(!matched.parameters.contains_key("per_page"));
///
/// assert!(core.match_path("/articles/2/edit").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct RouterCore<I = String> {
    graph: RoutingGraph<I>,
    decode_parameters: bool,
}

impl<I> Default for RouterCore<I> {
    fn default() -> Self {
        Self {
            graph: RoutingGraph::new(),
            decode_parameters: true,
        }
    }
}

impl<I: Clone> RouterCore<I> {
    /// Configures percent-decoding of captured parameters (functional builder)
    pub fn with_parameter_decoding(mut self, decode_parameters: bool) -> Self {
        self.decode_parameters = decode_parameters;
        self
    }

    /// Applies the matching-related options of a [`RouterConfig`]
    pub fn with_config(self, config: &RouterConfig) -> Self {
        self.with_parameter_decoding(config.decode_parameters)
    }

    /// Compiles `pattern` into the graph under a caller-chosen identifier
    ///
    /// Vertices that already carry an identifier keep it, so where two
    /// patterns share a terminal the first registration wins.
    pub fn register_with(&mut self, pattern: &str, identifier: I) -> Result<(), PatternRegisterError> {
        let tokens = tokenize_pattern(pattern);
        if let Err(err) = validate(&tokens) {
            warn!(pattern, error = %err, "rejected routing pattern");
            return Err(err);
        }

        let mut staged = self.graph.clone();
        if let Err(err) = PatternCompiler::new(&mut staged, &tokens, identifier).compile() {
            warn!(pattern, error = %err, "failed to compile routing pattern");
            return Err(err);
        }

        self.graph = staged;
        debug!(pattern, vertices = self.graph.len(), "registered routing pattern");
        Ok(())
    }

    /// Matches an extracted URL path; never fails, only misses
    pub fn match_path(&self, path: &str) -> Option<MatchedRoute<I>> {
        let matched = Matcher::new(&self.graph)
            .with_decoding(self.decode_parameters)
            .match_path(path);
        if matched.is_none() {
            debug!(path, "no route matched");
        }
        matched
    }

    pub fn graph(&self) -> &RoutingGraph<I> {
        &self.graph
    }
}

impl RouterCore<String> {
    /// Creates an empty core keyed by pattern text
    ///
    /// Use `RouterCore::<I>::default()` for other identifier types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `pattern` using its own text as the identifier
    pub fn register(&mut self, pattern: &str) -> Result<(), PatternRegisterError> {
        self.register_with(pattern, pattern.to_string())
    }

    /// Builds a core from a route manifest
    ///
    /// Routes register in manifest order; the first rejected pattern aborts.
    ///
    /// # Examples
    ///
    /// ```
    /// use deeplink_router::{Config, RouterCore};
    ///
    /// let config = Config::from_toml_str(r#"
    ///     [[routes]]
    ///     pattern = "/band/:band_id/product"
    ///     name = "band-product"
    /// "#).unwrap();
    ///
    /// let core = RouterCore::from_config(&config).unwrap();
    /// let matched = core.match_path("/band/20/product").unwrap();
    /// assert_eq!(matched.pattern_identifier, "band-product");
    /// ```
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut core = Self::new().with_config(&config.router);
        for route in &config.routes {
            core.register_with(&route.pattern, route.identifier().to_string())
                .with_context(|| format!("Failed to register route pattern: {}", route.pattern))?;
        }
        Ok(core)
    }
}

impl<I: fmt::Debug> fmt::Display for RouterCore<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.graph, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_failed_registration_leaves_graph_untouched() {
        let mut core = RouterCore::new();
        core.register("/foo/bar").unwrap();
        let before = core.graph().len();

        // Fails after the Slash edge and "baz" were already laid down.
        assert_eq!(
            core.register("/baz(/a)/b"),
            Err(PatternRegisterError::UnexpectedToken {
                after: "/baz(/a)".to_string()
            })
        );
        assert_eq!(core.graph().len(), before);
        assert!(core.match_path("/baz").is_none());
    }

    #[test]
    fn test_custom_identifiers() {
        let mut core: RouterCore<u32> = RouterCore::default();
        core.register_with("/home", 1).unwrap();
        core.register_with("/about", 2).unwrap();
        assert_eq!(core.match_path("/about").map(|m| m.pattern_identifier), Some(2));
    }

    #[test]
    fn test_from_config_reports_pattern() {
        let config = Config::from_toml_str("[[routes]]\npattern = \"no-slash\"").unwrap();
        let err = RouterCore::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("no-slash"));
    }

    #[test]
    fn test_display_renders_graph() {
        let mut core = RouterCore::new();
        core.register("/a").unwrap();
        assert_eq!(core.to_string(), "<root>\n  \"/\"\n    \"a\" => \"/a\"\n");
    }
}
