//! Handler dispatch over a [`RouterCore`]
//!
//! `Router` accepts whole URLs (custom schemes included), matches the path
//! through the core and calls the handler registered for the winning
//! pattern. Query pairs are folded into the captured parameters.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use tracing::debug;
use url::Url;

use crate::config::{Config, RouterConfig};
use crate::error::PatternRegisterError;
use crate::router::RouterCore;

/// Base used to resolve bare paths such as `/band/20`
static BASE_URL: Lazy<Url> = Lazy::new(|| {
    Url::parse("route://localhost/").unwrap()
});

type MatchHandler<C> = Box<dyn Fn(MatchResult<C>) + Send + Sync>;
type UnmatchHandler<C> = Box<dyn Fn(&str, Option<C>) + Send + Sync>;

/// What a matched handler receives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult<C> {
    /// The parsed URL that was dispatched
    pub url: Url,
    /// Path captures merged with the query pairs
    pub parameters: HashMap<String, String>,
    /// Caller-supplied context, passed through untouched
    pub context: Option<C>,
}

/// URL router with per-pattern handlers
///
/// # Examples
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use deeplink_router::Router;
///
/// let seen = Arc::new(Mutex::new(None));
/// let sink = Arc::clone(&seen);
///
/// let mut router: Router<&str> = Router::new();
/// router
///     .register("/band/:band_id/product", move |result| {
///         *sink.lock().unwrap() = result.parameters.get("band_id").cloned();
///     })
///     .unwrap();
///
/// assert!(router.match_url("myapp://open/band/20/product", Some("ctx")));
/// assert_eq!(seen.lock().unwrap().as_deref(), Some("20"));
/// assert!(!router.match_url("/band/20", None));
/// ```
pub struct Router<C = ()> {
    core: RouterCore<String>,
    handlers: HashMap<String, MatchHandler<C>>,
    default_unmatch_handler: Option<UnmatchHandler<C>>,
    options: RouterConfig,
}

impl<C> Default for Router<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Router<C> {
    pub fn new() -> Self {
        Self {
            core: RouterCore::new(),
            handlers: HashMap::new(),
            default_unmatch_handler: None,
            options: RouterConfig::default(),
        }
    }

    /// Sets the handler called for URLs no pattern matches
    pub fn with_unmatch_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str, Option<C>) + Send + Sync + 'static,
    {
        self.default_unmatch_handler = Some(Box::new(handler));
        self
    }

    /// Applies decoding and query-merge options
    pub fn with_config(mut self, options: RouterConfig) -> Self {
        self.core = self.core.with_config(&options);
        self.options = options;
        self
    }

    /// Takes the `[router]` options of a manifest
    ///
    /// Routes listed in the manifest have no handlers attached, so they are
    /// not registered here; use [`RouterCore::from_config`] for lookup-only
    /// routing.
    pub fn from_config(config: &Config) -> Self {
        Self::new().with_config(config.router.clone())
    }

    /// Registers `pattern` and binds `handler` to it
    ///
    /// Registering the same pattern text again only replaces its handler;
    /// the graph already holds the pattern.
    pub fn register<F>(&mut self, pattern: &str, handler: F) -> Result<(), PatternRegisterError>
    where
        F: Fn(MatchResult<C>) + Send + Sync + 'static,
    {
        if let Some(bound) = self.handlers.get_mut(pattern) {
            debug!(pattern, "replacing handler");
            *bound = Box::new(handler);
            return Ok(());
        }

        self.core.register(pattern)?;
        self.handlers.insert(pattern.to_string(), Box::new(handler));
        Ok(())
    }

    /// Dispatches `input`, falling back to the default unmatch handler
    ///
    /// Returns whether a pattern handler ran.
    pub fn match_url(&self, input: &str, context: Option<C>) -> bool {
        self.match_url_with(input, context, |url, context| {
            if let Some(handler) = &self.default_unmatch_handler {
                handler(url, context);
            }
        })
    }

    /// Dispatches `input`, calling `unmatch_handler` instead of the default
    /// one when nothing matches
    pub fn match_url_with<F>(&self, input: &str, context: Option<C>, unmatch_handler: F) -> bool
    where
        F: FnOnce(&str, Option<C>),
    {
        let Some(url) = parse_url(input) else {
            debug!(url = input, "unparseable url");
            unmatch_handler(input, context);
            return false;
        };

        let Some(matched) = self.core.match_path(url.path()) else {
            debug!(url = input, "no route matched url");
            unmatch_handler(input, context);
            return false;
        };

        let Some(handler) = self.handlers.get(&matched.pattern_identifier) else {
            debug!(url = input, pattern = %matched.pattern_identifier, "no handler bound");
            unmatch_handler(input, context);
            return false;
        };

        let mut parameters = matched.parameters;
        if self.options.merge_query {
            let query = query_parameters(&url);
            if self.options.query_overrides_path {
                parameters.extend(query);
            } else {
                for (name, value) in query {
                    parameters.entry(name).or_insert(value);
                }
            }
        }

        handler(MatchResult {
            url,
            parameters,
            context,
        });
        true
    }

    pub fn core(&self) -> &RouterCore<String> {
        &self.core
    }
}

impl<C> fmt::Display for Router<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.core, f)
    }
}

impl<C> fmt::Debug for Router<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("core", &self.core)
            .field("handlers", &self.handlers.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Decoded query pairs of `url`; for repeated names the last value wins
pub fn query_parameters(url: &Url) -> HashMap<String, String> {
    url.query_pairs()
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect()
}

/// Absolute URLs parse as-is; anything else resolves against [`BASE_URL`]
fn parse_url(input: &str) -> Option<Url> {
    if input.is_empty() {
        return None;
    }
    match Url::parse(input) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => BASE_URL.join(input).ok(),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_parse_url_resolves_bare_paths() {
        assert_eq!(parse_url("/band/20").unwrap().path(), "/band/20");
        assert_eq!(parse_url("myapp://host/band/20").unwrap().path(), "/band/20");
        assert!(parse_url("").is_none());
    }

    #[test]
    fn test_query_parameters_decode() {
        let url = parse_url("/search?q=caf%C3%A9&page=2&page=3").unwrap();
        let query = query_parameters(&url);
        assert_eq!(query.get("q"), Some(&"café".to_string()));
        assert_eq!(query.get("page"), Some(&"3".to_string()));
    }

    #[test]
    fn test_path_parameter_wins_by_default() {
        let seen = Arc::new(Mutex::new(HashMap::new()));
        let sink = Arc::clone(&seen);

        let mut router: Router = Router::new();
        router
            .register("/band/:band_id", move |result| {
                *sink.lock().unwrap() = result.parameters;
            })
            .unwrap();

        assert!(router.match_url("/band/20?band_id=99&tab=info", None));
        let parameters = seen.lock().unwrap().clone();
        assert_eq!(parameters.get("band_id"), Some(&"20".to_string()));
        assert_eq!(parameters.get("tab"), Some(&"info".to_string()));
    }

    #[test]
    fn test_query_can_override_path() {
        let seen = Arc::new(Mutex::new(HashMap::new()));
        let sink = Arc::clone(&seen);

        let options = RouterConfig {
            query_overrides_path: true,
            ..RouterConfig::default()
        };
        let mut router: Router = Router::new().with_config(options);
        router
            .register("/band/:band_id", move |result| {
                *sink.lock().unwrap() = result.parameters;
            })
            .unwrap();

        assert!(router.match_url("/band/20?band_id=99", None));
        assert_eq!(seen.lock().unwrap().get("band_id"), Some(&"99".to_string()));
    }

    #[test]
    fn test_query_merge_can_be_disabled() {
        let seen = Arc::new(Mutex::new(HashMap::new()));
        let sink = Arc::clone(&seen);

        let options = RouterConfig {
            merge_query: false,
            ..RouterConfig::default()
        };
        let mut router: Router = Router::new().with_config(options);
        router
            .register("/band/:band_id", move |result| {
                *sink.lock().unwrap() = result.parameters;
            })
            .unwrap();

        assert!(router.match_url("/band/20?tab=info", None));
        assert!(!seen.lock().unwrap().contains_key("tab"));
    }

    #[test]
    fn test_call_site_unmatch_handler_replaces_default() {
        let default_calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&default_calls);

        let router: Router<u8> = Router::new().with_unmatch_handler(move |_, _| {
            *counter.lock().unwrap() += 1;
        });

        let mut local = None;
        assert!(!router.match_url_with("/nowhere", Some(7), |url, context| {
            local = Some((url.to_string(), context));
        }));
        assert_eq!(local, Some(("/nowhere".to_string(), Some(7))));
        assert_eq!(*default_calls.lock().unwrap(), 0);

        assert!(!router.match_url("/nowhere", None));
        assert_eq!(*default_calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_reregistering_optional_pattern_swaps_handler() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let first = Arc::clone(&calls);
        let second = Arc::clone(&calls);

        let mut router: Router = Router::new();
        router
            .register("/articles(.:format)", move |_| first.lock().unwrap().push("first"))
            .unwrap();
        let vertices = router.core().graph().len();

        router
            .register("/articles(.:format)", move |_| second.lock().unwrap().push("second"))
            .unwrap();
        assert_eq!(router.core().graph().len(), vertices);

        assert!(router.match_url("/articles.json", None));
        assert_eq!(*calls.lock().unwrap(), vec!["second"]);
    }

    #[test]
    fn test_register_error_binds_no_handler() {
        let mut router: Router = Router::new();
        assert_eq!(
            router.register("no-slash", |_| {}),
            Err(PatternRegisterError::MissingPrefixSlash)
        );
        assert!(router.handlers.is_empty());
    }
}
