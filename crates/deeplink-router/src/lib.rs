//! # Deeplink Router
//!
//! A trie-based URL router for deep links and in-app navigation:
//! - Static segments (`/about`)
//! - Named parameters (`/band/:band_id`)
//! - Single-segment globbing (`/files/*name`)
//! - Optional groups, nestable and chainable (`/articles(/page/:page)(.:format)`)
//! - Dot separators for formats (`/sprockets.js`)
//!
//! ## Pipeline
//!
//! Registration runs as a chain of pure stages before anything is mutated:
//! - **Scan** the pattern into tokens ([`pattern::PatternScanner`])
//! - **Validate** symbols, globbing and parenthesis balance ([`pattern::validate`])
//! - **Compile** into a staged copy of the [`RoutingGraph`], committed on success
//!
//! Matching scans the path ([`path::PathScanner`]) and walks the graph once,
//! preferring exact edges over parameter edges. No backtracking.
//!
//! ## Example
//!
//! ```
//! use deeplink_router::RouterCore;
//!
//! let mut core = RouterCore::new();
//! core.register("/band/:band_id/product").unwrap();
//! core.register("/sprockets.js").unwrap();
//!
//! let matched = core.match_path("/band/20/product").unwrap();
//! assert_eq!(matched.pattern_identifier, "/band/:band_id/product");
//! assert_eq!(matched.parameters.get("band_id"), Some(&"20".to_string()));
//!
//! assert!(core.match_path("/sprockets.js").is_some());
//! assert!(core.match_path("/band/21").is_none());
//! ```
//!
//! For whole URLs and handler callbacks see [`Router`].

// ============================================================================
// Module Declarations
// ============================================================================

mod config;
mod dispatch;
mod error;
mod graph;
mod matcher;
pub mod path;
pub mod pattern;
mod router;

// ============================================================================
// Public API
// ============================================================================

pub use config::{Config, RouteEntry, RouterConfig};
pub use dispatch::{query_parameters, MatchResult, Router};
pub use error::PatternRegisterError;
pub use graph::{ParameterEdge, RouteEdge, RoutingGraph, Vertex, VertexId};
pub use matcher::{MatchedRoute, Matcher};
pub use path::{tokenize_path, PathScanner, PathToken};
pub use pattern::{tokenize_pattern, validate, PatternToken};
pub use router::RouterCore;
