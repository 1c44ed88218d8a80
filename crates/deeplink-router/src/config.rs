// File: src/config.rs
// Purpose: Route manifest and router options from routes.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Route manifest
///
/// ```toml
/// [router]
/// decode_parameters = true
/// merge_query = true
/// query_overrides_path = false
///
/// [[routes]]
/// pattern = "/articles(/page/:page)(.:format)"
/// name = "articles"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

/// Matching and dispatch options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Percent-decode captured parameters (default: true)
    #[serde(default = "default_true")]
    pub decode_parameters: bool,

    /// Merge decoded query pairs into the parameters on dispatch (default: true)
    #[serde(default = "default_true")]
    pub merge_query: bool,

    /// Let a query pair replace a path parameter of the same name (default: false)
    #[serde(default = "default_false")]
    pub query_overrides_path: bool,
}

/// One pattern to register
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub pattern: String,

    /// Identifier reported on match; the pattern text when absent
    #[serde(default)]
    pub name: Option<String>,
}

impl RouteEntry {
    pub fn identifier(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.pattern)
    }
}

// Default values
fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            decode_parameters: true,
            merge_query: true,
            query_overrides_path: false,
        }
    }
}

impl Config {
    /// Load configuration from a routes.toml file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read route manifest: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse route manifest: {:?}", path))
    }

    /// Load configuration from default path (./routes.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("routes.toml")
    }

    /// Parse a manifest held in memory; blank text yields the defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(content).context("Invalid route manifest")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.router.decode_parameters);
        assert!(config.router.merge_query);
        assert!(!config.router.query_overrides_path);
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_missing_file_yields_default() {
        let config = Config::load("does/not/exist/routes.toml").unwrap();
        assert!(config.routes.is_empty());
        assert_eq!(config.router, RouterConfig::default());
    }

    #[test]
    fn test_load_default_without_manifest() {
        // Tests run from the crate root, which ships no routes.toml.
        let config = Config::load_default().unwrap();
        assert_eq!(config.router, RouterConfig::default());
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_blank_manifest_yields_default() {
        let config = Config::from_toml_str("  \n").unwrap();
        assert_eq!(config.router, RouterConfig::default());
    }

    #[test]
    fn test_parse_manifest() {
        let config = Config::from_toml_str(
            r#"
            [router]
            merge_query = false

            [[routes]]
            pattern = "/articles(.:format)"
            name = "articles"

            [[routes]]
            pattern = "/band/:band_id"
            "#,
        )
        .unwrap();

        assert!(config.router.decode_parameters);
        assert!(!config.router.merge_query);
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].identifier(), "articles");
        assert_eq!(config.routes[1].identifier(), "/band/:band_id");
    }

    #[test]
    fn test_invalid_manifest_is_an_error() {
        assert!(Config::from_toml_str("[[routes]]\nname = 3").is_err());
    }
}
