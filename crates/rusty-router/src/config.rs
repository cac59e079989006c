// File: src/config.rs
// Purpose: Router configuration parsing from rusty-router.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::RouterError;

/// Router configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Mount prefix applied to every browser URL (e.g. "/frontend").
    /// Trailing slashes are ignored and "/" means no prefix.
    #[serde(default)]
    pub base_path: String,

    /// Root marker every module address starts with (default: "/app")
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,

    /// File stem of page modules (default: "page")
    #[serde(default = "default_page_file")]
    pub page_file: String,

    /// File stem of layout modules (default: "layout")
    #[serde(default = "default_layout_file")]
    pub layout_file: String,

    /// File stem of not-found modules (default: "not-found")
    #[serde(default = "default_not_found_file")]
    pub not_found_file: String,

    /// Rank routes with more literal segments first when catch-all presence
    /// and parameter count tie (default: false)
    #[serde(default)]
    pub strict_specificity: bool,
}

fn default_route_prefix() -> String {
    "/app".to_string()
}

fn default_page_file() -> String {
    "page".to_string()
}

fn default_layout_file() -> String {
    "layout".to_string()
}

fn default_not_found_file() -> String {
    "not-found".to_string()
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            route_prefix: default_route_prefix(),
            page_file: default_page_file(),
            layout_file: default_layout_file(),
            not_found_file: default_not_found_file(),
            strict_specificity: false,
        }
    }
}

impl RouterConfig {
    /// Load configuration from a TOML file
    ///
    /// A missing or empty file yields the default configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read router config: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse router config: {:?}", path))
    }

    /// Load configuration from default path (./rusty-router.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("rusty-router.toml")
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: RouterConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the mount prefix
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Sets the root marker of module addresses
    pub fn with_route_prefix(mut self, route_prefix: impl Into<String>) -> Self {
        self.route_prefix = route_prefix.into();
        self
    }

    pub fn with_strict_specificity(mut self, strict: bool) -> Self {
        self.strict_specificity = strict;
        self
    }

    /// Checks the invariants the compiler relies on
    pub fn validate(&self) -> Result<(), RouterError> {
        if !self.route_prefix.starts_with('/') {
            return Err(RouterError::Config(format!(
                "route_prefix must start with '/', got {:?}",
                self.route_prefix
            )));
        }

        let stems = [
            ("page_file", &self.page_file),
            ("layout_file", &self.layout_file),
            ("not_found_file", &self.not_found_file),
        ];
        for (field, stem) in stems {
            if stem.is_empty() || stem.contains('/') {
                return Err(RouterError::Config(format!(
                    "{} must be a bare file stem, got {:?}",
                    field, stem
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default();
        assert_eq!(config.base_path, "");
        assert_eq!(config.route_prefix, "/app");
        assert_eq!(config.page_file, "page");
        assert_eq!(config.layout_file, "layout");
        assert!(!config.strict_specificity);
    }

    #[test]
    fn test_empty_config() {
        let config = RouterConfig::from_toml_str("  \n").unwrap();
        assert_eq!(config, RouterConfig::default());
    }

    #[test]
    fn test_custom_config() {
        let toml = r#"
            base_path = "/frontend/"
            route_prefix = "/src/routes"
            strict_specificity = true
        "#;
        let config = RouterConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.base_path, "/frontend/");
        assert_eq!(config.route_prefix, "/src/routes");
        assert_eq!(config.page_file, "page");
        assert!(config.strict_specificity);
    }

    #[test]
    fn test_invalid_route_prefix() {
        let err = RouterConfig::from_toml_str(r#"route_prefix = "app""#).unwrap_err();
        assert!(err.to_string().contains("route_prefix"));
    }

    #[test]
    fn test_invalid_stem() {
        let config = RouterConfig {
            page_file: "pages/page".to_string(),
            ..RouterConfig::default()
        };
        assert!(matches!(config.validate(), Err(RouterError::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let config = RouterConfig::load("/definitely/not/here/rusty-router.toml").unwrap();
        assert_eq!(config, RouterConfig::default());
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!(
            "rusty-router-config-{}.toml",
            std::process::id()
        ));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, r#"base_path = "/admin""#).unwrap();

        let config = RouterConfig::load(&path).unwrap();
        assert_eq!(config.base_path, "/admin");

        fs::remove_file(&path).unwrap();
    }
}
