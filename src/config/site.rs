//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::helpers::is_valid_date_format;

/// Environment variable selecting the build environment
pub const ENV_VAR: &str = "FOLIO_ENV";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub index_title: String,

    // URL
    /// Path prefix applied to internal links in production
    pub base_path: String,
    pub blog_dir: String,

    // Directory
    pub content_dir: String,
    /// Posts directory, relative to `content_dir`
    pub posts_dir: String,
    pub templates_dir: String,
    pub styles_dir: String,
    pub public_dir: String,

    // Date format (strftime)
    pub date_format: String,

    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Site".to_string(),
            index_title: "Blog Posts".to_string(),

            base_path: String::new(),
            blog_dir: "blog".to_string(),

            content_dir: "content".to_string(),
            posts_dir: "posts".to_string(),
            templates_dir: "templates".to_string(),
            styles_dir: "styles".to_string(),
            public_dir: "public".to_string(),

            date_format: "%B %-d, %Y".to_string(),

            highlight: HighlightConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {:?}", path))?;
        if !is_valid_date_format(&config.date_format) {
            anyhow::bail!(
                "Invalid date_format {:?} in {:?}",
                config.date_format,
                path
            );
        }
        Ok(config)
    }

    /// Base URL for generated links in the given environment
    pub fn base_url(&self, env: Environment) -> String {
        match env {
            Environment::Development => String::new(),
            Environment::Production => {
                let trimmed = self.base_path.trim_matches('/');
                if trimmed.is_empty() {
                    String::new()
                } else {
                    format!("/{}", trimmed)
                }
            }
        }
    }
}

/// Which base URL the site is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Interpret a raw environment value; only "production" selects production
    pub fn from_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    /// Read the environment from `FOLIO_ENV`
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(ENV_VAR).ok().as_deref())
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: false,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Development server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 3001,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.public_dir, "public");
        assert_eq!(config.server.port, 3001);
        assert!(!config.highlight.enable);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Notebook
base_path: /notebook/
server:
  port: 8080
highlight:
  enable: true
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Notebook");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.ip, "localhost");
        assert!(config.highlight.enable);
        assert_eq!(config.index_title, "Blog Posts");
    }

    #[test]
    fn test_load_rejects_invalid_date_format() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("_config.yml");
        fs::write(&path, "date_format: \"%Q\"\n").unwrap();

        let err = SiteConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("date_format"));

        fs::write(&path, "date_format: \"%Y-%m-%d\"\n").unwrap();
        assert_eq!(SiteConfig::load(&path).unwrap().date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_base_url_per_environment() {
        let config = SiteConfig {
            base_path: "/notebook/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(Environment::Development), "");
        assert_eq!(config.base_url(Environment::Production), "/notebook");

        let root = SiteConfig::default();
        assert_eq!(root.base_url(Environment::Production), "");
    }

    #[test]
    fn test_environment_from_value() {
        assert_eq!(
            Environment::from_value(Some("production")),
            Environment::Production
        );
        assert_eq!(
            Environment::from_value(Some("Production ")),
            Environment::Production
        );
        assert_eq!(
            Environment::from_value(Some("staging")),
            Environment::Development
        );
        assert_eq!(Environment::from_value(None), Environment::Development);
    }
}
