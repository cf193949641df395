// File: src/config.rs
// Purpose: Configuration parsing from wiki.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default config file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "wiki.toml";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub templates: TemplateConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Where page files live
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Directory holding `<title>.txt` files (default: working directory)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// Template source
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TemplateConfig {
    /// Directory with `view.html` and `edit.html`; compiled-in templates when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl ServerConfig {
    /// Socket address to bind. `host` may be an IP literal or a name such as
    /// `localhost`; the first resolved address wins.
    pub async fn resolve(&self) -> Result<SocketAddr> {
        let target = format!("{}:{}", self.host, self.port);
        tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("Invalid listen address: {}", target))?
            .next()
            .with_context(|| format!("No address found for {}", target))
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load from `$WIKI_CONFIG` (or ./wiki.toml), then apply environment overrides
    pub fn from_env() -> Result<Self> {
        let path = std::env::var("WIKI_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override fields from `WIKI_HOST`, `WIKI_PORT`, `WIKI_DATA_DIR` and `WIKI_TEMPLATE_DIR`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup("WIKI_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("WIKI_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid WIKI_PORT: {:?}", port))?;
        }
        if let Some(dir) = lookup("WIKI_DATA_DIR") {
            self.storage.data_dir = dir.into();
        }
        if let Some(dir) = lookup("WIKI_TEMPLATE_DIR") {
            self.templates.dir = Some(dir.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.data_dir, PathBuf::from("."));
        assert_eq!(config.templates.dir, None);
    }

    #[tokio::test]
    async fn test_default_listen_address() {
        let addr = Config::default().server.resolve().await.unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:8080");
    }

    #[tokio::test]
    async fn test_host_name_resolves() {
        let server = ServerConfig {
            host: "localhost".to_string(),
            port: 8081,
        };
        let addr = server.resolve().await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 8081);
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_error() {
        let server = ServerConfig {
            host: "not a host".to_string(),
            port: 8080,
        };
        assert!(server.resolve().await.is_err());
    }

    #[test]
    fn test_empty_config() {
        let config = toml::from_str::<Config>("").unwrap_or_default();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [server]
            port = 9090

            [templates]
            dir = "templates"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.templates.dir, Some(PathBuf::from("templates")));
        assert_eq!(config.storage.data_dir, PathBuf::from("."));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wiki.toml");
        fs::write(&path, "[server]\nport = \"eighty\"").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }

    #[tokio::test]
    async fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("WIKI_HOST", "127.0.0.1"),
            ("WIKI_PORT", "3000"),
            ("WIKI_DATA_DIR", "/srv/wiki"),
            ("WIKI_TEMPLATE_DIR", "tmpl"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.resolve().await.unwrap().to_string(), "127.0.0.1:3000");
        assert_eq!(config.storage.data_dir, PathBuf::from("/srv/wiki"));
        assert_eq!(config.templates.dir, Some(PathBuf::from("tmpl")));
    }

    #[test]
    fn test_bad_port_override() {
        let mut config = Config::default();
        assert!(config
            .apply_overrides(|key| (key == "WIKI_PORT").then(|| "http".to_string()))
            .is_err());
    }
}
