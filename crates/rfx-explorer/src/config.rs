//! Explorer configuration.
//!
//! A TOML file with three optional sections, overridable from the command
//! line. No environment variables are consulted.
//!
//! ```toml
//! [reflection]
//! base_url = "http://127.0.0.1:3000"
//! access_token = "..."
//!
//! [tree]
//! indent_width = 2
//! stale_responses = "latest-activation"   # or "last-resolved"
//!
//! [logging]
//! level = "info"
//! file = "/tmp/reflection-explorer.log"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use rfx_hierarchy::{HierarchyRenderer, StalePolicy, DEFAULT_INDENT_WIDTH};
use rfx_network::http::DEFAULT_BASE_URL;
use rfx_network::HttpGatewayConfig;

const APP_DIR: &str = "reflection-explorer";
const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "explorer.log";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid log level '{0}' (expected trace, debug, info, warn or error)")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub reflection: ReflectionConfig,
    pub tree: TreeConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectionConfig {
    pub base_url: String,
    pub access_token: Option<String>,
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub indent_width: usize,
    pub stale_responses: StalePolicy,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            stale_responses: StalePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn level(&self) -> Result<tracing::Level, ConfigError> {
        parse_log_level(&self.level)
    }

    /// Log destination; the terminal belongs to the UI.
    pub fn file_path(&self) -> PathBuf {
        if let Some(file) = &self.file {
            return file.clone();
        }
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR)
            .join(LOG_FILE)
    }
}

/// Values given on the command line; `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub access_token: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

pub fn parse_log_level(level: &str) -> Result<tracing::Level, ConfigError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(tracing::Level::TRACE),
        "debug" => Ok(tracing::Level::DEBUG),
        "info" => Ok(tracing::Level::INFO),
        "warn" => Ok(tracing::Level::WARN),
        "error" => Ok(tracing::Level::ERROR),
        _ => Err(ConfigError::InvalidLogLevel(level.to_string())),
    }
}

impl ExplorerConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    pub fn from_toml_str(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents, path)
    }

    /// An explicit path must exist; the default location is optional.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.base_url {
            self.reflection.base_url = base_url;
        }
        if let Some(token) = overrides.access_token {
            self.reflection.access_token = Some(token);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(file) = overrides.log_file {
            self.logging.file = Some(file);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging.level()?;
        Ok(())
    }

    pub fn gateway_config(&self) -> HttpGatewayConfig {
        HttpGatewayConfig {
            base_url: self.reflection.base_url.clone(),
            access_token: self.reflection.access_token.clone(),
        }
    }

    pub fn renderer(&self) -> HierarchyRenderer {
        HierarchyRenderer::new(self.tree.indent_width)
    }
}
