use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Environment variable that overrides the configured backend URL.
pub const API_URL_ENV: &str = "PUBLIC_API_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the wiki backend, without a trailing slash.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Allow `$VAR` references in the URL
        config.api_url = Self::expand(&config.api_url).unwrap_or(config.api_url);
        config.api_url = normalize_url(&config.api_url);

        Ok(Some(config))
    }

    /// Resolves the effective configuration.
    ///
    /// Precedence: `PUBLIC_API_URL`, then the config file at `config_path`
    /// (or the default location), then [`DEFAULT_API_URL`].
    pub fn resolve(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_url = std::env::var(API_URL_ENV).ok();
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_path);
        Self::resolve_with(env_url.as_deref(), &path)
    }

    fn resolve_with(env_url: Option<&str>, config_path: &Path) -> Result<Self, ConfigError> {
        if let Some(url) = env_url.map(str::trim).filter(|url| !url.is_empty()) {
            log::info!("Using API URL from {API_URL_ENV}: {url}");
            return Ok(Self {
                api_url: normalize_url(url),
            });
        }

        match Self::load_from_path(config_path)? {
            Some(config) => {
                log::info!("Loaded config from {}", config_path.display());
                Ok(config)
            }
            None => {
                log::info!("No config file at {}, using defaults", config_path.display());
                Ok(Self::default())
            }
        }
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/wikinote");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand(value: &str) -> Option<String> {
        shellexpand::env(value).ok().map(|expanded| expanded.into_owned())
    }
}

/// Trims whitespace and trailing slashes so paths can be appended directly.
pub fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
