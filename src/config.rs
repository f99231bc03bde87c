//! Configuration management for Synapse
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, SynapseError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Synapse
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Session token storage settings
    #[serde(default)]
    pub session: SessionConfig,
    /// Interactive chat settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend, without a trailing `/api`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Where the session token is persisted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenBackend {
    /// JSON file in the user's data directory
    #[default]
    File,
    /// OS native credential store
    Keyring,
    /// Process memory only; nothing survives the invocation
    Memory,
}

impl TokenBackend {
    /// Parse a backend name ("file", "keyring" or "memory")
    pub fn parse_str(s: &str) -> std::result::Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "keyring" => Ok(Self::Keyring),
            "memory" => Ok(Self::Memory),
            other => Err(format!("Unknown token backend: {}", other)),
        }
    }
}

/// Session token storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Token storage backend
    #[serde(default)]
    pub backend: TokenBackend,

    /// Fixed key the token is stored under
    #[serde(default = "default_token_key")]
    pub token_key: String,

    /// Override for the file store location
    #[serde(default)]
    pub token_path: Option<PathBuf>,
}

fn default_token_key() -> String {
    "synapse_token".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: TokenBackend::default(),
            token_key: default_token_key(),
            token_path: None,
        }
    }
}

/// Interactive chat configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Print the time next to each message
    #[serde(default = "default_show_timestamps")]
    pub show_timestamps: bool,

    /// Number of entries kept in the readline history
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

fn default_show_timestamps() -> bool {
    true
}

fn default_history_size() -> usize {
    100
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            show_timestamps: default_show_timestamps(),
            history_size: default_history_size(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &Path, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    /// Default location of the configuration file
    ///
    /// `$CONFIG_DIR/synapse/config.yaml`, falling back to `config.yaml` in
    /// the working directory when no home directory can be determined.
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("com", "synapse", "synapse")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
            .unwrap_or_else(|| PathBuf::from("config.yaml"))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(SynapseError::Yaml)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(url) = std::env::var("SYNAPSE_API_URL") {
            self.api.base_url = url;
        }

        if let Ok(timeout) = std::env::var("SYNAPSE_TIMEOUT_SECONDS") {
            match timeout.parse() {
                Ok(secs) => self.api.timeout_seconds = secs,
                Err(_) => tracing::warn!("Ignoring invalid SYNAPSE_TIMEOUT_SECONDS: {}", timeout),
            }
        }

        if let Ok(backend) = std::env::var("SYNAPSE_TOKEN_BACKEND") {
            match TokenBackend::parse_str(&backend) {
                Ok(b) => self.session.backend = b,
                Err(e) => tracing::warn!("Ignoring SYNAPSE_TOKEN_BACKEND: {}", e),
            }
        }

        if let Ok(path) = std::env::var("SYNAPSE_TOKEN_PATH") {
            self.session.token_path = Some(PathBuf::from(path));
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(url) = &cli.api_url {
            self.api.base_url = url.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let base = self.api.base_url.trim();
        if base.is_empty() {
            return Err(SynapseError::Config("api.base_url cannot be empty".to_string()).into());
        }

        match url::Url::parse(base) {
            Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {}
            Ok(u) => {
                return Err(SynapseError::Config(format!(
                    "api.base_url must use http or https, got {}",
                    u.scheme()
                ))
                .into())
            }
            Err(e) => {
                return Err(
                    SynapseError::Config(format!("Invalid api.base_url {}: {}", base, e)).into(),
                )
            }
        }

        if self.api.timeout_seconds == 0 {
            return Err(SynapseError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.session.token_key.trim().is_empty() {
            return Err(
                SynapseError::Config("session.token_key cannot be empty".to_string()).into(),
            );
        }

        if self.chat.history_size == 0 {
            return Err(SynapseError::Config(
                "chat.history_size must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
