//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Environment variable consulted when no key is present in the config sources
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    pub connectivity: ConnectivityConfig,
    pub upload: UploadConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Remote generation capability configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct GeminiConfig {
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash-image-preview".to_string()
}

fn default_timeout() -> u64 {
    120000
}

/// Connectivity probe configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectivityConfig {
    #[serde(default = "default_probe_url")]
    pub probe_url: String,
    #[serde(default = "default_probe_timeout")]
    pub timeout_ms: u64,
}

fn default_probe_url() -> String {
    "https://www.gstatic.com/generate_204".to_string()
}

fn default_probe_timeout() -> u64 {
    3000
}

/// Upload configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    /// Files above this size are accepted but logged
    #[serde(default = "default_advisory_max_bytes")]
    pub advisory_max_bytes: usize,
}

fn default_advisory_max_bytes() -> usize {
    5 * 1024 * 1024
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
}

fn default_export_dir() -> String {
    "./renders".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// Credential for the remote generation capability
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(AppError::Config(config::ConfigError::Message(
                "API key cannot be empty".to_string(),
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/default.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("gemini.base_url", default_base_url())?
            .set_default("gemini.model", default_model())?
            .set_default("gemini.timeout_ms", default_timeout() as i64)?
            .set_default("connectivity.probe_url", default_probe_url())?
            .set_default("connectivity.timeout_ms", default_probe_timeout() as i64)?
            .set_default("upload.advisory_max_bytes", default_advisory_max_bytes() as i64)?
            .set_default("storage.export_dir", default_export_dir())?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?
            .add_source(File::with_name(path.as_ref().to_str().unwrap_or("config/default")).required(false))
            // Override with environment variables (prefixed with FLOORPLAN__)
            .add_source(
                Environment::with_prefix("FLOORPLAN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Server port cannot be 0".to_string(),
            )));
        }

        if self.gemini.model.trim().is_empty() {
            return Err(AppError::Config(config::ConfigError::Message(
                "Gemini model cannot be empty".to_string(),
            )));
        }

        if !self.gemini.base_url.starts_with("http://") && !self.gemini.base_url.starts_with("https://") {
            return Err(AppError::Config(config::ConfigError::Message(format!(
                "Gemini base URL '{}' must use http or https",
                self.gemini.base_url
            ))));
        }

        Ok(())
    }

    /// Resolve the credential from the settings, then from `GEMINI_API_KEY`.
    ///
    /// A missing key is fatal at startup.
    pub fn require_api_key(&self) -> Result<ApiKey> {
        self.resolve_api_key(std::env::var(API_KEY_ENV).ok())
    }

    fn resolve_api_key(&self, from_env: Option<String>) -> Result<ApiKey> {
        let candidate = self
            .gemini
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or(from_env);

        match candidate {
            Some(key) => ApiKey::new(key),
            None => Err(AppError::Config(config::ConfigError::Message(format!(
                "{} environment variable not set",
                API_KEY_ENV
            )))),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            gemini: GeminiConfig {
                api_key: None,
                base_url: default_base_url(),
                model: default_model(),
                timeout_ms: default_timeout(),
            },
            connectivity: ConnectivityConfig {
                probe_url: default_probe_url(),
                timeout_ms: default_probe_timeout(),
            },
            upload: UploadConfig {
                advisory_max_bytes: default_advisory_max_bytes(),
            },
            storage: StorageConfig {
                export_dir: default_export_dir(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
        }
    }
}
