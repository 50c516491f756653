//! Application configuration.
//!
//! [`AppConfig::load`] layers, lowest priority first: the embedded defaults,
//! an optional TOML file, then `EXTRACTOR_*` environment variables
//! (`EXTRACTOR_MODEL__API_KEY`, `EXTRACTOR_SERVER__PORT`, ...). The plain
//! `GEMINI_API_KEY` variable is used when no api key was configured otherwise.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Application-level constants
pub const APP_NAME: &str = "patient-extractor";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const ENV_PREFIX: &str = "EXTRACTOR";
const FALLBACK_API_KEY_VAR: &str = "GEMINI_API_KEY";
const DEFAULT_CONFIG_NAME: &str = "extractor";

const DEFAULT_CONFIG: &str = r#"
[server]
host             = "0.0.0.0"
port             = 8000
data_dir         = "."
max_upload_bytes = 5242880

[model]
api_key      = ""
model        = "gemini-2.5-flash"
base_url     = "https://generativelanguage.googleapis.com"
timeout_secs = 120
"#;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,patient_extractor=debug"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("No model api key configured (set GEMINI_API_KEY or EXTRACTOR_MODEL__API_KEY)")]
    MissingApiKey,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base directory for relative transcript paths.
    pub data_dir: PathBuf,
    pub max_upload_bytes: usize,
}

/// `[model]` section.
#[derive(Clone, Deserialize)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AppConfig {
    /// Load defaults → config file → environment, then validate.
    ///
    /// An explicit `path` must exist; otherwise `extractor.toml` in the
    /// working directory is read when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file_source = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let mut cfg: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(file_source)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        if cfg.model.api_key.is_empty() {
            if let Ok(key) = std::env::var(FALLBACK_API_KEY_VAR) {
                cfg.model.api_key = key;
            }
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Built-in defaults layered with a TOML string, without touching the
    /// filesystem or the environment. Not validated.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
