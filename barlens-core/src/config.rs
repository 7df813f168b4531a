//! BarLens configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. The LLM credential itself never lives in the file: the
//! config only names the environment variable that holds it.
//!
//! ```toml
//! [annotate]
//! marker_offset = 2.0
//! window = 200
//!
//! [delegate]
//! endpoint = "https://api.openai.com/v1/chat/completions"
//! model = "gpt-4o-mini"
//! api_key_env = "LLM_API_KEY"
//! max_tokens = 512
//! temperature = 0.2
//! timeout_secs = 30
//! sample_rows = 10
//! symbol = "TSLA"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::annotate::{MarkerPolicy, DEFAULT_MARKER_OFFSET};

/// Hard cap on the number of sample bars placed in a delegation prompt.
pub const MAX_SAMPLE_ROWS: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BarlensConfig {
    pub annotate: AnnotateConfig,
    pub delegate: DelegateConfig,
}

impl BarlensConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.annotate.validate()?;
        self.delegate.validate()
    }
}

/// Chart annotation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnnotateConfig {
    /// Price distance between a LONG/SHORT marker and the candle extreme.
    pub marker_offset: f64,
    /// Number of most recent bars to render.
    pub window: usize,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            marker_offset: DEFAULT_MARKER_OFFSET,
            window: 200,
        }
    }
}

impl AnnotateConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.marker_policy().map(|_| ())
    }

    pub fn marker_policy(&self) -> Result<MarkerPolicy, ConfigError> {
        MarkerPolicy::new(self.marker_offset).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "annotate.marker_offset must be finite and > 0, got {}",
                self.marker_offset
            ))
        })
    }
}

/// LLM delegation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DelegateConfig {
    /// Chat-completions endpoint (OpenAI-compatible).
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the bearer token.
    pub api_key_env: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout_secs: u64,
    /// Bars included in the prompt sample; capped at [`MAX_SAMPLE_ROWS`].
    pub sample_rows: usize,
    /// Instrument label used in prompts and answers.
    pub symbol: Option<String>,
}

impl Default for DelegateConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".into(),
            model: "gpt-4o-mini".into(),
            api_key_env: "LLM_API_KEY".into(),
            max_tokens: 512,
            temperature: 0.2,
            timeout_secs: 30,
            sample_rows: MAX_SAMPLE_ROWS,
            symbol: None,
        }
    }
}

impl DelegateConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("delegate.endpoint is empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("delegate.model is empty".into()));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::Invalid("delegate.max_tokens must be > 0".into()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "delegate.temperature must be in [0, 2], got {}",
                self.temperature
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("delegate.timeout_secs must be > 0".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn effective_sample_rows(&self) -> usize {
        self.sample_rows.min(MAX_SAMPLE_ROWS)
    }

    /// Read the credential from the configured environment variable.
    ///
    /// Blank values count as absent.
    pub fn resolve_credential(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
