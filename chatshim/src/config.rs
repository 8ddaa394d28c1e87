//! Service configuration.
//!
//! Settings are resolved in three layers:
//! 1. Default values
//! 2. Config file (`chatshim.toml`, or the path in `CHATSHIM_CONFIG`)
//! 3. Environment variables (`CHATSHIM_MODEL`, `CHATSHIM_MAX_TOKENS`,
//!    `CHATSHIM_DEFAULT_PROMPT_TYPE`)
//!
//! The result is loaded once and shared read-only behind an `Arc`.
//!
//! ```toml
//! [api]
//! default_model = "gpt-4o-mini"
//! max_tokens = 1024
//! default_prompt_type = "standardAssistant"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "CHATSHIM_CONFIG";
/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "chatshim.toml";

/// Model used when no model is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Prompt type used when no default prompt type is configured.
pub const DEFAULT_PROMPT_TYPE: &str = "standardAssistant";

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Chat-completion API settings.
    #[serde(default)]
    pub api: ApiConfig,
}

/// Model parameters and prompt selection for chat-completion calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Upper bound on generated tokens. `None` or `0` leaves it to the provider.
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Prompt type used when a request does not name one.
    #[serde(default = "default_prompt_type")]
    pub default_prompt_type: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_owned()
}

fn default_prompt_type() -> String {
    DEFAULT_PROMPT_TYPE.to_owned()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            max_tokens: None,
            default_prompt_type: default_prompt_type(),
        }
    }
}

impl ApiConfig {
    /// The model to request, falling back to [`DEFAULT_MODEL`] when blank.
    #[must_use]
    pub fn model(&self) -> &str {
        if self.default_model.trim().is_empty() {
            DEFAULT_MODEL
        } else {
            &self.default_model
        }
    }

    /// The token limit to send, if any. Zero counts as unset.
    #[must_use]
    pub fn max_tokens(&self) -> Option<u32> {
        self.max_tokens.filter(|&n| n > 0)
    }
}

impl AppConfig {
    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the text is not a valid config document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a file. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "loaded config file");

        Ok(config)
    }

    /// Load configuration from the default location, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file or an override is invalid.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(config_path())?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from an environment-like lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `CHATSHIM_MAX_TOKENS` is not an integer.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("CHATSHIM_MODEL") {
            self.api.default_model = model;
        }
        if let Some(raw) = lookup("CHATSHIM_MAX_TOKENS") {
            let tokens = raw
                .trim()
                .parse::<u32>()
                .map_err(|e| Error::config(format!("CHATSHIM_MAX_TOKENS={raw}: {e}")))?;
            self.api.max_tokens = Some(tokens);
        }
        if let Some(prompt_type) = lookup("CHATSHIM_DEFAULT_PROMPT_TYPE") {
            self.api.default_prompt_type = prompt_type;
        }
        Ok(())
    }
}

/// Path of the config file, honoring [`CONFIG_PATH_ENV`].
#[must_use]
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}
