use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::ConfigError;
use crate::utils::url::validate_base_url;

/// Contents of `config.toml`. Every field is optional; unset fields fall
/// back to the environment or built-in defaults at resolution time.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the OpenAI-compatible adapter (e.g., "http://localhost:8000")
    pub base_url: Option<String>,
    /// Model to select after the listing loads, when the server offers it
    pub default_model: Option<String>,
    /// Prompt injected as the single system message of every request
    pub system_prompt: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Abort requests that take longer than this many seconds
    pub request_timeout_secs: Option<u64>,
}

/// Keys accepted by `set` and `unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    BaseUrl,
    DefaultModel,
    SystemPrompt,
    Temperature,
    MaxTokens,
    RequestTimeout,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 6] = [
        ConfigKey::BaseUrl,
        ConfigKey::DefaultModel,
        ConfigKey::SystemPrompt,
        ConfigKey::Temperature,
        ConfigKey::MaxTokens,
        ConfigKey::RequestTimeout,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::BaseUrl => "base-url",
            ConfigKey::DefaultModel => "default-model",
            ConfigKey::SystemPrompt => "system-prompt",
            ConfigKey::Temperature => "temperature",
            ConfigKey::MaxTokens => "max-tokens",
            ConfigKey::RequestTimeout => "request-timeout",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

impl Config {
    pub fn set_value(&mut self, key: ConfigKey, value: &str) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidValue { key, reason };
        match key {
            ConfigKey::BaseUrl => {
                self.base_url = Some(validate_base_url(value).map_err(invalid)?);
            }
            ConfigKey::DefaultModel => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(invalid("model id cannot be empty".to_string()));
                }
                self.default_model = Some(value.to_string());
            }
            ConfigKey::SystemPrompt => {
                if value.trim().is_empty() {
                    return Err(invalid("system prompt cannot be empty".to_string()));
                }
                self.system_prompt = Some(value.to_string());
            }
            ConfigKey::Temperature => {
                let parsed: f32 = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid(format!("'{value}' is not a number")))?;
                if !(0.0..=2.0).contains(&parsed) {
                    return Err(invalid("must be between 0 and 2".to_string()));
                }
                self.temperature = Some(parsed);
            }
            ConfigKey::MaxTokens => {
                let parsed: u32 = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid(format!("'{value}' is not a positive integer")))?;
                if parsed == 0 {
                    return Err(invalid("must be at least 1".to_string()));
                }
                self.max_tokens = Some(parsed);
            }
            ConfigKey::RequestTimeout => {
                let parsed: u64 = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid(format!("'{value}' is not a number of seconds")))?;
                if parsed == 0 {
                    return Err(invalid("must be at least 1 second".to_string()));
                }
                self.request_timeout_secs = Some(parsed);
            }
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::BaseUrl => self.base_url = None,
            ConfigKey::DefaultModel => self.default_model = None,
            ConfigKey::SystemPrompt => self.system_prompt = None,
            ConfigKey::Temperature => self.temperature = None,
            ConfigKey::MaxTokens => self.max_tokens = None,
            ConfigKey::RequestTimeout => self.request_timeout_secs = None,
        }
    }
}

/// Render a path with the home directory shortened to `~`.
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
