use std::time::Duration;

use tracing::debug;

use super::{Config, ConfigError, ConfigKey};
use crate::api::client::ClientSettings;
use crate::core::controller::{RequestOptions, DEFAULT_SYSTEM_PROMPT};
use crate::utils::url::validate_base_url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable that points the client at the API adapter.
pub const BASE_URL_ENV: &str = "API_URL";

/// Values given on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub base_url: Option<String>,
    pub model: Option<String>,
}

/// Everything needed to build a client and a session.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub client: ClientSettings,
    pub system_prompt: String,
    pub options: RequestOptions,
    pub preferred_model: Option<String>,
}

impl Config {
    /// Merge CLI overrides, the environment and this file.
    ///
    /// Base URL precedence: flag, `API_URL`, config file, built-in default.
    /// `env_base_url` is passed in rather than read here so callers decide
    /// where the environment comes from.
    pub fn resolve(
        &self,
        overrides: &SettingsOverrides,
        env_base_url: Option<String>,
    ) -> Result<ResolvedSettings, ConfigError> {
        let env_base_url = env_base_url.filter(|url| !url.trim().is_empty());
        let (source, raw_base_url) = if let Some(url) = overrides.base_url.clone() {
            ("flag", url)
        } else if let Some(url) = env_base_url {
            ("environment", url)
        } else if let Some(url) = self.base_url.clone() {
            ("config", url)
        } else {
            ("default", DEFAULT_BASE_URL.to_string())
        };

        let base_url =
            validate_base_url(&raw_base_url).map_err(|reason| ConfigError::InvalidValue {
                key: ConfigKey::BaseUrl,
                reason,
            })?;
        debug!(%base_url, source, "resolved base URL");

        Ok(ResolvedSettings {
            client: ClientSettings {
                base_url,
                request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            },
            system_prompt: self
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            options: RequestOptions {
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            },
            preferred_model: overrides
                .model
                .clone()
                .or_else(|| self.default_model.clone()),
        })
    }
}
