pub mod data;
pub mod defaults;
pub mod io;
pub mod printing;


use std::path::PathBuf;
use thiserror::Error;

pub use data::{Config, ConfigKey};
pub use defaults::{ResolvedSettings, SettingsOverrides, BASE_URL_ENV, DEFAULT_BASE_URL};

use data::path_display;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {}: {source}", path_display(.path))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {}: {source}", path_display(.path))]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config at {}: {source}", path_display(.path))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Could not determine a configuration directory")]
    NoConfigDir,

    #[error("Unknown config key '{0}'")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: ConfigKey, reason: String },
}
