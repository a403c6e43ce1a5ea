//! `set`, `unset` and `config` subcommands.

use std::error::Error;
use std::path::Path;

use crate::core::config::data::path_display;
use crate::core::config::{Config, ConfigKey};

pub fn set_config_value(key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    let path = Config::get_config_path()?;
    let key = apply_set(&path, key, value)?;
    println!("✅ Set {key} to: {value}");
    Ok(())
}

pub fn unset_config_value(key: &str) -> Result<(), Box<dyn Error>> {
    let path = Config::get_config_path()?;
    let key = apply_unset(&path, key)?;
    println!("✅ Unset {key}");
    Ok(())
}

pub fn show_config() -> Result<(), Box<dyn Error>> {
    let path = Config::get_config_path()?;
    let config = Config::load_from_path(&path)?;
    println!("Config file: {}", path_display(&path));
    config.print_all();
    Ok(())
}

fn apply_set(path: &Path, key: &str, value: &str) -> Result<ConfigKey, Box<dyn Error>> {
    let key: ConfigKey = key.parse()?;
    let mut config = Config::load_from_path(path)?;
    config.set_value(key, value)?;
    config.save_to_path(path)?;
    Ok(key)
}

fn apply_unset(path: &Path, key: &str) -> Result<ConfigKey, Box<dyn Error>> {
    let key: ConfigKey = key.parse()?;
    let mut config = Config::load_from_path(path)?;
    config.unset_value(key);
    config.save_to_path(path)?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn set_then_unset_round_trips_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        apply_set(&path, "system-prompt", "Answer like a pirate.").unwrap();
        apply_set(&path, "default-model", "llama3").unwrap();
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.system_prompt.as_deref(), Some("Answer like a pirate."));
        assert_eq!(config.default_model.as_deref(), Some("llama3"));

        apply_unset(&path, "default-model").unwrap();
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.default_model, None);
        assert_eq!(config.system_prompt.as_deref(), Some("Answer like a pirate."));
    }

    #[test]
    fn rejected_values_leave_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        assert!(apply_set(&path, "theme", "dark").is_err());
        assert!(apply_set(&path, "temperature", "warm").is_err());
        assert!(!path.exists());
    }
}
