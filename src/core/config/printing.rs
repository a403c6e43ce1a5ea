use crate::core::config::data::{Config, ConfigKey};

impl Config {
    /// One `key: value` line per setting, `(unset)` for missing ones.
    pub fn describe(&self) -> Vec<String> {
        ConfigKey::ALL
            .into_iter()
            .map(|key| {
                let value = match key {
                    ConfigKey::BaseUrl => self.base_url.clone(),
                    ConfigKey::DefaultModel => self.default_model.clone(),
                    ConfigKey::SystemPrompt => self.system_prompt.clone(),
                    ConfigKey::Temperature => self.temperature.map(|t| t.to_string()),
                    ConfigKey::MaxTokens => self.max_tokens.map(|t| t.to_string()),
                    ConfigKey::RequestTimeout => {
                        self.request_timeout_secs.map(|secs| format!("{secs}s"))
                    }
                };
                format!("  {key}: {}", value.as_deref().unwrap_or("(unset)"))
            })
            .collect()
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        for line in self.describe() {
            println!("{line}");
        }
    }
}
