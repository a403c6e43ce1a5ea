//! Model listing functionality

use chrono::{DateTime, Utc};
use std::error::Error;

use crate::api::{ApiClient, ChatApi, ModelInfo};
use crate::core::config::ResolvedSettings;

pub async fn list_models(settings: ResolvedSettings) -> Result<(), Box<dyn Error>> {
    let base_url = settings.client.base_url.clone();
    let client = ApiClient::new(settings.client)?;
    let models = client.list_models().await?;

    println!("🤖 Available models at {base_url}");
    println!();
    for line in format_model_lines(&models, settings.preferred_model.as_deref()) {
        println!("{line}");
    }
    Ok(())
}

/// Human-readable listing in server order. The first entry is the one a new
/// chat selects by default.
pub fn format_model_lines(models: &[ModelInfo], preferred: Option<&str>) -> Vec<String> {
    if models.is_empty() {
        return vec!["No models found.".to_string()];
    }

    let preferred_listed = preferred.is_some_and(|id| models.iter().any(|m| m.id == id));
    let mut lines = Vec::new();
    for (index, model) in models.iter().enumerate() {
        let marker = match (index, preferred_listed) {
            (_, true) if Some(model.id.as_str()) == preferred => " (preferred)",
            (0, false) => " (default)",
            _ => "",
        };
        lines.push(format!("  • {}{marker}", model.id));
        if let Some(owned_by) = model.owned_by.as_deref().filter(|o| !o.is_empty()) {
            lines.push(format!("    Owner: {owned_by}"));
        }
        if let Some(created) = model.created.and_then(format_created) {
            lines.push(format!("    Created: {created}"));
        }
    }
    lines
}

fn format_created(created: u64) -> Option<String> {
    if created == 0 {
        return None;
    }
    // Some servers report milliseconds rather than seconds.
    let secs = if created > 10_000_000_000 {
        created / 1000
    } else {
        created
    };
    DateTime::<Utc>::from_timestamp(i64::try_from(secs).ok()?, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}
