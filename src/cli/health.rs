use std::error::Error;

use crate::api::ApiClient;
use crate::core::config::ResolvedSettings;

pub async fn check_health(settings: ResolvedSettings) -> Result<(), Box<dyn Error>> {
    let client = ApiClient::new(settings.client)?;
    let health = client.health().await?;
    println!("✅ {} is {} (version {})", client.base_url(), health.status, health.version);
    Ok(())
}
