//! TUI-less "say" command

use std::error::Error;
use std::sync::Arc;

use tracing::warn;

use crate::api::ApiClient;
use crate::core::config::ResolvedSettings;
use crate::core::controller::{Controller, Session, ValidationError};

pub async fn run_say(settings: ResolvedSettings, prompt: Vec<String>) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    let base_url = settings.client.base_url.clone();
    let api = Arc::new(ApiClient::new(settings.client)?);
    let mut controller = Controller::new(api, Session::new(settings.system_prompt, settings.options));

    controller.initialize().await;
    if let Some(error) = controller.session().last_error() {
        return Err(error.into());
    }

    if let Some(model) = settings.preferred_model.as_deref() {
        if !controller.prefer_model(model) {
            warn!(model, "requested model is not offered by the server");
            eprintln!("⚠️  Model '{model}' is not offered by {base_url}; using the default");
        }
    }

    match controller.send_message(prompt).await {
        Ok(()) => {}
        Err(ValidationError::NoModelSelected) => {
            return Err(format!("No models available from {base_url}").into());
        }
        Err(err) => return Err(err.into()),
    }

    let session = controller.session();
    if let Some(error) = session.last_error() {
        return Err(error.into());
    }
    if let Some(reply) = session.visible_messages().last() {
        println!("{}", reply.content);
    }
    Ok(())
}
