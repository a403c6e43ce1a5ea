use thiserror::Error;
use tracing::{debug, info, warn};

use super::session::{Phase, Session};
use crate::api::{ApiError, ChatRequest, Completion, ModelInfo};
use crate::core::message::Message;

pub const MODELS_UNAVAILABLE: &str =
    "Failed to fetch available models. Please check if the API server is running.";
pub const RESPONSE_FAILED: &str = "Failed to get response from the API. Please check if the server is running and the model is available.";
pub const SELECT_MODEL_FIRST: &str = "Please select a model first";

/// A local precondition that stopped a send before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("no model selected")]
    NoModelSelected,
}

/// Everything that can change session state: user intents and the results
/// of commands the controller asked the runtime to perform.
#[derive(Debug)]
pub enum ControllerAction {
    Initialize,
    ModelsLoaded(Result<Vec<ModelInfo>, ApiError>),
    SelectModel { id: String },
    SendMessage { text: String },
    CompletionFinished(Result<Completion, ApiError>),
}

/// Remote work requested by a transition. The result comes back as a
/// [`ControllerAction`].
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerCommand {
    LoadModels,
    RequestCompletion(ChatRequest),
}

/// Apply one action to the session.
///
/// Returns the command to run, if any. Actions that are not legal in the
/// current phase (a second send while one is in flight, a model switch
/// while sending) are ignored and return `Ok(None)`.
pub fn apply_action(
    session: &mut Session,
    action: ControllerAction,
) -> Result<Option<ControllerCommand>, ValidationError> {
    match action {
        ControllerAction::Initialize => Ok(initialize(session)),
        ControllerAction::ModelsLoaded(result) => {
            models_loaded(session, result);
            Ok(None)
        }
        ControllerAction::SelectModel { id } => {
            select_model(session, id);
            Ok(None)
        }
        ControllerAction::SendMessage { text } => send_message(session, text),
        ControllerAction::CompletionFinished(result) => {
            completion_finished(session, result);
            Ok(None)
        }
    }
}

fn initialize(session: &mut Session) -> Option<ControllerCommand> {
    if session.phase != Phase::Idle {
        debug!(phase = ?session.phase, "initialize ignored");
        return None;
    }
    session.phase = Phase::AwaitingModels;
    Some(ControllerCommand::LoadModels)
}

fn models_loaded(session: &mut Session, result: Result<Vec<ModelInfo>, ApiError>) {
    match result {
        Ok(models) => {
            info!(count = models.len(), "models loaded");
            let still_listed = session
                .selected_model
                .as_deref()
                .is_some_and(|id| models.iter().any(|m| m.id == id));
            if !still_listed {
                session.selected_model = models.first().and_then(|m| model_id(&m.id));
            }
            session.models = models;
        }
        Err(err) => {
            warn!(error = %err, "failed to fetch models");
            session.models.clear();
            session.selected_model = None;
            session.last_error = Some(MODELS_UNAVAILABLE.to_string());
        }
    }
    if session.phase == Phase::AwaitingModels {
        session.phase = Phase::Idle;
    }
}

fn select_model(session: &mut Session, id: String) {
    if session.phase == Phase::Sending {
        debug!(model = %id, "model change ignored while sending");
        return;
    }
    debug!(model = %id, "model selected");
    session.selected_model = model_id(&id);
}

/// Blank ids never count as a selection.
fn model_id(id: &str) -> Option<String> {
    if id.trim().is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

fn send_message(
    session: &mut Session,
    text: String,
) -> Result<Option<ControllerCommand>, ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyMessage);
    }
    if session.phase == Phase::Sending {
        debug!("send ignored, a completion is already in flight");
        return Ok(None);
    }
    let Some(model) = session.selected_model.as_deref().and_then(model_id) else {
        session.last_error = Some(SELECT_MODEL_FIRST.to_string());
        return Err(ValidationError::NoModelSelected);
    };

    session.conversation.push(Message::user(text));
    session.last_error = None;
    session.phase = Phase::Sending;

    let request = session.build_request(&model);
    Ok(Some(ControllerCommand::RequestCompletion(request)))
}

fn completion_finished(session: &mut Session, result: Result<Completion, ApiError>) {
    if session.phase != Phase::Sending {
        warn!("completion arrived with no request in flight, dropping it");
        return;
    }
    match result {
        Ok(completion) => {
            debug!(
                finish_reason = completion.finish_reason.as_deref().unwrap_or("unknown"),
                "completion received"
            );
            session.conversation.push(completion.message);
            session.last_usage = completion.usage;
        }
        Err(err) => {
            warn!(error = %err, "completion failed");
            session.last_error = Some(RESPONSE_FAILED.to_string());
        }
    }
    session.phase = Phase::Idle;
}
