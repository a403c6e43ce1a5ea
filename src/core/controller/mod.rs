//! Conversation controller.
//!
//! State lives in [`Session`]; every change goes through [`apply_action`],
//! which may hand back a [`ControllerCommand`] describing the remote call to
//! make next. [`Controller`] pairs a session with a [`ChatApi`] and runs those
//! commands in sequence for callers that simply await each step. The
//! terminal view instead runs commands on background tasks with
//! [`execute_command`] and feeds the resulting actions back in.

mod actions;
mod session;


use std::sync::Arc;

pub use actions::{
    apply_action, ControllerAction, ControllerCommand, ValidationError, MODELS_UNAVAILABLE,
    RESPONSE_FAILED, SELECT_MODEL_FIRST,
};
pub use session::{Phase, RequestOptions, Session, SessionSnapshot, DEFAULT_SYSTEM_PROMPT};

use crate::api::ChatApi;

/// Perform the remote call a command asks for and wrap the outcome as the
/// action that completes it.
pub async fn execute_command<A>(api: &A, command: ControllerCommand) -> ControllerAction
where
    A: ChatApi + ?Sized,
{
    match command {
        ControllerCommand::LoadModels => ControllerAction::ModelsLoaded(api.list_models().await),
        ControllerCommand::RequestCompletion(request) => {
            ControllerAction::CompletionFinished(api.create_completion(&request).await)
        }
    }
}

pub struct Controller<A: ?Sized> {
    api: Arc<A>,
    session: Session,
}

impl<A> Controller<A>
where
    A: ChatApi + ?Sized,
{
    pub fn new(api: Arc<A>, session: Session) -> Self {
        Self { api, session }
    }

    pub fn api(&self) -> Arc<A> {
        Arc::clone(&self.api)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Apply a single action without running the command it produces.
    pub fn dispatch(
        &mut self,
        action: ControllerAction,
    ) -> Result<Option<ControllerCommand>, ValidationError> {
        apply_action(&mut self.session, action)
    }

    /// Fetch the model listing and settle on a default selection.
    pub async fn initialize(&mut self) {
        // Initialize never fails validation.
        let _ = self.run(ControllerAction::Initialize).await;
    }

    pub fn select_model(&mut self, id: impl Into<String>) {
        let _ = self.dispatch(ControllerAction::SelectModel { id: id.into() });
    }

    /// Select `id` only if the server listed it. Returns whether it did.
    pub fn prefer_model(&mut self, id: &str) -> bool {
        if self.session.models().iter().any(|m| m.id == id) {
            self.select_model(id);
            self.session.selected_model() == Some(id)
        } else {
            false
        }
    }

    /// Send one user turn and wait for the reply.
    ///
    /// API failures are not returned here; they land in the session's
    /// `last_error` like they would for the interactive view.
    pub async fn send_message(&mut self, text: impl Into<String>) -> Result<(), ValidationError> {
        self.run(ControllerAction::SendMessage { text: text.into() })
            .await
    }

    async fn run(&mut self, action: ControllerAction) -> Result<(), ValidationError> {
        let mut next = Some(action);
        while let Some(action) = next.take() {
            if let Some(command) = self.dispatch(action)? {
                next = Some(execute_command(&*self.api, command).await);
            }
        }
        Ok(())
    }
}
