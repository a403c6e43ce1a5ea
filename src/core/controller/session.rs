use crate::api::{ChatRequest, ModelInfo, Usage};
use crate::core::message::{Message, Role};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// What the controller is currently waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingModels,
    Sending,
}

/// Optional sampling parameters forwarded with every completion request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RequestOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// State owned by the conversation controller.
///
/// The conversation always starts with a single system message seeded from
/// the configured prompt. Fields are only mutated by the reducer in
/// [`super::actions`].
#[derive(Debug, Clone)]
pub struct Session {
    system_prompt: String,
    options: RequestOptions,
    pub(super) conversation: Vec<Message>,
    pub(super) models: Vec<ModelInfo>,
    pub(super) selected_model: Option<String>,
    pub(super) phase: Phase,
    pub(super) last_error: Option<String>,
    pub(super) last_usage: Option<Usage>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT, RequestOptions::default())
    }
}

impl Session {
    pub fn new(system_prompt: impl Into<String>, options: RequestOptions) -> Self {
        let system_prompt = system_prompt.into();
        Self {
            conversation: vec![Message::system(system_prompt.clone())],
            system_prompt,
            options,
            models: Vec::new(),
            selected_model: None,
            phase: Phase::Idle,
            last_error: None,
            last_usage: None,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Full history, hidden system seed included.
    pub fn conversation(&self) -> &[Message] {
        &self.conversation
    }

    /// History as shown to the user: everything except system messages.
    pub fn visible_messages(&self) -> impl Iterator<Item = &Message> {
        self.conversation.iter().filter(|m| !m.role.is_system())
    }

    pub fn models(&self) -> &[ModelInfo] {
        &self.models
    }

    pub fn selected_model(&self) -> Option<&str> {
        self.selected_model.as_deref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_pending(&self) -> bool {
        self.phase == Phase::Sending
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_usage(&self) -> Option<Usage> {
        self.last_usage
    }

    /// Outbound request for the current history.
    ///
    /// Stored system messages are dropped and the configured prompt is
    /// injected once at the front, so the request carries exactly one.
    pub fn build_request(&self, model: &str) -> ChatRequest {
        let mut messages = Vec::with_capacity(self.conversation.len());
        messages.push(Message::new(Role::System, self.system_prompt.clone()));
        messages.extend(self.visible_messages().cloned());

        ChatRequest {
            model: model.to_string(),
            messages,
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            messages: self.visible_messages().cloned().collect(),
            models: self.models.clone(),
            selected_model: self.selected_model.clone(),
            phase: self.phase,
            last_error: self.last_error.clone(),
            last_usage: self.last_usage,
        }
    }
}

/// Immutable copy of session state handed to the view.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub messages: Vec<Message>,
    pub models: Vec<ModelInfo>,
    pub selected_model: Option<String>,
    pub phase: Phase,
    pub last_error: Option<String>,
    pub last_usage: Option<Usage>,
}

impl SessionSnapshot {
    pub fn is_pending(&self) -> bool {
        self.phase == Phase::Sending
    }

    /// Whether the send control should be enabled.
    pub fn can_send(&self) -> bool {
        !self.is_pending()
            && self
                .selected_model
                .as_deref()
                .is_some_and(|id| !id.trim().is_empty())
    }

    /// Zero-based position of the selected model in the listing.
    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected_model.as_deref()?;
        self.models.iter().position(|m| m.id == selected)
    }
}
