use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::api::{ApiError, ChatApi, ChatRequest, Completion, ModelInfo, Usage};
use crate::core::message::Message;

/// [`ChatApi`] double that replays queued results and records requests.
#[derive(Default)]
pub struct ScriptedApi {
    model_results: Mutex<VecDeque<Result<Vec<ModelInfo>, ApiError>>>,
    completion_results: Mutex<VecDeque<Result<Completion, ApiError>>>,
    requests: Mutex<Vec<ChatRequest>>,
    list_calls: Mutex<usize>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_models(ids: &[&str]) -> Self {
        let api = Self::new();
        api.push_models(Ok(ids.iter().map(|id| ModelInfo::new(*id)).collect()));
        api
    }

    pub fn push_models(&self, result: Result<Vec<ModelInfo>, ApiError>) {
        self.model_results.lock().unwrap().push_back(result);
    }

    pub fn push_reply(&self, content: &str) {
        self.completion_results
            .lock()
            .unwrap()
            .push_back(Ok(create_test_completion(content)));
    }

    pub fn push_failure(&self) {
        self.completion_results
            .lock()
            .unwrap()
            .push_back(Err(create_status_error()));
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }
}

#[async_trait]
impl ChatApi for ScriptedApi {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError> {
        *self.list_calls.lock().unwrap() += 1;
        self.model_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn create_completion(&self, request: &ChatRequest) -> Result<Completion, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        self.completion_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ApiError::parse(
                    "scripted://v1/chat/completions",
                    "no scripted completion",
                ))
            })
    }
}

pub fn create_test_completion(content: &str) -> Completion {
    Completion {
        message: Message::assistant(content),
        finish_reason: Some("stop".to_string()),
        usage: Some(Usage {
            prompt_tokens: 12,
            completion_tokens: 3,
            total_tokens: 15,
        }),
    }
}

pub fn create_status_error() -> ApiError {
    ApiError::Status {
        url: "scripted://v1/chat/completions".to_string(),
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: r#"{"detail":"Internal server error"}"#.to_string(),
    }
}
