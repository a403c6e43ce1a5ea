use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ApiError, ChatRequest, ChatResponse, Completion, Health, ModelInfo, ModelsResponse};
use crate::utils::url::construct_api_url;

/// The two remote operations the conversation depends on.
///
/// Each call is independent: one request, then one response or one error.
/// Nothing is retried, cached or streamed.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Models in the order the server returned them, duplicates included.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError>;

    /// First choice of a chat completion for `request`.
    async fn create_completion(&self, request: &ChatRequest) -> Result<Completion, ApiError>;
}

/// Connection settings owned by a single [`ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub request_timeout: Option<Duration>,
}

impl ClientSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: None,
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(settings: ClientSettings) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: settings.base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Liveness probe of the remote adapter. Not used by the conversation.
    pub async fn health(&self) -> Result<Health, ApiError> {
        let url = construct_api_url(&self.base_url, "health");
        debug!(%url, "checking health");
        let request = self.client.get(&url);
        send_json(url, request).await
    }
}

#[async_trait]
impl ChatApi for ApiClient {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError> {
        let url = construct_api_url(&self.base_url, "v1/models");
        debug!(%url, "listing models");
        let request = self
            .client
            .get(&url)
            .header("Content-Type", "application/json");
        let response: ModelsResponse = send_json(url, request).await?;
        debug!(count = response.data.len(), "models listed");
        Ok(response.data)
    }

    async fn create_completion(&self, request: &ChatRequest) -> Result<Completion, ApiError> {
        let url = construct_api_url(&self.base_url, "v1/chat/completions");
        debug!(
            %url,
            model = %request.model,
            messages = request.messages.len(),
            "requesting completion"
        );
        let http_request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request);
        let response: ChatResponse = send_json(url.clone(), http_request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::parse(&url, "response contained no choices"))?;

        Ok(Completion {
            message: choice.message,
            finish_reason: choice.finish_reason,
            usage: response.usage,
        })
    }
}

async fn send_json<T: DeserializeOwned>(
    url: String,
    request: reqwest::RequestBuilder,
) -> Result<T, ApiError> {
    let response = match request.send().await {
        Ok(response) => response,
        Err(source) => return Err(ApiError::Transport { url, source }),
    };

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        return Err(ApiError::Status { url, status, body });
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(source) => return Err(ApiError::Transport { url, source }),
    };

    serde_json::from_str(&body).map_err(|e| ApiError::parse(&url, e.to_string()))
}
