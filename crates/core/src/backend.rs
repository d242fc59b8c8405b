use reqwest::{RequestBuilder, StatusCode};
use tracing::{debug, warn};

use crate::{error::BackendError, prompt::ChatRequest, provider::BackendConfig};

/// A chat-completion style text-generation service.
#[allow(async_fn_in_trait)]
pub trait Backend {
    /// Model identifier placed in every request.
    fn model(&self) -> &str;

    /// Human-readable location, used in error messages.
    fn endpoint(&self) -> String;

    async fn is_available(&self) -> bool;

    /// Send one request and return the trimmed reply text.
    async fn complete(&self, request: &ChatRequest) -> Result<String, BackendError>;
}

/// OpenAI-compatible HTTP backend (LM Studio, Grok, OpenAI, Gemini).
#[derive(Clone, Debug)]
pub struct ChatBackend {
    client: reqwest::Client,
    config: BackendConfig,
}

impl ChatBackend {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

impl Backend for ChatBackend {
    fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        self.config.api_base.clone()
    }

    async fn is_available(&self) -> bool {
        let request = self
            .client
            .get(self.config.models_url())
            .timeout(self.config.probe_timeout);

        match self.authorize(request).send().await {
            Ok(response) => {
                debug!(status = %response.status(), "backend probe");
                response.status() == StatusCode::OK
            }
            Err(e) => {
                warn!(error = %e, url = %self.config.models_url(), "backend availability check failed");
                false
            }
        }
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, BackendError> {
        let builder = self
            .client
            .post(self.config.chat_completions_url())
            .timeout(self.config.request_timeout)
            .json(request);

        let response = self.authorize(builder).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| match BackendError::from(e) {
                BackendError::Http(e) => BackendError::InvalidResponse {
                    reason: e.to_string(),
                },
                other => other,
            })?;

        let first = body["choices"]
            .as_array()
            .and_then(|choices| choices.first())
            .ok_or(BackendError::EmptyChoices)?;

        let content = first["message"]["content"]
            .as_str()
            .ok_or_else(|| BackendError::InvalidResponse {
                reason: format!("missing message.content in {first}"),
            })?;

        Ok(content.trim().to_string())
    }
}
