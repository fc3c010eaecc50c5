use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use docent_core::DocentError;
use serde_json::{json, Value};

use crate::backend::{HttpBackend, ProviderBackend, ProviderRequest};
use crate::completion::{CompletionModel, CompletionRequest};

/// Configuration for an OpenAI-compatible chat-completions server
/// (llama.cpp server, LM Studio, vLLM, Ollama's compat endpoint, ...).
#[derive(Debug, Clone)]
pub struct OpenAiCompatConfig {
    /// Base URL up to and including `/v1`, e.g. `http://localhost:8080/v1`.
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl OpenAiCompatConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Chat-completions adapter for any OpenAI-compatible local server.
pub struct OpenAiCompatModel {
    config: OpenAiCompatConfig,
    backend: Arc<dyn ProviderBackend>,
}

impl OpenAiCompatModel {
    pub fn new(config: OpenAiCompatConfig) -> Self {
        Self {
            config,
            backend: Arc::new(HttpBackend::new()),
        }
    }

    /// Inject a transport, e.g. a [`FakeBackend`](crate::FakeBackend)
    /// in tests.
    pub fn with_backend(config: OpenAiCompatConfig, backend: Arc<dyn ProviderBackend>) -> Self {
        Self { config, backend }
    }

    fn headers(&self) -> Vec<(String, String)> {
        match &self.config.api_key {
            Some(key) => vec![("Authorization".to_string(), format!("Bearer {key}"))],
            None => Vec::new(),
        }
    }

    fn request_body(&self, request: &CompletionRequest) -> Value {
        let mut messages = Vec::new();
        if let Some(system) = &request.system {
            messages.push(json!({"role": "system", "content": system}));
        }
        messages.push(json!({"role": "user", "content": request.prompt}));

        json!({
            "model": self.config.model,
            "messages": messages,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        })
    }
}

#[async_trait]
impl CompletionModel for OpenAiCompatModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String, DocentError> {
        let provider_request = ProviderRequest {
            url: format!("{}/chat/completions", self.config.base_url),
            headers: self.headers(),
            body: self.request_body(&request),
        };

        let response = tokio::time::timeout(self.config.timeout, self.backend.send(provider_request))
            .await
            .map_err(|_| {
                DocentError::Model(format!(
                    "completion request timed out after {:?}",
                    self.config.timeout
                ))
            })??;

        if !(200..300).contains(&response.status) {
            return Err(DocentError::Model(format!(
                "completion request failed with status {}: {}",
                response.status, response.body
            )));
        }

        let content = response.body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                DocentError::Model(format!(
                    "completion response missing choices[0].message.content: {}",
                    response.body
                ))
            })?;

        Ok(content.trim().to_string())
    }

    async fn ping(&self) -> bool {
        let url = format!("{}/models", self.config.base_url);
        let probe = tokio::time::timeout(
            self.config.timeout,
            self.backend.probe(&url, &self.headers()),
        )
        .await;

        matches!(probe, Ok(Ok(status)) if (200..300).contains(&status))
    }
}
