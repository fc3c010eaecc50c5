use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use docent_core::DocentError;
use serde_json::Value;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: Value,
}

/// JSON transport to a completion provider.
#[async_trait]
pub trait ProviderBackend: Send + Sync {
    /// POST a JSON body and parse the JSON response.
    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse, DocentError>;

    /// GET a URL, returning the HTTP status. Used for health probes.
    async fn probe(&self, url: &str, headers: &[(String, String)]) -> Result<u16, DocentError>;
}

/// Production backend using reqwest.
pub struct HttpBackend {
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderBackend for HttpBackend {
    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse, DocentError> {
        let mut builder = self.client.post(&request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        builder = builder.json(&request.body);

        let response = builder
            .send()
            .await
            .map_err(|e| DocentError::Model(format!("HTTP request failed: {e}")))?;

        let status = response.status().as_u16();
        let body: Value = response
            .json()
            .await
            .map_err(|e| DocentError::Model(format!("failed to parse response JSON: {e}")))?;

        Ok(ProviderResponse { status, body })
    }

    async fn probe(&self, url: &str, headers: &[(String, String)]) -> Result<u16, DocentError> {
        let mut builder = self.client.get(url);
        for (key, value) in headers {
            builder = builder.header(key, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| DocentError::Model(format!("HTTP probe failed: {e}")))?;

        Ok(response.status().as_u16())
    }
}

/// Test backend with queued responses.
///
/// `send` and `probe` draw from separate queues; an exhausted queue
/// yields a model error (send) or a failed probe.
pub struct FakeBackend {
    responses: Arc<Mutex<VecDeque<Result<ProviderResponse, DocentError>>>>,
    probes: Arc<Mutex<VecDeque<u16>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            probes: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn push_response(&self, response: ProviderResponse) -> &Self {
        self.responses
            .try_lock()
            .expect("not concurrent during setup")
            .push_back(Ok(response));
        self
    }

    pub fn push_error(&self, error: DocentError) -> &Self {
        self.responses
            .try_lock()
            .expect("not concurrent during setup")
            .push_back(Err(error));
        self
    }

    pub fn push_probe_status(&self, status: u16) -> &Self {
        self.probes
            .try_lock()
            .expect("not concurrent during setup")
            .push_back(status);
        self
    }
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderBackend for FakeBackend {
    async fn send(&self, _request: ProviderRequest) -> Result<ProviderResponse, DocentError> {
        let mut responses = self.responses.lock().await;
        responses
            .pop_front()
            .unwrap_or_else(|| Err(DocentError::Model("FakeBackend exhausted".to_string())))
    }

    async fn probe(&self, _url: &str, _headers: &[(String, String)]) -> Result<u16, DocentError> {
        let mut probes = self.probes.lock().await;
        probes
            .pop_front()
            .ok_or_else(|| DocentError::Model("FakeBackend probe exhausted".to_string()))
    }
}
