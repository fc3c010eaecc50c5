use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use docent_core::DocentError;
use tokio::sync::Mutex;

use crate::completion::{CompletionModel, CompletionRequest};

/// Test double with queued responses and switchable availability.
///
/// Records every prompt it receives so tests can assert on what was
/// actually sent.
pub struct ScriptedCompletionModel {
    responses: Mutex<VecDeque<Result<String, DocentError>>>,
    prompts: Mutex<Vec<String>>,
    available: AtomicBool,
    delay: Option<Duration>,
}

impl ScriptedCompletionModel {
    pub fn new(responses: Vec<&str>) -> Self {
        Self::with_results(responses.into_iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn with_results(responses: Vec<Result<String, DocentError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
            available: AtomicBool::new(true),
            delay: None,
        }
    }

    /// Sleep this long before answering each completion, for deadline
    /// tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Prompts received so far, in call order.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    pub async fn calls(&self) -> usize {
        self.prompts.lock().await.len()
    }
}

#[async_trait]
impl CompletionModel for ScriptedCompletionModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String, DocentError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.prompts.lock().await.push(request.prompt);
        let mut responses = self.responses.lock().await;
        responses
            .pop_front()
            .unwrap_or_else(|| Err(DocentError::Model("scripted model exhausted".to_string())))
    }

    async fn ping(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}
