use std::sync::Arc;
use std::time::Duration;

use docent_core::ConversationState;
use docent_models::{AvailabilityCache, CompletionModel, CompletionRequest};

use crate::node::render_node_prompt;

/// Maps free-form conversational state to one of a fixed set of route
/// labels.
///
/// The backend's output is treated as unreliable free text, never as a
/// structured choice: it is normalized and scanned for containment of a
/// declared label, and every failure mode (backend down, timeout,
/// error, empty or junk output) resolves to the fallback label.
/// `classify` never errors.
pub struct Classifier {
    model: Arc<dyn CompletionModel>,
    availability: Arc<AvailabilityCache>,
    /// Legal destination labels, declaration order. First declared wins
    /// when the output ambiguously contains more than one.
    labels: Vec<String>,
    fallback: String,
    timeout: Duration,
}

impl Classifier {
    pub fn new(
        model: Arc<dyn CompletionModel>,
        availability: Arc<AvailabilityCache>,
        labels: Vec<String>,
        fallback: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            model,
            availability,
            labels,
            fallback: fallback.into(),
            timeout,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub async fn classify(&self, state: &ConversationState) -> String {
        if !self.availability.check(self.model.as_ref()).await {
            tracing::warn!(fallback = %self.fallback, "backend unavailable, taking fallback route");
            return self.fallback.clone();
        }

        let prompt = render_node_prompt(state);
        let request = CompletionRequest::routing(prompt);

        let raw = match tokio::time::timeout(self.timeout, self.model.complete(request)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "classification call failed, taking fallback route");
                self.availability.mark_unavailable().await;
                return self.fallback.clone();
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "classification call timed out, taking fallback route");
                self.availability.mark_unavailable().await;
                return self.fallback.clone();
            }
        };

        let label = self.resolve(&raw);
        tracing::debug!(raw = %raw.trim(), label = %label, "routing decision");
        label
    }

    /// Normalize a raw backend response down to a declared label.
    ///
    /// A response with no recognized label is discarded wholesale so
    /// incidental code or prose artifacts never leak into a routing
    /// decision.
    fn resolve(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.len() < 2 {
            return self.fallback.clone();
        }

        self.find_label(trimmed)
            .unwrap_or_else(|| self.fallback.clone())
    }

    /// First declared label contained in the case-folded text.
    fn find_label(&self, text: &str) -> Option<String> {
        let folded = text.to_lowercase();
        self.labels
            .iter()
            .find(|label| folded.contains(&label.to_lowercase()))
            .cloned()
    }
}

