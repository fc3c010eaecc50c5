use async_trait::async_trait;
use docent_core::DocentError;

/// A text-completion request.
///
/// Two call profiles exist in this system: routing decisions (single
/// tokens or short phrases, deterministic) and answer synthesis (prose).
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub system: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    /// Short-output, low-temperature profile for routing decisions.
    pub fn routing(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            max_tokens: 20,
            temperature: 0.1,
        }
    }

    /// Longer profile for synthesizing user-facing answers.
    pub fn answering(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            max_tokens: 512,
            temperature: 0.2,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// A text-completion backend.
///
/// `complete` failures are recoverable signals, never fatal to the
/// caller: the classifier resolves them to its fallback label and
/// answer synthesis degrades to a formatted context extract.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, DocentError>;

    /// Cheap health probe. `true` means the backend answered.
    async fn ping(&self) -> bool;
}
