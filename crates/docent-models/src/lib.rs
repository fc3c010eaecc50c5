mod availability;
mod backend;
mod completion;
mod openai_compat;
mod scripted;

pub use availability::AvailabilityCache;
pub use backend::{FakeBackend, HttpBackend, ProviderBackend, ProviderRequest, ProviderResponse};
pub use completion::{CompletionModel, CompletionRequest};
pub use openai_compat::{OpenAiCompatConfig, OpenAiCompatModel};
pub use scripted::ScriptedCompletionModel;
