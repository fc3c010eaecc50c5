use std::collections::HashMap;
use std::sync::Arc;

use docent_core::{ConversationState, PromptTemplate};
use docent_models::{CompletionModel, CompletionRequest};

use crate::classifier::Classifier;

/// Executable form of a declared node. A closed set: the node's kind is
/// resolved once at build time, never inspected at runtime.
pub enum NodeExecutor {
    Generic(GenericNode),
    Router(RouterNode),
}

impl NodeExecutor {
    /// Run the node against the state, appending its message-log entry.
    ///
    /// Router nodes return the chosen route label; generic nodes return
    /// `None`. Never fails: completion errors become error markers in
    /// the log (generic) or resolve to the fallback label (router).
    pub async fn process(&self, state: &mut ConversationState) -> Option<String> {
        match self {
            NodeExecutor::Generic(node) => {
                node.run(state).await;
                None
            }
            NodeExecutor::Router(node) => Some(node.run(state).await),
        }
    }
}

/// Runs the node's bound prompt through the completion model and logs
/// the result.
pub struct GenericNode {
    id: String,
    model: Arc<dyn CompletionModel>,
}

impl GenericNode {
    pub fn new(id: impl Into<String>, model: Arc<dyn CompletionModel>) -> Self {
        Self {
            id: id.into(),
            model,
        }
    }

    async fn run(&self, state: &mut ConversationState) {
        let prompt = render_node_prompt(state);
        match self.model.complete(CompletionRequest::answering(prompt)).await {
            Ok(text) => state.push_message(&self.id, &text),
            Err(e) => {
                tracing::warn!(node = %self.id, error = %e, "node completion failed");
                state.push_message(&self.id, format!("completion failed: {e}"));
            }
        }
    }
}

/// Delegates its decision to the classifier and logs the chosen label.
pub struct RouterNode {
    id: String,
    classifier: Classifier,
}

impl RouterNode {
    pub fn new(id: impl Into<String>, classifier: Classifier) -> Self {
        Self {
            id: id.into(),
            classifier,
        }
    }

    async fn run(&self, state: &mut ConversationState) -> String {
        let label = self.classifier.classify(state).await;
        state.push_message(&self.id, &label);
        label
    }
}

/// Build the completion prompt for the node currently in effect.
///
/// The bound template's `{{input}}` placeholder is rendered; a template
/// without the placeholder gets the input appended on its own line so
/// the model actually sees the query. No template means the raw input
/// is used verbatim.
pub fn render_node_prompt(state: &ConversationState) -> String {
    let template = PromptTemplate::new(state.prompt.clone());
    if template.is_empty() {
        return state.input.clone();
    }

    if template.references("input") {
        let mut values = HashMap::new();
        values.insert("input".to_string(), state.input.clone());
        if let Ok(rendered) = template.render(&values) {
            return rendered;
        }
    }

    format!("{}\n\n{}", state.prompt.trim(), state.input)
}
