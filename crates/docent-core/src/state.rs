use serde::{Deserialize, Serialize};

/// The mutable unit threaded through graph execution.
///
/// `messages` is append-only: one entry per node visited, in visitation
/// order, never reordered or deduplicated. `prompt` is the template in
/// effect for the current node and is overwritten, not accumulated, as
/// control passes from node to node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationState {
    pub input: String,
    pub messages: Vec<String>,
    pub prompt: String,
}

impl ConversationState {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            messages: Vec::new(),
            prompt: String::new(),
        }
    }

    /// Append a message-log entry for the given node.
    pub fn push_message(&mut self, node_id: &str, text: impl AsRef<str>) {
        self.messages.push(format!("[{node_id}] {}", text.as_ref()));
    }

    /// The most recent log entry, if any.
    pub fn last_message(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    /// The most recent log entry with its `[node_id]` tag stripped.
    pub fn last_message_text(&self) -> Option<&str> {
        let last = self.last_message()?;
        match last.split_once("] ") {
            Some((tag, text)) if tag.starts_with('[') => Some(text),
            _ => Some(last),
        }
    }
}
