use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use docent_core::{ConversationState, DocentError};
use docent_graph::CompiledGraph;

use crate::handler::{Answer, Handler};

/// Default graph specification: a supervisor router whose destinations
/// are stubs defining the route label set; answering is done by the
/// registered handlers.
pub fn default_graph_spec() -> &'static str {
    include_str!("../config/graph.toml")
}

/// Ties graph execution to handler dispatch.
///
/// Runs one query end-to-end: execute the graph under a deadline, then
/// read the final message-log entry. An entry that represents a routing
/// decision dispatches to the handler registered for that label; any
/// other entry is itself the answer.
///
/// Holds only read-only state, so one service instance may serve
/// concurrent queries.
pub struct QueryService {
    graph: CompiledGraph,
    handlers: HashMap<String, Arc<dyn Handler>>,
    deadline: Duration,
}

impl QueryService {
    pub fn new(graph: CompiledGraph) -> Self {
        Self {
            graph,
            handlers: HashMap::new(),
            deadline: Duration::from_secs(60),
        }
    }

    /// Register the handler answering for a route label.
    pub fn with_handler(mut self, label: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
        self.handlers.insert(label.into(), handler);
        self
    }

    /// Overall per-query deadline covering the sum of node steps.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub async fn answer(&self, query: &str) -> Result<Answer, DocentError> {
        let state = ConversationState::new(query);
        let final_state = self.graph.invoke_with_deadline(state, self.deadline).await?;

        let text = final_state.last_message_text().unwrap_or_default();
        if let Some(label) = self.route_decision(text) {
            tracing::debug!(label = %label, "dispatching to handler");
            let handler = &self.handlers[&label];
            return handler.handle(query).await;
        }

        Ok(Answer {
            answer: text.to_string(),
            sources: Vec::new(),
        })
    }

    /// Judge whether a final log entry is a routing decision rather
    /// than a direct answer: the text equals a registered label, or is
    /// a single short line containing exactly one registered label.
    fn route_decision(&self, text: &str) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.len() > 40 || trimmed.lines().count() > 1 {
            return None;
        }
        let folded = trimmed.to_lowercase();

        if let Some(label) = self
            .handlers
            .keys()
            .find(|label| folded == label.to_lowercase())
        {
            return Some(label.clone());
        }

        let contained: Vec<&String> = self
            .handlers
            .keys()
            .filter(|label| folded.contains(&label.to_lowercase()))
            .collect();
        match contained.as_slice() {
            [label] => Some((*label).clone()),
            _ => None,
        }
    }
}
