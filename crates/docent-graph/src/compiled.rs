use std::collections::HashMap;
use std::time::Duration;

use docent_core::{ConversationState, DocentError};

use crate::node::NodeExecutor;

/// The compiled, executable workflow graph.
///
/// Built once from a `GraphSpec`; read-only thereafter, so replicated
/// executions over `&self` are safe without synchronization.
pub struct CompiledGraph {
    pub(crate) executors: HashMap<String, NodeExecutor>,
    pub(crate) prompts: HashMap<String, String>,
    pub(crate) plain_edges: HashMap<String, String>,
    /// Router node id → ordered legal destinations.
    pub(crate) conditional: HashMap<String, Vec<String>>,
    pub(crate) entry_point: String,
    pub(crate) terminal: String,
    pub(crate) fallback_label: String,
    pub(crate) max_steps: usize,
}

impl std::fmt::Debug for CompiledGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledGraph")
            .field("entry_point", &self.entry_point)
            .field("terminal", &self.terminal)
            .field("node_count", &self.executors.len())
            .field("plain_edge_count", &self.plain_edges.len())
            .field("conditional_group_count", &self.conditional.len())
            .finish()
    }
}

impl CompiledGraph {
    /// Ordered destination labels of a router node, if it has any.
    pub fn destinations(&self, node_id: &str) -> Option<&[String]> {
        self.conditional.get(node_id).map(Vec::as_slice)
    }

    /// Execute the graph with only the step budget as a guard.
    pub async fn invoke(&self, state: ConversationState) -> Result<ConversationState, DocentError> {
        self.run(state).await
    }

    /// Execute with an overall wall-clock deadline covering the sum of
    /// node steps. Expiry aborts the run instead of looping on a
    /// misbehaving router cycle.
    pub async fn invoke_with_deadline(
        &self,
        state: ConversationState,
        deadline: Duration,
    ) -> Result<ConversationState, DocentError> {
        match tokio::time::timeout(deadline, self.run(state)).await {
            Ok(result) => result,
            Err(_) => Err(DocentError::Timeout(format!(
                "query deadline of {deadline:?} exceeded"
            ))),
        }
    }

    async fn run(&self, mut state: ConversationState) -> Result<ConversationState, DocentError> {
        let mut current = self.entry_point.clone();
        let mut steps = 0;

        loop {
            if steps >= self.max_steps {
                return Err(DocentError::Timeout(format!(
                    "step budget of {} exceeded at node '{current}'",
                    self.max_steps
                )));
            }
            steps += 1;

            let executor = self
                .executors
                .get(&current)
                .ok_or_else(|| DocentError::Graph(format!("node '{current}' not found")))?;

            // The prompt in effect is overwritten, not accumulated, as
            // control passes from node to node.
            state.prompt = self.prompts.get(&current).cloned().unwrap_or_default();

            let route = executor.process(&mut state).await;
            tracing::debug!(node = %current, step = steps, "node processed");

            if current == self.terminal {
                break;
            }
            current = self.next_node(&current, route)?;
        }

        Ok(state)
    }

    fn next_node(&self, current: &str, route: Option<String>) -> Result<String, DocentError> {
        if let Some(destinations) = self.conditional.get(current) {
            let label = route.unwrap_or_else(|| self.fallback_label.clone());
            if let Some(dest) = destinations.iter().find(|d| **d == label) {
                return Ok(dest.clone());
            }

            // Defensive: the classifier guarantees a declared label, so
            // this is a misrouting. Recover via the declared fallback
            // destination when present.
            tracing::warn!(node = %current, label = %label, "no destination matches label");
            if let Some(fallback) = destinations.iter().find(|d| **d == self.fallback_label) {
                return Ok(fallback.clone());
            }
            return Err(DocentError::Routing(format!(
                "no destination matches label '{label}' at node '{current}' and no fallback is declared"
            )));
        }

        if let Some(target) = self.plain_edges.get(current) {
            return Ok(target.clone());
        }

        Err(DocentError::Graph(format!(
            "node '{current}' has no outgoing edge"
        )))
    }
}
