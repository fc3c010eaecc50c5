use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use docent_config::{GraphSpec, NodeKind};
use docent_core::DocentError;
use docent_models::{AvailabilityCache, CompletionModel};

use crate::classifier::Classifier;
use crate::compiled::CompiledGraph;
use crate::node::{GenericNode, NodeExecutor, RouterNode};

const DEFAULT_SUPERVISOR_ID: &str = "supervisor";
const DEFAULT_FALLBACK_LABEL: &str = "fallback";
const DEFAULT_MAX_STEPS: usize = 100;

/// Builds an executable [`CompiledGraph`] from a [`GraphSpec`].
///
/// Fails fast: any validation error yields no graph at all.
pub struct GraphBuilder {
    spec: GraphSpec,
    model: Arc<dyn CompletionModel>,
    supervisor_id: String,
    fallback_label: String,
    classifier_timeout: Duration,
    availability_interval: Duration,
    max_steps: usize,
}

impl GraphBuilder {
    pub fn new(spec: GraphSpec, model: Arc<dyn CompletionModel>) -> Self {
        Self {
            spec,
            model,
            supervisor_id: DEFAULT_SUPERVISOR_ID.to_string(),
            fallback_label: DEFAULT_FALLBACK_LABEL.to_string(),
            classifier_timeout: Duration::from_secs(10),
            availability_interval: Duration::from_secs(30),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Identity of the router that receives conditional-edge wiring.
    pub fn with_supervisor_id(mut self, id: impl Into<String>) -> Self {
        self.supervisor_id = id.into();
        self
    }

    /// Label taken whenever classification cannot produce a usable
    /// decision.
    pub fn with_fallback_label(mut self, label: impl Into<String>) -> Self {
        self.fallback_label = label.into();
        self
    }

    pub fn with_classifier_timeout(mut self, timeout: Duration) -> Self {
        self.classifier_timeout = timeout;
        self
    }

    pub fn with_availability_interval(mut self, interval: Duration) -> Self {
        self.availability_interval = interval;
        self
    }

    /// Step budget guarding against router cycles.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn build(self) -> Result<CompiledGraph, DocentError> {
        let spec = &self.spec;

        if spec.nodes.is_empty() {
            return Err(DocentError::Config("no nodes declared".to_string()));
        }

        let mut seen = HashSet::new();
        for node in &spec.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(DocentError::Config(format!(
                    "duplicate node id '{}'",
                    node.id
                )));
            }
        }

        if !spec.declares(&spec.initial_node) {
            return Err(DocentError::Config(format!(
                "initial node '{}' not declared",
                spec.initial_node
            )));
        }
        if !spec.declares(&spec.end_node) {
            return Err(DocentError::Config(format!(
                "end node '{}' not declared",
                spec.end_node
            )));
        }

        for edge in &spec.edges {
            if !spec.declares(&edge.source) {
                return Err(DocentError::Config(format!(
                    "edge source '{}' not declared",
                    edge.source
                )));
            }
            if !spec.declares(&edge.target) {
                return Err(DocentError::Config(format!(
                    "edge target '{}' not declared",
                    edge.target
                )));
            }
        }

        // Partition edges: the supervisor router's edges form its
        // ordered conditional destination group (declaration order is
        // the ambiguity tie-break); everything else is a plain edge.
        let mut plain_edges: HashMap<String, String> = HashMap::new();
        let mut destinations: Vec<String> = Vec::new();
        for edge in &spec.edges {
            let source_kind = spec.node(&edge.source).map(|n| n.kind);
            if source_kind == Some(NodeKind::Router) && edge.source == self.supervisor_id {
                destinations.push(edge.target.clone());
            } else if plain_edges
                .insert(edge.source.clone(), edge.target.clone())
                .is_some()
            {
                return Err(DocentError::Config(format!(
                    "node '{}' declares multiple outgoing edges without conditional semantics",
                    edge.source
                )));
            }
        }

        self.check_reachability(&plain_edges, &destinations)?;

        let availability = Arc::new(AvailabilityCache::new(self.availability_interval));

        let mut executors: HashMap<String, NodeExecutor> = HashMap::new();
        let mut prompts: HashMap<String, String> = HashMap::new();
        for node in &spec.nodes {
            prompts.insert(node.id.clone(), node.system.clone());

            let executor = if node.kind == NodeKind::Router && node.id == self.supervisor_id {
                let classifier = Classifier::new(
                    Arc::clone(&self.model),
                    Arc::clone(&availability),
                    destinations.clone(),
                    self.fallback_label.clone(),
                    self.classifier_timeout,
                );
                NodeExecutor::Router(RouterNode::new(node.id.clone(), classifier))
            } else {
                // A router without declared conditional semantics runs
                // as a plain node; only its wiring is specified.
                NodeExecutor::Generic(GenericNode::new(node.id.clone(), Arc::clone(&self.model)))
            };
            executors.insert(node.id.clone(), executor);
        }

        let mut conditional = HashMap::new();
        if !destinations.is_empty() {
            conditional.insert(self.supervisor_id.clone(), destinations);
        }

        Ok(CompiledGraph {
            executors,
            prompts,
            plain_edges,
            conditional,
            entry_point: spec.initial_node.clone(),
            terminal: spec.end_node.clone(),
            fallback_label: self.fallback_label.clone(),
            max_steps: self.max_steps,
        })
    }

    /// Every declared node, the terminal included, must be reachable
    /// from the initial node.
    ///
    /// Nothing stronger: a router destination may be a stub that only
    /// defines a route label (a graph whose terminal is the supervisor
    /// itself routes by log entry, not by walking the branch).
    fn check_reachability(
        &self,
        plain_edges: &HashMap<String, String>,
        destinations: &[String],
    ) -> Result<(), DocentError> {
        let spec = &self.spec;

        let successors = |id: &str| -> Vec<&str> {
            let mut out: Vec<&str> = Vec::new();
            if id == self.supervisor_id {
                out.extend(destinations.iter().map(String::as_str));
            }
            if let Some(target) = plain_edges.get(id) {
                out.push(target.as_str());
            }
            out
        };

        let mut reachable: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        reachable.insert(spec.initial_node.as_str());
        queue.push_back(spec.initial_node.as_str());
        while let Some(id) = queue.pop_front() {
            for next in successors(id) {
                if reachable.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        for node in &spec.nodes {
            if !reachable.contains(node.id.as_str()) {
                return Err(DocentError::Config(format!(
                    "node '{}' unreachable from initial node '{}'",
                    node.id, spec.initial_node
                )));
            }
        }

        Ok(())
    }
}
