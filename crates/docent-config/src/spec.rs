use serde::Deserialize;

use docent_core::DocentError;

/// Node kind, a closed set. Anything other than these two values is a
/// deserialization error, not a runtime branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    Generic,
    Router,
}

/// A declared graph node. Immutable once the graph is built.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    /// Prompt template bound to the node. May embed routing instructions
    /// and `{{input}}` placeholders.
    #[serde(default)]
    pub system: String,
}

/// A directed edge between two declared nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeSpec {
    pub source: String,
    pub target: String,
}

/// The validated specification a workflow graph is built from.
#[derive(Debug, Clone)]
pub struct GraphSpec {
    pub nodes: Vec<NodeSpec>,
    pub edges: Vec<EdgeSpec>,
    pub initial_node: String,
    pub end_node: String,
}

impl GraphSpec {
    pub fn node(&self, id: &str) -> Option<&NodeSpec> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn declares(&self, id: &str) -> bool {
        self.node(id).is_some()
    }
}

/// Raw document shape: a root `graph` element with `meta`, `nodes`, and
/// a newline-separated `flow` edge list.
#[derive(Debug, Deserialize)]
pub(crate) struct GraphDocument {
    graph: Option<GraphSection>,
}

#[derive(Debug, Deserialize)]
struct GraphSection {
    meta: Option<MetaSection>,
    nodes: Option<NodesSection>,
    #[serde(default)]
    flow: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MetaSection {
    initial_node: Option<String>,
    end_node: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NodesSection {
    #[serde(default)]
    node: Vec<NodeSpec>,
}

impl GraphDocument {
    /// Validate the document's structure and produce a `GraphSpec`.
    ///
    /// Presence checks only; semantic validation (edge endpoints,
    /// reachability, per-kind edge counts) is the graph builder's job.
    pub(crate) fn into_spec(self) -> Result<GraphSpec, DocentError> {
        let graph = self
            .graph
            .ok_or_else(|| DocentError::Config("missing `graph` root element".to_string()))?;

        let meta = graph
            .meta
            .ok_or_else(|| DocentError::Config("missing `meta` section".to_string()))?;

        let initial_node = meta
            .initial_node
            .ok_or_else(|| DocentError::Config("`meta` lacks `initial_node`".to_string()))?;
        let end_node = meta
            .end_node
            .ok_or_else(|| DocentError::Config("`meta` lacks `end_node`".to_string()))?;

        let nodes = graph
            .nodes
            .ok_or_else(|| DocentError::Config("missing `nodes` section".to_string()))?
            .node;

        let edges = parse_flow(graph.flow.as_deref().unwrap_or(""))?;

        Ok(GraphSpec {
            nodes,
            edges,
            initial_node,
            end_node,
        })
    }
}

/// Parse the `flow` edge list: one `"<source> -> <destination>"` per
/// line, blank lines skipped. Any other line is a config error.
fn parse_flow(flow: &str) -> Result<Vec<EdgeSpec>, DocentError> {
    let mut edges = Vec::new();
    for line in flow.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (source, target) = line
            .split_once("->")
            .ok_or_else(|| DocentError::Config(format!("malformed flow line: '{line}'")))?;
        let source = source.trim();
        let target = target.trim();
        if source.is_empty() || target.is_empty() {
            return Err(DocentError::Config(format!(
                "malformed flow line: '{line}'"
            )));
        }
        edges.push(EdgeSpec {
            source: source.to_string(),
            target: target.to_string(),
        });
    }
    Ok(edges)
}
