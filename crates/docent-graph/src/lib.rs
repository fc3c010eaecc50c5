mod builder;
mod classifier;
mod compiled;
mod node;

pub use builder::GraphBuilder;
pub use classifier::Classifier;
pub use compiled::CompiledGraph;
pub use node::{render_node_prompt, GenericNode, NodeExecutor, RouterNode};
