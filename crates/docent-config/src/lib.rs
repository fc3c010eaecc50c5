mod loader;
mod spec;

pub use loader::{load_graph_spec, load_graph_spec_str, ConfigFormat};
pub use spec::{EdgeSpec, GraphSpec, NodeKind, NodeSpec};
