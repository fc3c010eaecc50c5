use std::path::Path;

use docent_core::DocentError;

use crate::spec::{GraphDocument, GraphSpec};

/// Supported graph-specification file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Detect format from a file extension string (e.g. "toml", "json",
    /// "yaml", "yml").
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Parse a graph specification from a string in the given format.
pub fn load_graph_spec_str(content: &str, format: ConfigFormat) -> Result<GraphSpec, DocentError> {
    let document: GraphDocument = match format {
        ConfigFormat::Toml => toml::from_str(content)
            .map_err(|e| DocentError::Config(format!("TOML parse error: {e}")))?,
        ConfigFormat::Json => serde_json::from_str(content)
            .map_err(|e| DocentError::Config(format!("JSON parse error: {e}")))?,
        ConfigFormat::Yaml => serde_yml::from_str(content)
            .map_err(|e| DocentError::Config(format!("YAML parse error: {e}")))?,
    };
    document.into_spec()
}

/// Load a graph specification from a file, auto-detecting the format
/// from the extension.
pub fn load_graph_spec(path: &Path) -> Result<GraphSpec, DocentError> {
    let format = ConfigFormat::from_path(path).ok_or_else(|| {
        DocentError::Config(format!(
            "cannot detect config format from extension: {}",
            path.display()
        ))
    })?;

    let content = std::fs::read_to_string(path)
        .map_err(|e| DocentError::Config(format!("failed to read {}: {e}", path.display())))?;

    load_graph_spec_str(&content, format)
}
