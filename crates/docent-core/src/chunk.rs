use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An immutable unit of ingested text.
///
/// Produced once at ingestion time; retrieval only reads and re-ranks,
/// it never mutates a chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub content: String,
    pub metadata: HashMap<String, Value>,
}

impl Chunk {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Convenience for the common `source` metadata key (originating
    /// file path).
    pub fn with_source(self, source: impl Into<String>) -> Self {
        self.with_metadata("source", source.into())
    }
}
