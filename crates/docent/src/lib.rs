//! Docent — graph-routed question answering over a private document
//! corpus.
//!
//! A declaratively-configured workflow graph routes each query through
//! an LLM-driven classifier; the document path answers from a hybrid
//! lexical retrieval engine, with no vector similarity involved.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use docent::{default_graph_spec, Answer, DocumentHandler, QueryService, StaticHandler};
//! use docent::config::{load_graph_spec_str, ConfigFormat};
//! use docent::graph::GraphBuilder;
//! use docent::models::{OpenAiCompatConfig, OpenAiCompatModel};
//! use docent::retrieval::Corpus;
//!
//! let spec = load_graph_spec_str(default_graph_spec(), ConfigFormat::Toml)?;
//! let model = Arc::new(OpenAiCompatModel::new(OpenAiCompatConfig::new(
//!     "http://localhost:8080/v1",
//!     "mistral",
//! )));
//! let graph = GraphBuilder::new(spec, model.clone()).build()?;
//!
//! let service = QueryService::new(graph)
//!     .with_handler("documents", Arc::new(DocumentHandler::new(corpus, model)))
//!     .with_handler("fallback", Arc::new(StaticHandler::new("Sorry, I can't help with that.")));
//!
//! let answer: Answer = service.answer("show me salary details").await?;
//! ```

mod handler;
mod service;

pub use handler::{Answer, CompletionHandler, DocumentHandler, Handler, StaticHandler};
pub use service::{default_graph_spec, QueryService};

/// Core types: `DocentError`, `ConversationState`, `Chunk`, `PromptTemplate`.
pub use docent_core as core;

/// Graph specification loader: TOML/JSON/YAML documents into `GraphSpec`.
pub use docent_config as config;

/// Completion backends: provider transport, OpenAI-compatible adapter,
/// availability caching, scripted test double.
pub use docent_models as models;

/// Workflow graph: builder, classifier router, single-path executor.
pub use docent_graph as graph;

/// Hybrid lexical retrieval over an immutable corpus snapshot.
pub use docent_retrieval as retrieval;
