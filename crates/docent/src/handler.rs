use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use docent_core::{ConversationState, DocentError, PromptTemplate};
use docent_graph::render_node_prompt;
use docent_models::{AvailabilityCache, CompletionModel, CompletionRequest};
use docent_retrieval::{Corpus, RetrievalEngine, RetrievalOutcome};
use serde_json::Value;

/// The answer contract exposed upward: the text plus the metadata of
/// the chunks it drew from, in ranked order.
#[derive(Debug, Clone, Default)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<HashMap<String, Value>>,
}

/// A specialized route handler. One handler is registered per route
/// label; the matched handler produces the externally visible answer.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, query: &str) -> Result<Answer, DocentError>;
}

const SYNTHESIS_TEMPLATE: &str = "\
[ROLE]
You are a professional assistant. Answer the user's question using ONLY the provided context.

[CRITICAL INSTRUCTION]
- Use ONLY the information provided in the context below.
- Do NOT add any information not present in the context.
- If the context contains the answer, provide it in a clear, human-readable format.
- If the context doesn't contain the answer, say: \"I don't have that information in the database.\"
- Format tabular data in a readable table format.
- Use bullet points for lists.
- Keep your response concise and well-structured.

[CONTEXT]
{{context}}

[USER QUESTION]
{{question}}

[RESPONSE]
";

/// Answers document queries: retrieves and narrows the most relevant
/// passages, then synthesizes a reply through the completion model.
///
/// When the model is down or fails, the narrowed context itself is
/// formatted into the reply instead — retrieval results are never
/// thrown away because of a flaky backend.
pub struct DocumentHandler {
    engine: RetrievalEngine,
    corpus: Corpus,
    model: Arc<dyn CompletionModel>,
    availability: Arc<AvailabilityCache>,
}

impl DocumentHandler {
    pub fn new(corpus: Corpus, model: Arc<dyn CompletionModel>) -> Self {
        Self {
            engine: RetrievalEngine::new(),
            corpus,
            model,
            availability: Arc::new(AvailabilityCache::default()),
        }
    }

    pub fn with_engine(mut self, engine: RetrievalEngine) -> Self {
        self.engine = engine;
        self
    }

    async fn synthesize(&self, query: &str, context: &str) -> String {
        if self.availability.check(self.model.as_ref()).await {
            let mut values = HashMap::new();
            values.insert("context".to_string(), context.to_string());
            values.insert("question".to_string(), query.to_string());

            // The template is a compile-time constant; rendering it
            // cannot miss a variable.
            if let Ok(prompt) = PromptTemplate::new(SYNTHESIS_TEMPLATE).render(&values) {
                match self.model.complete(CompletionRequest::answering(prompt)).await {
                    Ok(text) if !text.trim().is_empty() => return text,
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "answer synthesis failed, formatting context");
                        self.availability.mark_unavailable().await;
                    }
                }
            }
        }

        format_context_extract(context)
    }
}

#[async_trait]
impl Handler for DocumentHandler {
    async fn handle(&self, query: &str) -> Result<Answer, DocentError> {
        match self.engine.retrieve(query, &self.corpus) {
            RetrievalOutcome::Empty { terms } => Ok(Answer {
                answer: no_match_message(&terms),
                sources: Vec::new(),
            }),
            RetrievalOutcome::Matches(chunks) => {
                let context = chunks
                    .iter()
                    .map(|c| c.content.as_str())
                    .collect::<Vec<_>>()
                    .join("\n\n");
                let sources = chunks.iter().map(|c| c.metadata.clone()).collect();

                Ok(Answer {
                    answer: self.synthesize(query, &context).await,
                    sources,
                })
            }
        }
    }
}

/// Runs a bound prompt through the completion model; for routes whose
/// answer is generated rather than retrieved (e.g. a finance assistant).
pub struct CompletionHandler {
    system: String,
    model: Arc<dyn CompletionModel>,
}

impl CompletionHandler {
    pub fn new(system: impl Into<String>, model: Arc<dyn CompletionModel>) -> Self {
        Self {
            system: system.into(),
            model,
        }
    }
}

#[async_trait]
impl Handler for CompletionHandler {
    async fn handle(&self, query: &str) -> Result<Answer, DocentError> {
        let mut state = ConversationState::new(query);
        state.prompt = self.system.clone();
        let prompt = render_node_prompt(&state);

        let answer = match self.model.complete(CompletionRequest::answering(prompt)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "completion handler failed");
                "I'm unable to answer that right now. Please try again later.".to_string()
            }
        };

        Ok(Answer {
            answer,
            sources: Vec::new(),
        })
    }
}

/// Replies with a canned message; the usual fallback route.
pub struct StaticHandler {
    reply: String,
}

impl StaticHandler {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl Handler for StaticHandler {
    async fn handle(&self, _query: &str) -> Result<Answer, DocentError> {
        Ok(Answer {
            answer: self.reply.clone(),
            sources: Vec::new(),
        })
    }
}

/// User-facing message naming the search terms that were tried.
fn no_match_message(terms: &[String]) -> String {
    if terms.is_empty() {
        return "I couldn't find any information matching your question. \
                Please try using different keywords."
            .to_string();
    }
    let shown = terms
        .iter()
        .take(5)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "I couldn't find any information containing: {shown}. Please try \
         using different keywords or check if the information exists in \
         your documents."
    )
}

/// Degraded reply when no model is available: deduplicated context
/// lines, noise dropped, capped at ten entries.
fn format_context_extract(context: &str) -> String {
    let mut seen = HashSet::new();
    let mut entries: Vec<&str> = Vec::new();
    for line in context.lines() {
        let line = line.trim();
        if line.len() < 3
            || !line.chars().any(char::is_alphanumeric)
            || line.chars().all(|c| c.is_ascii_digit())
        {
            continue;
        }
        if seen.insert(line) {
            entries.push(line);
        }
    }

    if entries.is_empty() {
        return "I found some data but it appears to be incomplete or unclear. \
                Please try rephrasing your question."
            .to_string();
    }

    let mut reply = String::from("Based on the available data, here's what I found:\n\n");
    let shown = entries.len().min(10);
    reply.push_str(&entries[..shown].join("\n"));
    if entries.len() > shown {
        reply.push_str(&format!("\n\n... and {} more entries", entries.len() - shown));
    }
    reply
}
