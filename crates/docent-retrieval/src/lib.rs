mod engine;
mod terms;

pub use engine::{Corpus, RetrievalEngine, RetrievalOutcome, ScoredChunk};
pub use terms::{extract_keywords, extract_phrases, search_terms};
