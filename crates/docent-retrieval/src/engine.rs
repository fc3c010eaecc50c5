use std::collections::HashMap;

use docent_core::Chunk;
use serde_json::Value;

use crate::terms::search_terms;

/// Ordered, immutable snapshot of the ingested corpus.
///
/// Received per retrieval call rather than as a live handle into a
/// store, so concurrent ingestion never interleaves with a query.
/// Chunk order is the corpus order used to break ranking ties.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    chunks: Vec<Chunk>,
}

impl Corpus {
    pub fn from_chunks(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }
}

/// A chunk re-ranked for one query: narrowed content, original
/// metadata, relevance score in [0, 1].
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub id: String,
    pub content: String,
    pub metadata: HashMap<String, Value>,
    pub score: f64,
}

/// Result of a retrieval call.
///
/// `Empty` is an explicit "nothing found" signal distinct from a
/// successful list — it carries the attempted search terms so the
/// caller can render a helpful message.
#[derive(Debug, Clone)]
pub enum RetrievalOutcome {
    Matches(Vec<ScoredChunk>),
    Empty { terms: Vec<String> },
}

impl RetrievalOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, RetrievalOutcome::Empty { .. })
    }

    pub fn matches(&self) -> &[ScoredChunk] {
        match self {
            RetrievalOutcome::Matches(chunks) => chunks,
            RetrievalOutcome::Empty { .. } => &[],
        }
    }
}

/// Hybrid keyword/phrase relevance engine.
///
/// No vector similarity: chunks are scored by lexical term containment,
/// narrowed to their relevant sentences, and ranked.
#[derive(Debug, Clone)]
pub struct RetrievalEngine {
    limit: usize,
    phrase_bonus: f64,
}

impl Default for RetrievalEngine {
    fn default() -> Self {
        Self {
            limit: 3,
            phrase_bonus: 0.2,
        }
    }
}

impl RetrievalEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score, narrow, and rank the corpus against the query. Returns at
    /// most `limit` chunks, best first; ties keep corpus order.
    pub fn retrieve(&self, query: &str, corpus: &Corpus) -> RetrievalOutcome {
        let terms = search_terms(query);
        tracing::debug!(term_count = terms.len(), corpus_size = corpus.len(), "retrieval");

        if corpus.is_empty() || terms.is_empty() {
            return RetrievalOutcome::Empty { terms };
        }

        let mut scored: Vec<ScoredChunk> = Vec::new();
        for chunk in corpus.iter() {
            let content_folded = chunk.content.to_lowercase();
            let matched: Vec<&str> = terms
                .iter()
                .map(String::as_str)
                .filter(|term| content_folded.contains(*term))
                .collect();
            if matched.is_empty() {
                continue;
            }

            // A chunk that matched as a whole but has no narrowable
            // sentence or paragraph is dropped from the results.
            let Some(content) = narrow(&chunk.content, &matched) else {
                continue;
            };

            let base = matched.len() as f64 / terms.len() as f64;
            let bonus = if matched.iter().any(|term| term.contains(' ')) {
                self.phrase_bonus
            } else {
                0.0
            };

            scored.push(ScoredChunk {
                id: chunk.id.clone(),
                content,
                metadata: chunk.metadata.clone(),
                score: (base + bonus).min(1.0),
            });
        }

        if scored.is_empty() {
            return RetrievalOutcome::Empty { terms };
        }

        // Stable sort: equal scores preserve corpus order.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(self.limit);

        RetrievalOutcome::Matches(scored)
    }
}

/// Reduce chunk content to the sentences containing a matched term,
/// falling back to blank-line paragraphs. `None` when neither level
/// contains a term.
fn narrow(content: &str, terms: &[&str]) -> Option<String> {
    let contains_term = |text: &str| {
        let folded = text.to_lowercase();
        terms.iter().any(|term| folded.contains(term))
    };

    let sentences: Vec<&str> = content
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty() && contains_term(s))
        .collect();
    if !sentences.is_empty() {
        return Some(format!("{}.", sentences.join(". ")));
    }

    let paragraphs: Vec<&str> = content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty() && contains_term(p))
        .collect();
    if !paragraphs.is_empty() {
        return Some(paragraphs.join("\n\n"));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::narrow;

    #[test]
    fn keeps_only_sentences_with_a_term() {
        let content = "Name: Alice. Salary: 5000. Hobby: chess";
        assert_eq!(narrow(content, &["salary"]).unwrap(), "Salary: 5000.");
    }

    #[test]
    fn sentence_matches_once_even_with_multiple_terms() {
        let content = "Salary and salaries rose. Nothing else";
        assert_eq!(
            narrow(content, &["salary", "salaries"]).unwrap(),
            "Salary and salaries rose."
        );
    }

    #[test]
    fn falls_back_to_paragraphs_when_a_term_spans_sentences() {
        // A term crossing a sentence delimiter can't match any single
        // sentence, but still matches at paragraph granularity.
        let content = "Phase one. Phase two\n\nUnrelated paragraph";
        assert_eq!(
            narrow(content, &["one. phase"]).unwrap(),
            "Phase one. Phase two"
        );
    }

    #[test]
    fn drops_chunk_when_no_granularity_matches() {
        let content = "Phase one\n\nPhase two";
        assert_eq!(narrow(content, &["one\n\nphase"]), None);
    }
}
