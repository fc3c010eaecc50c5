use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Function words and query verbs that carry no retrieval signal.
const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should", "may", "might", "can", "what", "when", "where", "why", "how", "who", "which",
    "this", "that", "these", "those", "provide", "show", "give", "tell", "me", "about", "from",
    "get", "find", "search", "look", "see", "want", "need", "please", "you", "your",
];

/// Known misspelling ↔ correct-form pairs, expanded in both directions
/// so either side of the pair matches ingested text.
const TYPO_VARIANTS: &[(&str, &[&str])] = &[
    ("mailestone", &["milestone", "milestones"]),
    ("milestone", &["mailestone", "milestones"]),
    ("detials", &["details"]),
    ("details", &["detials"]),
];

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w+").expect("static pattern"))
}

fn phrase_res() -> &'static Vec<Regex> {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        [
            r"(\w+(?:\s+\w+)*)\s+details?",
            r"provide\s+(\w+(?:\s+\w+)*)",
            r"show\s+(\w+(?:\s+\w+)*)",
            r"(\w+(?:\s+\w+)*)\s+information",
            r"(\w+(?:\s+\w+)*)\s+diagram",
            r"(\w+(?:\s+\w+)*)\s+architecture",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("static pattern"))
        .collect()
    })
}

/// Extract search keywords from a query: word tokens, case-folded,
/// stopwords and single characters dropped, expanded with a
/// plural/singular variant and known typo corrections. Deduplicated
/// preserving first-seen order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let folded = text.to_lowercase();

    let mut expanded = Vec::new();
    for m in word_re().find_iter(&folded) {
        let word = m.as_str();
        if word.len() <= 1 || STOPWORDS.contains(&word) {
            continue;
        }

        expanded.push(word.to_string());

        if word.len() > 3 {
            if let Some(singular) = word.strip_suffix('s') {
                expanded.push(singular.to_string());
            } else {
                expanded.push(format!("{word}s"));
            }
        }

        if let Some((_, variants)) = TYPO_VARIANTS.iter().find(|(k, _)| *k == word) {
            expanded.extend(variants.iter().map(|v| v.to_string()));
        }
    }

    dedupe(expanded)
}

/// Collect multi-word search terms from the fixed surface patterns
/// (`<words> details`, `provide <words>`, `show <words>`,
/// `<words> information`, `<words> diagram`, `<words> architecture`).
pub fn extract_phrases(text: &str) -> Vec<String> {
    let folded = text.to_lowercase();

    let mut phrases = Vec::new();
    for re in phrase_res() {
        for captures in re.captures_iter(&folded) {
            if let Some(group) = captures.get(1) {
                let phrase = group.as_str().trim();
                if !phrase.is_empty() {
                    phrases.push(phrase.to_string());
                }
            }
        }
    }

    dedupe(phrases)
}

/// The combined keyword + phrase term set for a query.
pub fn search_terms(query: &str) -> Vec<String> {
    let mut terms = extract_keywords(query);
    terms.extend(extract_phrases(query));
    dedupe(terms)
}

fn dedupe(terms: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    terms
        .into_iter()
        .filter(|term| seen.insert(term.clone()))
        .collect()
}
