use docent_retrieval::{extract_keywords, extract_phrases, search_terms};

#[test]
fn keywords_are_folded_filtered_and_expanded() {
    let keywords = extract_keywords("Show me Salary details");

    for expected in ["salary", "details", "detail", "detials"] {
        assert!(keywords.contains(&expected.to_string()), "missing {expected}");
    }
    // Query verbs and pronouns carry no signal.
    assert!(!keywords.contains(&"show".to_string()));
    assert!(!keywords.contains(&"me".to_string()));
}

#[test]
fn plural_and_singular_variants_are_added() {
    let keywords = extract_keywords("milestones report");
    assert!(keywords.contains(&"milestones".to_string()));
    assert!(keywords.contains(&"milestone".to_string()));
    assert!(keywords.contains(&"report".to_string()));
    assert!(keywords.contains(&"reports".to_string()));
}

#[test]
fn typo_table_is_bidirectional() {
    let misspelled = extract_keywords("mailestone plan");
    assert!(misspelled.contains(&"milestone".to_string()));
    assert!(misspelled.contains(&"milestones".to_string()));

    let correct = extract_keywords("milestone plan");
    assert!(correct.contains(&"mailestone".to_string()));
}

#[test]
fn short_tokens_and_stopwords_are_dropped() {
    assert!(extract_keywords("a is the to x").is_empty());
}

#[test]
fn keywords_are_deduplicated_in_first_seen_order() {
    let keywords = extract_keywords("salary salary budget");
    assert_eq!(keywords, vec!["salary", "salarys", "budget", "budgets"]);
}

#[test]
fn phrase_patterns_capture_word_groups() {
    let phrases = extract_phrases("show me salary details");
    assert!(phrases.contains(&"show me salary".to_string()));
    assert!(phrases.contains(&"me salary details".to_string()));

    let phrases = extract_phrases("provide the system architecture");
    assert!(phrases.contains(&"the system architecture".to_string()));
    assert!(phrases.contains(&"provide the system".to_string()));

    let phrases = extract_phrases("deployment diagram please");
    assert!(phrases.contains(&"deployment".to_string()));
}

#[test]
fn no_patterns_yield_no_phrases() {
    assert!(extract_phrases("what is the budget").is_empty());
}

#[test]
fn search_terms_combine_keywords_then_phrases() {
    let terms = search_terms("show me salary details");

    let salary_pos = terms.iter().position(|t| t == "salary").unwrap();
    let phrase_pos = terms.iter().position(|t| t == "show me salary").unwrap();
    assert!(salary_pos < phrase_pos);

    // Deterministic across calls.
    assert_eq!(terms, search_terms("show me salary details"));
}
