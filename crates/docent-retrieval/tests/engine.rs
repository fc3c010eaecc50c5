use docent_core::Chunk;
use docent_retrieval::{Corpus, RetrievalEngine, RetrievalOutcome};

fn corpus(entries: &[(&str, &str)]) -> Corpus {
    Corpus::from_chunks(
        entries
            .iter()
            .map(|(id, content)| Chunk::new(*id, *content).with_source(format!("{id}.txt")))
            .collect(),
    )
}

#[test]
fn salary_query_matches_and_narrows() {
    let corpus = corpus(&[(
        "hr_chunk0",
        "Employee Name: Alice, Salary: 5000. Office: Berlin. Reviewed annually",
    )]);
    let outcome = RetrievalEngine::new().retrieve("show me salary details", &corpus);

    let matches = outcome.matches();
    assert_eq!(matches.len(), 1);
    assert!(matches[0].score > 0.0);
    assert!(matches[0].score <= 1.0);
    assert!(matches[0].content.contains("Salary: 5000"));
    // Narrowing cut the unrelated sentences.
    assert!(!matches[0].content.contains("Berlin"));
    assert_eq!(matches[0].metadata["source"], "hr_chunk0.txt");
}

#[test]
fn empty_corpus_yields_explicit_no_match_with_terms() {
    let outcome = RetrievalEngine::new().retrieve("show me salary details", &Corpus::default());

    match outcome {
        RetrievalOutcome::Empty { terms } => {
            assert!(terms.contains(&"salary".to_string()));
        }
        RetrievalOutcome::Matches(_) => panic!("expected Empty outcome"),
    }
}

#[test]
fn zero_match_chunks_never_appear() {
    let corpus = corpus(&[
        ("a", "Quarterly revenue grew by ten percent."),
        ("b", "The office dog is named Pixel."),
    ]);
    let outcome = RetrievalEngine::new().retrieve("show me salary details", &corpus);
    assert!(outcome.is_empty());
}

#[test]
fn more_matched_terms_score_higher() {
    let corpus = corpus(&[
        ("one_term", "The salary table is stored here."),
        ("three_terms", "Full salary details for every employee."),
    ]);
    let outcome = RetrievalEngine::new().retrieve("show me salary details", &corpus);

    let matches = outcome.matches();
    assert_eq!(matches[0].id, "three_terms");
    assert!(matches[0].score > matches[1].score);
}

#[test]
fn phrase_match_earns_bonus() {
    let plain = corpus(&[("k", "the salary is listed")]);
    let phrased = corpus(&[("p", "show me salary figures here")]);

    let engine = RetrievalEngine::new();
    let keyword_score = engine.retrieve("show me salary details", &plain).matches()[0].score;
    let phrase_score = engine.retrieve("show me salary details", &phrased).matches()[0].score;

    // The phrased chunk matched the multi-word term "show me salary"
    // and earns the bonus on top of its containment score.
    assert!(phrase_score > keyword_score);
}

#[test]
fn score_is_capped_at_one() {
    // Every expanded term matches, plus a multi-word phrase: the bonus
    // would push past 1.0 without the cap.
    let corpus = corpus(&[("all", "salarys detials salary data show me salary details")]);
    let outcome = RetrievalEngine::new().retrieve("show me salary details", &corpus);
    let score = outcome.matches()[0].score;
    assert!(score <= 1.0);
    assert!(score > 0.9);
}

#[test]
fn returns_at_most_three_sorted_desc_ties_in_corpus_order() {
    let corpus = corpus(&[
        ("tie_first", "salary"),
        ("rich", "salary details for staff"),
        ("tie_second", "salary"),
        ("tie_third", "salary"),
    ]);
    let outcome = RetrievalEngine::new().retrieve("show me salary details", &corpus);

    let ids: Vec<&str> = outcome.matches().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["rich", "tie_first", "tie_second"]);

    let scores: Vec<f64> = outcome.matches().iter().map(|m| m.score).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn retrieval_is_idempotent() {
    let corpus = corpus(&[
        ("a", "salary data for the team"),
        ("b", "milestone details and dates"),
        ("c", "salary details appendix"),
    ]);
    let engine = RetrievalEngine::new();

    let first = engine.retrieve("show me salary details", &corpus);
    let second = engine.retrieve("show me salary details", &corpus);

    let ids = |o: &RetrievalOutcome| -> Vec<String> {
        o.matches().iter().map(|m| m.id.clone()).collect()
    };
    let scores = |o: &RetrievalOutcome| -> Vec<f64> {
        o.matches().iter().map(|m| m.score).collect()
    };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(scores(&first), scores(&second));
}

#[test]
fn typo_in_query_still_matches_correct_form() {
    let corpus = corpus(&[("a", "Milestone plan: ship in June.")]);
    let outcome = RetrievalEngine::new().retrieve("mailestone detials", &corpus);
    assert_eq!(outcome.matches().len(), 1);
    assert!(outcome.matches()[0].content.contains("Milestone plan"));
}

#[test]
fn stopword_only_query_is_empty() {
    let corpus = corpus(&[("a", "salary data")]);
    let outcome = RetrievalEngine::new().retrieve("what is the", &corpus);
    assert!(outcome.is_empty());
}
