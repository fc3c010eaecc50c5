use std::sync::Arc;
use std::time::Duration;

use docent_core::{ConversationState, DocentError};
use docent_graph::Classifier;
use docent_models::{AvailabilityCache, ScriptedCompletionModel};

fn labels() -> Vec<String> {
    vec![
        "documents".to_string(),
        "finance".to_string(),
        "fallback".to_string(),
    ]
}

fn classifier(model: Arc<ScriptedCompletionModel>) -> Classifier {
    Classifier::new(
        model,
        Arc::new(AvailabilityCache::new(Duration::from_secs(60))),
        labels(),
        "fallback",
        Duration::from_secs(1),
    )
}

fn state(input: &str) -> ConversationState {
    ConversationState::new(input)
}

#[tokio::test]
async fn exact_label_is_returned() {
    let model = Arc::new(ScriptedCompletionModel::new(vec!["documents"]));
    let classifier = classifier(Arc::clone(&model));
    assert_eq!(classifier.classify(&state("salary?")).await, "documents");
}

#[tokio::test]
async fn label_embedded_in_prose_is_recognized() {
    let model = Arc::new(ScriptedCompletionModel::new(vec![
        "Sure! The best route here is documents, because the query mentions a file.",
    ]));
    let classifier = classifier(model);
    assert_eq!(classifier.classify(&state("salary?")).await, "documents");
}

#[tokio::test]
async fn case_folded_containment() {
    let model = Arc::new(ScriptedCompletionModel::new(vec!["  FINANCE\n"]));
    let classifier = classifier(model);
    assert_eq!(classifier.classify(&state("tax?")).await, "finance");
}

#[tokio::test]
async fn ambiguous_output_resolves_to_first_declared() {
    // Both labels present; "documents" is declared first, so it wins
    // even though "finance" appears first in the text.
    let model = Arc::new(ScriptedCompletionModel::new(vec![
        "finance or documents, hard to say",
    ]));
    let classifier = classifier(model);
    assert_eq!(classifier.classify(&state("?")).await, "documents");
}

#[tokio::test]
async fn unrecognized_output_falls_back() {
    let model = Arc::new(ScriptedCompletionModel::new(vec!["banana"]));
    let classifier = classifier(model);
    assert_eq!(classifier.classify(&state("?")).await, "fallback");
}

#[tokio::test]
async fn code_like_output_without_label_falls_back() {
    let model = Arc::new(ScriptedCompletionModel::new(vec![
        "def route(query):\n    return best_agent(query)",
    ]));
    let classifier = classifier(model);
    assert_eq!(classifier.classify(&state("?")).await, "fallback");
}

#[tokio::test]
async fn empty_and_too_short_output_fall_back() {
    let model = Arc::new(ScriptedCompletionModel::new(vec!["", "x"]));
    let classifier = classifier(model);
    assert_eq!(classifier.classify(&state("?")).await, "fallback");
    assert_eq!(classifier.classify(&state("?")).await, "fallback");
}

#[tokio::test]
async fn backend_error_falls_back_and_marks_unavailable() {
    let model = Arc::new(ScriptedCompletionModel::with_results(vec![
        Err(DocentError::Model("connection refused".to_string())),
        Ok("documents".to_string()),
    ]));
    let classifier = classifier(Arc::clone(&model));

    assert_eq!(classifier.classify(&state("?")).await, "fallback");
    // The failure poisoned the availability window: the second call
    // short-circuits without reaching the model.
    assert_eq!(classifier.classify(&state("?")).await, "fallback");
    assert_eq!(model.calls().await, 1);
}

#[tokio::test]
async fn unavailable_backend_short_circuits() {
    let model = Arc::new(ScriptedCompletionModel::new(vec!["documents"]));
    model.set_available(false);
    let classifier = classifier(Arc::clone(&model));

    assert_eq!(classifier.classify(&state("?")).await, "fallback");
    assert_eq!(model.calls().await, 0);
}

#[tokio::test]
async fn slow_backend_times_out_to_fallback() {
    let model = Arc::new(
        ScriptedCompletionModel::new(vec!["documents"]).with_delay(Duration::from_millis(100)),
    );
    let classifier = Classifier::new(
        model.clone(),
        Arc::new(AvailabilityCache::new(Duration::from_secs(60))),
        labels(),
        "fallback",
        Duration::from_millis(10),
    );

    assert_eq!(classifier.classify(&state("?")).await, "fallback");
}

#[tokio::test]
async fn template_input_placeholder_is_rendered() {
    let model = Arc::new(ScriptedCompletionModel::new(vec!["documents"]));
    let classifier = classifier(Arc::clone(&model));

    let mut state = state("show salary details");
    state.prompt = "Route this query: {{input}}. Answer with one word.".to_string();
    classifier.classify(&state).await;

    let prompts = model.prompts().await;
    assert_eq!(
        prompts[0],
        "Route this query: show salary details. Answer with one word."
    );
}

#[tokio::test]
async fn template_without_placeholder_gets_input_appended() {
    let model = Arc::new(ScriptedCompletionModel::new(vec!["documents"]));
    let classifier = classifier(Arc::clone(&model));

    let mut state = state("show salary details");
    state.prompt = "Pick one of: documents, finance, fallback.".to_string();
    classifier.classify(&state).await;

    let prompts = model.prompts().await;
    assert!(prompts[0].starts_with("Pick one of:"));
    assert!(prompts[0].ends_with("show salary details"));
}

#[tokio::test]
async fn no_template_sends_raw_input() {
    let model = Arc::new(ScriptedCompletionModel::new(vec!["documents"]));
    let classifier = classifier(Arc::clone(&model));

    classifier.classify(&state("show salary details")).await;
    assert_eq!(model.prompts().await[0], "show salary details");
}
