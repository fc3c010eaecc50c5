use docent_core::DocentError;
use docent_models::{CompletionModel, CompletionRequest, ScriptedCompletionModel};

#[tokio::test]
async fn responses_drain_in_order() {
    let model = ScriptedCompletionModel::new(vec!["first", "second"]);

    let a = model
        .complete(CompletionRequest::routing("one"))
        .await
        .unwrap();
    let b = model
        .complete(CompletionRequest::routing("two"))
        .await
        .unwrap();
    assert_eq!((a.as_str(), b.as_str()), ("first", "second"));

    let err = model
        .complete(CompletionRequest::routing("three"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("exhausted"));
}

#[tokio::test]
async fn records_received_prompts() {
    let model = ScriptedCompletionModel::new(vec!["ok"]);
    model
        .complete(CompletionRequest::routing("classify: show salary details"))
        .await
        .unwrap();

    let prompts = model.prompts().await;
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("show salary details"));
    assert_eq!(model.calls().await, 1);
}

#[tokio::test]
async fn scripted_errors_surface() {
    let model = ScriptedCompletionModel::with_results(vec![Err(DocentError::Model(
        "connection refused".to_string(),
    ))]);
    let err = model
        .complete(CompletionRequest::routing("x"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("connection refused"));
}
