use std::collections::HashMap;

use docent_core::PromptTemplate;

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn renders_variables() {
    let template = PromptTemplate::new("Route this query: {{input}}");
    let out = template.render(&vars(&[("input", "show salary details")])).unwrap();
    assert_eq!(out, "Route this query: show salary details");
}

#[test]
fn tolerates_inner_whitespace() {
    let template = PromptTemplate::new("Q: {{ question }}");
    let out = template.render(&vars(&[("question", "why?")])).unwrap();
    assert_eq!(out, "Q: why?");
    assert!(template.references("question"));
}

#[test]
fn missing_variable_is_an_error() {
    let template = PromptTemplate::new("{{absent}}");
    let err = template.render(&vars(&[])).unwrap_err();
    assert!(err.to_string().contains("absent"));
}

#[test]
fn references_reports_placeholders_only() {
    let template = PromptTemplate::new("classify {{input}} now");
    assert!(template.references("input"));
    assert!(!template.references("output"));
    assert!(!PromptTemplate::new("plain text").references("input"));
}

#[test]
fn unterminated_placeholder_is_literal() {
    let template = PromptTemplate::new("keep {{this");
    let out = template.render(&vars(&[])).unwrap();
    assert_eq!(out, "keep {{this");
}
