use answer_api::error::parse_error_message;

#[test]
fn parse_error_message_reads_flat_error_string() {
    let body = r#"{"error":"model unavailable","answer":"","confidence":0.0}"#;
    assert_eq!(
        parse_error_message(body).as_deref(),
        Some("model unavailable")
    );
}

#[test]
fn parse_error_message_reads_nested_error_message() {
    let body = r#"{"error":{"code":"bad_request","message":"Question is required"}}"#;
    assert_eq!(
        parse_error_message(body).as_deref(),
        Some("Question is required")
    );
}

#[test]
fn parse_error_message_is_none_without_structured_message() {
    assert_eq!(parse_error_message("raw failure text"), None);
    assert_eq!(parse_error_message(""), None);
    assert_eq!(parse_error_message(r#"{"error":""}"#), None);
    assert_eq!(parse_error_message(r#"{"detail":"nope"}"#), None);
    assert_eq!(parse_error_message(r#"{"error":{"code":"x"}}"#), None);
}
