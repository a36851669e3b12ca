use std::time::Duration;

use answer_api::headers::{default_user_agent, HEADER_USER_AGENT};
use answer_api::{AnswerApiClient, AnswerApiConfig, AnswerApiError, AskPayload, Endpoint};

#[test]
fn ask_request_posts_json_to_ask_endpoint() {
    let config = AnswerApiConfig::new("http://127.0.0.1:5000/");
    let client = AnswerApiClient::new(config).expect("client");

    let http_request = client
        .build_ask_request(&AskPayload::new("What is time management?"))
        .expect("build request")
        .build()
        .expect("request");

    assert_eq!(http_request.url().as_str(), "http://127.0.0.1:5000/ask");
    assert_eq!(http_request.method(), "POST");
    assert_eq!(
        http_request.headers()["content-type"],
        "application/json"
    );

    let body = http_request
        .body()
        .and_then(|body| body.as_bytes())
        .expect("json body is buffered");
    let value: serde_json::Value = serde_json::from_slice(body).expect("body is json");
    assert_eq!(value["question"], "What is time management?");
}

#[test]
fn history_and_health_requests_use_get() {
    let client = AnswerApiClient::new(AnswerApiConfig::new("http://localhost:5000"))
        .expect("client");

    let history = client
        .build_history_request()
        .expect("history request")
        .build()
        .expect("request");
    assert_eq!(history.method(), "GET");
    assert_eq!(history.url().as_str(), client.endpoint(Endpoint::History));

    let health = client
        .build_health_request()
        .expect("health request")
        .build()
        .expect("request");
    assert_eq!(health.method(), "GET");
    assert_eq!(health.url().as_str(), "http://localhost:5000/health");
}

#[test]
fn user_agent_defaults_and_overrides() {
    let client = AnswerApiClient::new(AnswerApiConfig::default()).expect("client");
    let headers = client.build_headers(None).expect("headers");
    assert_eq!(headers[HEADER_USER_AGENT], default_user_agent().as_str());

    let client = AnswerApiClient::new(
        AnswerApiConfig::default()
            .with_user_agent("desk-test/1.0")
            .insert_header("X-Trace", "abc"),
    )
    .expect("client");
    let headers = client
        .build_headers(client.config().user_agent.as_deref())
        .expect("headers");
    assert_eq!(headers[HEADER_USER_AGENT], "desk-test/1.0");
    assert_eq!(headers["x-trace"], "abc");
}

#[test]
fn blank_question_is_rejected_before_sending() {
    let client = AnswerApiClient::new(AnswerApiConfig::default()).expect("client");

    let error = client
        .build_ask_request(&AskPayload::new("  "))
        .expect_err("blank question must not build");

    assert!(matches!(error, AnswerApiError::InvalidRequestPayload(_)));
}

#[test]
fn invalid_base_url_fails_client_construction() {
    let error = AnswerApiClient::new(
        AnswerApiConfig::new("mailto:someone@example.com").with_timeout(Duration::from_secs(5)),
    )
    .expect_err("non-http scheme should fail");

    assert!(matches!(error, AnswerApiError::InvalidBaseUrl(_)));
}
