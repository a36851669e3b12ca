use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::AnswerApiConfig;
use crate::error::{parse_error_message, AnswerApiError};
use crate::headers::build_headers;
use crate::payload::{AskPayload, AskResponse, HealthResponse, HistoryResponse};
use crate::url::{endpoint_url, normalize_base_url, Endpoint};

#[derive(Debug)]
pub struct AnswerApiClient {
    http: Client,
    config: AnswerApiConfig,
}

impl AnswerApiClient {
    pub fn new(config: AnswerApiConfig) -> Result<Self, AnswerApiError> {
        validate_base_url(&config.base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(AnswerApiError::from)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &AnswerApiConfig {
        &self.config
    }

    pub fn endpoint(&self, endpoint: Endpoint) -> String {
        endpoint_url(&self.config.base_url, endpoint)
    }

    pub fn build_headers(&self, user_agent: Option<&str>) -> Result<HeaderMap, AnswerApiError> {
        let headers = build_headers(&self.config, user_agent);
        let mut out = HeaderMap::new();
        for (key, value) in headers {
            out.insert(
                HeaderName::from_bytes(key.as_bytes())
                    .map_err(|_| AnswerApiError::InvalidHeader(format!("invalid header key: {key}")))?,
                HeaderValue::from_str(&value).map_err(|_| {
                    AnswerApiError::InvalidHeader(format!("invalid header value for {key}"))
                })?,
            );
        }
        Ok(out)
    }

    pub fn build_ask_request(&self, payload: &AskPayload) -> Result<RequestBuilder, AnswerApiError> {
        validate_ask_payload(payload)?;

        let headers = self.build_headers(self.config.user_agent.as_deref())?;
        Ok(self
            .http
            .post(self.endpoint(Endpoint::Ask))
            .headers(headers)
            .json(payload))
    }

    pub fn build_history_request(&self) -> Result<RequestBuilder, AnswerApiError> {
        let headers = self.build_headers(self.config.user_agent.as_deref())?;
        Ok(self.http.get(self.endpoint(Endpoint::History)).headers(headers))
    }

    pub fn build_health_request(&self) -> Result<RequestBuilder, AnswerApiError> {
        let headers = self.build_headers(self.config.user_agent.as_deref())?;
        Ok(self.http.get(self.endpoint(Endpoint::Health)).headers(headers))
    }

    /// Sends one question. Never retries.
    pub async fn ask(&self, question: &str) -> Result<AskResponse, AnswerApiError> {
        let request = self.build_ask_request(&AskPayload::new(question))?;
        self.send_json(request).await
    }

    /// Fetches recorded history. A success body carrying `error` is a failure.
    pub async fn history(&self) -> Result<HistoryResponse, AnswerApiError> {
        let request = self.build_history_request()?;
        let response: HistoryResponse = self.send_json(request).await?;

        if let Some(message) = response.error.as_deref() {
            if !message.trim().is_empty() {
                return Err(AnswerApiError::ServiceReported(message.to_owned()));
            }
        }

        Ok(response)
    }

    pub async fn health(&self) -> Result<HealthResponse, AnswerApiError> {
        let request = self.build_health_request()?;
        self.send_json(request).await
    }

    async fn send_json<T>(&self, request: RequestBuilder) -> Result<T, AnswerApiError>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(AnswerApiError::from)?;
        let response = error_for_status(response).await?;
        let body = response.bytes().await.map_err(AnswerApiError::from)?;

        serde_json::from_slice(&body)
            .map_err(|error| AnswerApiError::MalformedResponse(error.to_string()))
    }
}

async fn error_for_status(response: Response) -> Result<Response, AnswerApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AnswerApiError::Status {
        status,
        message: parse_error_message(&body),
    })
}

fn validate_base_url(base_url: &str) -> Result<(), AnswerApiError> {
    let normalized = normalize_base_url(base_url);
    let parsed = url::Url::parse(&normalized)
        .map_err(|error| AnswerApiError::InvalidBaseUrl(format!("{normalized}: {error}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AnswerApiError::InvalidBaseUrl(format!(
            "{normalized}: unsupported scheme '{other}'"
        ))),
    }
}

fn validate_ask_payload(payload: &AskPayload) -> Result<(), AnswerApiError> {
    if payload.question.trim().is_empty() {
        return Err(AnswerApiError::InvalidRequestPayload(
            "'question' must not be blank".to_owned(),
        ));
    }

    Ok(())
}
