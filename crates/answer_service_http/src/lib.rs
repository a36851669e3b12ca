//! HTTP-backed implementation of the shared `answer_service` contract.
//!
//! This adapter drives `answer_api` transport calls to completion on a
//! per-call runtime and classifies transport failures into the two-way
//! `ServiceError` taxonomy the client core expects.

use std::sync::Arc;
use std::time::Duration;

use answer_api::{
    normalize_base_url, AnswerApiClient, AnswerApiConfig, AnswerApiError, AskResponse,
    HealthResponse, HistoryItem,
};
use answer_service::{
    AnswerService, AskReply, AskRequest, HealthStatus, HistoryRecord, ServiceError,
    ServiceInitError, ServiceProfile,
};

/// Stable service identifier used for explicit startup selection.
pub const HTTP_SERVICE_ID: &str = "http";

/// Runtime configuration for the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpServiceConfig {
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
}

impl HttpServiceConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn into_answer_api_config(self) -> AnswerApiConfig {
        let mut config = AnswerApiConfig::default();

        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }

        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        config
    }
}

trait Transport: Send + Sync {
    fn endpoint(&self) -> String;
    fn ask(&self, question: &str) -> Result<AskResponse, AnswerApiError>;
    fn history(&self) -> Result<Vec<HistoryItem>, AnswerApiError>;
    fn health(&self) -> Result<HealthResponse, AnswerApiError>;
}

#[derive(Debug)]
struct DefaultTransport {
    client: AnswerApiClient,
}

impl DefaultTransport {
    fn block_on<F, T>(&self, future: F) -> Result<T, AnswerApiError>
    where
        F: std::future::Future<Output = Result<T, AnswerApiError>>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|error| {
                AnswerApiError::Runtime(format!("failed to initialize tokio runtime: {error}"))
            })?;

        runtime.block_on(future)
    }
}

impl Transport for DefaultTransport {
    fn endpoint(&self) -> String {
        normalize_base_url(&self.client.config().base_url)
    }

    fn ask(&self, question: &str) -> Result<AskResponse, AnswerApiError> {
        self.block_on(self.client.ask(question))
    }

    fn history(&self) -> Result<Vec<HistoryItem>, AnswerApiError> {
        self.block_on(self.client.history())
            .map(|response| response.into_items())
    }

    fn health(&self) -> Result<HealthResponse, AnswerApiError> {
        self.block_on(self.client.health())
    }
}

/// `AnswerService` adapter backed by `answer_api` transport primitives.
pub struct HttpAnswerService {
    transport: Arc<dyn Transport>,
}

impl HttpAnswerService {
    /// Creates a service using real HTTP transport.
    pub fn new(config: HttpServiceConfig) -> Result<Self, ServiceInitError> {
        let client =
            AnswerApiClient::new(config.into_answer_api_config()).map_err(map_init_error)?;

        Ok(Self {
            transport: Arc::new(DefaultTransport { client }),
        })
    }

    #[cfg(test)]
    fn with_transport_for_tests(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

impl AnswerService for HttpAnswerService {
    fn profile(&self) -> ServiceProfile {
        ServiceProfile {
            service_id: HTTP_SERVICE_ID.to_string(),
            endpoint: self.transport.endpoint(),
        }
    }

    fn history(&self) -> Result<Vec<HistoryRecord>, ServiceError> {
        let items = self.transport.history().map_err(classify_error)?;

        Ok(items
            .into_iter()
            .map(|item| HistoryRecord {
                timestamp: item.timestamp,
                question: item.question,
                answer: item.answer,
                confidence: item.confidence,
            })
            .collect())
    }

    fn ask(&self, request: AskRequest) -> Result<AskReply, ServiceError> {
        let response = self
            .transport
            .ask(&request.question)
            .map_err(classify_error)?;

        Ok(AskReply::new(response.answer, response.confidence))
    }

    fn health(&self) -> Result<HealthStatus, ServiceError> {
        let response = self.transport.health().map_err(classify_error)?;

        Ok(HealthStatus {
            status: response.status,
            model_loaded: response.model_loaded,
            knowledge_base_loaded: response.knowledge_base_loaded,
        })
    }
}

/// Errors carrying a non-blank service message are rejections; everything
/// else is an availability failure.
fn classify_error(error: AnswerApiError) -> ServiceError {
    match error.structured_message() {
        Some(message) => ServiceError::rejected(
            error.status().map(|status| status.as_u16()),
            message.to_string(),
        ),
        None => ServiceError::unavailable(error.to_string()),
    }
}

fn map_init_error(error: AnswerApiError) -> ServiceInitError {
    ServiceInitError::new(format!("Failed to initialize http answer service: {error}"))
}
