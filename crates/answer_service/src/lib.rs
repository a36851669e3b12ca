//! Minimal transport-agnostic contract for talking to a remote answering service.
//!
//! This crate defines only the request/reply shapes the client core consumes
//! and the two-way failure classification it relies on. It excludes transport
//! details, wire payloads, and client-side state.

use std::fmt;

/// Error returned while constructing/configuring a service before any exchange starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInitError {
    message: String,
}

impl ServiceInitError {
    /// Creates a new service initialization error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the underlying error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ServiceInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ServiceInitError {}

impl From<String> for ServiceInitError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ServiceInitError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Failure of one remote call, already classified by the service adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The service answered with an explicit error message.
    Rejected {
        status: Option<u16>,
        message: String,
    },
    /// The call could not complete or produced nothing usable.
    Unavailable { reason: String },
}

impl ServiceError {
    #[must_use]
    pub fn rejected(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Returns the service-provided message when one is present and not blank.
    #[must_use]
    pub fn structured_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected {
                status: Some(status),
                message,
            } => write!(f, "service rejected request (HTTP {status}): {message}"),
            Self::Rejected {
                status: None,
                message,
            } => write!(f, "service rejected request: {message}"),
            Self::Unavailable { reason } => write!(f, "service unavailable: {reason}"),
        }
    }
}

impl std::error::Error for ServiceError {}

/// One question sent to the service. `question` is already trimmed by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskRequest {
    pub question: String,
}

impl AskRequest {
    #[must_use]
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// Successful answer for one question.
#[derive(Debug, Clone, PartialEq)]
pub struct AskReply {
    pub answer: String,
    pub confidence: Option<f64>,
}

impl AskReply {
    #[must_use]
    pub fn new(answer: impl Into<String>, confidence: Option<f64>) -> Self {
        Self {
            answer: answer.into(),
            confidence,
        }
    }
}

/// One restored exchange as the service reports it.
///
/// `timestamp` is kept as the raw service string; interpretation belongs to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub timestamp: String,
    pub question: String,
    pub answer: String,
    pub confidence: Option<f64>,
}

/// Service liveness report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    pub knowledge_base_loaded: bool,
}

impl HealthStatus {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") && self.model_loaded && self.knowledge_base_loaded
    }
}

/// Immutable metadata describing a service binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceProfile {
    pub service_id: String,
    pub endpoint: String,
}

/// Remote answering service as seen by the client core.
///
/// Calls are blocking and run to completion; there is no cancellation hook.
pub trait AnswerService: Send + Sync + 'static {
    /// Returns service identity metadata.
    fn profile(&self) -> ServiceProfile;

    /// Fetches the recorded history in service order.
    fn history(&self) -> Result<Vec<HistoryRecord>, ServiceError>;

    /// Performs exactly one question/answer exchange.
    fn ask(&self, request: AskRequest) -> Result<AskReply, ServiceError>;

    /// Reports service liveness.
    ///
    /// Services may return an error when health probing is unsupported.
    fn health(&self) -> Result<HealthStatus, ServiceError> {
        Err(ServiceError::unavailable(
            "Health checks are not supported by this service",
        ))
    }
}
