use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug)]
pub enum AnswerApiError {
    InvalidBaseUrl(String),
    InvalidHeader(String),
    InvalidRequestPayload(String),
    Request(reqwest::Error),
    Status {
        status: StatusCode,
        message: Option<String>,
    },
    /// A success status whose body still carried an `error` field.
    ServiceReported(String),
    MalformedResponse(String),
    Runtime(String),
}

impl AnswerApiError {
    /// HTTP status of a failed response, when the request got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(error) => error.status(),
            _ => None,
        }
    }

    /// Service-provided error text, when present and not blank.
    pub fn structured_message(&self) -> Option<&str> {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } => non_empty_string(message),
            Self::ServiceReported(message) => non_empty_string(message),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(error) if error.is_timeout())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    #[serde(default)]
    pub error: Option<ErrorField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorField {
    Text(String),
    Detailed { message: Option<String> },
}

impl ErrorField {
    fn message(&self) -> Option<&str> {
        match self {
            Self::Text(text) => non_empty_string(text),
            Self::Detailed { message } => message.as_deref().and_then(non_empty_string),
        }
    }
}

impl fmt::Display for AnswerApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBaseUrl(value) => write!(f, "invalid base URL: {value}"),
            Self::InvalidHeader(message) => write!(f, "invalid header: {message}"),
            Self::InvalidRequestPayload(message) => {
                write!(f, "invalid request payload: {message}")
            }
            Self::Request(error) if error.is_timeout() => write!(f, "request timed out: {error}"),
            Self::Request(error) => write!(f, "request error: {error}"),
            Self::Status {
                status,
                message: Some(message),
            } => write!(f, "HTTP {}: {message}", status.as_u16()),
            Self::Status {
                status,
                message: None,
            } => write!(f, "HTTP {status}"),
            Self::ServiceReported(message) => write!(f, "service reported error: {message}"),
            Self::MalformedResponse(message) => write!(f, "malformed response: {message}"),
            Self::Runtime(message) => write!(f, "runtime failure: {message}"),
        }
    }
}

impl std::error::Error for AnswerApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(error) => Some(error),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AnswerApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Request(error)
    }
}

/// Extracts the service's `error` message from a response body.
///
/// Accepts both `{"error": "text"}` and `{"error": {"message": "text"}}`.
/// Returns `None` for non-JSON bodies and blank or missing messages.
pub fn parse_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<ErrorPayload>(body).ok()?;
    parsed
        .error
        .as_ref()
        .and_then(ErrorField::message)
        .map(str::to_owned)
}

fn non_empty_string(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_message_ignores_blank_status_messages() {
        let blank = AnswerApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: Some("  ".to_owned()),
        };
        let missing = AnswerApiError::Status {
            status: StatusCode::BAD_GATEWAY,
            message: None,
        };

        assert_eq!(blank.structured_message(), None);
        assert_eq!(missing.structured_message(), None);
        assert_eq!(missing.status(), Some(StatusCode::BAD_GATEWAY));
    }

    #[test]
    fn status_display_prefers_service_message() {
        let error = AnswerApiError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: None,
        };

        assert_eq!(error.to_string(), "HTTP 503 Service Unavailable");

        let error = AnswerApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: Some("model unavailable".to_owned()),
        };
        assert_eq!(error.to_string(), "HTTP 500: model unavailable");
    }
}
