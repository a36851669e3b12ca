use serde::{Deserialize, Serialize};

/// Request body for `POST /ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskPayload {
    pub question: String,
}

impl AskPayload {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// Success body for `POST /ask`.
///
/// The service may echo `question` and add its own `timestamp`; the client
/// keeps them only for diagnostics.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Body for `GET /history`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Option<Vec<HistoryItem>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl HistoryResponse {
    /// Returns the recorded items; a missing or null `history` field is empty.
    pub fn into_items(self) -> Vec<HistoryItem> {
        self.history.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub timestamp: String,
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Body for `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default)]
    pub knowledge_base_loaded: bool,
}
