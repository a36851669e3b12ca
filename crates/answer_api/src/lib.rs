//! Transport-only client primitives for the remote answering service.
//!
//! This crate owns request building, response parsing, and error extraction
//! for the `/ask`, `/history`, and `/health` endpoints. It contains no client
//! state and no retry policy: every call maps to exactly one HTTP request.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod payload;
pub mod url;

pub use client::AnswerApiClient;
pub use config::AnswerApiConfig;
pub use error::AnswerApiError;
pub use payload::{AskPayload, AskResponse, HealthResponse, HistoryItem, HistoryResponse};
pub use url::{endpoint_url, normalize_base_url, Endpoint};

pub use reqwest::StatusCode;
