//! Error taxonomy surfaced by the client core.

use thiserror::Error;

/// User-facing fallback shown when the service fails without a usable message.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Sorry, there was an error processing your question. Please try again.";

/// Outcome of a submission that did not produce a transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// Input was empty after trimming. Never reaches the service.
    #[error("question is empty")]
    EmptyInput,
    /// A request is already in flight. Never reaches the service.
    #[error("a question is already being answered")]
    Busy,
    /// The service answered with an explicit error message.
    #[error("{0}")]
    RemoteRejected(String),
    /// The exchange failed without a usable service message.
    #[error("answering service unavailable")]
    RemoteUnavailable,
}

impl SubmissionError {
    /// Text suitable for showing next to the input.
    pub fn user_message(&self) -> &str {
        match self {
            Self::EmptyInput => "Please enter a question.",
            Self::Busy => "Please wait for the current answer before asking again.",
            Self::RemoteRejected(message) => message,
            Self::RemoteUnavailable => GENERIC_FAILURE_MESSAGE,
        }
    }

    /// Whether the error was decided locally without contacting the service.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::Busy)
    }
}

/// Startup history restore failed. Logged, never surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("history unavailable: {reason}")]
pub struct HistoryUnavailable {
    pub reason: String,
}

/// A restored record that cannot become a transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryRecordError {
    #[error("history record has a blank question")]
    BlankQuestion,
    #[error("history record has an unparseable timestamp '{0}'")]
    InvalidTimestamp(String),
}
