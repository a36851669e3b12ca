//! Client core for an interactive question-and-answer desk.
//!
//! Invariant: single in-flight request. Only
//! `runtime::RequestCoordinator::begin(..)` moves the request slot to Pending,
//! and every `PendingRequest` returns it to Idle when it settles or drops.
//!
//! # Public API Overview
//! - Keep the ordered transcript in [`TranscriptStore`], restored once per
//!   session from the service's history.
//! - Submit questions through [`RequestCoordinator`], either in one call
//!   ([`RequestCoordinator::submit`]) or split across threads
//!   ([`RequestCoordinator::begin`] then [`RequestCoordinator::complete`]).
//! - Route key presses through [`classify_key`] for soft submit.
//! - Configure from the environment with [`EnvConfig`] and install tracing with
//!   [`logging::init_logging`].

pub mod config;
pub mod logging;

pub mod core;
pub mod runtime;

/// Transcript data model.
pub use crate::core::entry::{parse_service_timestamp, Confidence, TranscriptEntry};
pub use crate::core::transcript::TranscriptStore;

/// Draft and key handling.
pub use crate::core::draft::InputDraft;
pub use crate::core::keys::{
    classify_key, split_line_terminator, Key, KeyAction, KeyOutcome, KeyPress, Modifiers,
};

/// Error taxonomy.
pub use crate::core::error::{
    HistoryRecordError, HistoryUnavailable, SubmissionError, GENERIC_FAILURE_MESSAGE,
};

/// Request coordination.
pub use crate::runtime::{KeyDispatch, PendingRequest, RequestCoordinator, RequestState};

/// Environment configuration.
pub use crate::config::{ConfigError, EnvConfig};
