//! Line-oriented terminal client for the question-and-answer desk.
//!
//! ## Service bootstrap
//!
//! - `ASKDESK_SERVICE=http` (default) talks to a running answering service
//! - `ASKDESK_SERVICE=mock` answers locally with deterministic mock replies
//!
//! For `http`, `ASKDESK_BASE_URL` selects the service (default
//! `http://127.0.0.1:5000`) and `ASKDESK_TIMEOUT_SEC` bounds each request.
//! `ASKDESK_SKIP_HISTORY=1` starts with an empty transcript instead of
//! restoring the service's recorded history.
//!
//! ## Input
//!
//! Each line ends with Enter, which submits the draft. End a line with `\` to
//! continue the question on the next line. Slash commands (`/help`, `/clear`,
//! `/history`, `/health`, `/quit`) are handled locally.
//!
//! ## Logging
//!
//! `ASKDESK_LOG` sets the tracing filter and `ASKDESK_LOG_FILE` redirects
//! events away from stderr.

pub mod app;
pub mod commands;
pub mod providers;
pub mod render;
pub mod runtime;
