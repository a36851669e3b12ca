use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};

use answer_service::{AnswerService, AskRequest, HealthStatus, ServiceError};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::core::draft::InputDraft;
use crate::core::entry::TranscriptEntry;
use crate::core::error::SubmissionError;
use crate::core::keys::{classify_key, Key, KeyAction, KeyPress};
use crate::core::transcript::{lock_unpoisoned, TranscriptStore};

/// The single request slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Pending { question: String },
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// Proof that the slot is Pending for one question.
///
/// Produced by [`RequestCoordinator::begin`] and consumed by
/// [`RequestCoordinator::complete`]. Not cloneable and not cancellable. Dropping
/// it without completing returns the slot to Idle.
#[must_use = "a pending request holds the slot until it is completed or dropped"]
pub struct PendingRequest {
    question: String,
    slot: Arc<Mutex<RequestState>>,
}

impl PendingRequest {
    /// Trimmed question carried by the request.
    pub fn question(&self) -> &str {
        &self.question
    }
}

impl fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest")
            .field("question", &self.question)
            .finish_non_exhaustive()
    }
}

impl Drop for PendingRequest {
    fn drop(&mut self) {
        *lock_unpoisoned(&self.slot) = RequestState::Idle;
        debug!("request slot idle");
    }
}

/// Result of routing one key press through soft submit.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyDispatch {
    pub action: KeyAction,
    pub default_prevented: bool,
    /// Present when the key ran the submission path.
    pub submission: Option<Result<TranscriptEntry, SubmissionError>>,
}

/// Owns the request slot and merges settled exchanges into the transcript.
pub struct RequestCoordinator {
    service: Arc<dyn AnswerService>,
    transcript: Arc<TranscriptStore>,
    draft: Mutex<InputDraft>,
    slot: Arc<Mutex<RequestState>>,
}

impl RequestCoordinator {
    pub fn new(service: Arc<dyn AnswerService>) -> Self {
        Self::with_transcript(service, Arc::new(TranscriptStore::new()))
    }

    pub fn with_transcript(service: Arc<dyn AnswerService>, transcript: Arc<TranscriptStore>) -> Self {
        Self {
            service,
            transcript,
            draft: Mutex::new(InputDraft::new()),
            slot: Arc::new(Mutex::new(RequestState::Idle)),
        }
    }

    pub fn service(&self) -> &Arc<dyn AnswerService> {
        &self.service
    }

    pub fn transcript(&self) -> &Arc<TranscriptStore> {
        &self.transcript
    }

    /// Restores the transcript from service history. See
    /// [`TranscriptStore::load_initial`].
    pub fn load_initial(&self) -> Vec<TranscriptEntry> {
        self.transcript.load_initial(self.service.as_ref())
    }

    pub fn state(&self) -> RequestState {
        self.lock_slot().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.lock_slot().is_pending()
    }

    /// Whether the submission surface should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_pending()
    }

    pub fn draft(&self) -> InputDraft {
        self.lock_draft().clone()
    }

    pub fn edit_draft<R>(&self, edit: impl FnOnce(&mut InputDraft) -> R) -> R {
        edit(&mut self.lock_draft())
    }

    /// Validates `raw` and moves the slot from Idle to Pending.
    ///
    /// Busy is checked first, so a blank submission while Pending reports
    /// [`SubmissionError::Busy`].
    pub fn begin(&self, raw: &str) -> Result<PendingRequest, SubmissionError> {
        let mut slot = self.lock_slot();
        if slot.is_pending() {
            debug!("submission rejected: request already pending");
            return Err(SubmissionError::Busy);
        }

        let question = raw.trim();
        if question.is_empty() {
            debug!("submission rejected: empty input");
            return Err(SubmissionError::EmptyInput);
        }

        *slot = RequestState::Pending {
            question: question.to_string(),
        };
        debug!(question_chars = question.chars().count(), "request slot pending");

        Ok(PendingRequest {
            question: question.to_string(),
            slot: Arc::clone(&self.slot),
        })
    }

    /// Begins a submission of the current draft text.
    pub fn begin_draft(&self) -> Result<PendingRequest, SubmissionError> {
        let text = self.lock_draft().text().to_string();
        self.begin(&text)
    }

    /// Performs the single remote exchange for `pending` and settles it.
    ///
    /// On success the entry is appended and the draft cleared before the slot
    /// returns to Idle. On failure the transcript and draft are untouched.
    pub fn complete(&self, pending: PendingRequest) -> Result<TranscriptEntry, SubmissionError> {
        let request = AskRequest::new(pending.question());
        let outcome = catch_unwind(AssertUnwindSafe(|| self.service.ask(request)));

        let result = match outcome {
            Ok(Ok(reply)) => {
                let entry = TranscriptEntry::new(
                    OffsetDateTime::now_utc(),
                    pending.question(),
                    reply.answer,
                    reply.confidence,
                );
                self.transcript.append(entry.clone());
                self.lock_draft().clear();
                info!(
                    confidence = ?entry.confidence().map(|confidence| confidence.value()),
                    "exchange answered"
                );
                Ok(entry)
            }
            Ok(Err(error)) => Err(classify_service_error(&error)),
            Err(_) => {
                warn!("answer service panicked during exchange");
                Err(SubmissionError::RemoteUnavailable)
            }
        };

        drop(pending);
        result
    }

    /// Validates, exchanges, and settles in one call.
    pub fn submit(&self, raw: &str) -> Result<TranscriptEntry, SubmissionError> {
        let pending = self.begin(raw)?;
        self.complete(pending)
    }

    /// Submits the current draft text.
    pub fn submit_draft(&self) -> Result<TranscriptEntry, SubmissionError> {
        let pending = self.begin_draft()?;
        self.complete(pending)
    }

    /// Applies one key press to the draft, running the submission path on
    /// a bare Enter.
    pub fn handle_key(&self, press: KeyPress) -> KeyDispatch {
        let outcome = classify_key(press);

        let submission = match outcome.action {
            KeyAction::Submit => Some(self.submit_draft()),
            KeyAction::InsertNewline => {
                self.lock_draft().insert_newline();
                None
            }
            KeyAction::PassThrough => {
                match press.key {
                    Key::Char(ch) if !press.modifiers.ctrl && !press.modifiers.alt => {
                        self.lock_draft().push_char(ch)
                    }
                    Key::Backspace => self.lock_draft().backspace(),
                    _ => {}
                }
                None
            }
        };

        KeyDispatch {
            action: outcome.action,
            default_prevented: outcome.default_prevented,
            submission,
        }
    }

    /// Queries service liveness. A panicking service reports unavailable.
    pub fn health(&self) -> Result<HealthStatus, ServiceError> {
        match catch_unwind(AssertUnwindSafe(|| self.service.health())) {
            Ok(result) => result,
            Err(_) => Err(ServiceError::unavailable(
                "answer service panicked during health check",
            )),
        }
    }

    fn lock_slot(&self) -> MutexGuard<'_, RequestState> {
        lock_unpoisoned(&self.slot)
    }

    fn lock_draft(&self) -> MutexGuard<'_, InputDraft> {
        lock_unpoisoned(&self.draft)
    }
}

fn classify_service_error(error: &ServiceError) -> SubmissionError {
    match error.structured_message() {
        Some(message) => {
            warn!(%error, "answer service rejected question");
            SubmissionError::RemoteRejected(message.to_string())
        }
        None => {
            warn!(%error, "answer service unavailable");
            SubmissionError::RemoteUnavailable
        }
    }
}
