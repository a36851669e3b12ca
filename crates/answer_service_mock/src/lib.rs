//! Deterministic mock implementation of the shared `answer_service` contract.
//!
//! This crate contains no transport logic and is intended for local
//! development and contract-level testing of the client core.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use answer_service::{
    AnswerService, AskReply, AskRequest, HealthStatus, HistoryRecord, ServiceError,
    ServiceProfile,
};

/// Stable service identifier used for explicit startup selection.
pub const MOCK_SERVICE_ID: &str = "mock";

/// Confidence reported by the fallback answer when no outcome is scripted.
pub const FALLBACK_CONFIDENCE: f64 = 0.75;

/// Scripted result of one `ask` call.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOutcome {
    Reply(AskReply),
    Fail(ServiceError),
    /// Panics inside the service call, for exercising settlement guarantees.
    Panic(String),
}

impl MockOutcome {
    #[must_use]
    pub fn reply(answer: impl Into<String>, confidence: Option<f64>) -> Self {
        Self::Reply(AskReply::new(answer, confidence))
    }

    #[must_use]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Fail(ServiceError::rejected(Some(status), message))
    }

    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Fail(ServiceError::unavailable(reason))
    }
}

#[derive(Debug, Default)]
struct GateState {
    waiting: usize,
    permits: usize,
}

#[derive(Debug, Default)]
struct GateShared {
    state: Mutex<GateState>,
    changed: Condvar,
}

/// Holds `ask` calls open until the test releases them.
#[derive(Debug, Clone, Default)]
pub struct MockGate {
    shared: Arc<GateShared>,
}

impl MockGate {
    /// Lets one held (or future) `ask` call proceed.
    pub fn release_one(&self) {
        let mut state = lock_unpoisoned(&self.shared.state);
        state.permits += 1;
        self.shared.changed.notify_all();
    }

    /// Blocks until at least `count` calls are held at the gate or `timeout` elapses.
    pub fn wait_for_waiters(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = lock_unpoisoned(&self.shared.state);

        while state.waiting < count {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }

            state = match self.shared.changed.wait_timeout(state, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }

        true
    }

    fn pass(&self) {
        let mut state = lock_unpoisoned(&self.shared.state);
        state.waiting += 1;
        self.shared.changed.notify_all();

        while state.permits == 0 {
            state = match self.shared.changed.wait(state) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }

        state.permits -= 1;
        state.waiting -= 1;
        self.shared.changed.notify_all();
    }
}

/// Deterministic mock service used by client tests and local runs.
#[derive(Debug)]
pub struct MockAnswerService {
    outcomes: Mutex<VecDeque<MockOutcome>>,
    history: Mutex<Result<Vec<HistoryRecord>, ServiceError>>,
    health: HealthStatus,
    delay: Duration,
    gate: Option<MockGate>,
    asked: Mutex<Vec<String>>,
    ask_calls: AtomicUsize,
    history_calls: AtomicUsize,
}

impl MockAnswerService {
    /// Creates a mock with empty history and no scripted outcomes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            history: Mutex::new(Ok(Vec::new())),
            health: HealthStatus {
                status: "healthy".to_string(),
                model_loaded: true,
                knowledge_base_loaded: true,
            },
            delay: Duration::ZERO,
            gate: None,
            asked: Mutex::new(Vec::new()),
            ask_calls: AtomicUsize::new(0),
            history_calls: AtomicUsize::new(0),
        }
    }

    /// Creates a mock that answers `ask` calls with `outcomes` in order.
    #[must_use]
    pub fn with_outcomes(outcomes: Vec<MockOutcome>) -> Self {
        let service = Self::new();
        *lock_unpoisoned(&service.outcomes) = outcomes.into();
        service
    }

    #[must_use]
    pub fn with_history(self, records: Vec<HistoryRecord>) -> Self {
        *lock_unpoisoned(&self.history) = Ok(records);
        self
    }

    #[must_use]
    pub fn with_history_failure(self, error: ServiceError) -> Self {
        *lock_unpoisoned(&self.history) = Err(error);
        self
    }

    #[must_use]
    pub fn with_health(mut self, health: HealthStatus) -> Self {
        self.health = health;
        self
    }

    /// Sleeps `delay` inside every `ask` call.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Holds every `ask` call until the returned gate releases it.
    #[must_use]
    pub fn gated(mut self) -> (Self, MockGate) {
        let gate = MockGate::default();
        self.gate = Some(gate.clone());
        (self, gate)
    }

    /// Appends an outcome to the script.
    pub fn push_outcome(&self, outcome: MockOutcome) {
        lock_unpoisoned(&self.outcomes).push_back(outcome);
    }

    /// Number of `ask` calls received so far.
    #[must_use]
    pub fn ask_calls(&self) -> usize {
        self.ask_calls.load(Ordering::SeqCst)
    }

    /// Number of `history` calls received so far.
    #[must_use]
    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    /// Questions received by `ask`, in call order.
    #[must_use]
    pub fn asked_questions(&self) -> Vec<String> {
        lock_unpoisoned(&self.asked).clone()
    }

    fn fallback_reply(question: &str) -> AskReply {
        AskReply::new(
            format!("Mock answer for: {question}"),
            Some(FALLBACK_CONFIDENCE),
        )
    }
}

impl Default for MockAnswerService {
    fn default() -> Self {
        Self::new()
    }
}

impl AnswerService for MockAnswerService {
    fn profile(&self) -> ServiceProfile {
        ServiceProfile {
            service_id: MOCK_SERVICE_ID.to_string(),
            endpoint: "memory://mock".to_string(),
        }
    }

    fn history(&self) -> Result<Vec<HistoryRecord>, ServiceError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        lock_unpoisoned(&self.history).clone()
    }

    fn ask(&self, request: AskRequest) -> Result<AskReply, ServiceError> {
        self.ask_calls.fetch_add(1, Ordering::SeqCst);
        lock_unpoisoned(&self.asked).push(request.question.clone());

        if let Some(gate) = &self.gate {
            gate.pass();
        }

        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        let outcome = lock_unpoisoned(&self.outcomes).pop_front();
        match outcome {
            Some(MockOutcome::Reply(reply)) => Ok(reply),
            Some(MockOutcome::Fail(error)) => Err(error),
            Some(MockOutcome::Panic(message)) => panic!("{message}"),
            None => Ok(Self::fallback_reply(&request.question)),
        }
    }

    fn health(&self) -> Result<HealthStatus, ServiceError> {
        Ok(self.health.clone())
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
