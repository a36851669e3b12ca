use std::io::{self, BufRead, Write};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use answer_service::{HealthStatus, ServiceError};
use askdesk::{PendingRequest, RequestCoordinator, SubmissionError, TranscriptEntry};
use tracing::{debug, warn};

use crate::app::{App, HostOps};

/// Everything the UI thread reacts to, funneled through one channel.
#[derive(Debug)]
pub enum RuntimeEvent {
    Line(String),
    InputClosed,
    ExchangeSettled(Result<TranscriptEntry, SubmissionError>),
    HealthChecked(Result<HealthStatus, ServiceError>),
}

/// Host side of [`App`]: spawns workers and tracks render/stop requests.
pub struct RuntimeController {
    coordinator: Arc<RequestCoordinator>,
    events: Sender<RuntimeEvent>,
    next_worker_id: AtomicU64,
    render_requested: bool,
    stop_requested: bool,
}

impl RuntimeController {
    pub fn new(coordinator: Arc<RequestCoordinator>, events: Sender<RuntimeEvent>) -> Self {
        Self {
            coordinator,
            events,
            next_worker_id: AtomicU64::new(1),
            render_requested: true,
            stop_requested: false,
        }
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// Returns and resets the pending render request.
    pub fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.render_requested)
    }

    fn spawn_worker(
        &self,
        kind: &str,
        work: impl FnOnce() -> RuntimeEvent + Send + 'static,
    ) -> Result<JoinHandle<()>, String> {
        let worker_id = self.next_worker_id.fetch_add(1, Ordering::SeqCst);
        let events = self.events.clone();
        thread::Builder::new()
            .name(format!("askdesk-{kind}-{worker_id}"))
            .spawn(move || {
                let event = work();
                if events.send(event).is_err() {
                    debug!("event loop gone; dropping worker result");
                }
            })
            .map_err(|error| format!("Failed to spawn {kind} worker: {error}"))
    }
}

impl HostOps for RuntimeController {
    fn start_exchange(&mut self, pending: PendingRequest) -> Result<(), String> {
        let coordinator = Arc::clone(&self.coordinator);
        self.spawn_worker("exchange", move || {
            RuntimeEvent::ExchangeSettled(coordinator.complete(pending))
        })
        .map(|_| ())
    }

    fn start_health_check(&mut self) -> Result<(), String> {
        let coordinator = Arc::clone(&self.coordinator);
        self.spawn_worker("health", move || {
            RuntimeEvent::HealthChecked(coordinator.health())
        })
        .map(|_| ())
    }

    fn request_render(&mut self) {
        self.render_requested = true;
    }

    fn request_stop(&mut self) {
        self.stop_requested = true;
    }
}

/// Reads lines from `reader` on a named thread, keeping terminators.
pub fn spawn_input_reader<R>(reader: R, events: Sender<RuntimeEvent>) -> io::Result<JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("askdesk-input".to_string())
        .spawn(move || {
            let mut reader = reader;
            loop {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) => break,
                    Ok(_) => {
                        if events.send(RuntimeEvent::Line(line)).is_err() {
                            return;
                        }
                    }
                    Err(error) => {
                        warn!(%error, "failed to read input");
                        break;
                    }
                }
            }

            let _ = events.send(RuntimeEvent::InputClosed);
        })
}

/// Applies events to `app` until it asks to exit and every worker result has
/// been applied.
pub fn run_event_loop<W: Write>(
    app: &mut App,
    host: &mut RuntimeController,
    events: &Receiver<RuntimeEvent>,
    out: &mut W,
) -> io::Result<()> {
    loop {
        flush_output(app, host, out)?;

        if host.stop_requested() && !app.has_outstanding_work() {
            return Ok(());
        }

        let event = match events.recv() {
            Ok(event) => event,
            Err(_) => return Ok(()),
        };

        let applied = catch_unwind(AssertUnwindSafe(|| apply_event(app, host, event)));
        if applied.is_err() {
            warn!("event handler panicked; continuing");
            host.request_render();
        }
    }
}

fn apply_event(app: &mut App, host: &mut RuntimeController, event: RuntimeEvent) {
    match event {
        RuntimeEvent::Line(line) => {
            if !host.stop_requested() {
                app.on_line(&line, host);
            }
        }
        RuntimeEvent::InputClosed => app.on_input_closed(host),
        RuntimeEvent::ExchangeSettled(result) => {
            app.on_exchange_settled(result);
            host.request_render();
        }
        RuntimeEvent::HealthChecked(result) => {
            app.on_health_checked(result);
            host.request_render();
        }
    }
}

fn flush_output<W: Write>(app: &mut App, host: &mut RuntimeController, out: &mut W) -> io::Result<()> {
    for line in app.take_output() {
        writeln!(out, "{line}")?;
    }

    if host.take_render_request() && !host.stop_requested() {
        write!(out, "{}", app.prompt())?;
    }

    out.flush()
}
