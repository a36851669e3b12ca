use std::sync::Arc;

use answer_service::{HealthStatus, ServiceError};
use askdesk::{
    classify_key, split_line_terminator, KeyAction, PendingRequest, RequestCoordinator,
    SubmissionError, TranscriptEntry,
};
use tracing::debug;

use crate::commands::{parse_slash_command, SlashCommand};
use crate::render::{render_entry, render_error, render_health, render_notice, render_prompt};

pub trait HostOps {
    /// Runs the exchange for `pending` off the input thread.
    fn start_exchange(&mut self, pending: PendingRequest) -> Result<(), String>;
    fn start_health_check(&mut self) -> Result<(), String>;
    fn request_render(&mut self);
    fn request_stop(&mut self);
}

const DRAFT_KEPT_TEXT: &str = "Your question was kept. Press Enter to send it again.";
const LINE_DROPPED_TEXT: &str = "That line was not added to the question being answered.";
const HELP_TEXT: &str = "Commands: /help, /clear, /history, /health, /quit. End a line with \\ to continue the question.";

/// UI-thread state: routes input lines and settled results, and buffers
/// rendered output until the runtime flushes it.
pub struct App {
    coordinator: Arc<RequestCoordinator>,
    output: Vec<String>,
    exchange_in_flight: bool,
    health_in_flight: bool,
    pub should_exit: bool,
}

impl App {
    pub fn new(coordinator: Arc<RequestCoordinator>) -> Self {
        Self {
            coordinator,
            output: Vec::new(),
            exchange_in_flight: false,
            health_in_flight: false,
            should_exit: false,
        }
    }

    pub fn coordinator(&self) -> &Arc<RequestCoordinator> {
        &self.coordinator
    }

    /// Rendered lines not yet written to the terminal.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    /// Whether a worker result has yet to be applied.
    pub fn has_outstanding_work(&self) -> bool {
        self.exchange_in_flight || self.health_in_flight
    }

    pub fn prompt(&self) -> String {
        render_prompt(
            self.coordinator.is_pending(),
            !self.coordinator.draft().text().is_empty(),
        )
    }

    /// Prints restored history after startup.
    pub fn on_history_restored(&mut self, entries: &[TranscriptEntry]) {
        if entries.is_empty() {
            return;
        }

        self.push_notice(&format!("Restored {} earlier exchange(s)", entries.len()));
        for entry in entries {
            self.push_entry(entry);
        }
    }

    /// Applies one input line. The terminator acts as Enter, or Shift+Enter
    /// after a trailing backslash.
    ///
    /// While an exchange is in flight the draft holds the question being
    /// answered, so lines are not added to it. Slash commands still run.
    pub fn on_line(&mut self, line: &str, host: &mut dyn HostOps) {
        let (text, key) = split_line_terminator(line);

        if self.exchange_in_flight || self.coordinator.is_pending() {
            self.on_line_while_pending(text, host);
            return;
        }

        self.coordinator.edit_draft(|draft| draft.push_str(text));

        match classify_key(key).action {
            KeyAction::Submit => self.on_submit(host),
            KeyAction::InsertNewline => {
                self.coordinator.edit_draft(|draft| draft.insert_newline());
                host.request_render();
            }
            KeyAction::PassThrough => host.request_render(),
        }
    }

    fn on_line_while_pending(&mut self, text: &str, host: &mut dyn HostOps) {
        if let Some(command) = parse_slash_command(text) {
            self.on_command(command, host);
        } else if !text.trim().is_empty() {
            self.push_notice(SubmissionError::Busy.user_message());
            self.push_notice(LINE_DROPPED_TEXT);
        }

        host.request_render();
    }

    pub fn on_submit(&mut self, host: &mut dyn HostOps) {
        let draft = self.coordinator.draft();

        if let Some(command) = parse_slash_command(draft.text()) {
            self.coordinator.edit_draft(|draft| draft.clear());
            self.on_command(command, host);
            host.request_render();
            return;
        }

        match self.coordinator.begin_draft() {
            Ok(pending) => match host.start_exchange(pending) {
                Ok(()) => self.exchange_in_flight = true,
                Err(error) => self.push_error(&format!("Failed to start request: {error}")),
            },
            Err(SubmissionError::EmptyInput) => {}
            Err(error) => {
                self.push_notice(error.user_message());
                self.push_notice(DRAFT_KEPT_TEXT);
            }
        }

        host.request_render();
    }

    pub fn on_exchange_settled(&mut self, result: Result<TranscriptEntry, SubmissionError>) {
        self.exchange_in_flight = false;
        match result {
            Ok(entry) => self.push_entry(&entry),
            Err(error) => {
                self.push_error(error.user_message());
                self.push_notice(DRAFT_KEPT_TEXT);
            }
        }
    }

    pub fn on_health_checked(&mut self, result: Result<HealthStatus, ServiceError>) {
        self.health_in_flight = false;
        match result {
            Ok(health) => self.output.push(render_health(&health)),
            Err(error) => self.push_error(&format!("Health check failed: {error}")),
        }
    }

    /// Input closed. The runtime exits once no worker result is outstanding.
    pub fn on_input_closed(&mut self, host: &mut dyn HostOps) {
        self.on_quit(host);
    }

    pub fn on_quit(&mut self, host: &mut dyn HostOps) {
        debug!(outstanding = self.has_outstanding_work(), "quit requested");
        self.should_exit = true;
        host.request_stop();
    }

    fn on_command(&mut self, command: SlashCommand, host: &mut dyn HostOps) {
        match command {
            SlashCommand::Help => self.push_notice(HELP_TEXT),
            SlashCommand::Clear => {
                self.coordinator.transcript().clear();
                self.push_notice("Transcript cleared");
            }
            SlashCommand::History => {
                let entries = self.coordinator.transcript().current_entries();
                if entries.is_empty() {
                    self.push_notice("Transcript is empty");
                }
                for entry in &entries {
                    self.push_entry(entry);
                }
            }
            SlashCommand::Health => {
                if self.health_in_flight {
                    self.push_notice("Health check already running");
                    return;
                }

                match host.start_health_check() {
                    Ok(()) => self.health_in_flight = true,
                    Err(error) => self.push_error(&format!("Failed to start health check: {error}")),
                }
            }
            SlashCommand::Quit => self.on_quit(host),
            SlashCommand::Unknown(command) => {
                self.push_notice(&format!("Unknown command: {command}"));
            }
        }
    }

    fn push_entry(&mut self, entry: &TranscriptEntry) {
        self.output.extend(render_entry(entry));
        self.output.push(String::new());
    }

    fn push_notice(&mut self, text: &str) {
        self.output.push(render_notice(text));
    }

    fn push_error(&mut self, text: &str) {
        self.output.push(render_error(text));
    }
}
