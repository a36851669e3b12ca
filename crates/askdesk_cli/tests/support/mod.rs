#![allow(dead_code)]

use std::sync::Arc;

use answer_service::AnswerService;
use answer_service_mock::MockAnswerService;
use askdesk::{PendingRequest, RequestCoordinator};
use askdesk_cli::app::{App, HostOps};

#[derive(Default)]
pub struct HostSpy {
    pub started_questions: Vec<String>,
    pub held: Vec<PendingRequest>,
    pub health_checks: usize,
    pub render_requests: usize,
    pub stop_requests: usize,
    pub fail_start: Option<String>,
}

impl HostOps for HostSpy {
    fn start_exchange(&mut self, pending: PendingRequest) -> Result<(), String> {
        if let Some(error) = self.fail_start.clone() {
            return Err(error);
        }

        self.started_questions.push(pending.question().to_string());
        self.held.push(pending);
        Ok(())
    }

    fn start_health_check(&mut self) -> Result<(), String> {
        self.health_checks += 1;
        Ok(())
    }

    fn request_render(&mut self) {
        self.render_requests += 1;
    }

    fn request_stop(&mut self) {
        self.stop_requests += 1;
    }
}

pub fn app_with(service: &Arc<MockAnswerService>) -> App {
    let coordinator = RequestCoordinator::new(Arc::clone(service) as Arc<dyn AnswerService>);
    App::new(Arc::new(coordinator))
}

/// Output with ANSI escape sequences removed.
pub fn plain_output(app: &mut App) -> Vec<String> {
    app.take_output().iter().map(|line| strip_ansi(line)).collect()
}

pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        out.push(ch);
    }
    out
}
