mod support;

use std::sync::Arc;

use answer_service::{HealthStatus, ServiceError};
use answer_service_mock::{MockAnswerService, MockOutcome};
use askdesk::{RequestState, SubmissionError, GENERIC_FAILURE_MESSAGE};
use askdesk_cli::commands::{parse_slash_command, SlashCommand};
use pretty_assertions::assert_eq;
use support::{app_with, plain_output, HostSpy};

#[test]
fn enter_begins_exchange_with_trimmed_draft() {
    let service = Arc::new(MockAnswerService::new());
    let mut app = app_with(&service);
    let mut host = HostSpy::default();

    app.on_line("  What is time management?  \n", &mut host);

    assert_eq!(host.started_questions, vec!["What is time management?"]);
    assert_eq!(
        app.coordinator().state(),
        RequestState::Pending {
            question: "What is time management?".to_string()
        }
    );
    assert_eq!(host.render_requests, 1);
    assert!(app.prompt().contains("waiting"));
}

#[test]
fn settled_exchange_prints_entry_with_confidence_percent() {
    let service = Arc::new(MockAnswerService::with_outcomes(vec![MockOutcome::reply(
        "Prioritize tasks",
        Some(0.92),
    )]));
    let mut app = app_with(&service);
    let mut host = HostSpy::default();

    app.on_line("What is time management?\n", &mut host);
    let pending = host.held.pop().expect("exchange started");
    let result = app.coordinator().complete(pending);
    app.on_exchange_settled(result);

    let output = plain_output(&mut app);
    assert!(output.iter().any(|line| line == "Q: What is time management?"));
    assert!(output.iter().any(|line| line == "A: Prioritize tasks"));
    assert!(output.iter().any(|line| line.contains("confidence 92%")));
    assert_eq!(app.coordinator().state(), RequestState::Idle);
    assert_eq!(app.coordinator().draft().text(), "");
}

#[test]
fn trailing_backslash_continues_the_question() {
    let service = Arc::new(MockAnswerService::new());
    let mut app = app_with(&service);
    let mut host = HostSpy::default();

    app.on_line("first line\\\n", &mut host);
    assert!(host.started_questions.is_empty());
    assert_eq!(app.coordinator().draft().text(), "first line\n");
    assert!(app.prompt().contains(".."));

    app.on_line("second line\n", &mut host);
    assert_eq!(host.started_questions, vec!["first line\nsecond line"]);
}

#[test]
fn line_typed_while_pending_is_rejected_and_leaves_draft_alone() {
    let service = Arc::new(MockAnswerService::new());
    let mut app = app_with(&service);
    let mut host = HostSpy::default();

    app.on_line("first\n", &mut host);
    app.on_line("second\n", &mut host);

    assert_eq!(host.started_questions, vec!["first"]);
    assert_eq!(app.coordinator().draft().text(), "first");
    let output = plain_output(&mut app);
    assert!(output
        .iter()
        .any(|line| line.contains(SubmissionError::Busy.user_message())));
    assert!(output
        .iter()
        .all(|line| !line.contains("Your question was kept")));
}

#[test]
fn failed_exchange_keeps_only_the_originally_typed_question() {
    let service = Arc::new(MockAnswerService::with_outcomes(vec![MockOutcome::rejected(
        500,
        "model unavailable",
    )]));
    let mut app = app_with(&service);
    let mut host = HostSpy::default();

    app.on_line("What is time management?\n", &mut host);
    app.on_line("X\n", &mut host);
    let result = app.coordinator().complete(host.held.pop().expect("started"));
    app.on_exchange_settled(result);

    assert_eq!(app.coordinator().draft().text(), "What is time management?");
    assert_eq!(service.asked_questions(), vec!["What is time management?"]);
}

#[test]
fn successful_exchange_after_extra_line_leaves_empty_draft() {
    let service = Arc::new(MockAnswerService::new());
    let mut app = app_with(&service);
    let mut host = HostSpy::default();

    app.on_line("first\n", &mut host);
    app.on_line("second\n", &mut host);
    let result = app.coordinator().complete(host.held.pop().expect("started"));
    app.on_exchange_settled(result);

    assert_eq!(app.coordinator().draft().text(), "");
    app.on_line("second\n", &mut host);
    assert_eq!(host.started_questions, vec!["first", "second"]);
}

#[test]
fn slash_commands_run_while_pending() {
    let service = Arc::new(MockAnswerService::new());
    let mut app = app_with(&service);
    let mut host = HostSpy::default();

    app.coordinator().submit("earlier").expect("seed entry");
    app.on_line("in flight\n", &mut host);

    app.on_line("/clear\n", &mut host);
    assert!(app.coordinator().transcript().is_empty());
    assert_eq!(app.coordinator().draft().text(), "in flight");

    app.on_line("/quit\n", &mut host);
    assert!(app.should_exit);
    assert_eq!(host.stop_requests, 1);
    assert!(app.has_outstanding_work());

    let result = app.coordinator().complete(host.held.pop().expect("started"));
    app.on_exchange_settled(result);

    let entries = app.coordinator().transcript().current_entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].question(), "in flight");
    assert!(!app.has_outstanding_work());
    assert_eq!(service.ask_calls(), 2);
}

#[test]
fn failed_exchange_shows_message_and_keeps_draft_for_retry() {
    let service = Arc::new(MockAnswerService::with_outcomes(vec![
        MockOutcome::rejected(500, "model unavailable"),
        MockOutcome::unavailable("timed out"),
    ]));
    let mut app = app_with(&service);
    let mut host = HostSpy::default();

    app.on_line("hello\n", &mut host);
    let result = app.coordinator().complete(host.held.pop().expect("started"));
    app.on_exchange_settled(result);

    let output = plain_output(&mut app);
    assert!(output.iter().any(|line| line == "! model unavailable"));
    assert_eq!(app.coordinator().draft().text(), "hello");
    assert!(app.coordinator().transcript().is_empty());

    app.on_line("\n", &mut host);
    assert_eq!(host.started_questions, vec!["hello", "hello"]);
    let result = app.coordinator().complete(host.held.pop().expect("restarted"));
    app.on_exchange_settled(result);

    let output = plain_output(&mut app);
    assert!(output
        .iter()
        .any(|line| line == &format!("! {GENERIC_FAILURE_MESSAGE}")));
}

#[test]
fn failed_worker_start_releases_the_slot() {
    let service = Arc::new(MockAnswerService::new());
    let mut app = app_with(&service);
    let mut host = HostSpy {
        fail_start: Some("no threads left".to_string()),
        ..HostSpy::default()
    };

    app.on_line("hello\n", &mut host);

    assert_eq!(app.coordinator().state(), RequestState::Idle);
    let output = plain_output(&mut app);
    assert!(output
        .iter()
        .any(|line| line.contains("Failed to start request: no threads left")));
}

#[test]
fn blank_enter_does_nothing() {
    let service = Arc::new(MockAnswerService::new());
    let mut app = app_with(&service);
    let mut host = HostSpy::default();

    app.on_line("   \n", &mut host);

    assert!(host.started_questions.is_empty());
    assert!(plain_output(&mut app).is_empty());
    assert_eq!(service.ask_calls(), 0);
}

#[test]
fn parser_recognizes_known_and_unknown_slash_commands() {
    assert_eq!(parse_slash_command("plain question"), None);
    assert_eq!(parse_slash_command("/help"), Some(SlashCommand::Help));
    assert_eq!(parse_slash_command("/clear"), Some(SlashCommand::Clear));
    assert_eq!(parse_slash_command("/history"), Some(SlashCommand::History));
    assert_eq!(parse_slash_command("/health"), Some(SlashCommand::Health));
    assert_eq!(parse_slash_command("/quit"), Some(SlashCommand::Quit));
    assert_eq!(parse_slash_command("/exit"), Some(SlashCommand::Quit));
    assert_eq!(
        parse_slash_command("/nope extra args"),
        Some(SlashCommand::Unknown("/nope".to_string()))
    );
}

#[test]
fn slash_commands_never_reach_the_service() {
    let service = Arc::new(MockAnswerService::new());
    let mut app = app_with(&service);
    let mut host = HostSpy::default();

    app.coordinator().submit("kept").expect("seed entry");

    app.on_line("/history\n", &mut host);
    let output = plain_output(&mut app);
    assert!(output.iter().any(|line| line == "Q: kept"));

    app.on_line("/clear\n", &mut host);
    assert!(app.coordinator().transcript().is_empty());

    app.on_line("/bogus\n", &mut host);
    let output = plain_output(&mut app);
    assert!(output.iter().any(|line| line.contains("Unknown command: /bogus")));

    app.on_line("/help\n", &mut host);
    assert!(plain_output(&mut app)
        .iter()
        .any(|line| line.contains("/health")));

    assert_eq!(service.ask_calls(), 1);
    assert!(host.started_questions.is_empty());
    assert_eq!(app.coordinator().draft().text(), "");
}

#[test]
fn health_command_starts_one_check_at_a_time() {
    let service = Arc::new(MockAnswerService::new());
    let mut app = app_with(&service);
    let mut host = HostSpy::default();

    app.on_line("/health\n", &mut host);
    app.on_line("/health\n", &mut host);
    assert_eq!(host.health_checks, 1);
    assert!(plain_output(&mut app)
        .iter()
        .any(|line| line.contains("Health check already running")));

    app.on_health_checked(Ok(HealthStatus {
        status: "healthy".to_string(),
        model_loaded: true,
        knowledge_base_loaded: true,
    }));
    assert!(plain_output(&mut app)
        .iter()
        .any(|line| line.contains("status healthy")));

    app.on_line("/health\n", &mut host);
    app.on_health_checked(Err(ServiceError::unavailable("connection refused")));
    assert_eq!(host.health_checks, 2);
    assert!(plain_output(&mut app)
        .iter()
        .any(|line| line.contains("Health check failed")));
}

#[test]
fn quit_requests_stop() {
    let service = Arc::new(MockAnswerService::new());
    let mut app = app_with(&service);
    let mut host = HostSpy::default();

    app.on_line("/quit\n", &mut host);

    assert!(app.should_exit);
    assert_eq!(host.stop_requests, 1);
}
