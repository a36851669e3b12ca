//! ANSI formatting for transcript entries, notices, and the prompt.

use answer_service::{HealthStatus, ServiceProfile};
use askdesk::TranscriptEntry;
use time::{OffsetDateTime, UtcOffset};

fn ansi_wrap(text: &str, prefix: &str, suffix: &str) -> String {
    format!("{prefix}{text}{suffix}")
}

pub fn dim(text: &str) -> String {
    ansi_wrap(text, "\x1b[2m", "\x1b[22m")
}

pub fn bold(text: &str) -> String {
    ansi_wrap(text, "\x1b[1m", "\x1b[22m")
}

pub fn cyan(text: &str) -> String {
    ansi_wrap(text, "\x1b[36m", "\x1b[39m")
}

pub fn yellow(text: &str) -> String {
    ansi_wrap(text, "\x1b[33m", "\x1b[39m")
}

pub fn red(text: &str) -> String {
    ansi_wrap(text, "\x1b[31m", "\x1b[39m")
}

pub fn green(text: &str) -> String {
    ansi_wrap(text, "\x1b[32m", "\x1b[39m")
}

/// `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_timestamp(timestamp: OffsetDateTime) -> String {
    let utc = timestamp.to_offset(UtcOffset::UTC);
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02} UTC",
        utc.year(),
        u8::from(utc.month()),
        utc.day(),
        utc.hour(),
        utc.minute(),
        utc.second()
    )
}

/// Timestamp header, question, then indented answer with confidence.
pub fn render_entry(entry: &TranscriptEntry) -> Vec<String> {
    let mut lines = vec![dim(&format_timestamp(entry.timestamp()))];

    for (index, line) in entry.question().split('\n').enumerate() {
        let prefix = if index == 0 { "Q: " } else { "   " };
        lines.push(format!("{}{}", bold(prefix), line));
    }

    for (index, line) in entry.answer().split('\n').enumerate() {
        let prefix = if index == 0 { "A: " } else { "   " };
        lines.push(format!("{}{}", cyan(prefix), line));
    }

    if let Some(confidence) = entry.confidence() {
        lines.push(format!("   {} {}", dim("confidence"), green(&confidence.to_string())));
    }

    lines
}

pub fn render_header(profile: &ServiceProfile) -> String {
    format!(
        "{} {} {} {}",
        bold("askdesk"),
        dim("service"),
        cyan(&profile.service_id),
        dim(&profile.endpoint)
    )
}

pub fn render_health(health: &HealthStatus) -> String {
    let flag = |loaded: bool| if loaded { green("yes") } else { red("no") };
    let status = if health.is_healthy() {
        green(&health.status)
    } else {
        yellow(&health.status)
    };

    format!(
        "{} {} {} {} {} {}",
        dim("status"),
        status,
        dim("model"),
        flag(health.model_loaded),
        dim("knowledge base"),
        flag(health.knowledge_base_loaded)
    )
}

pub fn render_notice(text: &str) -> String {
    format!("{} {}", yellow("*"), dim(text))
}

pub fn render_error(text: &str) -> String {
    format!("{} {}", red("!"), text)
}

/// Prompt for the next line. `continuing` marks a multi-line draft.
pub fn render_prompt(pending: bool, continuing: bool) -> String {
    match (pending, continuing) {
        (true, _) => format!("{} ", yellow("… waiting")),
        (false, true) => format!("{} ", dim("..")),
        (false, false) => format!("{} ", cyan(">")),
    }
}
