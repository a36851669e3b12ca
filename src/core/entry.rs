//! Transcript entries and confidence scores.

use std::fmt;

use answer_service::HistoryRecord;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::core::error::HistoryRecordError;

/// Service-reported confidence, stored exactly as received.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Confidence(f64);

impl Confidence {
    pub fn new(score: f64) -> Self {
        Self(score)
    }

    /// The score as the service reported it.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whole percentage, rounded half away from zero (`0.92` -> `92`).
    ///
    /// Scores outside `[0, 1]` render as the nearest bound; NaN renders as 0.
    pub fn percent(self) -> u8 {
        if self.0.is_nan() {
            return 0;
        }

        (self.0.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// One settled question/answer exchange. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    timestamp: OffsetDateTime,
    question: String,
    answer: String,
    confidence: Option<Confidence>,
}

impl TranscriptEntry {
    pub fn new(
        timestamp: OffsetDateTime,
        question: impl Into<String>,
        answer: impl Into<String>,
        confidence: Option<f64>,
    ) -> Self {
        Self {
            timestamp,
            question: question.into(),
            answer: answer.into(),
            confidence: confidence.map(Confidence::new),
        }
    }

    /// Converts a restored service record.
    ///
    /// The question is trimmed and must not be blank. The timestamp must parse
    /// per [`parse_service_timestamp`].
    pub fn from_history_record(record: &HistoryRecord) -> Result<Self, HistoryRecordError> {
        let question = record.question.trim();
        if question.is_empty() {
            return Err(HistoryRecordError::BlankQuestion);
        }

        let timestamp = parse_service_timestamp(&record.timestamp)
            .ok_or_else(|| HistoryRecordError::InvalidTimestamp(record.timestamp.clone()))?;

        Ok(Self::new(
            timestamp,
            question,
            record.answer.clone(),
            record.confidence,
        ))
    }

    /// Instant the exchange was recorded as answered.
    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn confidence(&self) -> Option<Confidence> {
        self.confidence
    }
}

/// Parses a service timestamp.
///
/// Accepts RFC 3339, then falls back to an ISO 8601 date-time without offset,
/// which is read as UTC.
pub fn parse_service_timestamp(value: &str) -> Option<OffsetDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(parsed);
    }

    PrimitiveDateTime::parse(value, &Iso8601::DEFAULT)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}
