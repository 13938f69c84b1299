//! Boundary parsing and validation for interaction streams
//!
//! Accepts a full session document, a bare JSON array of events or NDJSON.
//! The analysis path tolerates out-of-order or unknown events; validation here
//! is where callers can reject them.

use crate::error::AnalysisError;
use crate::schema::event::{EventKind, InteractionEvent, QuizSession};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How malformed NDJSON lines are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Skip bad lines with a warning
    #[default]
    Lenient,
    /// Fail on the first bad line
    Strict,
}

/// Parse a `QuizSession` document
pub fn parse_session(json: &str) -> Result<QuizSession, AnalysisError> {
    let session: QuizSession = serde_json::from_str(json)?;
    if session.total_questions == 0 {
        return Err(AnalysisError::MissingField(
            "total_questions must be at least 1".to_string(),
        ));
    }
    Ok(session)
}

/// Parse a JSON array of events
pub fn parse_events_array(json: &str) -> Result<Vec<InteractionEvent>, AnalysisError> {
    let events: Vec<InteractionEvent> = serde_json::from_str(json)?;
    Ok(events)
}

/// Parse newline-delimited events
pub fn parse_ndjson(ndjson: &str, mode: ParseMode) -> Result<Vec<InteractionEvent>, AnalysisError> {
    let mut events = Vec::new();
    for (line_num, line) in ndjson.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<InteractionEvent>(trimmed) {
            Ok(event) => events.push(event),
            Err(e) => match mode {
                ParseMode::Strict => {
                    return Err(AnalysisError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
                ParseMode::Lenient => {
                    warn!(line = line_num + 1, error = %e, "skipping malformed event line");
                }
            },
        }
    }
    Ok(events)
}

/// Parse either a JSON array or NDJSON, sniffing the first non-blank byte
pub fn parse_events(input: &str, mode: ParseMode) -> Result<Vec<InteractionEvent>, AnalysisError> {
    if input.trim_start().starts_with('[') {
        parse_events_array(input)
    } else {
        parse_ndjson(input, mode)
    }
}

/// A single problem found by `validate_events`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    NonMonotonic {
        index: usize,
        previous: i64,
        timestamp: i64,
    },
    UnknownKind {
        index: usize,
    },
    NegativeTimestamp {
        index: usize,
        timestamp: i64,
    },
}

/// Outcome of boundary validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub total_events: usize,
    pub unknown_events: usize,
    pub first_timestamp: Option<i64>,
    pub last_timestamp: Option<i64>,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Span from first to last event in milliseconds
    pub fn span_ms(&self) -> i64 {
        match (self.first_timestamp, self.last_timestamp) {
            (Some(first), Some(last)) => last.saturating_sub(first),
            _ => 0,
        }
    }

    /// Convert the first ordering or timestamp problem into an error
    ///
    /// Unknown kinds alone do not fail: metrics ignore them.
    pub fn into_result(self) -> Result<Self, AnalysisError> {
        for issue in &self.issues {
            match *issue {
                ValidationIssue::NonMonotonic {
                    index,
                    previous,
                    timestamp,
                } => {
                    return Err(AnalysisError::NonMonotonicTimestamps {
                        index,
                        previous,
                        timestamp,
                    });
                }
                ValidationIssue::NegativeTimestamp { index, timestamp } => {
                    return Err(AnalysisError::InvalidEvent {
                        index,
                        reason: format!("negative timestamp {timestamp}"),
                    });
                }
                ValidationIssue::UnknownKind { .. } => {}
            }
        }
        Ok(self)
    }
}

/// Check ordering and symbol recognition without touching the events
pub fn validate_events(events: &[InteractionEvent]) -> ValidationReport {
    let mut report = ValidationReport {
        total_events: events.len(),
        first_timestamp: events.first().map(|e| e.timestamp),
        last_timestamp: events.last().map(|e| e.timestamp),
        ..Default::default()
    };

    for (index, event) in events.iter().enumerate() {
        if event.timestamp < 0 {
            report.issues.push(ValidationIssue::NegativeTimestamp {
                index,
                timestamp: event.timestamp,
            });
        }
        if event.kind == EventKind::Unknown {
            report.unknown_events += 1;
            report.issues.push(ValidationIssue::UnknownKind { index });
        }
        if index > 0 {
            let previous = events[index - 1].timestamp;
            if event.timestamp < previous {
                report.issues.push(ValidationIssue::NonMonotonic {
                    index,
                    previous,
                    timestamp: event.timestamp,
                });
            }
        }
    }

    report
}
