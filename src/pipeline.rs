//! Pipeline orchestration
//!
//! Public entry points for Quiz Sentinel: from a session document or event
//! slice to a verdict or an encoded JSON report.
//!
//! Stages: parse → validate (strict mode only) → partition → analyze cells →
//! aggregate → encode.

use crate::aggregator::{analyze_at, analyze_quiz_behavior};
use crate::config::DetectorConfig;
use crate::encoder::ReportEncoder;
use crate::error::AnalysisError;
use crate::schema::{parse_session, validate_events, InteractionEvent, QuizSession};
use crate::types::SessionVerdict;
use chrono::Utc;
use tracing::{info, warn};

/// Analyze an event stream with the default configuration.
///
/// # Arguments
/// * `events` - Chronological interaction events
/// * `score` - Correct answers
/// * `total_questions` - Questions in the quiz
/// * `session_start_ms` - Quiz start in epoch milliseconds
///
/// # Example
/// ```ignore
/// let verdict = analyze(&events, 8, 10, started_at_ms);
/// println!("{}: {}", verdict.level, verdict.details);
/// ```
pub fn analyze(
    events: &[InteractionEvent],
    score: u32,
    total_questions: u32,
    session_start_ms: i64,
) -> SessionVerdict {
    analyze_quiz_behavior(score, events, total_questions, session_start_ms)
}

/// Convert a `QuizSession` JSON document into a JSON report.
///
/// # Returns
/// Pretty-printed report JSON
///
/// # Example
/// ```ignore
/// let report = session_to_report(session_json)?;
/// ```
pub fn session_to_report(session_json: String) -> Result<String, AnalysisError> {
    SessionAnalyzer::new().process_json(&session_json)
}

/// Reusable analyzer holding a validated configuration and one encoder.
///
/// Use this when scoring many sessions so every report carries the same
/// producer instance id.
pub struct SessionAnalyzer {
    config: DetectorConfig,
    encoder: ReportEncoder,
    strict: bool,
}

impl Default for SessionAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionAnalyzer {
    /// Create an analyzer with the default configuration
    pub fn new() -> Self {
        Self {
            config: DetectorConfig::default(),
            encoder: ReportEncoder::new(),
            strict: false,
        }
    }

    /// Create an analyzer with a custom configuration
    pub fn with_config(config: DetectorConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self {
            config,
            encoder: ReportEncoder::new(),
            strict: false,
        })
    }

    /// Reject streams with backwards or negative timestamps instead of tolerating them
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn encoder(&self) -> &ReportEncoder {
        &self.encoder
    }

    /// Analyze a parsed session
    pub fn analyze_session(&self, session: &QuizSession) -> Result<SessionVerdict, AnalysisError> {
        let now_ms = session
            .submitted_at_ms
            .unwrap_or_else(|| Utc::now().timestamp_millis());
        self.analyze_session_at(session, now_ms)
    }

    /// Analyze a parsed session against a fixed "now"
    pub fn analyze_session_at(
        &self,
        session: &QuizSession,
        now_ms: i64,
    ) -> Result<SessionVerdict, AnalysisError> {
        let report = validate_events(&session.events);
        if self.strict {
            report.into_result()?;
        } else if !report.is_valid() {
            warn!(
                session_id = %session.session_id,
                issues = report.issues.len(),
                "event stream has ordering or symbol issues; analyzing anyway"
            );
        }

        let verdict = analyze_at(
            session.score,
            &session.events,
            session.total_questions,
            session.started_at_ms,
            now_ms,
            &self.config,
        );

        info!(
            session_id = %session.session_id,
            level = %verdict.level,
            weighted_score = verdict.weighted_score,
            valid_cells = verdict.cell_stats.valid_cells,
            "session analyzed"
        );
        Ok(verdict)
    }

    /// Analyze a session and encode the report
    pub fn report(&self, session: &QuizSession) -> Result<String, AnalysisError> {
        let verdict = self.analyze_session(session)?;
        self.encoder
            .encode_to_json(&session.session_id, Some(session.started_at_ms), &verdict)
    }

    /// Parse a session document, analyze it and encode the report
    pub fn process_json(&self, session_json: &str) -> Result<String, AnalysisError> {
        let session = parse_session(session_json)?;
        self.report(&session)
    }
}
