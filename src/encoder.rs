//! Report encoding
//!
//! Turns a `SessionVerdict` into the JSON report handed to the quiz UI and to
//! audit storage. Presentation rounding happens here and only here.

use crate::error::AnalysisError;
use crate::types::{
    AggregateMetrics, CellReport, KeyboardSignal, SessionFlags, SessionMetrics, SessionStats,
    SessionVerdict, SuspicionLevel,
};
use crate::{PRODUCER_NAME, SENTINEL_VERSION};
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Top-level report document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub provenance: ReportProvenance,
    pub verdict: ReportVerdict,
    pub quiz: ReportQuiz,
    pub stats: SessionStats,
    pub cell_stats: ReportCellStats,
    pub metrics: ReportMetrics,
    pub cells: Vec<ReportCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProvenance {
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub started_at_utc: Option<String>,
    pub computed_at_utc: String,
    pub event_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportVerdict {
    pub level: SuspicionLevel,
    pub label: String,
    pub classification: String,
    pub details: String,
    pub reasons: Vec<String>,
    pub color: String,
    pub severity: u8,
    pub weighted_score: f64,
    /// Weighted score as a percentage with one decimal
    pub weighted_score_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportQuiz {
    pub score: u32,
    pub total_questions: u32,
    pub perfect_score: bool,
    pub too_fast: bool,
    pub total_time_sec: f64,
    pub avg_time_per_question_sec: f64,
    pub keyboard_signal: KeyboardSignal,
    pub keyboard_ratio_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportCellStats {
    pub total_cells: usize,
    pub cells_with_data: usize,
    pub valid_cells: usize,
    pub suspicious_pct: f64,
    pub caution_pct: f64,
    pub human_pct: f64,
    pub coverage_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetrics {
    /// Weighted averages over cells; absent when no cell had enough data
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cells: Option<ReportMetricSet>,
    pub session: ReportMetricSet,
    pub session_flags: ReportSessionFlags,
}

/// Whole-session 0/0.5/1 flags with their sum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportSessionFlags {
    pub timing: f64,
    pub repetition: f64,
    pub entropy: f64,
    pub compression: f64,
    pub keyboard_only: f64,
    pub sum: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportMetricSet {
    pub cv: f64,
    pub repetition_pct: f64,
    pub entropy_norm: f64,
    pub compression: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportCell {
    pub index: usize,
    pub start_sec: f64,
    pub end_sec: f64,
    pub event_count: usize,
    pub has_enough_data: bool,
    /// `T_s | R_n | E_h | C_h`
    pub token: String,
    pub verdict: String,
}

/// Report encoder
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Build the report document
    pub fn encode(
        &self,
        session_id: &str,
        started_at_ms: Option<i64>,
        verdict: &SessionVerdict,
    ) -> SessionReport {
        let started_at_utc = started_at_ms
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .map(|t| t.to_rfc3339());

        SessionReport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: SENTINEL_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            provenance: ReportProvenance {
                session_id: session_id.to_string(),
                started_at_utc,
                computed_at_utc: Utc::now().to_rfc3339(),
                event_count: verdict.stats.total_events,
            },
            verdict: ReportVerdict {
                level: verdict.level,
                label: verdict.level.to_string(),
                classification: verdict.classification.clone(),
                details: verdict.details.clone(),
                reasons: verdict.reasons.clone(),
                color: verdict.color.clone(),
                severity: verdict.severity,
                weighted_score: round_to(verdict.weighted_score, 3),
                weighted_score_pct: pct(verdict.weighted_score),
            },
            quiz: ReportQuiz {
                score: verdict.score,
                total_questions: verdict.total_questions,
                perfect_score: verdict.perfect_score,
                too_fast: verdict.too_fast,
                total_time_sec: round_to(verdict.stats.total_time_sec, 0),
                avg_time_per_question_sec: round_to(verdict.stats.avg_time_per_question_sec, 1),
                keyboard_signal: verdict.keyboard_signal,
                keyboard_ratio_pct: pct(verdict.stats.keyboard_ratio),
            },
            stats: verdict.stats,
            cell_stats: ReportCellStats {
                total_cells: verdict.cell_stats.total_cells,
                cells_with_data: verdict.cell_stats.cells_with_data,
                valid_cells: verdict.cell_stats.valid_cells,
                suspicious_pct: pct(verdict.cell_stats.suspicious_ratio),
                caution_pct: pct(verdict.cell_stats.caution_ratio),
                human_pct: pct(verdict.cell_stats.human_ratio),
                coverage_pct: pct(verdict.cell_stats.coverage),
            },
            metrics: ReportMetrics {
                cells: verdict.cell_metrics.as_ref().map(cell_metric_set),
                session: session_metric_set(&verdict.session_metrics),
                session_flags: session_flag_set(&verdict.session_flags),
            },
            cells: verdict.cells.iter().map(encode_cell).collect(),
        }
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json(
        &self,
        session_id: &str,
        started_at_ms: Option<i64>,
        verdict: &SessionVerdict,
    ) -> Result<String, AnalysisError> {
        let report = self.encode(session_id, started_at_ms, verdict);
        serde_json::to_string_pretty(&report).map_err(AnalysisError::JsonError)
    }
}

fn encode_cell(cell: &CellReport) -> ReportCell {
    ReportCell {
        index: cell.index,
        start_sec: round_to(cell.start_offset_sec, 1),
        end_sec: round_to(cell.end_offset_sec, 1),
        event_count: cell.event_count,
        has_enough_data: cell.flags.has_enough_data,
        token: cell.flags.to_string(),
        verdict: cell.verdict.symbol().to_string(),
    }
}

fn cell_metric_set(m: &AggregateMetrics) -> ReportMetricSet {
    ReportMetricSet {
        cv: round_to(m.cv, 3),
        repetition_pct: pct(m.repetition),
        entropy_norm: round_to(m.entropy_norm, 2),
        compression: round_to(m.compression, 2),
    }
}

fn session_metric_set(m: &SessionMetrics) -> ReportMetricSet {
    ReportMetricSet {
        cv: round_to(m.cv, 3),
        repetition_pct: pct(m.repetition),
        entropy_norm: round_to(m.entropy_norm, 2),
        compression: round_to(m.compression, 2),
    }
}

fn session_flag_set(f: &SessionFlags) -> ReportSessionFlags {
    ReportSessionFlags {
        timing: f.timing,
        repetition: f.repetition,
        entropy: f.entropy,
        compression: f.compression,
        keyboard_only: f.keyboard_only,
        sum: f.sum(),
        max: SessionFlags::MAX,
    }
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Ratio (0-1) as a percentage with one decimal
fn pct(ratio: f64) -> f64 {
    round_to(ratio * 100.0, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::analyze_at;
    use crate::config::DetectorConfig;
    use crate::schema::InteractionEvent;

    const START: i64 = 1_700_000_000_000;

    fn bot_verdict() -> SessionVerdict {
        let events: Vec<InteractionEvent> = (0..40)
            .map(|i| InteractionEvent::click(START + i * 250))
            .collect();
        analyze_at(10, &events, 10, START, START + 30_000, &DetectorConfig::default())
    }

    #[test]
    fn test_encoder_creation() {
        let encoder = ReportEncoder::new();
        assert!(!encoder.instance_id().is_empty());
        assert_ne!(encoder.instance_id(), ReportEncoder::new().instance_id());
    }

    #[test]
    fn test_report_fields() {
        let encoder = ReportEncoder::with_instance_id("test-instance".to_string());
        let report = encoder.encode("quiz-1", Some(START), &bot_verdict());

        assert_eq!(report.report_version, REPORT_VERSION);
        assert_eq!(report.producer.name, PRODUCER_NAME);
        assert_eq!(report.producer.instance_id, "test-instance");
        assert_eq!(report.provenance.session_id, "quiz-1");
        assert_eq!(
            report.provenance.started_at_utc.as_deref(),
            Some("2023-11-14T22:13:20+00:00")
        );
        assert_eq!(report.verdict.level, SuspicionLevel::Suspicious);
        assert_eq!(report.verdict.label, "Suspicious");
        assert_eq!(report.verdict.weighted_score_pct, 50.0);
        assert_eq!(report.cell_stats.suspicious_pct, 50.0);
        assert_eq!(report.quiz.avg_time_per_question_sec, 3.0);

        assert_eq!(report.cells.len(), 2);
        assert_eq!(report.cells[0].token, "T_s | R_n | E_s | C_h");
        assert_eq!(report.cells[0].verdict, "s");
        assert_eq!(report.cells[1].start_sec, 5.0);
    }

    #[test]
    fn test_json_shape() {
        let encoder = ReportEncoder::new();
        let json = encoder.encode_to_json("", None, &bot_verdict()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["verdict"]["level"], "suspicious");
        assert_eq!(value["verdict"]["color"], "#ef4444");
        assert!(value["provenance"].get("session_id").is_none());
        assert!(value["provenance"].get("started_at_utc").is_none());
        assert!(value["metrics"]["cells"].is_object());
        assert_eq!(value["quiz"]["keyboard_signal"], "none");
        assert_eq!(value["metrics"]["session_flags"]["timing"], 1.0);
        assert_eq!(value["metrics"]["session_flags"]["sum"], 1.0);
        assert_eq!(value["metrics"]["session_flags"]["max"], 5.0);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to(0.40540540, 3), 0.405);
        assert_eq!(pct(0.3333), 33.3);
        assert_eq!(round_to(12.5, 0), 13.0);
    }
}
