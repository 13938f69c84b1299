//! Quiz Sentinel - heuristic human-vs-automation classifier for quiz sessions
//!
//! Sentinel turns the interaction stream captured during a timed quiz into a
//! suspicion verdict through a deterministic pipeline: cell partitioning →
//! per-cell metric flags → coverage-weighted session score → report encoding.
//!
//! ## Modules
//!
//! - **Metrics**: timing CV, block repetition, entropy, run-length compression
//! - **Cells / Analyzer**: fixed-width time cells and their per-metric flags
//! - **Aggregator**: session level, evidence reasons and statistics
//! - **Pipeline / Encoder**: JSON session in, JSON report out

pub mod aggregator;
pub mod analyzer;
pub mod cells;
pub mod config;
pub mod encoder;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod schema;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use aggregator::{analyze_at, analyze_quiz_behavior};
pub use analyzer::{analyze_cell, analyze_cell_with};
pub use cells::{partition_into_cells, Cell};
pub use config::DetectorConfig;
pub use encoder::ReportEncoder;
pub use error::AnalysisError;
pub use pipeline::{analyze, session_to_report, SessionAnalyzer};
pub use schema::{EventKind, InteractionEvent, QuizSession};
pub use types::{CellFlags, Flag, SessionVerdict, SuspicionLevel};

/// Sentinel version embedded in every report
pub const SENTINEL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "quiz-sentinel";
