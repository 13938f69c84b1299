//! Analysis result types
//!
//! Value objects produced by the cell analyzer and the session aggregator.
//! None of them are mutated after construction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-metric verdict for one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    Suspicious,
    Caution,
    Human,
    NotEnoughData,
}

impl Flag {
    /// Session-flag weight: 1 for suspicious, 0.5 for caution
    pub fn weight(self) -> f64 {
        match self {
            Flag::Suspicious => 1.0,
            Flag::Caution => 0.5,
            Flag::Human | Flag::NotEnoughData => 0.0,
        }
    }

    /// Single-letter symbol: s, c, h or n
    pub fn symbol(self) -> char {
        match self {
            Flag::Suspicious => 's',
            Flag::Caution => 'c',
            Flag::Human => 'h',
            Flag::NotEnoughData => 'n',
        }
    }

    /// Whether the metric produced a verdict at all
    pub fn is_measured(self) -> bool {
        self != Flag::NotEnoughData
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The four per-cell metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Timing regularity
    #[serde(rename = "T")]
    Timing,
    /// Pattern repetition
    #[serde(rename = "R")]
    Repetition,
    /// Symbol entropy
    #[serde(rename = "E")]
    Entropy,
    /// Sequence compressibility
    #[serde(rename = "C")]
    Compression,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Timing,
        Metric::Repetition,
        Metric::Entropy,
        Metric::Compression,
    ];

    pub fn letter(self) -> char {
        match self {
            Metric::Timing => 'T',
            Metric::Repetition => 'R',
            Metric::Entropy => 'E',
            Metric::Compression => 'C',
        }
    }
}

/// Raw metric values behind a cell's flags
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricValues {
    /// Click-interval CV; absent when the cell had too few clicks
    pub cv: Option<f64>,
    pub repetition: f64,
    pub entropy_norm: f64,
    pub compression: f64,
    pub weights: MetricWeights,
}

/// Sample sizes behind each metric, used for weighted averages across cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricWeights {
    /// Click intervals (0 when the CV was not computed)
    pub cv: usize,
    pub repetition: usize,
    pub entropy_norm: usize,
    pub compression: usize,
}

/// Flags for one cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellFlags {
    /// False when the cell had fewer than two clicks; all flags are then `n`
    pub has_enough_data: bool,
    #[serde(rename = "T")]
    pub timing: Flag,
    #[serde(rename = "R")]
    pub repetition: Flag,
    #[serde(rename = "E")]
    pub entropy: Flag,
    #[serde(rename = "C")]
    pub compression: Flag,
    /// Absent when the cell was not analyzed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<MetricValues>,
}

impl CellFlags {
    /// Flags for a cell that cannot carry evidence
    pub fn not_enough_data() -> Self {
        Self {
            has_enough_data: false,
            timing: Flag::NotEnoughData,
            repetition: Flag::NotEnoughData,
            entropy: Flag::NotEnoughData,
            compression: Flag::NotEnoughData,
            values: None,
        }
    }

    pub fn get(&self, metric: Metric) -> Flag {
        match metric {
            Metric::Timing => self.timing,
            Metric::Repetition => self.repetition,
            Metric::Entropy => self.entropy,
            Metric::Compression => self.compression,
        }
    }

    pub fn flags(&self) -> [Flag; 4] {
        [self.timing, self.repetition, self.entropy, self.compression]
    }

    pub fn count(&self, flag: Flag) -> usize {
        self.flags().iter().filter(|f| **f == flag).count()
    }

    /// Number of metrics that produced a verdict
    pub fn measured(&self) -> usize {
        self.flags().iter().filter(|f| f.is_measured()).count()
    }

    /// Composite verdict for the cell
    ///
    /// Two suspicious flags, or one suspicious backed by a caution, make the
    /// cell suspicious; two cautions make it caution; otherwise two human
    /// flags make it human. Anything thinner is `n`.
    pub fn verdict(&self) -> Flag {
        let s = self.count(Flag::Suspicious);
        let c = self.count(Flag::Caution);
        let h = self.count(Flag::Human);

        if s >= 2 || (s == 1 && c >= 1) {
            Flag::Suspicious
        } else if c >= 2 {
            Flag::Caution
        } else if h >= 2 {
            Flag::Human
        } else {
            Flag::NotEnoughData
        }
    }
}

impl fmt::Display for CellFlags {
    /// Renders as `T_s | R_n | E_h | C_h`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<String> = Metric::ALL
            .iter()
            .map(|m| format!("{}_{}", m.letter(), self.get(*m)))
            .collect();
        f.write_str(&tokens.join(" | "))
    }
}

/// Final session classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuspicionLevel {
    InsufficientData,
    Human,
    Caution,
    Suspicious,
}

impl SuspicionLevel {
    /// Fixed explanation shown for the level
    pub fn message(self) -> &'static str {
        match self {
            SuspicionLevel::InsufficientData => "Not enough data to analyze behavior.",
            SuspicionLevel::Human => "Interaction pattern looks natural and human-like.",
            SuspicionLevel::Caution => "Some indicators suggest possible automated behavior.",
            SuspicionLevel::Suspicious => "Strong indicators of automated interaction detected.",
        }
    }

    /// Display color for the level
    pub fn color(self) -> &'static str {
        match self {
            SuspicionLevel::InsufficientData => "#9CA3AF",
            SuspicionLevel::Human => "#22c55e",
            SuspicionLevel::Caution => "#fbbf24",
            SuspicionLevel::Suspicious => "#ef4444",
        }
    }

    /// Ordinal severity, 0 for no verdict up to 3 for suspicious
    pub fn severity(self) -> u8 {
        match self {
            SuspicionLevel::InsufficientData => 0,
            SuspicionLevel::Human => 1,
            SuspicionLevel::Caution => 2,
            SuspicionLevel::Suspicious => 3,
        }
    }
}

impl fmt::Display for SuspicionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SuspicionLevel::InsufficientData => "Not Enough Data",
            SuspicionLevel::Human => "Human",
            SuspicionLevel::Caution => "Caution",
            SuspicionLevel::Suspicious => "Suspicious",
        };
        f.write_str(label)
    }
}

/// Analysis of a single non-empty cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellReport {
    /// Time-slice number from the session anchor
    pub index: usize,
    pub start_time: i64,
    pub end_time: i64,
    /// Start relative to the first event, in seconds
    pub start_offset_sec: f64,
    /// End relative to the first event, in seconds
    pub end_offset_sec: f64,
    pub event_count: usize,
    pub flags: CellFlags,
    /// Composite cell verdict
    pub verdict: Flag,
}

/// Metric averages across cells, weighted by per-cell sample size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub cv: f64,
    pub repetition: f64,
    pub entropy_norm: f64,
    pub compression: f64,
    /// Cells that contributed a CV
    pub cv_cells: usize,
    /// Cells with enough data
    pub cells: usize,
}

/// The same four metrics over the whole event stream
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub cv: f64,
    pub repetition: f64,
    pub entropy_norm: f64,
    pub compression: f64,
}

/// Whole-session flags scored 0, 0.5 or 1
///
/// Explanatory only: the session level comes from the per-cell tally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionFlags {
    pub timing: f64,
    pub repetition: f64,
    pub entropy: f64,
    pub compression: f64,
    pub keyboard_only: f64,
}

impl SessionFlags {
    pub const MAX: f64 = 5.0;

    pub fn sum(&self) -> f64 {
        self.timing + self.repetition + self.entropy + self.compression + self.keyboard_only
    }
}

/// Flag tallies and coverage ratios over valid cells
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellStats {
    pub total_cells: usize,
    /// Cells with at least two clicks
    pub cells_with_data: usize,
    /// Cells with at least one measured metric
    pub valid_cells: usize,
    pub suspicious_flags: usize,
    pub caution_flags: usize,
    pub human_flags: usize,
    /// Shares of the `valid_cells * 4` metric slots
    pub suspicious_ratio: f64,
    pub caution_ratio: f64,
    pub human_ratio: f64,
    pub coverage: f64,
}

/// Event counts and timing for the report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_events: usize,
    pub clicks: usize,
    pub mouse_movements: usize,
    pub hovers: usize,
    pub scrolls: usize,
    /// Tab-away plus tab-return events
    pub tab_switches: usize,
    pub submits: usize,
    pub clears: usize,
    pub keyboard_navigation: usize,
    pub keyboard_clicks: usize,
    /// Keyboard clicks over all clicks (0-1)
    pub keyboard_ratio: f64,
    pub unknown_events: usize,
    pub total_time_sec: f64,
    pub avg_time_per_question_sec: f64,
}

/// Keyboard-only clicking signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardSignal {
    None,
    Mild,
    Strong,
}

impl KeyboardSignal {
    pub fn weight(self) -> f64 {
        match self {
            KeyboardSignal::Strong => 1.0,
            KeyboardSignal::Mild => 0.5,
            KeyboardSignal::None => 0.0,
        }
    }
}

/// Result of analyzing one quiz submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionVerdict {
    pub level: SuspicionLevel,
    /// Coverage-aware weighted score; 0 when the data gate failed
    pub weighted_score: f64,
    /// Fixed text for the level
    pub classification: String,
    /// Evidence sentence built from per-metric shares
    pub details: String,
    pub reasons: Vec<String>,
    pub color: String,
    pub severity: u8,
    pub score: u32,
    pub total_questions: u32,
    pub too_fast: bool,
    pub perfect_score: bool,
    pub keyboard_signal: KeyboardSignal,
    pub stats: SessionStats,
    pub cell_stats: CellStats,
    pub cell_metrics: Option<AggregateMetrics>,
    pub session_metrics: SessionMetrics,
    pub session_flags: SessionFlags,
    pub cells: Vec<CellReport>,
}

impl SessionVerdict {
    /// Per-cell verdict symbols in chronological order
    pub fn cell_symbols(&self) -> String {
        self.cells.iter().map(|c| c.verdict.symbol()).collect()
    }
}
