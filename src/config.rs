//! Detector configuration
//!
//! Every threshold, sample gate and weight used by the analyzer and the
//! session aggregator. `DetectorConfig::default()` is the calibrated profile;
//! JSON overrides may be partial since every section falls back to defaults.

use crate::error::AnalysisError;
use crate::metrics::{MIN_COMPRESSION_SYMBOLS, MIN_REPETITION_SYMBOLS};
use serde::{Deserialize, Serialize};

/// Default cell width in milliseconds
pub const DEFAULT_CELL_WIDTH_MS: i64 = 5_000;

/// Minimum number of clicks for a cell to carry any evidence
pub const MIN_CLICKS_PER_CELL: usize = 2;

/// Two-level cutoff for a metric where LOW values are bot-like.
///
/// A value strictly below `suspicious` (or at/below it when `inclusive`) is
/// suspicious, below `caution` is caution, anything else is human.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LowCutoffs {
    pub suspicious: f64,
    pub caution: f64,
    /// Compare with `<=` instead of `<`
    #[serde(default)]
    pub inclusive: bool,
}

/// Two-level cutoff for a metric where HIGH values are bot-like
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighCutoffs {
    pub suspicious: f64,
    pub caution: f64,
}

/// Timing regularity (coefficient of variation of click intervals)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Clicks needed before a CV is computed (two intervals)
    pub min_clicks: usize,
    pub cutoffs: LowCutoffs,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            min_clicks: 3,
            cutoffs: LowCutoffs {
                suspicious: 0.08,
                caution: 0.20,
                inclusive: false,
            },
        }
    }
}

/// Block repetition of meaningful symbols
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepetitionConfig {
    pub min_symbols: usize,
    pub min_distinct: usize,
    pub cutoffs: HighCutoffs,
}

impl Default for RepetitionConfig {
    fn default() -> Self {
        Self {
            min_symbols: MIN_REPETITION_SYMBOLS,
            min_distinct: 2,
            cutoffs: HighCutoffs {
                suspicious: 0.75,
                caution: 0.60,
            },
        }
    }
}

/// Normalized Shannon entropy of the cell's symbol distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntropyConfig {
    pub min_distinct: usize,
    /// Volume at which a single-symbol cell is forced suspicious
    pub homogeneity_min_events: usize,
    pub cutoffs: LowCutoffs,
}

impl Default for EntropyConfig {
    fn default() -> Self {
        Self {
            min_distinct: 2,
            homogeneity_min_events: 20,
            cutoffs: LowCutoffs {
                suspicious: 0.40,
                caution: 0.60,
                inclusive: false,
            },
        }
    }
}

/// Run-length compression ratio of click/hover/scroll symbols
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    pub min_symbols: usize,
    pub cutoffs: LowCutoffs,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            min_symbols: MIN_COMPRESSION_SYMBOLS,
            cutoffs: LowCutoffs {
                suspicious: 0.50,
                caution: 0.75,
                inclusive: true,
            },
        }
    }
}

/// Session-level aggregation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Cells with usable metrics required before any verdict is given
    pub min_valid_cells: usize,
    pub suspicious_weight: f64,
    pub caution_weight: f64,
    /// Weighted score at or above which the session is suspicious
    pub suspicious_score: f64,
    /// Weighted score at or above which the session needs caution
    pub caution_score: f64,
    /// Average seconds per question below which answers count as too fast
    pub too_fast_secs_per_question: f64,
    /// Clicks needed before the keyboard-only signal is considered
    pub keyboard_min_clicks: usize,
    pub keyboard_strong_ratio: f64,
    pub keyboard_mild_ratio: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_valid_cells: 2,
            suspicious_weight: 2.0,
            caution_weight: 1.0,
            suspicious_score: 0.32,
            caution_score: 0.24,
            too_fast_secs_per_question: 1.0,
            keyboard_min_clicks: 5,
            keyboard_strong_ratio: 0.90,
            keyboard_mild_ratio: 0.70,
        }
    }
}

/// Full detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub cell_width_ms: i64,
    pub timing: TimingConfig,
    pub repetition: RepetitionConfig,
    pub entropy: EntropyConfig,
    pub compression: CompressionConfig,
    pub session: SessionConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            cell_width_ms: DEFAULT_CELL_WIDTH_MS,
            timing: TimingConfig::default(),
            repetition: RepetitionConfig::default(),
            entropy: EntropyConfig::default(),
            compression: CompressionConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl DetectorConfig {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        let config: DetectorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, AnalysisError> {
        serde_json::to_string_pretty(self).map_err(AnalysisError::JsonError)
    }

    /// Reject configurations that would make partitioning or scoring meaningless
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.cell_width_ms <= 0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "cell_width_ms must be positive, got {}",
                self.cell_width_ms
            )));
        }
        if self.timing.min_clicks < MIN_CLICKS_PER_CELL + 1 {
            return Err(AnalysisError::InvalidConfig(
                "timing.min_clicks must allow at least two intervals".to_string(),
            ));
        }

        if self.repetition.min_symbols < MIN_REPETITION_SYMBOLS {
            return Err(AnalysisError::InvalidConfig(format!(
                "repetition.min_symbols must be at least {MIN_REPETITION_SYMBOLS}, got {}",
                self.repetition.min_symbols
            )));
        }
        if self.compression.min_symbols < MIN_COMPRESSION_SYMBOLS {
            return Err(AnalysisError::InvalidConfig(format!(
                "compression.min_symbols must be at least {MIN_COMPRESSION_SYMBOLS}, got {}",
                self.compression.min_symbols
            )));
        }

        check_low("timing", &self.timing.cutoffs)?;
        check_low("entropy", &self.entropy.cutoffs)?;
        check_low("compression", &self.compression.cutoffs)?;

        let rep = &self.repetition.cutoffs;
        if !rep.suspicious.is_finite() || !rep.caution.is_finite() || rep.caution > rep.suspicious
        {
            return Err(AnalysisError::InvalidConfig(
                "repetition cutoffs must be finite with caution <= suspicious".to_string(),
            ));
        }

        let s = &self.session;
        if s.min_valid_cells == 0 {
            return Err(AnalysisError::InvalidConfig(
                "session.min_valid_cells must be at least 1".to_string(),
            ));
        }
        if !(s.suspicious_weight > 0.0 && s.caution_weight >= 0.0)
            || s.caution_weight > s.suspicious_weight
        {
            return Err(AnalysisError::InvalidConfig(
                "session weights must satisfy 0 <= caution_weight <= suspicious_weight".to_string(),
            ));
        }
        if !s.suspicious_score.is_finite()
            || !s.caution_score.is_finite()
            || s.caution_score > s.suspicious_score
        {
            return Err(AnalysisError::InvalidConfig(
                "session scores must be finite with caution_score <= suspicious_score".to_string(),
            ));
        }
        if s.keyboard_mild_ratio > s.keyboard_strong_ratio {
            return Err(AnalysisError::InvalidConfig(
                "keyboard_mild_ratio must not exceed keyboard_strong_ratio".to_string(),
            ));
        }

        Ok(())
    }
}

fn check_low(name: &str, cutoffs: &LowCutoffs) -> Result<(), AnalysisError> {
    if !cutoffs.suspicious.is_finite()
        || !cutoffs.caution.is_finite()
        || cutoffs.suspicious > cutoffs.caution
    {
        return Err(AnalysisError::InvalidConfig(format!(
            "{name} cutoffs must be finite with suspicious <= caution"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_valid() {
        assert!(DetectorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config =
            DetectorConfig::from_json(r#"{"cell_width_ms": 10000, "session": {"min_valid_cells": 3}}"#)
                .unwrap();

        assert_eq!(config.cell_width_ms, 10_000);
        assert_eq!(config.session.min_valid_cells, 3);
        assert_eq!(config.session.suspicious_score, 0.32);
        assert_eq!(config.timing, TimingConfig::default());
    }

    #[test]
    fn test_zero_width_rejected() {
        let err = DetectorConfig::from_json(r#"{"cell_width_ms": 0}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfig(_)));
    }

    #[test]
    fn test_inverted_cutoffs_rejected() {
        let mut config = DetectorConfig::default();
        config.timing.cutoffs.suspicious = 0.5;
        config.timing.cutoffs.caution = 0.1;
        assert!(config.validate().is_err());

        let mut config = DetectorConfig::default();
        config.session.caution_score = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sample_gates_below_metric_minimum_rejected() {
        let err = DetectorConfig::from_json(r#"{"repetition": {"min_symbols": 8}}"#).unwrap_err();
        match err {
            AnalysisError::InvalidConfig(msg) => assert!(msg.contains("repetition.min_symbols")),
            other => panic!("unexpected error: {other:?}"),
        }

        let mut config = DetectorConfig::default();
        config.compression.min_symbols = 3;
        assert!(config.validate().is_err());

        // stricter gates stay allowed
        config.compression.min_symbols = 10;
        config.repetition.min_symbols = 24;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = DetectorConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(DetectorConfig::from_json(&json).unwrap(), config);
    }
}
