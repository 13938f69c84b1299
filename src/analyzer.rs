//! Cell analyzer
//!
//! Turns the events of one cell into four per-metric flags. The cell is blank
//! (all `n`) below two clicks; past that gate every metric checks its own
//! minimum sample.

use crate::config::{DetectorConfig, HighCutoffs, LowCutoffs, MIN_CLICKS_PER_CELL};
use crate::metrics::{
    calculate_compression, calculate_cv, calculate_normalized_entropy, calculate_repetition,
    click_intervals, distinct_count,
};
use crate::schema::{EventKind, InteractionEvent};
use crate::types::{CellFlags, Flag, MetricValues, MetricWeights};
use tracing::debug;

impl LowCutoffs {
    /// Classify a metric where low values are bot-like
    pub fn classify(&self, value: f64) -> Flag {
        let below = |limit: f64| {
            if self.inclusive {
                value <= limit
            } else {
                value < limit
            }
        };

        if below(self.suspicious) {
            Flag::Suspicious
        } else if below(self.caution) {
            Flag::Caution
        } else {
            Flag::Human
        }
    }
}

impl HighCutoffs {
    /// Classify a metric where high values are bot-like
    pub fn classify(&self, value: f64) -> Flag {
        if value >= self.suspicious {
            Flag::Suspicious
        } else if value >= self.caution {
            Flag::Caution
        } else {
            Flag::Human
        }
    }
}

/// Analyze a cell with the default thresholds
pub fn analyze_cell(events: &[InteractionEvent]) -> CellFlags {
    analyze_cell_with(events, &DetectorConfig::default())
}

/// Analyze a cell with explicit thresholds
pub fn analyze_cell_with(events: &[InteractionEvent], config: &DetectorConfig) -> CellFlags {
    let clicks = events.iter().filter(|e| e.kind == EventKind::Click).count();
    if clicks < MIN_CLICKS_PER_CELL {
        return CellFlags::not_enough_data();
    }

    let symbols: Vec<EventKind> = events
        .iter()
        .map(|e| e.kind)
        .filter(|k| k.is_recognized())
        .collect();

    let mut values = MetricValues::default();
    let mut weights = MetricWeights::default();

    // T: timing regularity
    let timing = if clicks >= config.timing.min_clicks {
        let intervals = click_intervals(events);
        let cv = calculate_cv(&intervals);
        values.cv = Some(cv);
        weights.cv = intervals.len();
        config.timing.cutoffs.classify(cv)
    } else {
        Flag::NotEnoughData
    };

    // R: block repetition
    let meaningful: Vec<EventKind> = symbols.iter().copied().filter(|k| k.is_meaningful()).collect();
    weights.repetition = meaningful.len();
    let repetition = if meaningful.len() >= config.repetition.min_symbols
        && distinct_count(meaningful.iter()) >= config.repetition.min_distinct
    {
        values.repetition = calculate_repetition(&meaningful);
        config.repetition.cutoffs.classify(values.repetition)
    } else {
        Flag::NotEnoughData
    };

    // E: entropy, with the homogeneity override
    let distinct = distinct_count(symbols.iter());
    weights.entropy_norm = symbols.len();
    let entropy = if distinct == 1 && symbols.len() >= config.entropy.homogeneity_min_events {
        values.entropy_norm = 0.0;
        Flag::Suspicious
    } else if distinct >= config.entropy.min_distinct {
        values.entropy_norm = calculate_normalized_entropy(&symbols, distinct);
        config.entropy.cutoffs.classify(values.entropy_norm)
    } else {
        Flag::NotEnoughData
    };

    // C: compressibility
    let compressible = symbols.iter().filter(|k| k.is_compressible()).count();
    weights.compression = compressible;
    values.compression = calculate_compression(&symbols);
    let compression = if compressible >= config.compression.min_symbols {
        config.compression.cutoffs.classify(values.compression)
    } else {
        Flag::NotEnoughData
    };

    values.weights = weights;

    let flags = CellFlags {
        has_enough_data: true,
        timing,
        repetition,
        entropy,
        compression,
        values: Some(values),
    };
    debug!(clicks, symbols = symbols.len(), token = %flags, "cell analyzed");
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EventKind::{Click, Hover, Move, Scroll};
    use pretty_assertions::assert_eq;

    fn uniform_clicks(count: usize, start: i64, step: i64) -> Vec<InteractionEvent> {
        (0..count)
            .map(|i| InteractionEvent::click(start + i as i64 * step))
            .collect()
    }

    #[test]
    fn test_single_click_is_blank() {
        let events = vec![
            InteractionEvent::new(Move, 0),
            InteractionEvent::click(100),
            InteractionEvent::new(Hover, 200),
        ];
        let flags = analyze_cell(&events);
        assert_eq!(flags, CellFlags::not_enough_data());
    }

    #[test]
    fn test_two_clicks_pass_gate_but_timing_needs_three() {
        let events = vec![
            InteractionEvent::click(0),
            InteractionEvent::new(Hover, 300),
            InteractionEvent::click(900),
        ];
        let flags = analyze_cell(&events);
        assert!(flags.has_enough_data);
        assert_eq!(flags.timing, Flag::NotEnoughData);
        // distinct C/H with maximal entropy
        assert_eq!(flags.entropy, Flag::Human);
        assert_eq!(flags.compression, Flag::NotEnoughData);
    }

    #[test]
    fn test_uniform_click_burst() {
        let flags = analyze_cell(&uniform_clicks(20, 0, 250));
        assert_eq!(flags.timing, Flag::Suspicious);
        assert_eq!(flags.repetition, Flag::NotEnoughData);
        assert_eq!(flags.entropy, Flag::Suspicious);
        // single distinct symbol carries no compression signal
        assert_eq!(flags.compression, Flag::Human);
        assert_eq!(flags.verdict(), Flag::Suspicious);
    }

    #[test]
    fn test_homogeneity_needs_volume() {
        let flags = analyze_cell(&uniform_clicks(5, 0, 1_000));
        assert_eq!(flags.timing, Flag::Suspicious);
        assert_eq!(flags.entropy, Flag::NotEnoughData);
    }

    #[test]
    fn test_scripted_cycle_trips_repetition() {
        let events: Vec<InteractionEvent> = [Hover, Click, Scroll, Click]
            .iter()
            .cycle()
            .take(16)
            .enumerate()
            .map(|(i, k)| InteractionEvent::new(*k, i as i64 * 200))
            .collect();
        let flags = analyze_cell(&events);
        assert_eq!(flags.repetition, Flag::Suspicious);
        assert_eq!(flags.values.unwrap().repetition, 1.0);
    }

    #[test]
    fn test_natural_cell_reads_human() {
        let events = vec![
            InteractionEvent::new(Move, 100),
            InteractionEvent::new(Hover, 300),
            InteractionEvent::click(400),
            InteractionEvent::new(Move, 800),
            InteractionEvent::new(Scroll, 1_200),
            InteractionEvent::click(1_500),
            InteractionEvent::new(Hover, 2_500),
            InteractionEvent::new(Move, 3_000),
            InteractionEvent::click(4_100),
            InteractionEvent::new(Scroll, 4_600),
        ];
        let flags = analyze_cell(&events);
        assert_eq!(flags.to_string(), "T_h | R_n | E_h | C_h");
        assert_eq!(flags.verdict(), Flag::Human);

        let values = flags.values.unwrap();
        assert!((values.cv.unwrap() - 750.0 / 1850.0).abs() < 1e-9);
        assert_eq!(values.weights.cv, 2);
        assert_eq!(values.weights.repetition, 7);
        assert_eq!(values.weights.entropy_norm, 10);
        assert_eq!(values.weights.compression, 7);
    }

    #[test]
    fn test_unknown_kinds_are_ignored() {
        let mut events = uniform_clicks(20, 0, 250);
        events.push(InteractionEvent::new(EventKind::Unknown, 4_900));
        let flags = analyze_cell(&events);
        // homogeneity still applies to the recognized symbols
        assert_eq!(flags.entropy, Flag::Suspicious);
    }

    #[test]
    fn test_cutoff_boundaries() {
        let low = LowCutoffs {
            suspicious: 0.5,
            caution: 0.75,
            inclusive: true,
        };
        assert_eq!(low.classify(0.5), Flag::Suspicious);
        assert_eq!(low.classify(0.75), Flag::Caution);
        assert_eq!(low.classify(0.76), Flag::Human);

        let exclusive = LowCutoffs {
            inclusive: false,
            ..low
        };
        assert_eq!(exclusive.classify(0.5), Flag::Caution);

        let high = HighCutoffs {
            suspicious: 0.75,
            caution: 0.6,
        };
        assert_eq!(high.classify(0.75), Flag::Suspicious);
        assert_eq!(high.classify(0.6), Flag::Caution);
        assert_eq!(high.classify(0.59), Flag::Human);
    }
}
