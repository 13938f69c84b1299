//! Session aggregator
//!
//! Combines per-cell flags into coverage-aware ratios and a weighted
//! suspicion score, then decides the session level. Fewer than two valid
//! cells is a hard gate: no verdict is given on thin evidence.

use crate::analyzer::analyze_cell_with;
use crate::cells::{partition_into_cells, Cell};
use crate::config::DetectorConfig;
use crate::metrics::{
    calculate_compression, calculate_cv, calculate_normalized_entropy, calculate_repetition,
    click_intervals, distinct_count,
};
use crate::schema::{EventKind, InteractionEvent};
use crate::types::{
    AggregateMetrics, CellReport, CellStats, Flag, KeyboardSignal, Metric, SessionFlags,
    SessionMetrics, SessionStats, SessionVerdict, SuspicionLevel,
};
use chrono::Utc;
use tracing::debug;

/// Analyze a submission, taking "now" from the wall clock
pub fn analyze_quiz_behavior(
    score: u32,
    events: &[InteractionEvent],
    total_questions: u32,
    session_start_ms: i64,
) -> SessionVerdict {
    analyze_at(
        score,
        events,
        total_questions,
        session_start_ms,
        Utc::now().timestamp_millis(),
        &DetectorConfig::default(),
    )
}

/// Analyze a submission against a fixed "now"
///
/// Deterministic for a given input, which makes replays and tests stable.
pub fn analyze_at(
    score: u32,
    events: &[InteractionEvent],
    total_questions: u32,
    session_start_ms: i64,
    now_ms: i64,
    config: &DetectorConfig,
) -> SessionVerdict {
    let cells = partition_into_cells(events, config.cell_width_ms);
    let anchor = events.first().map(|e| e.timestamp).unwrap_or(session_start_ms);

    let reports: Vec<CellReport> = cells
        .iter()
        .map(|cell| build_cell_report(cell, anchor, config))
        .collect();

    let cell_stats = tally(&reports);
    let stats = session_stats(events, total_questions, session_start_ms, now_ms);
    let keyboard_signal = keyboard_signal(&stats, config);
    let session_metrics = session_metrics(events);
    let session_flags = session_flags(events, &session_metrics, keyboard_signal, config);

    let too_fast = total_questions > 0
        && stats.avg_time_per_question_sec < config.session.too_fast_secs_per_question;
    let perfect_score = total_questions > 0 && score == total_questions;

    let (level, weighted_score) = if cell_stats.valid_cells < config.session.min_valid_cells {
        (SuspicionLevel::InsufficientData, 0.0)
    } else {
        let session = &config.session;
        let weighted = (session.suspicious_weight * cell_stats.suspicious_flags as f64
            + session.caution_weight * cell_stats.caution_flags as f64)
            / (session.suspicious_weight * (cell_stats.valid_cells * Metric::ALL.len()) as f64);

        let level = if weighted >= session.suspicious_score {
            SuspicionLevel::Suspicious
        } else if weighted >= session.caution_score {
            SuspicionLevel::Caution
        } else {
            SuspicionLevel::Human
        };
        (level, weighted)
    };

    let mut reasons = Vec::new();
    if too_fast && perfect_score {
        reasons.push("very fast answers with a perfect score".to_string());
    }
    reasons.extend(metric_reasons(&reports));
    match keyboard_signal {
        KeyboardSignal::Strong => reasons.push("clicks mostly triggered via keyboard".to_string()),
        KeyboardSignal::Mild => reasons.push("heavy keyboard-based clicking".to_string()),
        KeyboardSignal::None => {}
    }

    let details = details_sentence(level, &reasons, &cell_stats);

    debug!(
        cells = reports.len(),
        valid_cells = cell_stats.valid_cells,
        weighted_score,
        level = %level,
        "session aggregated"
    );

    SessionVerdict {
        level,
        weighted_score,
        classification: level.message().to_string(),
        details,
        reasons,
        color: level.color().to_string(),
        severity: level.severity(),
        score,
        total_questions,
        too_fast,
        perfect_score,
        keyboard_signal,
        stats,
        cell_stats,
        cell_metrics: weighted_cell_metrics(&reports, &session_metrics),
        session_metrics,
        session_flags,
        cells: reports,
    }
}

fn build_cell_report(cell: &Cell, anchor: i64, config: &DetectorConfig) -> CellReport {
    let flags = analyze_cell_with(&cell.events, config);
    let verdict = flags.verdict();
    debug!(index = cell.index, events = cell.events.len(), token = %flags, "cell");

    CellReport {
        index: cell.index,
        start_time: cell.start_time,
        end_time: cell.end_time,
        start_offset_sec: cell.start_time.saturating_sub(anchor) as f64 / 1000.0,
        end_offset_sec: cell.end_time.saturating_sub(anchor) as f64 / 1000.0,
        event_count: cell.events.len(),
        flags,
        verdict,
    }
}

/// Count flags over cells with enough data and derive the coverage ratios
fn tally(reports: &[CellReport]) -> CellStats {
    let mut stats = CellStats {
        total_cells: reports.len(),
        cells_with_data: 0,
        valid_cells: 0,
        suspicious_flags: 0,
        caution_flags: 0,
        human_flags: 0,
        suspicious_ratio: 0.0,
        caution_ratio: 0.0,
        human_ratio: 0.0,
        coverage: 0.0,
    };

    for report in reports.iter().filter(|r| r.flags.has_enough_data) {
        stats.cells_with_data += 1;
        let flags = &report.flags;
        if flags.measured() == 0 {
            continue;
        }
        stats.valid_cells += 1;
        stats.suspicious_flags += flags.count(Flag::Suspicious);
        stats.caution_flags += flags.count(Flag::Caution);
        stats.human_flags += flags.count(Flag::Human);
    }

    let slots = (stats.valid_cells * Metric::ALL.len()) as f64;
    if slots > 0.0 {
        let measured = stats.suspicious_flags + stats.caution_flags + stats.human_flags;
        stats.suspicious_ratio = stats.suspicious_flags as f64 / slots;
        stats.caution_ratio = stats.caution_flags as f64 / slots;
        stats.human_ratio = stats.human_flags as f64 / slots;
        stats.coverage = measured as f64 / slots;
    }

    stats
}

fn session_stats(
    events: &[InteractionEvent],
    total_questions: u32,
    session_start_ms: i64,
    now_ms: i64,
) -> SessionStats {
    let count = |kind: EventKind| events.iter().filter(|e| e.kind == kind).count();

    let clicks = count(EventKind::Click);
    let keyboard_clicks = events.iter().filter(|e| e.is_keyboard_click()).count();
    let total_time_sec = now_ms.saturating_sub(session_start_ms).max(0) as f64 / 1000.0;

    SessionStats {
        total_events: events.len(),
        clicks,
        mouse_movements: count(EventKind::Move),
        hovers: count(EventKind::Hover),
        scrolls: count(EventKind::Scroll),
        tab_switches: count(EventKind::TabAway) + count(EventKind::TabReturn),
        submits: count(EventKind::Submit),
        clears: count(EventKind::Clear),
        keyboard_navigation: count(EventKind::KeyboardNav),
        keyboard_clicks,
        keyboard_ratio: if clicks > 0 {
            keyboard_clicks as f64 / clicks as f64
        } else {
            0.0
        },
        unknown_events: count(EventKind::Unknown),
        total_time_sec,
        avg_time_per_question_sec: if total_questions > 0 {
            total_time_sec / total_questions as f64
        } else {
            0.0
        },
    }
}

fn keyboard_signal(stats: &SessionStats, config: &DetectorConfig) -> KeyboardSignal {
    let session = &config.session;
    if stats.clicks < session.keyboard_min_clicks {
        KeyboardSignal::None
    } else if stats.keyboard_ratio >= session.keyboard_strong_ratio {
        KeyboardSignal::Strong
    } else if stats.keyboard_ratio >= session.keyboard_mild_ratio {
        KeyboardSignal::Mild
    } else {
        KeyboardSignal::None
    }
}

/// Per-metric evidence from the share of cells flagging it
///
/// The share denominator is the cells where that metric was measured.
fn metric_reasons(reports: &[CellReport]) -> Vec<String> {
    let mut reasons = Vec::new();

    for metric in Metric::ALL {
        let measured: Vec<Flag> = reports
            .iter()
            .filter(|r| r.flags.has_enough_data)
            .map(|r| r.flags.get(metric))
            .filter(|f| f.is_measured())
            .collect();
        if measured.is_empty() {
            continue;
        }

        let denom = measured.len() as f64;
        let s = measured.iter().filter(|f| **f == Flag::Suspicious).count() as f64 / denom;
        let c = measured.iter().filter(|f| **f == Flag::Caution).count() as f64 / denom;

        let (strong, mild) = reason_text(metric);
        if s >= 0.5 {
            reasons.push(format!("{strong} across time windows"));
        } else if c >= 0.35 || s + c >= 0.5 {
            reasons.push(format!("{mild} across time windows"));
        }
    }

    reasons
}

fn reason_text(metric: Metric) -> (&'static str, &'static str) {
    match metric {
        Metric::Timing => (
            "highly consistent click timing",
            "unusually consistent click timing",
        ),
        Metric::Repetition => (
            "high repetition in action patterns",
            "some repetition in action patterns",
        ),
        Metric::Entropy => ("low interaction variety", "reduced interaction variety"),
        Metric::Compression => ("very simple repeated sequences", "simple sequences"),
    }
}

fn details_sentence(level: SuspicionLevel, reasons: &[String], cell_stats: &CellStats) -> String {
    if level == SuspicionLevel::InsufficientData {
        return format!(
            "Only {} of {} time windows had enough activity to analyze.",
            cell_stats.valid_cells, cell_stats.total_cells
        );
    }
    if reasons.is_empty() {
        return level.message().to_string();
    }

    let lead_in = match level {
        SuspicionLevel::Suspicious => "Detected",
        SuspicionLevel::Caution => "Observed",
        _ => "Minor signals:",
    };
    format!("{} {}.", lead_in, reasons.join(", "))
}

/// Cell metrics averaged with per-cell sample sizes as weights
///
/// A metric no cell measured falls back to its whole-session value.
fn weighted_cell_metrics(
    reports: &[CellReport],
    session: &SessionMetrics,
) -> Option<AggregateMetrics> {
    let mut cv = (0.0, 0usize);
    let mut repetition = (0.0, 0usize);
    let mut entropy = (0.0, 0usize);
    let mut compression = (0.0, 0usize);
    let mut cv_cells = 0;
    let mut cells = 0;

    for report in reports.iter().filter(|r| r.flags.has_enough_data) {
        let Some(values) = report.flags.values else {
            continue;
        };
        cells += 1;
        let w = values.weights;

        if let Some(value) = values.cv {
            if w.cv > 0 {
                cv.0 += value * w.cv as f64;
                cv.1 += w.cv;
                cv_cells += 1;
            }
        }
        repetition.0 += values.repetition * w.repetition as f64;
        repetition.1 += w.repetition;
        entropy.0 += values.entropy_norm * w.entropy_norm as f64;
        entropy.1 += w.entropy_norm;
        compression.0 += values.compression * w.compression as f64;
        compression.1 += w.compression;
    }

    if cells == 0 {
        return None;
    }

    let mean = |(sum, weight): (f64, usize), fallback: f64| {
        if weight > 0 {
            sum / weight as f64
        } else {
            fallback
        }
    };

    Some(AggregateMetrics {
        cv: mean(cv, session.cv),
        repetition: mean(repetition, session.repetition),
        entropy_norm: mean(entropy, session.entropy_norm),
        compression: mean(compression, session.compression),
        cv_cells,
        cells,
    })
}

/// The four metrics over the whole stream, ignoring cell boundaries
pub fn session_metrics(events: &[InteractionEvent]) -> SessionMetrics {
    let symbols: Vec<EventKind> = events
        .iter()
        .map(|e| e.kind)
        .filter(|k| k.is_recognized())
        .collect();

    SessionMetrics {
        cv: calculate_cv(&click_intervals(events)),
        repetition: calculate_repetition(&symbols),
        entropy_norm: calculate_normalized_entropy(&symbols, distinct_count(symbols.iter())),
        compression: calculate_compression(&symbols),
    }
}

/// Whole-session flags from the stream-level metrics
///
/// Each metric keeps the cell sample gates; an ungated metric scores 0.
fn session_flags(
    events: &[InteractionEvent],
    metrics: &SessionMetrics,
    keyboard: KeyboardSignal,
    config: &DetectorConfig,
) -> SessionFlags {
    let symbols: Vec<EventKind> = events
        .iter()
        .map(|e| e.kind)
        .filter(|k| k.is_recognized())
        .collect();
    let clicks = symbols.iter().filter(|k| **k == EventKind::Click).count();
    let meaningful = symbols.iter().filter(|k| k.is_meaningful());
    let compressible = symbols.iter().filter(|k| k.is_compressible()).count();

    let timing = if clicks >= config.timing.min_clicks {
        config.timing.cutoffs.classify(metrics.cv)
    } else {
        Flag::NotEnoughData
    };
    let repetition = if symbols.len() >= config.repetition.min_symbols
        && distinct_count(meaningful) >= config.repetition.min_distinct
    {
        config.repetition.cutoffs.classify(metrics.repetition)
    } else {
        Flag::NotEnoughData
    };
    let entropy = if distinct_count(symbols.iter()) >= config.entropy.min_distinct {
        config.entropy.cutoffs.classify(metrics.entropy_norm)
    } else {
        Flag::NotEnoughData
    };
    let compression = if compressible >= config.compression.min_symbols {
        config.compression.cutoffs.classify(metrics.compression)
    } else {
        Flag::NotEnoughData
    };

    SessionFlags {
        timing: timing.weight(),
        repetition: repetition.weight(),
        entropy: entropy.weight(),
        compression: compression.weight(),
        keyboard_only: keyboard.weight(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ClickMethod, EventKind::*};
    use pretty_assertions::assert_eq;

    const START: i64 = 1_700_000_000_000;

    fn at(kind: EventKind, offset: i64) -> InteractionEvent {
        InteractionEvent::new(kind, START + offset)
    }

    fn uniform_clicks(count: usize, step: i64) -> Vec<InteractionEvent> {
        (0..count).map(|i| at(Click, i as i64 * step)).collect()
    }

    fn run(score: u32, events: &[InteractionEvent], total: u32, elapsed_ms: i64) -> SessionVerdict {
        analyze_at(
            score,
            events,
            total,
            START,
            START + elapsed_ms,
            &DetectorConfig::default(),
        )
    }

    fn natural_session() -> Vec<InteractionEvent> {
        vec![
            at(Move, 100),
            at(Hover, 300),
            at(Click, 400),
            at(Move, 800),
            at(Scroll, 1_200),
            at(Click, 1_500),
            at(Hover, 2_500),
            at(Move, 3_000),
            at(Click, 4_100),
            at(Scroll, 4_600),
            at(Move, 5_100),
            at(Hover, 5_200),
            at(Click, 5_300),
            at(Move, 5_500),
            at(Scroll, 5_700),
            at(Click, 6_000),
            at(Hover, 7_000),
            at(Move, 7_800),
            at(Click, 8_800),
            at(Scroll, 9_400),
        ]
    }

    #[test]
    fn test_uniform_bot_is_suspicious() {
        // 40 clicks every 250 ms fill two cells of 20
        let verdict = run(10, &uniform_clicks(40, 250), 10, 10_000);

        assert_eq!(verdict.cells.len(), 2);
        assert_eq!(verdict.cell_stats.valid_cells, 2);
        assert_eq!(verdict.cell_stats.suspicious_flags, 4);
        assert!((verdict.weighted_score - 0.5).abs() < 1e-12);
        assert_eq!(verdict.level, SuspicionLevel::Suspicious);
        assert_eq!(verdict.color, "#ef4444");
        assert_eq!(verdict.cell_symbols(), "ss");
        assert!(verdict
            .reasons
            .contains(&"highly consistent click timing across time windows".to_string()));
        assert!(verdict
            .reasons
            .contains(&"low interaction variety across time windows".to_string()));
    }

    #[test]
    fn test_sparse_uniform_clicks_reach_caution() {
        // Two cells of 5 clicks: only timing fires, 2 of 8 slots weighted x2
        let verdict = run(3, &uniform_clicks(10, 1_000), 10, 60_000);

        assert_eq!(verdict.cell_stats.valid_cells, 2);
        assert!((verdict.weighted_score - 0.25).abs() < 1e-12);
        assert_eq!(verdict.level, SuspicionLevel::Caution);
    }

    #[test]
    fn test_natural_session_is_human() {
        let verdict = run(7, &natural_session(), 10, 90_000);

        assert_eq!(verdict.cell_stats.valid_cells, 2);
        assert_eq!(verdict.cell_stats.suspicious_flags, 0);
        assert_eq!(verdict.cell_stats.caution_flags, 0);
        assert_eq!(verdict.weighted_score, 0.0);
        assert_eq!(verdict.level, SuspicionLevel::Human);
        assert_eq!(verdict.cell_symbols(), "hh");
        assert!(verdict.reasons.is_empty());
        assert_eq!(verdict.details, SuspicionLevel::Human.message());
        assert!((verdict.cell_stats.coverage - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_single_informative_cell_is_insufficient() {
        let mut events = uniform_clicks(20, 200);
        events.push(at(Move, 6_000));
        events.push(at(Move, 7_000));
        events.push(at(Move, 12_000));

        let verdict = run(10, &events, 10, 20_000);

        assert_eq!(verdict.cells.len(), 3);
        assert_eq!(verdict.cell_stats.cells_with_data, 1);
        assert_eq!(verdict.cell_stats.valid_cells, 1);
        assert_eq!(verdict.level, SuspicionLevel::InsufficientData);
        assert_eq!(verdict.weighted_score, 0.0);
        assert_eq!(verdict.classification, "Not enough data to analyze behavior.");
        assert_eq!(verdict.color, "#9CA3AF");
    }

    #[test]
    fn test_empty_stream_is_insufficient() {
        let verdict = run(0, &[], 10, 5_000);
        assert_eq!(verdict.level, SuspicionLevel::InsufficientData);
        assert!(verdict.cells.is_empty());
        assert!(verdict.cell_metrics.is_none());
    }

    #[test]
    fn test_cell_offsets_keep_gaps() {
        let mut events = natural_session();
        events.push(at(Move, 23_000));
        let verdict = run(7, &events, 10, 90_000);

        let last = verdict.cells.last().unwrap();
        assert_eq!(last.index, 4);
        assert_eq!(last.start_offset_sec, 20.0);
        assert_eq!(last.end_offset_sec, 25.0);
        assert_eq!(last.verdict, Flag::NotEnoughData);
    }

    #[test]
    fn test_too_fast_perfect_score_adds_reason() {
        let verdict = run(10, &natural_session(), 10, 9_000);
        assert!(verdict.too_fast);
        assert!(verdict.perfect_score);
        assert_eq!(verdict.reasons[0], "very fast answers with a perfect score");
        // reasons explain but never move the level
        assert_eq!(verdict.level, SuspicionLevel::Human);
        assert!(verdict.details.starts_with("Minor signals:"));
    }

    #[test]
    fn test_keyboard_only_clicking() {
        let events: Vec<InteractionEvent> = natural_session()
            .into_iter()
            .map(|e| {
                if e.kind == Click {
                    e.with_method(ClickMethod::Keyboard)
                } else {
                    e
                }
            })
            .collect();
        let verdict = run(6, &events, 10, 90_000);

        assert_eq!(verdict.stats.keyboard_clicks, 6);
        assert_eq!(verdict.stats.keyboard_ratio, 1.0);
        assert_eq!(verdict.keyboard_signal, KeyboardSignal::Strong);
        assert!(verdict
            .reasons
            .contains(&"clicks mostly triggered via keyboard".to_string()));
    }

    #[test]
    fn test_session_stats() {
        let mut events = natural_session();
        events.push(at(TabAway, 9_500));
        events.push(at(TabReturn, 9_800));
        events.push(at(Submit, 9_900));

        let verdict = run(7, &events, 10, 120_000);
        let stats = verdict.stats;

        assert_eq!(stats.total_events, 23);
        assert_eq!(stats.clicks, 6);
        assert_eq!(stats.mouse_movements, 6);
        assert_eq!(stats.hovers, 4);
        assert_eq!(stats.scrolls, 4);
        assert_eq!(stats.tab_switches, 2);
        assert_eq!(stats.submits, 1);
        assert_eq!(stats.total_time_sec, 120.0);
        assert_eq!(stats.avg_time_per_question_sec, 12.0);
    }

    #[test]
    fn test_weighted_cell_metrics() {
        let verdict = run(7, &natural_session(), 10, 90_000);
        let metrics = verdict.cell_metrics.unwrap();

        // cell CVs 750/1850 and 1050/1750, two intervals each
        let expected = (750.0 / 1850.0 + 1050.0 / 1750.0) / 2.0;
        assert!((metrics.cv - expected).abs() < 1e-9);
        assert_eq!(metrics.cv_cells, 2);
        assert_eq!(metrics.cells, 2);
        assert_eq!(metrics.compression, 1.0);
    }

    #[test]
    fn test_min_valid_cells_is_configurable() {
        let mut events = uniform_clicks(20, 200);
        events.push(at(Move, 6_000));
        let mut config = DetectorConfig::default();
        config.session.min_valid_cells = 1;

        let verdict = analyze_at(10, &events, 10, START, START + 20_000, &config);
        assert_eq!(verdict.level, SuspicionLevel::Suspicious);
    }

    #[test]
    fn test_unmeasured_cell_metric_falls_back_to_session_value() {
        // two clicks per cell: no cell computes a CV
        let events = vec![
            at(Click, 0),
            at(Hover, 300),
            at(Click, 1_000),
            at(Scroll, 1_200),
            at(Hover, 2_000),
            at(Click, 5_000),
            at(Hover, 5_300),
            at(Scroll, 6_200),
            at(Click, 7_000),
            at(Hover, 7_500),
        ];
        let verdict = run(5, &events, 10, 30_000);
        let metrics = verdict.cell_metrics.unwrap();

        assert_eq!(metrics.cv_cells, 0);
        assert_eq!(metrics.cells, 2);
        assert!(verdict.session_metrics.cv > 0.0);
        assert_eq!(metrics.cv, verdict.session_metrics.cv);
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        let events = vec![
            InteractionEvent::click(i64::MIN),
            InteractionEvent::click(i64::MIN + 1),
            InteractionEvent::click(i64::MAX),
        ];
        let verdict = analyze_at(
            3,
            &events,
            3,
            i64::MIN,
            i64::MAX,
            &DetectorConfig::default(),
        );

        assert!(verdict.stats.total_time_sec.is_finite());
        assert!(verdict.stats.total_time_sec > 0.0);
        assert_eq!(verdict.cells.len(), 2);
        assert!(verdict.cells.iter().all(|c| c.end_offset_sec >= c.start_offset_sec));
        assert_eq!(verdict.level, SuspicionLevel::InsufficientData);

        let backwards = analyze_at(0, &[], 3, i64::MAX, i64::MIN, &DetectorConfig::default());
        assert_eq!(backwards.stats.total_time_sec, 0.0);
    }

    #[test]
    fn test_click_gated_cells_without_measured_metrics_are_not_valid() {
        // two cells pass the click gate yet measure nothing
        let mut events = vec![at(Click, 0), at(Click, 500), at(Click, 5_000), at(Click, 5_500)];
        events.extend((0..20).map(|i| at(Click, 10_000 + i * 200)));
        let verdict = run(10, &events, 10, 30_000);

        assert_eq!(verdict.cell_symbols(), "nns");
        assert_eq!(verdict.cell_stats.cells_with_data, 3);
        assert_eq!(verdict.cell_stats.valid_cells, 1);
        assert_eq!(verdict.level, SuspicionLevel::InsufficientData);
        assert_eq!(verdict.weighted_score, 0.0);
    }

    #[test]
    fn test_session_flags_explain_without_moving_level() {
        let bot = run(10, &uniform_clicks(40, 250), 10, 10_000);
        assert_eq!(
            bot.session_flags,
            SessionFlags {
                timing: 1.0,
                repetition: 0.0,
                entropy: 0.0,
                compression: 0.0,
                keyboard_only: 0.0,
            }
        );
        assert_eq!(bot.session_flags.sum(), 1.0);
        assert_eq!(bot.level, SuspicionLevel::Suspicious);

        // a strong whole-session flag does not lift a thin session
        let thin = run(10, &uniform_clicks(5, 250), 10, 10_000);
        assert_eq!(thin.session_flags.timing, 1.0);
        assert_eq!(thin.level, SuspicionLevel::InsufficientData);

        let human = run(7, &natural_session(), 10, 90_000);
        assert_eq!(human.session_flags.sum(), 0.0);
        assert_eq!(SessionFlags::MAX, 5.0);
    }
}
