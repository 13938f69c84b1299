//! Metric library
//!
//! Pure numeric signals over click intervals and interaction symbol sequences.
//! Each function is total: degenerate input yields the metric's neutral value
//! rather than an error.

use crate::schema::{EventKind, InteractionEvent};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Symbols per repetition block
const BLOCK_SIZE: usize = 4;

/// Share of positions that must agree for a block to count as a repeat
const BLOCK_MATCH_RATIO: f64 = 0.8;

/// Minimum meaningful symbols for a repetition score
pub const MIN_REPETITION_SYMBOLS: usize = 12;

/// Minimum blocks (first block plus two comparisons)
const MIN_REPETITION_BLOCKS: usize = 3;

/// Minimum click/hover/scroll symbols for a compression ratio
pub const MIN_COMPRESSION_SYMBOLS: usize = 4;

/// Number of distinct values in a sequence
pub fn distinct_count<T: Hash + Eq>(items: impl IntoIterator<Item = T>) -> usize {
    items.into_iter().collect::<HashSet<T>>().len()
}

/// Gaps in milliseconds between consecutive click events
pub fn click_intervals(events: &[InteractionEvent]) -> Vec<f64> {
    let clicks: Vec<i64> = events
        .iter()
        .filter(|e| e.kind == EventKind::Click)
        .map(|e| e.timestamp)
        .collect();

    clicks
        .windows(2)
        .map(|pair| pair[1].saturating_sub(pair[0]) as f64)
        .collect()
}

/// Coefficient of variation of inter-click intervals
///
/// Formula: `σ / μ` with population variance (divide by N).
/// Returns 0 when fewer than two intervals exist or the mean is zero, so 0
/// means either "no data" or "perfectly constant".
pub fn calculate_cv(intervals: &[f64]) -> f64 {
    if intervals.len() < 2 {
        return 0.0;
    }

    let n = intervals.len() as f64;
    let mean = intervals.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return 0.0;
    }

    let variance = intervals.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() / mean
}

/// Block repetition score over meaningful symbols (0-1)
///
/// Meaningful symbols are cut into non-overlapping blocks of four; every block
/// after the first is compared position-by-position with the first one and
/// counts as a repeat when at least 80% of positions agree.
/// Result: `repeats / (blocks - 1)`.
pub fn calculate_repetition(symbols: &[EventKind]) -> f64 {
    let meaningful: Vec<EventKind> = symbols
        .iter()
        .copied()
        .filter(|k| k.is_meaningful())
        .collect();

    // A single-symbol stream trivially "repeats"; that is not a scripted cycle
    if distinct_count(meaningful.iter()) < 2 || meaningful.len() < MIN_REPETITION_SYMBOLS {
        return 0.0;
    }

    let blocks: Vec<&[EventKind]> = meaningful.chunks_exact(BLOCK_SIZE).collect();
    if blocks.len() < MIN_REPETITION_BLOCKS {
        return 0.0;
    }

    let first = blocks[0];
    let repeats = blocks[1..]
        .iter()
        .filter(|block| {
            let agreeing = block.iter().zip(first).filter(|(a, b)| a == b).count();
            agreeing as f64 / BLOCK_SIZE as f64 >= BLOCK_MATCH_RATIO
        })
        .count();

    repeats as f64 / (blocks.len() - 1) as f64
}

/// Shannon entropy of the symbol distribution in bits
pub fn calculate_entropy(symbols: &[EventKind]) -> f64 {
    if symbols.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<EventKind, usize> = HashMap::new();
    for symbol in symbols {
        *counts.entry(*symbol).or_insert(0) += 1;
    }

    let total = symbols.len() as f64;
    counts
        .values()
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// Shannon entropy scaled by the maximum entropy of the alphabet (0-1)
///
/// Formula: `H / log2(max(alphabet_size, 2))`, clamped to [0, 1].
pub fn calculate_normalized_entropy(symbols: &[EventKind], alphabet_size: usize) -> f64 {
    let max_entropy = (alphabet_size.max(2) as f64).log2();
    (calculate_entropy(symbols) / max_entropy).clamp(0.0, 1.0)
}

/// Run-length compression ratio of click/hover/scroll symbols (0-1]
///
/// Consecutive repeats collapse into one symbol; the ratio is
/// `encoded_len / original_len`. Returns 1.0 (no signal) for fewer than four
/// qualifying symbols or a single distinct value.
pub fn calculate_compression(symbols: &[EventKind]) -> f64 {
    let qualifying: Vec<EventKind> = symbols
        .iter()
        .copied()
        .filter(|k| k.is_compressible())
        .collect();

    if qualifying.len() < MIN_COMPRESSION_SYMBOLS || distinct_count(qualifying.iter()) < 2 {
        return 1.0;
    }

    let runs = 1 + qualifying.windows(2).filter(|w| w[0] != w[1]).count();
    runs as f64 / qualifying.len() as f64
}
