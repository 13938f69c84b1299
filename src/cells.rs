//! Cell partitioner
//!
//! Splits a chronological event stream into fixed-width, non-overlapping time
//! cells anchored at the first event. Only slices that received at least one
//! event are materialized.

use crate::schema::InteractionEvent;
use std::collections::BTreeMap;

/// A fixed-width time slice of the session
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Slice number counted from the anchor; gaps mean empty slices
    pub index: usize,
    /// Inclusive start in epoch milliseconds
    pub start_time: i64,
    /// Exclusive end in epoch milliseconds
    pub end_time: i64,
    pub events: Vec<InteractionEvent>,
}

/// Group events into `[start, start + width)` cells
///
/// `cell_width_ms` must be positive; `DetectorConfig::validate` guarantees
/// this for configured widths and a non-positive width yields no cells.
/// Events stamped before the anchor (a producer ordering fault) are folded
/// into slice 0 rather than dropped.
pub fn partition_into_cells(events: &[InteractionEvent], cell_width_ms: i64) -> Vec<Cell> {
    let Some(first) = events.first() else {
        return Vec::new();
    };
    if cell_width_ms <= 0 {
        return Vec::new();
    }

    let anchor = first.timestamp;
    let mut slices: BTreeMap<usize, Vec<InteractionEvent>> = BTreeMap::new();

    for event in events {
        let offset = event.timestamp.saturating_sub(anchor).max(0);
        let index = (offset / cell_width_ms) as usize;
        slices.entry(index).or_default().push(event.clone());
    }

    slices
        .into_iter()
        .map(|(index, events)| {
            let start_time = anchor.saturating_add((index as i64).saturating_mul(cell_width_ms));
            Cell {
                index,
                start_time,
                end_time: start_time.saturating_add(cell_width_ms),
                events,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use crate::schema::EventKind;

    fn stream(timestamps: &[i64]) -> Vec<InteractionEvent> {
        timestamps
            .iter()
            .map(|&t| InteractionEvent::new(EventKind::Move, t))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(partition_into_cells(&[], 5_000).is_empty());
    }

    #[test]
    fn test_single_event() {
        let cells = partition_into_cells(&stream(&[42]), 5_000);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].start_time, 42);
        assert_eq!(cells[0].end_time, 5_042);
    }

    #[test]
    fn test_boundary_belongs_to_next_cell() {
        let cells = partition_into_cells(&stream(&[0, 4_999, 5_000]), 5_000);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].events.len(), 2);
        assert_eq!(cells[1].index, 1);
        assert_eq!(cells[1].events[0].timestamp, 5_000);
    }

    #[test]
    fn test_empty_slices_are_skipped_but_indexed() {
        let cells = partition_into_cells(&stream(&[1_000, 1_500, 17_000]), 5_000);
        let indices: Vec<usize> = cells.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 3]);
        assert_eq!(cells[1].start_time, 16_000);
    }

    #[test]
    fn test_partition_is_lossless_and_bounded() {
        let timestamps: Vec<i64> = (0..200).map(|i| 10_000 + i * 137).collect();
        let events = stream(&timestamps);
        let width = 2_000;
        let cells = partition_into_cells(&events, width);

        let span = timestamps[timestamps.len() - 1] - timestamps[0];
        assert!(cells.len() as i64 <= span / width + 1);

        for cell in &cells {
            assert_eq!(cell.end_time - cell.start_time, width);
            assert!(cell
                .events
                .iter()
                .all(|e| e.timestamp >= cell.start_time && e.timestamp < cell.end_time));
        }

        let rejoined: Vec<InteractionEvent> =
            cells.into_iter().flat_map(|c| c.events).collect();
        assert_eq!(rejoined, events);
    }

    #[test]
    fn test_out_of_order_event_folds_into_first_slice() {
        let cells = partition_into_cells(&stream(&[1_000, 400, 6_500]), 5_000);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].events.len(), 2);
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        let events = vec![
            InteractionEvent::click(i64::MIN),
            InteractionEvent::click(i64::MAX),
        ];
        let cells = partition_into_cells(&events, 5_000);

        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].start_time, i64::MIN);
        assert!(cells[1].start_time <= i64::MAX && cells[1].end_time >= cells[1].start_time);
        let total: usize = cells.iter().map(|c| c.events.len()).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_non_positive_width_yields_nothing() {
        assert!(partition_into_cells(&stream(&[1, 2]), 0).is_empty());
    }
}
