use crate::library::Item;

use super::record::ProgressRecord;

/// Course-wide completion figures.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aggregate {
    pub completed_count: usize,
    pub total_count: usize,
    pub percent_complete: f64,
    pub completed_seconds: f64,
    pub remaining_seconds: f64,
}

impl Aggregate {
    pub(super) fn compute<'a>(
        items: &[Item],
        record_for: impl Fn(&str) -> Option<&'a ProgressRecord>,
    ) -> Self {
        let mut completed_count = 0;
        let mut total_seconds = 0.0;
        let mut completed_seconds = 0.0;

        for item in items {
            let duration = item.duration.max(0.0);
            total_seconds += duration;

            let Some(record) = record_for(&item.id) else {
                continue;
            };
            if record.completed {
                completed_count += 1;
                completed_seconds += duration;
            } else {
                completed_seconds += duration * record.watch_percentage / 100.0;
            }
        }

        let total_count = items.len();
        let percent_complete = if total_count == 0 {
            0.0
        } else {
            100.0 * completed_count as f64 / total_count as f64
        };

        Self {
            completed_count,
            total_count,
            percent_complete,
            completed_seconds,
            remaining_seconds: (total_seconds - completed_seconds).max(0.0),
        }
    }
}
