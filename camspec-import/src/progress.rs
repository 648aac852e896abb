//! Row-level progress callbacks for the CSV and JSON importers.

/// Receives updates while normalized rows are validated and inserted.
///
/// Implementations take `&self`; a reporter that needs state (a progress
/// bar, a counter) keeps it behind interior mutability.
pub trait ImportProgress {
    /// A row has been handled, whether it was inserted or skipped.
    /// `current` is 1-based; `label` is the row's "brand model".
    fn on_row(&self, current: usize, total: usize, label: &str);

    /// A new stage began, such as reading the input file.
    fn on_phase(&self, message: &str);

    /// The import finished and its summary is ready.
    fn on_complete(&self, message: &str);
}

/// Ignores every update.
pub struct SilentProgress;

impl ImportProgress for SilentProgress {
    fn on_row(&self, _current: usize, _total: usize, _label: &str) {}
    fn on_phase(&self, _message: &str) {}
    fn on_complete(&self, _message: &str) {}
}

/// Logs through `log::info!`, one line per tenth of the input.
pub struct LogProgress;

impl LogProgress {
    fn reports(current: usize, total: usize) -> bool {
        let step = (total / 10).max(1);
        current == total || current.is_multiple_of(step)
    }
}

impl ImportProgress for LogProgress {
    fn on_row(&self, current: usize, total: usize, label: &str) {
        if Self::reports(current, total) {
            log::info!(
                "  {:>3}% ({}/{} rows, last: {})",
                current * 100 / total.max(1),
                current,
                total,
                label
            );
        }
    }

    fn on_phase(&self, message: &str) {
        log::info!("{message}");
    }

    fn on_complete(&self, message: &str) {
        log::info!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_each_tenth() {
        let reported: Vec<usize> = (1..=100)
            .filter(|&i| LogProgress::reports(i, 100))
            .collect();
        assert_eq!(reported, vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
    }

    #[test]
    fn small_inputs_report_every_row() {
        assert!((1..=7).all(|i| LogProgress::reports(i, 7)));
    }

    #[test]
    fn last_row_is_always_reported() {
        assert!(LogProgress::reports(23, 23));
        assert!(!LogProgress::reports(22, 23));
    }
}
