//! Aggregate statistics derived from the ledger.
//!
//! Everything here is a pure function of the full record list and is
//! recomputed on every snapshot. Nothing is cached or updated incrementally.

use serde::Serialize;

use super::record::ScanRecord;
use crate::scan::classify::Verdict;

/// Number of records in the trend window.
pub const RECENT_WINDOW: usize = 10;

/// Smallest bar height, in display units.
pub const BAR_MIN_HEIGHT: u64 = 12;

/// Bar height of the record with the maximum confidence, in display units.
pub const BAR_SCALE_MAX: u64 = 48;

/// Derived ledger statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Telemetry {
    /// Total number of completed scans.
    pub total: usize,
    /// Scans with a tampered verdict.
    pub tampered: usize,
    /// Scans with an authentic verdict.
    pub authentic: usize,
    /// Last `min(10, total)` records, oldest first.
    pub recent: Vec<ScanRecord>,
    /// Largest confidence in `recent`, never below 1.
    pub max_confidence: f64,
    /// Bar height per entry of `recent`.
    pub bar_heights: Vec<u64>,
}

impl Telemetry {
    /// Compute telemetry for `records` (chronological order).
    #[must_use]
    pub fn from_records(records: &[ScanRecord]) -> Self {
        let total = records.len();
        let tampered = records
            .iter()
            .filter(|r| r.verdict() == Verdict::Tampered)
            .count();

        let start = total.saturating_sub(RECENT_WINDOW);
        let recent: Vec<ScanRecord> = records[start..].to_vec();

        let max_confidence = recent
            .iter()
            .map(|r| r.confidence().as_percent())
            .fold(1.0_f64, f64::max);

        let bar_heights = recent
            .iter()
            .map(|r| bar_height(r.confidence().as_percent(), max_confidence))
            .collect();

        Self {
            total,
            tampered,
            authentic: total - tampered,
            recent,
            max_confidence,
            bar_heights,
        }
    }

    /// Share of tampered scans in percent (0 when empty).
    #[must_use]
    pub fn tampered_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.tampered as f64 / self.total as f64 * 100.0
        }
    }
}

/// Proportional bar height: `max(12, round(confidence / max * 48))`.
///
/// `max_confidence` is floored at 1 so the divisor is never zero.
#[must_use]
pub fn bar_height(confidence: f64, max_confidence: f64) -> u64 {
    let divisor = if max_confidence.is_finite() {
        max_confidence.max(1.0)
    } else {
        1.0
    };
    let confidence = if confidence.is_finite() {
        confidence.max(0.0)
    } else {
        0.0
    };
    let scaled = (confidence / divisor * BAR_SCALE_MAX as f64).round() as u64;
    scaled.max(BAR_MIN_HEIGHT)
}
