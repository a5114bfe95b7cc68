//! In-session scan ledger.
//!
//! The ledger is an append-only, chronologically ordered log of completed
//! scans. It lives for the duration of the process and is never persisted or
//! reloaded.
//!
//! # Architecture
//!
//! * [`record`]: the immutable [`ScanRecord`] stored per completed scan.
//! * [`telemetry`]: statistics derived from the full log on every read.
//!
//! # Example
//!
//! ```
//! use axiom_intake::ledger::{ScanRecord, SessionLedger};
//! use axiom_intake::scan::classify::{Classification, Confidence, Verdict};
//! use chrono::Utc;
//!
//! let mut ledger = SessionLedger::new();
//! ledger.append(ScanRecord::new(
//!     "scan.jpg",
//!     Utc::now(),
//!     Classification { verdict: Verdict::Authentic, confidence: Confidence::from_tenths(993) },
//! ));
//!
//! let snapshot = ledger.snapshot();
//! assert_eq!(snapshot.telemetry.total, 1);
//! assert_eq!(snapshot.telemetry.authentic, 1);
//! ```

pub mod record;
pub mod telemetry;

pub use record::ScanRecord;
pub use telemetry::{bar_height, Telemetry, BAR_MIN_HEIGHT, BAR_SCALE_MAX, RECENT_WINDOW};

/// Append-only ordered log of completed scans.
#[derive(Debug, Clone, Default)]
pub struct SessionLedger {
    records: Vec<ScanRecord>,
}

/// Owned, read-only view of the ledger at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSnapshot {
    /// All records, oldest first.
    pub records: Vec<ScanRecord>,
    /// Statistics derived from `records`.
    pub telemetry: Telemetry,
}

impl SessionLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed scan.
    pub fn append(&mut self, record: ScanRecord) {
        log::info!(
            "Ledger #{}: {} -> {} ({})",
            self.records.len() + 1,
            record.file_name(),
            record.verdict(),
            record.confidence()
        );
        self.records.push(record);
    }

    /// Number of completed scans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recently appended record.
    #[must_use]
    pub fn latest(&self) -> Option<&ScanRecord> {
        self.records.last()
    }

    /// Read-only borrow of the records, oldest first.
    #[must_use]
    pub fn records(&self) -> &[ScanRecord] {
        &self.records
    }

    /// Copy the log and recompute telemetry.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            records: self.records.clone(),
            telemetry: Telemetry::from_records(&self.records),
        }
    }
}
