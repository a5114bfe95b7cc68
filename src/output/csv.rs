//! CSV report. One row per completed scan.
//!
//! # Columns
//!
//! - `scan_id`: 1-based position in the ledger
//! - `timestamp`: completion time (RFC 3339)
//! - `file_name`
//! - `verdict`: `authentic` or `tampered`
//! - `confidence`: percent, one decimal
//! - `digest`: SHA-256 (hex), empty when unknown
//! - `region_x`, `region_y`, `region_w`, `region_h`: evidence region fractions

use std::io;

use serde::Serialize;

use super::ReportError;
use crate::evidence::Region;
use crate::ledger::ScanRecord;

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    scan_id: usize,
    timestamp: String,
    file_name: &'a str,
    verdict: String,
    confidence: f64,
    digest: &'a str,
    region_x: f64,
    region_y: f64,
    region_w: f64,
    region_h: f64,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    records: &'a [ScanRecord],
}

impl<'a> CsvOutput<'a> {
    #[must_use]
    pub fn new(records: &'a [ScanRecord]) -> Self {
        Self { records }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), ReportError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for (idx, record) in self.records.iter().enumerate() {
            let region = Region::for_demo(record.file_name());
            csv_writer.serialize(CsvRow {
                scan_id: idx + 1,
                timestamp: record.timestamp().to_rfc3339(),
                file_name: record.file_name(),
                verdict: record.verdict().to_string(),
                confidence: record.confidence().as_percent(),
                digest: record.digest().unwrap_or(""),
                region_x: region.x,
                region_y: region.y,
                region_w: region.w,
                region_h: region.h,
            })?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` if serialization fails.
    pub fn to_string(&self) -> Result<String, ReportError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
