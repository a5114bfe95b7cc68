//! JSON forensic report.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "generated_at": "2024-03-09T07:05:01Z",
//!   "summary": { "total": 2, "authentic": 1, "tampered": 1 },
//!   "scans": [
//!     {
//!       "file_name": "scan_tempered.png",
//!       "timestamp": "2024-03-09T07:04:58Z",
//!       "verdict": "tampered",
//!       "confidence": 91.7,
//!       "digest": "9f86d0...",
//!       "region": { "x": 0.58, "y": 0.22, "w": 0.22, "h": 0.22 },
//!       "annotation": { "rect_box": { ... }, "zoom_focus": { ... } }
//!     }
//!   ]
//! }
//! ```

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ReportError;
use crate::evidence::{annotate, Annotation, Region};
use crate::ledger::{LedgerSnapshot, ScanRecord};
use crate::scan::classify::{Confidence, Verdict};

/// Verdict counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub authentic: usize,
    pub tampered: usize,
}

/// One scan in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub file_name: String,
    pub timestamp: DateTime<Utc>,
    pub verdict: Verdict,
    pub confidence: Confidence,
    /// SHA-256 of the scanned bytes, when available.
    pub digest: Option<String>,
    /// Evidence region in image-relative coordinates.
    pub region: Region,
    /// Overlay geometry derived from `region`.
    pub annotation: Annotation,
}

impl ReportEntry {
    #[must_use]
    pub fn from_record(record: &ScanRecord) -> Self {
        let region = Region::for_demo(record.file_name());
        Self {
            file_name: record.file_name().to_string(),
            timestamp: record.timestamp(),
            verdict: record.verdict(),
            confidence: record.confidence(),
            digest: record.digest().map(str::to_string),
            annotation: annotate(&region),
            region,
        }
    }
}

/// Complete JSON report structure.
#[derive(Debug, Clone, Serialize)]
pub struct ForensicReport {
    pub generated_at: DateTime<Utc>,
    pub summary: ReportSummary,
    /// Scans in chronological order.
    pub scans: Vec<ReportEntry>,
}

impl ForensicReport {
    /// Build a report from a ledger snapshot.
    #[must_use]
    pub fn new(snapshot: &LedgerSnapshot, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            summary: ReportSummary {
                total: snapshot.telemetry.total,
                authentic: snapshot.telemetry.authentic,
                tampered: snapshot.telemetry.tampered,
            },
            scans: snapshot
                .records
                .iter()
                .map(ReportEntry::from_record)
                .collect(),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), ReportError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::SessionLedger;
    use crate::scan::classify::Classification;
    use chrono::TimeZone;

    fn ledger() -> SessionLedger {
        let ts = Utc.timestamp_opt(1_700_000_000, 0).single().unwrap();
        let mut ledger = SessionLedger::new();
        ledger.append(ScanRecord::new(
            "scan.jpg",
            ts,
            Classification {
                verdict: Verdict::Authentic,
                confidence: Confidence::from_tenths(993),
            },
        ));
        ledger.append(
            ScanRecord::new(
                "scan_tempered.png",
                ts,
                Classification {
                    verdict: Verdict::Tampered,
                    confidence: Confidence::from_tenths(917),
                },
            )
            .with_digest(Some("ab".repeat(32))),
        );
        ledger
    }

    #[test]
    fn test_summary_counts() {
        let report = ForensicReport::new(&ledger().snapshot(), Utc::now());
        assert_eq!(
            report.summary,
            ReportSummary {
                total: 2,
                authentic: 1,
                tampered: 1
            }
        );
        assert_eq!(report.scans[0].file_name, "scan.jpg");
        assert_eq!(report.scans[1].digest.as_deref().map(str::len), Some(64));
    }

    #[test]
    fn test_json_shape() {
        let report = ForensicReport::new(&ledger().snapshot(), Utc::now());
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["summary"]["total"], 2);
        let scan = &value["scans"][1];
        assert_eq!(scan["verdict"], "tampered");
        assert_eq!(scan["confidence"], 91.7);
        assert_eq!(scan["region"]["x"], 0.58);
        assert_eq!(scan["annotation"]["zoom_focus"]["magnification"], 260.0);
        assert!(value["scans"][0]["digest"].is_null());
        assert_eq!(value["scans"][0]["timestamp"], "2023-11-14T22:13:20Z");
    }

    #[test]
    fn test_write_to_appends_newline() {
        let report = ForensicReport::new(&SessionLedger::new().snapshot(), Utc::now());
        let mut buf = Vec::new();
        report.write_to(&mut buf, false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\"scans\":[]"));
    }
}
