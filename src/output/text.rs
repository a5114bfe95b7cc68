//! Human-readable report for the terminal.

use std::io;

use yansi::Paint;

use super::ReportError;
use crate::ledger::LedgerSnapshot;
use crate::scan::classify::Verdict;

/// Text output formatter. Colors follow the global `yansi` switch.
pub struct TextOutput<'a> {
    snapshot: &'a LedgerSnapshot,
}

impl<'a> TextOutput<'a> {
    #[must_use]
    pub fn new(snapshot: &'a LedgerSnapshot) -> Self {
        Self { snapshot }
    }

    /// Write one line per scan followed by a summary line.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Io` if writing fails.
    pub fn write_to<W: io::Write>(&self, writer: &mut W) -> Result<(), ReportError> {
        for record in &self.snapshot.records {
            let label = match record.verdict() {
                Verdict::Authentic => record.verdict().label().green().bold(),
                Verdict::Tampered => record.verdict().label().red().bold(),
            };
            writeln!(
                writer,
                "{:<9} {:>6}  {}  {}",
                label,
                record.confidence().to_string(),
                record.timestamp().format("%Y-%m-%d %H:%M:%S"),
                record.file_name()
            )?;
        }

        let t = &self.snapshot.telemetry;
        writeln!(
            writer,
            "{} scanned, {} authentic, {} tampered",
            t.total.bold(),
            t.authentic.green(),
            t.tampered.red()
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{ScanRecord, SessionLedger};
    use crate::scan::classify::{Classification, Confidence};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_text_lines() {
        yansi::disable();
        let mut ledger = SessionLedger::new();
        ledger.append(ScanRecord::new(
            "xray_fake.png",
            Utc.timestamp_opt(1_700_000_000, 0).single().unwrap(),
            Classification {
                verdict: Verdict::Tampered,
                confidence: Confidence::from_tenths(905),
            },
        ));

        let mut buf = Vec::new();
        TextOutput::new(&ledger.snapshot()).write_to(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let mut lines = text.lines();
        let first = lines.next().unwrap();
        assert!(first.starts_with("TAMPERED"));
        assert!(first.contains("90.5%"));
        assert!(first.ends_with("xray_fake.png"));
        assert_eq!(
            lines.next(),
            Some("1 scanned, 0 authentic, 1 tampered")
        );
    }
}
