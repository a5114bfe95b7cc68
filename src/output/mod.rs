//! Report formatters for the session ledger.
//!
//! - JSON for automation and archival (also written by the dashboard's export key)
//! - CSV for spreadsheet import
//! - Text for the terminal, colored with `yansi`
//!
//! # Example
//!
//! ```
//! use axiom_intake::ledger::{ScanRecord, SessionLedger};
//! use axiom_intake::output::json::ForensicReport;
//! use axiom_intake::scan::classify::{Classification, Confidence, Verdict};
//! use chrono::Utc;
//!
//! let mut ledger = SessionLedger::new();
//! ledger.append(ScanRecord::new(
//!     "scan_tempered.png",
//!     Utc::now(),
//!     Classification { verdict: Verdict::Tampered, confidence: Confidence::from_tenths(917) },
//! ));
//!
//! let report = ForensicReport::new(&ledger.snapshot(), Utc::now());
//! assert_eq!(report.summary.tampered, 1);
//! ```

pub mod csv;
pub mod json;
pub mod text;

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::LedgerSnapshot;

pub use self::csv::CsvOutput;
pub use self::json::ForensicReport;
pub use self::text::TextOutput;

/// Errors that can occur while producing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    /// I/O error while writing the report.
    #[error("I/O error writing report: {0}")]
    Io(#[from] io::Error),

    /// The report directory could not be created or written.
    #[error("cannot write report to {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Report format for the `classify` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored, human-readable lines.
    #[default]
    Text,
    /// Pretty-printed JSON report.
    Json,
    /// One CSV row per scan.
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Write `snapshot` in `format` to `writer`.
///
/// # Errors
///
/// Returns [`ReportError`] if serialization or writing fails.
pub fn write_report<W: io::Write>(
    snapshot: &LedgerSnapshot,
    format: OutputFormat,
    generated_at: DateTime<Utc>,
    writer: &mut W,
) -> Result<(), ReportError> {
    match format {
        OutputFormat::Text => TextOutput::new(snapshot).write_to(writer),
        OutputFormat::Json => ForensicReport::new(snapshot, generated_at).write_to(writer, true),
        OutputFormat::Csv => CsvOutput::new(&snapshot.records).write_to(writer),
    }
}

/// File name for an exported report: `forensic-report-YYYYmmdd-HHMMSS.json`.
#[must_use]
pub fn report_file_name(at: DateTime<Local>) -> String {
    format!("forensic-report-{}.json", at.format("%Y%m%d-%H%M%S"))
}

/// Export `snapshot` as a JSON report into `dir`, creating it if needed.
///
/// Returns the path of the written file.
///
/// # Errors
///
/// Returns [`ReportError::File`] if the directory or file cannot be written.
pub fn export_json(dir: &Path, snapshot: &LedgerSnapshot) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(dir).map_err(|source| ReportError::File {
        path: dir.to_path_buf(),
        source,
    })?;

    let now = Utc::now();
    let json = ForensicReport::new(snapshot, now).to_json_pretty()?;
    let (path, mut file) = create_unique(dir, &report_file_name(now.with_timezone(&Local)))?;
    file.write_all(json.as_bytes())
        .map_err(|source| ReportError::File {
            path: path.clone(),
            source,
        })?;

    log::info!(
        "Exported {} scan(s) to {}",
        snapshot.records.len(),
        path.display()
    );
    Ok(path)
}

/// Create `name` in `dir` without clobbering an earlier export.
///
/// Exports within the same second get `-2`, `-3`, ... before the extension.
fn create_unique(dir: &Path, name: &str) -> Result<(PathBuf, File), ReportError> {
    let (stem, ext) = name.rsplit_once('.').unwrap_or((name, "json"));
    let mut attempt = 1u32;
    loop {
        let path = if attempt == 1 {
            dir.join(name)
        } else {
            dir.join(format!("{stem}-{attempt}.{ext}"))
        };
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                log::debug!("{} exists, trying next suffix", path.display());
                attempt += 1;
            }
            Err(source) => return Err(ReportError::File { path, source }),
        }
    }
}
