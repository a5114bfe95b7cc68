use axiom_intake::intake::IntakeFile;
use axiom_intake::ledger::{LedgerSnapshot, SessionLedger};
use axiom_intake::output::{export_json, write_report, OutputFormat, ReportError};
use axiom_intake::preview::FilePreviewProvider;
use axiom_intake::scan::{Classifier, FixedOffset, ScanSession};
use chrono::Utc;
use std::time::{Duration, Instant};
use tempfile::tempdir;

fn snapshot_after(names: &[&str]) -> LedgerSnapshot {
    let mut session = ScanSession::new(
        FilePreviewProvider::new(),
        Classifier::new(FixedOffset::new(0.0)),
    );
    let mut ledger = SessionLedger::new();
    for name in names {
        let start = Instant::now();
        session
            .upload(&[IntakeFile::from_bytes(*name, name.as_bytes().to_vec())], start)
            .unwrap();
        assert!(session.poll(start + Duration::from_secs(10), &mut ledger));
    }
    ledger.snapshot()
}

#[test]
fn test_export_json_report_file() {
    let dir = tempdir().unwrap();
    let reports = dir.path().join("nested").join("reports");
    let snapshot = snapshot_after(&["scan.jpg", "scan_tempered.png"]);

    let path = export_json(&reports, &snapshot).unwrap();

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("forensic-report-"));
    assert!(name.ends_with(".json"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["summary"]["total"], 2);
    assert_eq!(json["summary"]["authentic"], 1);
    assert_eq!(json["summary"]["tampered"], 1);

    let scans = json["scans"].as_array().unwrap();
    assert_eq!(scans[0]["file_name"], "scan.jpg");
    assert_eq!(scans[0]["verdict"], "authentic");
    assert_eq!(scans[0]["confidence"], 99.3);
    assert_eq!(scans[1]["verdict"], "tampered");
    assert_eq!(scans[1]["region"]["x"], 0.58);
    assert_eq!(scans[1]["digest"].as_str().map(str::len), Some(64));
    assert!(scans[1]["annotation"]["zoom_focus"]["magnification"].is_number());
}

#[test]
fn test_export_into_file_path_fails() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("occupied");
    std::fs::write(&blocker, b"x").unwrap();

    let err = export_json(&blocker, &snapshot_after(&["scan.jpg"])).unwrap_err();
    assert!(matches!(err, ReportError::File { .. }));
    assert!(err.to_string().contains("occupied"));
}

#[test]
fn test_csv_report_rows() {
    let snapshot = snapshot_after(&["a.png", "b_edited.png"]);
    let mut out = Vec::new();
    write_report(&snapshot, OutputFormat::Csv, Utc::now(), &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("scan_id,timestamp,file_name,verdict,confidence"));
    assert!(lines[1].contains("a.png,authentic,96"));
    assert!(lines[2].contains("b_edited.png,tampered,88"));
}

#[test]
fn test_text_report_summary() {
    let snapshot = snapshot_after(&["scan.jpg"]);
    let mut out = Vec::new();
    write_report(&snapshot, OutputFormat::Text, Utc::now(), &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("scan.jpg"));
    assert!(text.contains("99.3%"));
    assert!(text.contains("authentic"));
}

#[test]
fn test_empty_ledger_report() {
    let snapshot = SessionLedger::new().snapshot();
    let mut out = Vec::new();
    write_report(&snapshot, OutputFormat::Json, Utc::now(), &mut out).unwrap();

    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["summary"]["total"], 0);
    assert!(json["scans"].as_array().unwrap().is_empty());
}
