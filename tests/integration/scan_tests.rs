use axiom_intake::evidence::{annotate, CompareSlider, PointerId, Region};
use axiom_intake::intake::{accept, parse_dropped_paths, IntakeFile};
use axiom_intake::ledger::SessionLedger;
use axiom_intake::preview::{FilePreviewProvider, PreviewProvider};
use axiom_intake::scan::{Classifier, FixedOffset, ScanSession, ScanStatus, SessionError, Verdict};
use image::{Rgb, RgbImage};
use std::time::{Duration, Instant};
use tempfile::tempdir;

fn session() -> ScanSession<FilePreviewProvider> {
    ScanSession::new(
        FilePreviewProvider::new(),
        Classifier::new(FixedOffset::new(0.5)),
    )
}

fn run_to_completion(
    session: &mut ScanSession<FilePreviewProvider>,
    ledger: &mut SessionLedger,
    file: IntakeFile,
) {
    let start = Instant::now();
    assert!(session.upload(&[file], start).unwrap());
    assert_eq!(session.status(), ScanStatus::Scanning);
    assert!(!session.poll(start + Duration::from_millis(10), ledger));
    assert!(session.poll(start + session.scan_duration(), ledger));
}

#[test]
fn test_authentic_demo_scan() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scan.jpg");
    std::fs::write(&path, b"jpeg-ish bytes").unwrap();

    let mut session = session();
    let mut ledger = SessionLedger::new();
    run_to_completion(&mut session, &mut ledger, IntakeFile::from_path(&path).unwrap());

    assert_eq!(session.status(), ScanStatus::Authentic);
    let result = session.result().unwrap();
    assert_eq!(result.verdict, Verdict::Authentic);
    assert_eq!(result.confidence.as_percent(), 99.3);

    assert_eq!(ledger.len(), 1);
    let record = ledger.latest().unwrap();
    assert_eq!(record.file_name(), "scan.jpg");
    assert_eq!(record.digest().map(str::len), Some(64));
}

#[test]
fn test_tampered_demo_scan_region() {
    let mut session = session();
    let mut ledger = SessionLedger::new();
    run_to_completion(
        &mut session,
        &mut ledger,
        IntakeFile::from_bytes("scan_tempered.png", vec![0; 8]),
    );

    assert_eq!(session.status(), ScanStatus::Tampered);
    assert_eq!(session.result().unwrap().confidence.as_percent(), 91.7);
    assert_eq!(session.region(), Some(Region::new(0.58, 0.22, 0.22, 0.22)));

    let annotation = session.annotation().unwrap();
    assert_eq!(annotation, annotate(&Region::new(0.58, 0.22, 0.22, 0.22)));
    assert!((annotation.zoom_focus.x - 69.0).abs() < 1e-9);
    assert!((annotation.zoom_focus.y - 33.0).abs() < 1e-9);
}

#[test]
fn test_manipulated_name_uses_variance() {
    let mut session = session();
    let mut ledger = SessionLedger::new();
    run_to_completion(
        &mut session,
        &mut ledger,
        IntakeFile::from_bytes("xray_manipulated.jpg", vec![1]),
    );

    let result = session.result().unwrap();
    assert_eq!(result.verdict, Verdict::Tampered);
    let pct = result.confidence.as_percent();
    assert!((88.0..92.0).contains(&pct), "{pct}");
    assert_eq!(pct, 90.0);
}

#[test]
fn test_decoded_image_has_thumbnail() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("knee.png");
    RgbImage::from_pixel(40, 30, Rgb([200, 10, 10])).save(&path).unwrap();

    let mut session = session();
    session
        .upload(&[IntakeFile::from_path(&path).unwrap()], Instant::now())
        .unwrap();

    let preview = session.preview().unwrap();
    assert_eq!(preview.dimensions(), Some((40, 30)));
    assert_eq!(preview.format(), Some("PNG"));
    let thumb = preview.thumbnail().unwrap();
    assert_eq!(thumb.sample(0.5, 0.5), [200, 10, 10]);
}

#[test]
fn test_missing_file_surfaces_error_and_keeps_state() {
    let dir = tempdir().unwrap();
    let mut session = session();
    let mut ledger = SessionLedger::new();
    run_to_completion(&mut session, &mut ledger, IntakeFile::from_bytes("scan.jpg", vec![1]));

    let missing = IntakeFile::from_path(dir.path().join("gone.png")).unwrap();
    let err = session.upload(&[missing], Instant::now()).unwrap_err();
    assert!(matches!(err, SessionError::Preview { .. }));

    assert_eq!(session.status(), ScanStatus::Authentic);
    assert_eq!(session.file_name(), Some("scan.jpg"));
    assert_eq!(session.provider().live_count(), 1);
}

#[test]
fn test_superseded_scan_records_only_latest() {
    let mut session = session();
    let mut ledger = SessionLedger::new();
    let start = Instant::now();

    session
        .upload(&[IntakeFile::from_bytes("first.png", vec![1])], start)
        .unwrap();
    let stale = session.generation();
    session
        .upload(
            &[IntakeFile::from_bytes("second.png", vec![2])],
            start + Duration::from_millis(500),
        )
        .unwrap();

    assert!(!session.complete(stale, &mut ledger));
    assert!(session.poll(start + Duration::from_secs(10), &mut ledger));

    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.latest().unwrap().file_name(), "second.png");
    assert_eq!(session.provider().live_count(), 1);
}

#[test]
fn test_reset_twice_from_idle() {
    let mut session = session();
    assert!(!session.reset());
    assert!(!session.reset());
    assert_eq!(session.status(), ScanStatus::Idle);
    assert_eq!(session.generation(), 0);
}

#[test]
fn test_reset_releases_preview() {
    let mut session = session();
    let mut ledger = SessionLedger::new();
    run_to_completion(&mut session, &mut ledger, IntakeFile::from_bytes("a.png", vec![1]));

    assert!(session.reset());
    assert_eq!(session.status(), ScanStatus::Idle);
    assert!(session.file_name().is_none());
    assert!(session.preview_handle().is_none());
    assert_eq!(session.provider().live_count(), 0);
    assert_eq!(ledger.len(), 1, "reset never touches the ledger");
}

#[test]
fn test_dropped_text_single_file_intake() {
    let dir = tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    let image = dir.path().join("my study.png");
    std::fs::write(&notes, b"x").unwrap();
    std::fs::write(&image, b"x").unwrap();

    let text = format!("'{}' '{}'", notes.display(), image.display());
    let file = accept(parse_dropped_paths(&text)).unwrap();
    assert_eq!(file.name, "my study.png");
}

#[test]
fn test_slider_drag_scenario() {
    let mut slider = CompareSlider::new(0.5);
    slider.set_container(0.0, 1.0);
    let pointer = PointerId(1);

    slider.begin(pointer, 0.3);
    assert!((slider.position() - 0.3).abs() < 1e-9);

    slider.move_to(pointer, 1.4);
    assert_eq!(slider.position(), 1.0);

    slider.end(pointer);
    assert!(!slider.is_dragging());
    assert_eq!(slider.position(), 1.0);
}
