use axiom_intake::cli::Cli;
use axiom_intake::error::{ExitCode, StructuredError};
use axiom_intake::run_app;
use clap::Parser;
use tempfile::tempdir;

fn classify(args: &[&str]) -> ExitCode {
    let mut argv = vec!["axiom-intake", "--quiet", "classify"];
    argv.extend_from_slice(args);
    run_app(Cli::try_parse_from(argv).unwrap()).unwrap()
}

#[test]
fn test_classify_all_authentic_succeeds() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("scan.jpg");
    let b = dir.path().join("ankle.png");
    std::fs::write(&a, b"a").unwrap();
    std::fs::write(&b, b"b").unwrap();

    let code = classify(&[
        "--seed",
        "7",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
    ]);
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_classify_tampered_exit_code() {
    let code = classify(&["--output", "json", "/does/not/exist/xray_forged.png"]);
    assert_eq!(code, ExitCode::TamperedFound);
    assert_eq!(code.as_i32(), 2);
}

#[test]
fn test_classify_requires_files() {
    assert!(Cli::try_parse_from(["axiom-intake", "classify"]).is_err());
}

#[test]
fn test_structured_error_for_failure() {
    let err = anyhow::anyhow!("terminal went away").context("dashboard failed");
    let structured = StructuredError::new(&err, ExitCode::GeneralError);

    assert_eq!(structured.code, "AX001");
    assert_eq!(structured.exit_code, 1);
    assert_eq!(structured.message, "dashboard failed");
    assert_eq!(structured.causes, vec!["terminal went away".to_string()]);
    assert!(!structured.interrupted);
}
