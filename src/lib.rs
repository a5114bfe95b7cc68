//! Axiom Intake - Forensic Image Intake Dashboard
//!
//! A terminal dashboard that takes a single uploaded medical image, runs a
//! simulated tamper scan and presents the verdict with an evidence region,
//! a before/after comparison slider and session telemetry.

pub mod cli;
pub mod config;
pub mod error;
pub mod evidence;
pub mod intake;
pub mod ledger;
pub mod logging;
pub mod output;
pub mod preview;
pub mod scan;
pub mod signal;
pub mod tui;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;

use cli::{ClassifyArgs, Cli, Commands, DashboardArgs};
use config::Config;
use error::ExitCode;
use intake::IntakeFile;
use ledger::{ScanRecord, SessionLedger};
use logging::LogTarget;
use preview::{FilePreviewProvider, PreviewProvider};
use scan::{Classifier, ScanSession};
use tui::{App, KeyBindings, Theme, TuiError};

/// Run the command described by `cli`.
///
/// # Errors
///
/// Returns an error when logging, the terminal or report output fails.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    if cli.no_color {
        yansi::disable();
    }

    match cli.command {
        Commands::Dashboard(ref args) => run_dashboard(&cli, args),
        Commands::Classify(ref args) => run_classify(&cli, args),
    }
}

fn run_dashboard(cli: &Cli, args: &DashboardArgs) -> anyhow::Result<ExitCode> {
    let target = match &args.log_file {
        Some(path) => LogTarget::File(path.clone()),
        None => LogTarget::Suppressed,
    };
    logging::init_logging(cli.verbose, cli.quiet, target).context("failed to initialize logging")?;

    let mut config = Config::load(args.config.as_deref(), args.profile.as_deref());
    config.merge_dashboard_args(args);
    log::debug!("Effective configuration: {:?}", config);

    let handler = signal::install_handler(false).context("failed to install signal handler")?;

    let session = ScanSession::new(FilePreviewProvider::new(), Classifier::with_seed(args.seed))
        .with_scan_duration(Duration::from_millis(config.scan_duration_ms));

    let mut app = App::new(session)
        .with_theme(Theme::from_arg(config.theme))
        .with_keybindings(KeyBindings::from_profile(config.keybinding_profile))
        .with_accessible(config.accessibility.enabled || config.accessibility.use_ascii_borders)
        .with_report_dir(config.report_dir())
        .with_slider_initial(config.slider_initial);

    if let Some(path) = &args.file {
        match IntakeFile::from_path(path) {
            Some(file) if intake::has_accepted_extension(path) => {
                app.upload(file, std::time::Instant::now());
            }
            _ => app.set_status(format!("Not a supported image: {}", path.display())),
        }
    }

    match tui::run_tui(&mut app, Some(handler.get_flag())) {
        Ok(()) => Ok(ExitCode::Success),
        Err(TuiError::Interrupted) => Ok(ExitCode::Interrupted),
        Err(e) => Err(anyhow::Error::new(e).context("dashboard failed")),
    }
}

fn run_classify(cli: &Cli, args: &ClassifyArgs) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet, LogTarget::Stderr)
        .context("failed to initialize logging")?;
    let handler = signal::install_handler(true).context("failed to install signal handler")?;

    let mut classifier = Classifier::with_seed(args.seed);
    let mut provider = FilePreviewProvider::new();
    let mut ledger = SessionLedger::new();

    for path in &args.files {
        if handler.is_shutdown_requested() {
            log::warn!("Interrupted after {} file(s)", ledger.len());
            return Ok(ExitCode::Interrupted);
        }

        let Some(file) = IntakeFile::from_path(path) else {
            log::warn!("Skipping {}: no file name", path.display());
            continue;
        };

        let digest = match provider.acquire(&file) {
            Ok(handle) => {
                let digest = provider.get(handle).map(|p| p.digest().to_string());
                provider.release(handle);
                digest
            }
            Err(e) => {
                log::warn!("No digest for {}: {}", path.display(), e);
                None
            }
        };

        let classification = classifier.classify(&file.name);
        log::debug!(
            "{} -> {} ({})",
            file.name,
            classification.verdict,
            classification.confidence
        );
        ledger.append(ScanRecord::new(file.name, Utc::now(), classification).with_digest(digest));
    }

    let snapshot = ledger.snapshot();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    output::write_report(&snapshot, args.output, Utc::now(), &mut out)
        .context("failed to write report")?;
    out.flush().context("failed to flush report")?;

    if snapshot.telemetry.tampered > 0 {
        Ok(ExitCode::TamperedFound)
    } else {
        Ok(ExitCode::Success)
    }
}
