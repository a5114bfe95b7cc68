//! The scan session state machine.
//!
//! # States
//!
//! ```text
//!            upload                 timer
//!   Idle ------------> Scanning ------------> Authentic | Tampered
//!    ^                  |  ^ upload (restart)        |
//!    |      reset       |  |                         | upload
//!    +------------------+  +-------------------------+
//!    ^                                               |
//!    +------------------- reset ---------------------+
//! ```
//!
//! The verdict is decided when the scan starts and revealed when the single
//! pending completion fires. Every upload and reset bumps the session
//! generation; a completion carrying an older generation is ignored.
//!
//! Time is passed in explicitly, so the machine runs the same under the TUI
//! loop and in tests.

use std::time::{Duration, Instant};

use chrono::Utc;
use thiserror::Error;

use super::classify::{Classification, Classifier, Verdict};
use super::timer::{CompletionTimer, TimerSlot};
use crate::evidence::{annotate, Annotation, Region};
use crate::intake::IntakeFile;
use crate::ledger::{ScanRecord, SessionLedger};
use crate::preview::{Preview, PreviewError, PreviewHandle, PreviewProvider};

/// Default simulated scan duration.
pub const DEFAULT_SCAN_DURATION: Duration = Duration::from_millis(3500);

/// Shortest scan duration accepted.
pub const MIN_SCAN_DURATION: Duration = Duration::from_millis(100);

/// Progress steps, keyed by start offset within a 3500 ms reference scan.
pub const SCAN_STEPS: &[(u64, &str)] = &[
    (0, "Verifying Metadata..."),
    (900, "Scanning for GAN Artifacts..."),
    (1800, "Cross-checking Clinical Hashes..."),
    (2700, "Finalizing Report..."),
];

const REFERENCE_SCAN_MS: u64 = 3500;

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScanStatus {
    #[default]
    Idle,
    Scanning,
    Authentic,
    Tampered,
}

impl ScanStatus {
    /// Whether a verdict has been revealed.
    #[must_use]
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Authentic | Self::Tampered)
    }

    /// Header badge text.
    #[must_use]
    pub fn badge(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Scanning => "Running",
            Self::Authentic | Self::Tampered => "Complete",
        }
    }

    fn from_verdict(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Authentic => Self::Authentic,
            Verdict::Tampered => Self::Tampered,
        }
    }
}

/// Errors surfaced by [`ScanSession::upload`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// The preview provider could not produce a handle.
    #[error("cannot preview '{name}': {source}")]
    Preview {
        name: String,
        #[source]
        source: PreviewError,
    },
}

/// Progress of the running scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanProgress {
    /// Elapsed share of the scan duration, in `[0, 1]`.
    pub fraction: f64,
    /// Index into [`SCAN_STEPS`].
    pub step_index: usize,
    /// Label of the active step.
    pub step: &'static str,
    /// Time since the scan started.
    pub elapsed: Duration,
}

/// The single live scan session.
#[derive(Debug)]
pub struct ScanSession<P: PreviewProvider> {
    status: ScanStatus,
    file_name: Option<String>,
    preview: Option<PreviewHandle>,
    generation: u64,
    timer: TimerSlot,
    classifier: Classifier,
    pending: Option<Classification>,
    result: Option<Classification>,
    scan_duration: Duration,
    started: Option<Instant>,
    provider: P,
}

impl<P: PreviewProvider> ScanSession<P> {
    /// Create an idle session.
    #[must_use]
    pub fn new(provider: P, classifier: Classifier) -> Self {
        Self {
            status: ScanStatus::Idle,
            file_name: None,
            preview: None,
            generation: 0,
            timer: TimerSlot::new(),
            classifier,
            pending: None,
            result: None,
            scan_duration: DEFAULT_SCAN_DURATION,
            started: None,
            provider,
        }
    }

    /// Set the simulated scan duration (at least [`MIN_SCAN_DURATION`]).
    #[must_use]
    pub fn with_scan_duration(mut self, duration: Duration) -> Self {
        self.scan_duration = duration.max(MIN_SCAN_DURATION);
        self
    }

    /// Start a scan of the first acceptable file in `files`.
    ///
    /// Returns `Ok(false)` without touching state when no file is acceptable.
    /// A superseded scan is cancelled and its preview released.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Preview`] when the provider fails. The session
    /// is left exactly as it was before the call.
    pub fn upload(&mut self, files: &[IntakeFile], now: Instant) -> Result<bool, SessionError> {
        let Some(file) = files.iter().find(|f| f.is_acceptable()) else {
            log::debug!("Upload ignored: no acceptable file");
            return Ok(false);
        };
        if files.len() > 1 {
            log::debug!("Single-file intake: ignoring {} extra file(s)", files.len() - 1);
        }

        let handle = self
            .provider
            .acquire(file)
            .map_err(|source| SessionError::Preview {
                name: file.name.clone(),
                source,
            })?;

        if let Some(old) = self.preview.replace(handle) {
            self.provider.release(old);
        }

        self.generation += 1;
        let classification = self.classifier.classify(&file.name);
        self.file_name = Some(file.name.clone());
        self.pending = Some(classification);
        self.result = None;
        self.started = Some(now);
        self.status = ScanStatus::Scanning;
        self.timer.arm(self.generation, now, self.scan_duration);

        log::info!(
            "Scan #{} started: {} ({} ms)",
            self.generation,
            file.name,
            self.scan_duration.as_millis()
        );
        Ok(true)
    }

    /// Fire the pending completion if it is due. Returns whether a scan completed.
    pub fn poll(&mut self, now: Instant, ledger: &mut SessionLedger) -> bool {
        match self.timer.take_due(now) {
            Some(timer) => self.complete(timer.generation, ledger),
            None => false,
        }
    }

    /// Reveal the verdict for `generation` and append it to `ledger`.
    ///
    /// No-op (returns `false`) when `generation` is stale or no scan is running.
    pub fn complete(&mut self, generation: u64, ledger: &mut SessionLedger) -> bool {
        if self.status != ScanStatus::Scanning || generation != self.generation {
            log::debug!(
                "Ignoring stale completion (generation {}, current {})",
                generation,
                self.generation
            );
            return false;
        }
        let Some(classification) = self.pending.take() else {
            return false;
        };
        self.timer.cancel();

        let name = self.file_name.clone().unwrap_or_default();
        let digest = self.preview().map(|p| p.digest().to_string());
        ledger.append(ScanRecord::new(name, Utc::now(), classification).with_digest(digest));

        self.status = ScanStatus::from_verdict(classification.verdict);
        self.result = Some(classification);
        self.started = None;
        true
    }

    /// Return to Idle, releasing the preview and cancelling any pending scan.
    ///
    /// Returns `false` when the session was already idle.
    pub fn reset(&mut self) -> bool {
        if self.status == ScanStatus::Idle && self.preview.is_none() && !self.timer.is_armed() {
            return false;
        }

        if let Some(timer) = self.timer.cancel() {
            log::info!("Scan #{} cancelled", timer.generation);
        }
        if let Some(handle) = self.preview.take() {
            self.provider.release(handle);
        }
        self.generation += 1;
        self.file_name = None;
        self.pending = None;
        self.result = None;
        self.started = None;
        self.status = ScanStatus::Idle;
        true
    }

    /// Progress of the running scan; `None` unless scanning.
    #[must_use]
    pub fn progress(&self, now: Instant) -> Option<ScanProgress> {
        if self.status != ScanStatus::Scanning {
            return None;
        }
        let started = self.started?;
        let elapsed = now.saturating_duration_since(started);
        let fraction = (elapsed.as_secs_f64() / self.scan_duration.as_secs_f64()).clamp(0.0, 1.0);

        // Integer comparison: elapsed / total >= offset / reference.
        let elapsed_ms = elapsed.as_millis();
        let total_ms = self.scan_duration.as_millis().max(1);
        let step_index = SCAN_STEPS
            .iter()
            .rposition(|&(offset_ms, _)| {
                elapsed_ms * u128::from(REFERENCE_SCAN_MS) >= u128::from(offset_ms) * total_ms
            })
            .unwrap_or(0);

        Some(ScanProgress {
            fraction,
            step_index,
            step: SCAN_STEPS[step_index].1,
            elapsed,
        })
    }

    #[must_use]
    pub fn status(&self) -> ScanStatus {
        self.status
    }

    /// Name of the active file.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    #[must_use]
    pub fn preview_handle(&self) -> Option<PreviewHandle> {
        self.preview
    }

    /// Preview data for the active file.
    #[must_use]
    pub fn preview(&self) -> Option<&Preview> {
        self.preview.and_then(|h| self.provider.get(h))
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Pending completion, if a scan is running.
    #[must_use]
    pub fn pending_timer(&self) -> Option<CompletionTimer> {
        self.timer.pending()
    }

    /// Revealed classification; `None` until the scan completes.
    #[must_use]
    pub fn result(&self) -> Option<Classification> {
        self.result
    }

    /// Evidence region of the revealed result.
    #[must_use]
    pub fn region(&self) -> Option<Region> {
        if !self.status.is_complete() {
            return None;
        }
        self.file_name.as_deref().map(Region::for_demo)
    }

    /// Overlay geometry of the revealed result.
    #[must_use]
    pub fn annotation(&self) -> Option<Annotation> {
        self.region().as_ref().map(annotate)
    }

    #[must_use]
    pub fn scan_duration(&self) -> Duration {
        self.scan_duration
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }
}
