//! Signal handling for graceful shutdown.
//!
//! A shared `AtomicBool` records that shutdown was requested. The dashboard
//! loop checks it every frame; the `classify` command checks it between files.
//!
//! In raw terminal mode Ctrl+C does not raise SIGINT; the dashboard binds the
//! key to its Quit action instead.
//!
//! # Usage
//!
//! ```rust,no_run
//! use axiom_intake::signal::install_handler;
//!
//! let handler = install_handler(true).expect("Failed to install signal handler");
//! if handler.is_shutdown_requested() {
//!     return;
//! }
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Exit code for SIGINT (Ctrl+C) interruption: 128 + SIGINT.
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

/// Shared shutdown flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
    announce: Arc<AtomicBool>,
}

impl ShutdownHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` once Ctrl+C was pressed or `request_shutdown()` was called.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clone of the shutdown flag.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Clear the flag. Used when a handler is reused within one process.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// Whether the signal hook prints a notice to stderr.
    ///
    /// Turned off while the dashboard owns the screen.
    pub fn set_announce(&self, announce: bool) {
        self.announce.store(announce, Ordering::SeqCst);
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install a Ctrl+C handler that sets the shutdown flag on interrupt.
///
/// Repeated calls in one process reuse the installed handler (with its flag
/// cleared), so tests can call `run_app` concurrently.
///
/// # Errors
///
/// Currently always succeeds: when the hook cannot be registered, an
/// unhooked handler is returned that still honors `request_shutdown()`.
pub fn install_handler(announce: bool) -> Result<ShutdownHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        handler.set_announce(announce);
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    handler.set_announce(announce);
    let hooked = handler.clone();

    match ctrlc::set_handler(move || {
        hooked.request_shutdown();
        if hooked.announce.load(Ordering::SeqCst) {
            let _ = writeln!(std::io::stderr(), "\nInterrupted. Cleaning up...");
            let _ = std::io::stderr().flush();
        }
        log::info!("Shutdown signal received");
    }) {
        Ok(()) => {
            let _ = GLOBAL_HANDLER.set(handler.clone());
            Ok(handler)
        }
        Err(e) => {
            if let Some(existing) = GLOBAL_HANDLER.get() {
                existing.reset();
                existing.set_announce(announce);
                Ok(existing.clone())
            } else {
                log::debug!("Ctrl+C handler unavailable ({e}), using unhooked handler");
                let _ = GLOBAL_HANDLER.set(handler.clone());
                Ok(handler)
            }
        }
    }
}
