//! TUI main loop.
//!
//! This module provides the main entry point for running the interactive TUI.
//! It handles terminal setup, the event loop, and cleanup on exit.
//!
//! # Terminal Management
//!
//! The TUI takes over the terminal by:
//! - Enabling raw mode (unbuffered input, no echo)
//! - Entering the alternate screen buffer
//! - Capturing the mouse and enabling bracketed paste
//! - Hiding the cursor
//!
//! All these changes are reverted on exit, including on panic.
//!
//! # Event Loop
//!
//! The main loop follows this pattern:
//! 1. Advance the scan clock (completes due scans)
//! 2. Render the current state and record the comparison view's position
//! 3. Poll for events with a timeout and handle them
//! 4. Limit frame rate to ~60 FPS
//!
//! # Example
//!
//! ```no_run
//! use axiom_intake::tui::{run_tui, App};
//!
//! let mut app = App::default();
//! if let Err(e) = run_tui(&mut app, None) {
//!     eprintln!("TUI error: {}", e);
//! }
//! ```

use std::io::{self, Stdout};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use thiserror::Error;

use super::app::{Action, App};
use super::events::{AppEvent, EventHandler};
use super::ui::{compare_area, render};

/// Frame rate limit: 60 FPS = ~16.67ms per frame.
/// Using 16ms for slightly conservative timing.
const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Event poll timeout: Use the frame duration for responsive rendering.
const POLL_TIMEOUT: Duration = Duration::from_millis(16);

/// Error type for TUI operations.
#[derive(Debug, Error)]
pub enum TuiError {
    /// I/O error from terminal operations.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// Event handling error.
    #[error("event error: {0}")]
    Event(#[from] super::events::EventError),

    /// The TUI was interrupted by a shutdown signal.
    #[error("interrupted by shutdown signal")]
    Interrupted,
}

/// Result type for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;

/// Type alias for the terminal backend.
type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Run the interactive TUI.
///
/// This function takes over the terminal and runs the dashboard until the
/// user quits, a shutdown is signaled, or an error occurs.
///
/// # Arguments
///
/// * `app` - The application state, possibly with a scan already running
/// * `shutdown_flag` - Optional flag for external shutdown signaling (e.g., Ctrl+C handler)
///
/// # Terminal Restoration
///
/// The terminal is always restored to its original state, even on error or panic.
///
/// # Errors
///
/// Returns `TuiError::Io` for terminal I/O errors.
/// Returns `TuiError::Event` for event handling errors.
/// Returns `TuiError::Interrupted` if shutdown was requested.
pub fn run_tui(app: &mut App, shutdown_flag: Option<Arc<AtomicBool>>) -> TuiResult<()> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let result = run_tui_inner(app, shutdown_flag);

    // Restoring the terminal is idempotent, so do it on every exit path.
    let _ = restore_terminal();
    let _ = panic::take_hook();

    result
}

fn run_tui_inner(app: &mut App, shutdown_flag: Option<Arc<AtomicBool>>) -> TuiResult<()> {
    let mut terminal = setup_terminal()?;
    let event_handler = EventHandler::new();
    let mut last_render = Instant::now();

    loop {
        if let Some(ref flag) = shutdown_flag {
            if flag.load(Ordering::SeqCst) {
                log::info!("Shutdown signal received, exiting TUI");
                return Err(TuiError::Interrupted);
            }
        }

        if app.should_quit() {
            log::debug!("App requested quit");
            break;
        }

        app.tick(Instant::now());

        let mut frame_area = Rect::default();
        terminal.draw(|frame| {
            frame_area = frame.area();
            render(frame, app);
        })?;
        let area = compare_area(frame_area, app);
        app.set_compare_area(area);

        if let Some(event) = event_handler.poll(POLL_TIMEOUT)? {
            handle_event(app, event);
        }

        let elapsed = last_render.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
        last_render = Instant::now();
    }

    log::info!("TUI exited normally");
    Ok(())
}

/// Dispatch one terminal event to the app.
fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => {
            if let Some(action) = app.handle_key(&key) {
                handle_action(app, action);
            }
        }
        AppEvent::Mouse(mouse) => {
            app.handle_mouse(&mouse);
        }
        AppEvent::Paste(text) => {
            app.handle_paste(&text, Instant::now());
        }
        AppEvent::Resize(width, height) => {
            log::trace!("Terminal resized to {}x{}", width, height);
        }
    }
}

/// Handle a user action.
///
/// State changes go through `App::handle_action`; uploads and report
/// exports run here once the app accepts them.
fn handle_action(app: &mut App, action: Action) {
    let accepted = app.handle_action(action);

    match action {
        Action::Submit if accepted => {
            app.submit_input(Instant::now());
        }
        Action::Export if accepted => {
            if let Err(e) = app.export_report() {
                log::error!("Report export failed: {}", e);
                app.set_error(&format!("Export failed: {}", e));
            }
        }
        _ => {
            if !accepted {
                log::trace!("Action not handled: {:?}", action);
            }
        }
    }
}

/// Set up the terminal for TUI mode.
fn setup_terminal() -> TuiResult<Terminal> {
    log::debug!("Setting up terminal for TUI");

    terminal::enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste,
        cursor::Hide
    )?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    log::debug!("Terminal setup complete");
    Ok(terminal)
}

/// Restore the terminal to its original state.
fn restore_terminal() -> TuiResult<()> {
    log::debug!("Restoring terminal");

    let _ = terminal::disable_raw_mode();

    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste,
        cursor::Show
    );

    log::debug!("Terminal restored");
    Ok(())
}
