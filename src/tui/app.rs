//! TUI application state management.
//!
//! # Overview
//!
//! This module manages the application state for the intake dashboard:
//! - Current mode (Dashboard, EnteringPath, ShowingHelp, Quitting)
//! - The scan session, the session ledger and the comparison slider
//! - The path prompt buffer and transient status/error messages
//!
//! # Architecture
//!
//! `App` is the central state container. It is accessed only from the loop
//! thread; the clock is passed in (`now`) so state changes are reproducible.
//! Key events become [`Action`]s through [`App::handle_key`];
//! [`App::handle_action`] applies the pure state changes and the run loop
//! performs the side effects (upload, export) afterwards.
//!
//! # Example
//!
//! ```
//! use axiom_intake::tui::app::{Action, App, AppMode};
//!
//! let mut app = App::default();
//! app.handle_action(Action::OpenPrompt);
//! assert_eq!(app.mode(), AppMode::EnteringPath);
//!
//! app.handle_action(Action::Cancel);
//! assert_eq!(app.mode(), AppMode::Dashboard);
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use super::keybindings::KeyBindings;
use super::theme::Theme;
use crate::evidence::{CompareSlider, PointerId};
use crate::intake::{self, IntakeFile};
use crate::ledger::SessionLedger;
use crate::output::{self, ReportError};
use crate::preview::FilePreviewProvider;
use crate::scan::{Classifier, ScanSession, ScanStatus};

/// Keyboard slider step.
pub const SLIDER_STEP: f64 = 0.05;

/// Shown when intake is attempted during a running scan.
const BUSY_MESSAGE: &str = "Scan in progress. Reset (r) before uploading another study.";

/// Distance in cells from the handle that still starts a drag.
pub const HANDLE_TOLERANCE: f64 = 1.0;

/// The terminal reports a single mouse; it always uses this pointer id.
const MOUSE_POINTER: PointerId = PointerId(0);

/// Application mode/state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Main dashboard: upload panel, forensic output and telemetry.
    #[default]
    Dashboard,
    /// Typing a path into the upload prompt.
    EnteringPath,
    /// Keybinding help overlay.
    ShowingHelp,
    /// Application is quitting.
    Quitting,
}

impl AppMode {
    /// Check if the application is done (quitting).
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Quitting)
    }
}

/// User action triggered by keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Open the upload path prompt.
    OpenPrompt,
    /// Submit the prompt.
    Submit,
    /// Close the prompt or overlay; on the dashboard, dismiss or reset.
    Cancel,
    /// Reset the scan session.
    Reset,
    /// Export the session ledger as a JSON report.
    Export,
    /// Switch between dark and light palettes.
    ToggleTheme,
    /// Show or hide the help overlay.
    ShowHelp,
    /// Move the comparison split left.
    SliderLeft,
    /// Move the comparison split right.
    SliderRight,
    /// Quit the application.
    Quit,
}

impl Action {
    /// Every action, in help-screen order.
    #[must_use]
    pub fn all() -> &'static [Action] {
        &[
            Self::OpenPrompt,
            Self::Submit,
            Self::Cancel,
            Self::Reset,
            Self::Export,
            Self::ToggleTheme,
            Self::SliderLeft,
            Self::SliderRight,
            Self::ShowHelp,
            Self::Quit,
        ]
    }

    /// Short description for hints and help.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::OpenPrompt => "Upload study",
            Self::Submit => "Submit path",
            Self::Cancel => "Cancel / reset",
            Self::Reset => "Reset session",
            Self::Export => "Export report",
            Self::ToggleTheme => "Toggle theme",
            Self::ShowHelp => "Help",
            Self::SliderLeft => "Slider left",
            Self::SliderRight => "Slider right",
            Self::Quit => "Quit",
        }
    }
}

/// Central state of the dashboard.
#[derive(Debug)]
pub struct App {
    mode: AppMode,
    session: ScanSession<FilePreviewProvider>,
    ledger: SessionLedger,
    slider: CompareSlider,
    slider_initial: f64,
    theme: Theme,
    accessible: bool,
    keybindings: KeyBindings,
    input: String,
    error_message: Option<String>,
    status_message: Option<String>,
    report_dir: PathBuf,
}

impl Default for App {
    fn default() -> Self {
        Self::new(ScanSession::new(FilePreviewProvider::new(), Classifier::default()))
    }
}

impl App {
    /// Create an app around `session` with default presentation settings.
    #[must_use]
    pub fn new(session: ScanSession<FilePreviewProvider>) -> Self {
        Self {
            mode: AppMode::Dashboard,
            session,
            ledger: SessionLedger::new(),
            slider: CompareSlider::default(),
            slider_initial: 0.5,
            theme: Theme::default(),
            accessible: false,
            keybindings: KeyBindings::default(),
            input: String::new(),
            error_message: None,
            status_message: None,
            report_dir: PathBuf::from("."),
        }
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Accessible mode: ASCII borders and textual verdict markers.
    #[must_use]
    pub fn with_accessible(mut self, accessible: bool) -> Self {
        self.accessible = accessible;
        self
    }

    #[must_use]
    pub fn with_keybindings(mut self, keybindings: KeyBindings) -> Self {
        self.keybindings = keybindings;
        self
    }

    #[must_use]
    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = dir.into();
        self
    }

    /// Slider position restored after every completed scan.
    #[must_use]
    pub fn with_slider_initial(mut self, initial: f64) -> Self {
        self.slider_initial = initial;
        self.slider.reset(initial);
        self
    }

    // ==================== Mode Management ====================

    #[must_use]
    pub fn mode(&self) -> AppMode {
        self.mode
    }

    /// Set the application mode.
    pub fn set_mode(&mut self, mode: AppMode) {
        log::debug!("Mode transition: {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.mode.is_done()
    }

    // ==================== Accessors ====================

    #[must_use]
    pub fn session(&self) -> &ScanSession<FilePreviewProvider> {
        &self.session
    }

    #[must_use]
    pub fn ledger(&self) -> &SessionLedger {
        &self.ledger
    }

    #[must_use]
    pub fn slider(&self) -> &CompareSlider {
        &self.slider
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    #[must_use]
    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    #[must_use]
    pub fn keybindings(&self) -> &KeyBindings {
        &self.keybindings
    }

    /// Current contents of the path prompt.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    // ==================== Messages ====================

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Set an error message to display.
    pub fn set_error(&mut self, message: &str) {
        self.error_message = Some(message.to_string());
        log::error!("App error: {}", message);
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// One-line notice shown in the footer area (export path, ignored input).
    #[must_use]
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{}", message);
        self.status_message = Some(message);
    }

    // ==================== Input ====================

    /// Translate a key event into an action.
    ///
    /// While the prompt is open, printable keys edit the buffer and only
    /// Enter, Esc and Ctrl shortcuts resolve to actions. When an error is
    /// shown, any key press dismisses it.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if self.error_message.is_some() && self.mode != AppMode::EnteringPath {
            self.clear_error();
            return None;
        }

        if self.mode == AppMode::EnteringPath {
            match key.code {
                KeyCode::Enter => return Some(Action::Submit),
                KeyCode::Esc => return Some(Action::Cancel),
                KeyCode::Backspace => {
                    self.input.pop();
                    return None;
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.input.push(c);
                    return None;
                }
                _ => {}
            }
        }

        self.keybindings.resolve(key)
    }

    /// Handle a user action and update state accordingly.
    ///
    /// Returns true if the action was handled. `Submit` and `Export` report
    /// whether the run loop should perform them.
    pub fn handle_action(&mut self, action: Action) -> bool {
        log::trace!("Handling action: {:?} in mode {:?}", action, self.mode);

        match action {
            Action::OpenPrompt => {
                if self.mode == AppMode::Dashboard && self.is_scanning() {
                    self.set_status(BUSY_MESSAGE);
                    false
                } else if self.mode == AppMode::Dashboard {
                    self.input.clear();
                    self.clear_error();
                    self.set_mode(AppMode::EnteringPath);
                    true
                } else {
                    false
                }
            }
            Action::Submit => self.mode == AppMode::EnteringPath,
            Action::Cancel => {
                match self.mode {
                    AppMode::EnteringPath => {
                        self.input.clear();
                        self.set_mode(AppMode::Dashboard);
                    }
                    AppMode::ShowingHelp => self.set_mode(AppMode::Dashboard),
                    AppMode::Dashboard => {
                        if self.error_message.is_some() {
                            self.clear_error();
                        } else {
                            self.reset_session();
                        }
                    }
                    AppMode::Quitting => {}
                }
                true
            }
            Action::Reset => {
                if self.mode == AppMode::Dashboard {
                    self.reset_session()
                } else {
                    false
                }
            }
            Action::Export => self.mode == AppMode::Dashboard,
            Action::ToggleTheme => {
                self.theme = self.theme.toggled();
                true
            }
            Action::ShowHelp => {
                match self.mode {
                    AppMode::Dashboard => self.set_mode(AppMode::ShowingHelp),
                    AppMode::ShowingHelp => self.set_mode(AppMode::Dashboard),
                    _ => return false,
                }
                true
            }
            Action::SliderLeft | Action::SliderRight => {
                if self.mode != AppMode::Dashboard || !self.session.status().is_complete() {
                    return false;
                }
                let delta = if action == Action::SliderLeft {
                    -SLIDER_STEP
                } else {
                    SLIDER_STEP
                };
                self.slider.nudge(delta);
                true
            }
            Action::Quit => {
                self.set_mode(AppMode::Quitting);
                true
            }
        }
    }

    /// Drag the comparison handle with the left mouse button.
    ///
    /// A press only starts a drag on the handle. Column `c` maps to client
    /// coordinate `c + 0.5`, the center of the cell.
    pub fn handle_mouse(&mut self, mouse: &MouseEvent) -> bool {
        if self.mode != AppMode::Dashboard || !self.session.status().is_complete() {
            return false;
        }
        let client_x = f64::from(mouse.column) + 0.5;

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.slider.hits_handle(client_x, HANDLE_TOLERANCE) {
                    self.slider.begin(MOUSE_POINTER, client_x);
                    true
                } else {
                    false
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.slider.move_to(MOUSE_POINTER, client_x);
                self.slider.is_dragging()
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let was_dragging = self.slider.is_dragging();
                self.slider.end(MOUSE_POINTER);
                was_dragging
            }
            _ => false,
        }
    }

    /// Record where the comparison view was laid out.
    pub fn set_compare_area(&mut self, area: Option<Rect>) {
        if let Some(area) = area {
            self.slider
                .set_container(f64::from(area.x), f64::from(area.width));
        }
    }

    /// Handle bracketed paste: a dropped file path.
    ///
    /// With the prompt open, the text is appended to the buffer instead.
    /// During a running scan the paste is dropped with a status message.
    pub fn handle_paste(&mut self, text: &str, now: Instant) -> bool {
        match self.mode {
            AppMode::EnteringPath => {
                self.input.push_str(text.trim_end_matches(['\r', '\n']));
                true
            }
            AppMode::Dashboard if self.is_scanning() => {
                self.set_status(BUSY_MESSAGE);
                false
            }
            AppMode::Dashboard => self.upload_paths(intake::parse_dropped_paths(text), now),
            _ => false,
        }
    }

    /// Intake is closed while a scan runs; only reset or completion reopen it.
    #[must_use]
    pub fn is_scanning(&self) -> bool {
        self.session.status() == ScanStatus::Scanning
    }

    // ==================== Session ====================

    /// Upload the path typed into the prompt and close it.
    pub fn submit_input(&mut self, now: Instant) -> bool {
        let text = std::mem::take(&mut self.input);
        self.set_mode(AppMode::Dashboard);
        self.upload_paths(intake::parse_dropped_paths(&text), now)
    }

    /// Apply the intake policy to `paths` and start a scan of the winner.
    pub fn upload_paths(&mut self, paths: Vec<PathBuf>, now: Instant) -> bool {
        match intake::accept(paths) {
            Some(file) => self.upload(file, now),
            None => {
                self.set_status("No supported image in input (png, jpg, gif, bmp, webp, tiff, dcm)");
                false
            }
        }
    }

    /// Start a scan of `file`.
    pub fn upload(&mut self, file: IntakeFile, now: Instant) -> bool {
        match self.session.upload(std::slice::from_ref(&file), now) {
            Ok(started) => {
                if started {
                    self.status_message = None;
                    self.clear_error();
                }
                started
            }
            Err(e) => {
                self.set_error(&e.to_string());
                false
            }
        }
    }

    /// Return the session to Idle.
    pub fn reset_session(&mut self) -> bool {
        let changed = self.session.reset();
        if changed {
            self.slider.reset(self.slider_initial);
            self.status_message = None;
        }
        changed
    }

    /// Advance the session clock. Returns whether a scan completed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.session.poll(now, &mut self.ledger) {
            return false;
        }
        if self.status_message.as_deref() == Some(BUSY_MESSAGE) {
            self.status_message = None;
        }
        self.slider.reset(self.slider_initial);
        if let (Some(name), Some(result)) = (self.session.file_name(), self.session.result()) {
            log::info!(
                "Scan complete: {} -> {} ({})",
                name,
                result.verdict,
                result.confidence
            );
        }
        true
    }

    /// Write the ledger as a JSON report into the report directory.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when the directory or file cannot be written.
    pub fn export_report(&mut self) -> Result<PathBuf, ReportError> {
        let path = output::export_json(&self.report_dir, &self.ledger.snapshot())?;
        self.set_status(format!("Report written to {}", path.display()));
        Ok(path)
    }
}
