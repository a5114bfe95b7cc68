//! Terminal User Interface module.
//!
//! This module provides the interactive intake dashboard using ratatui with
//! the crossterm backend.
//!
//! # Overview
//!
//! The TUI module consists of:
//! - [`app`]: Application state (modes, session, ledger, slider)
//! - [`events`]: Terminal event polling (keys, mouse, paste)
//! - [`keybindings`]: Key-to-action profiles
//! - [`theme`]: Color palettes
//! - [`ui`]: Ratatui rendering
//! - [`run`]: Terminal setup and the main loop
//!
//! # Architecture
//!
//! The TUI follows a unidirectional data flow:
//! 1. Events are captured from the terminal (crossterm)
//! 2. Key events are translated to Actions
//! 3. Actions, mouse and paste events modify the App state
//! 4. The UI renders based on the current App state
//!
//! # Example
//!
//! ```
//! use axiom_intake::tui::app::{Action, App, AppMode};
//!
//! let mut app = App::default();
//!
//! app.handle_action(Action::ShowHelp);
//! assert_eq!(app.mode(), AppMode::ShowingHelp);
//!
//! app.handle_action(Action::Cancel);
//! assert_eq!(app.mode(), AppMode::Dashboard);
//! ```

pub mod app;
pub mod events;
pub mod keybindings;
pub mod run;
pub mod theme;
pub mod ui;

// Re-export commonly used types
pub use app::{Action, App, AppMode};
pub use events::{AppEvent, EventError, EventHandler};
pub use keybindings::{KeyBindings, KeybindingProfile};
pub use run::{run_tui, TuiError, TuiResult};
pub use theme::Theme;
pub use ui::{render, truncate_string};
