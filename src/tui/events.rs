//! TUI event handling with crossterm.
//!
//! # Overview
//! Terminal events are polled with a timeout and narrowed to what the
//! dashboard reacts to:
//! - Key presses (mapped to actions by the app)
//! - Mouse presses, drags and releases (comparison slider)
//! - Bracketed paste (dropped file paths)
//! - Resizes (trigger a redraw)

use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use thiserror::Error;

/// Error type for event polling.
#[derive(Debug, Error)]
pub enum EventError {
    /// Reading from the terminal failed.
    #[error("failed to read terminal event: {0}")]
    Read(#[from] std::io::Error),
}

/// A terminal event the dashboard handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Paste(String),
    Resize(u16, u16),
}

/// Polls crossterm for events.
#[derive(Debug, Default)]
pub struct EventHandler;

impl EventHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Wait up to `timeout` for the next relevant event.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Read`] if the terminal cannot be read.
    pub fn poll(&self, timeout: Duration) -> Result<Option<AppEvent>, EventError> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(translate(event::read()?))
    }
}

/// Narrow a raw crossterm event. Returns `None` for events the dashboard ignores.
#[must_use]
pub fn translate(event: Event) -> Option<AppEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(_) | MouseEventKind::Drag(_) | MouseEventKind::Up(_) => {
                Some(AppEvent::Mouse(mouse))
            }
            _ => None,
        },
        Event::Paste(text) => Some(AppEvent::Paste(text)),
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers, MouseButton};

    #[test]
    fn test_translate_key_press_only() {
        let press = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(translate(Event::Key(press)), Some(AppEvent::Key(press)));

        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(translate(Event::Key(release)), None);
    }

    #[test]
    fn test_translate_mouse_moves_ignored() {
        let moved = MouseEvent {
            kind: MouseEventKind::Moved,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(translate(Event::Mouse(moved)), None);

        let down = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            ..moved
        };
        assert_eq!(translate(Event::Mouse(down)), Some(AppEvent::Mouse(down)));
    }

    #[test]
    fn test_translate_paste_and_focus() {
        assert_eq!(
            translate(Event::Paste("/tmp/scan.jpg".into())),
            Some(AppEvent::Paste("/tmp/scan.jpg".into()))
        );
        assert_eq!(translate(Event::FocusGained), None);
    }
}
