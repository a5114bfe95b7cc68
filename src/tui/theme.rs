//! TUI theming support.
//!
//! This module provides the `Theme` struct which defines the color palette
//! for the dashboard. It supports light and dark themes, as well as automatic
//! detection based on terminal environment.

use ratatui::style::Color;

use crate::cli::ThemeArg;
use crate::scan::ScanStatus;

/// A collection of colors used for TUI components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub danger: Color,
    pub success: Color,
    pub highlight: Color,
    pub dim: Color,
    pub normal: Color,
    pub inverted_fg: Color,
}

impl Theme {
    /// Create a high-contrast dark theme (default).
    ///
    /// Palette:
    /// - Primary: Cyan (headers, borders)
    /// - Secondary: Yellow (key hints, slider handle)
    /// - Danger: Red (tampered verdicts, errors)
    /// - Success: Green (authentic verdicts)
    /// - Highlight: Magenta (evidence region outline)
    /// - Dim: DarkGray (secondary text)
    /// - Normal: White (main text)
    /// - Inverted FG: Black (text on colored background)
    pub fn dark() -> Self {
        Self {
            primary: Color::Cyan,
            secondary: Color::Yellow,
            danger: Color::Red,
            success: Color::Green,
            highlight: Color::Magenta,
            dim: Color::DarkGray,
            normal: Color::White,
            inverted_fg: Color::Black,
        }
    }

    /// Create a high-contrast light theme.
    pub fn light() -> Self {
        Self {
            primary: Color::Blue,
            secondary: Color::Magenta,
            danger: Color::Red,
            success: Color::Green,
            highlight: Color::LightRed,
            dim: Color::Gray,
            normal: Color::Black,
            inverted_fg: Color::White,
        }
    }

    /// Detect terminal theme or return dark theme as default.
    pub fn auto() -> Self {
        if is_light_terminal() {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Theme for a configured choice.
    pub fn from_arg(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Auto => Self::auto(),
            ThemeArg::Dark => Self::dark(),
            ThemeArg::Light => Self::light(),
        }
    }

    /// Check if this is a light theme.
    pub fn is_light(&self) -> bool {
        self.normal == Color::Black
    }

    /// The opposite palette.
    #[must_use]
    pub fn toggled(&self) -> Self {
        if self.is_light() {
            Self::dark()
        } else {
            Self::light()
        }
    }

    /// Accent color for a session status.
    pub fn status_color(&self, status: ScanStatus) -> Color {
        match status {
            ScanStatus::Idle => self.dim,
            ScanStatus::Scanning => self.secondary,
            ScanStatus::Authentic => self.success,
            ScanStatus::Tampered => self.danger,
        }
    }
}

/// Simple heuristic to detect if the terminal is light-themed.
fn is_light_terminal() -> bool {
    // COLORFGBG is "fg;bg" (rxvt, xterm, konsole); 0=black, 7=gray, 15=white.
    if let Ok(colorfgbg) = std::env::var("COLORFGBG") {
        if let Some(bg) = colorfgbg.split(';').last() {
            if let Ok(bg_num) = bg.parse::<u32>() {
                return bg_num >= 7 && bg_num != 8;
            }
        }
    }

    false
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
