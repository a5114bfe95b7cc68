//! Keybinding profiles for the dashboard.
//!
//! Every profile binds the same set of [`Action`]s; they differ in which keys
//! nudge the comparison slider and in the help/quit shortcuts.
//!
//! # Profiles
//!
//! - [`KeybindingProfile::Universal`]: letter shortcuts plus both `h`/`l` and
//!   arrow keys for the slider (default)
//! - [`KeybindingProfile::Vim`]: `h`/`l` for the slider, no arrow keys
//! - [`KeybindingProfile::Standard`]: arrow keys, function keys and Ctrl
//!   shortcuts only
//!
//! # Example
//!
//! ```
//! use axiom_intake::tui::keybindings::{KeyBindings, KeybindingProfile};
//! use axiom_intake::tui::Action;
//! use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
//!
//! let bindings = KeyBindings::from_profile(KeybindingProfile::Universal);
//!
//! let h_key = KeyEvent::new(KeyCode::Char('h'), KeyModifiers::NONE);
//! let left_key = KeyEvent::new(KeyCode::Left, KeyModifiers::NONE);
//!
//! assert_eq!(bindings.resolve(&h_key), Some(Action::SliderLeft));
//! assert_eq!(bindings.resolve(&left_key), Some(Action::SliderLeft));
//! ```

use std::collections::HashMap;

use clap::ValueEnum;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::Action;

/// Keybinding profile presets.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Hash,
    ValueEnum,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum KeybindingProfile {
    /// Letter shortcuts with both vim-style and arrow slider keys.
    #[default]
    Universal,

    /// Vim-style slider keys (`h`/`l`) only.
    Vim,

    /// Arrow keys, function keys and Ctrl shortcuts.
    Standard,
}

impl KeybindingProfile {
    /// Get the display name for the profile.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Universal => "Universal (Vim + Arrow keys)",
            Self::Vim => "Vim (hjkl)",
            Self::Standard => "Standard (Arrow keys)",
        }
    }

    /// Get all available profiles.
    #[must_use]
    pub fn all() -> &'static [KeybindingProfile] {
        &[Self::Universal, Self::Vim, Self::Standard]
    }
}

impl std::fmt::Display for KeybindingProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Universal => "universal",
            Self::Vim => "vim",
            Self::Standard => "standard",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for KeybindingProfile {
    type Err = KeybindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "universal" => Ok(Self::Universal),
            "vim" => Ok(Self::Vim),
            "standard" | "arrows" | "arrow" => Ok(Self::Standard),
            _ => Err(KeybindingError::InvalidProfile(s.to_string())),
        }
    }
}

/// Error type for keybinding operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KeybindingError {
    /// Invalid profile name.
    #[error("Unknown keybinding profile: '{0}'. Valid profiles: universal, vim, standard")]
    InvalidProfile(String),
}

/// Mapping from actions to the key events that trigger them.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    profile: KeybindingProfile,
    action_keys: HashMap<Action, Vec<KeyEvent>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_profile(KeybindingProfile::Universal)
    }
}

impl KeyBindings {
    /// Create keybindings from a specific profile.
    #[must_use]
    pub fn from_profile(profile: KeybindingProfile) -> Self {
        let action_keys = match profile {
            KeybindingProfile::Universal => Self::universal_bindings(),
            KeybindingProfile::Vim => Self::vim_bindings(),
            KeybindingProfile::Standard => Self::standard_bindings(),
        };

        Self {
            profile,
            action_keys,
        }
    }

    /// Get the keybinding profile.
    #[must_use]
    pub fn profile(&self) -> KeybindingProfile {
        self.profile
    }

    /// Resolve a key event to an action.
    ///
    /// Key release and repeat events are ignored (some terminals send them).
    #[must_use]
    pub fn resolve(&self, key: &KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        self.action_keys
            .iter()
            .find(|(_, keys)| keys.iter().any(|k| Self::key_matches(k, key)))
            .map(|(action, _)| *action)
    }

    /// Matches code and modifiers, ignoring kind and state.
    fn key_matches(target: &KeyEvent, actual: &KeyEvent) -> bool {
        target.code == actual.code && target.modifiers == actual.modifiers
    }

    /// Get the keys bound to a specific action.
    ///
    /// Returns an empty slice if the action is not bound.
    #[must_use]
    pub fn keys_for_action(&self, action: &Action) -> &[KeyEvent] {
        self.action_keys
            .get(action)
            .map_or(&[], |keys| keys.as_slice())
    }

    /// Human-readable string for the first key bound to an action.
    #[must_use]
    pub fn key_hint(&self, action: &Action) -> String {
        self.keys_for_action(action)
            .first()
            .map_or_else(String::new, Self::format_key)
    }

    /// All keys bound to an action, joined with `/`.
    #[must_use]
    pub fn key_hints(&self, action: &Action) -> String {
        self.keys_for_action(action)
            .iter()
            .map(Self::format_key)
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Format a key event as a human-readable string.
    #[must_use]
    pub fn format_key(key: &KeyEvent) -> String {
        let mut parts = Vec::new();

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl");
        }
        if key.modifiers.contains(KeyModifiers::ALT) {
            parts.push("Alt");
        }
        if key.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("Shift");
        }

        let key_name = match key.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::F(n) => format!("F{n}"),
            _ => "?".to_string(),
        };

        if parts.is_empty() {
            key_name
        } else {
            parts.push(&key_name);
            parts.join("+")
        }
    }

    // =========================================================================
    // Profile Binding Definitions
    // =========================================================================

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn plain(c: char) -> KeyEvent {
        Self::key(KeyCode::Char(c), KeyModifiers::NONE)
    }

    /// Bindings every profile shares.
    fn common_bindings() -> HashMap<Action, Vec<KeyEvent>> {
        let mut bindings = HashMap::new();
        bindings.insert(
            Action::Submit,
            vec![Self::key(KeyCode::Enter, KeyModifiers::NONE)],
        );
        bindings.insert(
            Action::Cancel,
            vec![Self::key(KeyCode::Esc, KeyModifiers::NONE)],
        );
        bindings
    }

    /// Universal bindings: letter shortcuts, vim-style AND arrow slider keys.
    fn universal_bindings() -> HashMap<Action, Vec<KeyEvent>> {
        let mut bindings = Self::common_bindings();

        bindings.insert(Action::OpenPrompt, vec![Self::plain('o')]);
        bindings.insert(Action::Reset, vec![Self::plain('r')]);
        bindings.insert(Action::Export, vec![Self::plain('e')]);
        bindings.insert(Action::ToggleTheme, vec![Self::plain('t')]);
        bindings.insert(
            Action::ShowHelp,
            vec![
                Self::plain('?'),
                Self::key(KeyCode::Char('?'), KeyModifiers::SHIFT),
                Self::key(KeyCode::F(1), KeyModifiers::NONE),
            ],
        );
        bindings.insert(
            Action::SliderLeft,
            vec![
                Self::plain('h'),
                Self::key(KeyCode::Left, KeyModifiers::NONE),
            ],
        );
        bindings.insert(
            Action::SliderRight,
            vec![
                Self::plain('l'),
                Self::key(KeyCode::Right, KeyModifiers::NONE),
            ],
        );
        bindings.insert(
            Action::Quit,
            vec![
                Self::plain('q'),
                Self::key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            ],
        );

        bindings
    }

    /// Vim bindings: `h`/`l` for the slider.
    fn vim_bindings() -> HashMap<Action, Vec<KeyEvent>> {
        let mut bindings = Self::common_bindings();

        bindings.insert(Action::OpenPrompt, vec![Self::plain('o')]);
        bindings.insert(Action::Reset, vec![Self::plain('r')]);
        bindings.insert(Action::Export, vec![Self::plain('e')]);
        bindings.insert(Action::ToggleTheme, vec![Self::plain('t')]);
        bindings.insert(
            Action::ShowHelp,
            vec![
                Self::plain('?'),
                Self::key(KeyCode::Char('?'), KeyModifiers::SHIFT),
            ],
        );
        bindings.insert(Action::SliderLeft, vec![Self::plain('h')]);
        bindings.insert(Action::SliderRight, vec![Self::plain('l')]);
        bindings.insert(
            Action::Quit,
            vec![
                Self::plain('q'),
                Self::key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            ],
        );

        bindings
    }

    /// Standard bindings: arrows, function keys and Ctrl shortcuts.
    fn standard_bindings() -> HashMap<Action, Vec<KeyEvent>> {
        let mut bindings = Self::common_bindings();

        bindings.insert(
            Action::OpenPrompt,
            vec![Self::key(KeyCode::Char('o'), KeyModifiers::CONTROL)],
        );
        bindings.insert(
            Action::Reset,
            vec![
                Self::key(KeyCode::Delete, KeyModifiers::NONE),
                Self::key(KeyCode::F(5), KeyModifiers::NONE),
            ],
        );
        bindings.insert(
            Action::Export,
            vec![Self::key(KeyCode::Char('s'), KeyModifiers::CONTROL)],
        );
        bindings.insert(
            Action::ToggleTheme,
            vec![Self::key(KeyCode::Char('t'), KeyModifiers::CONTROL)],
        );
        bindings.insert(
            Action::ShowHelp,
            vec![Self::key(KeyCode::F(1), KeyModifiers::NONE)],
        );
        bindings.insert(
            Action::SliderLeft,
            vec![Self::key(KeyCode::Left, KeyModifiers::NONE)],
        );
        bindings.insert(
            Action::SliderRight,
            vec![Self::key(KeyCode::Right, KeyModifiers::NONE)],
        );
        bindings.insert(
            Action::Quit,
            vec![
                Self::key(KeyCode::Char('q'), KeyModifiers::CONTROL),
                Self::key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            ],
        );

        bindings
    }
}
