//! Application configuration management.
//!
//! Settings are layered with `figment`, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (platform config directory, or `--config`)
//! 3. Named profile from the file (`[profile.<name>]`, selected with `--profile`)
//! 4. `AXIOM_*` environment variables (`__` separates nested keys)
//! 5. Command-line flags
//!
//! A broken file never aborts startup: the error is logged and defaults are
//! used. Unknown keys are logged with a suggestion.
//!
//! # Example file
//!
//! ```toml
//! theme = "dark"
//! keybinding_profile = "vim"
//! scan_duration_ms = 1500
//!
//! [accessibility]
//! enabled = true
//!
//! [profile.demo]
//! scan_duration_ms = 400
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::{DashboardArgs, ThemeArg};
use crate::tui::keybindings::KeybindingProfile;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "AXIOM_";

const DEFAULT_SCAN_DURATION_MS: u64 = 3500;
const MIN_SCAN_DURATION_MS: u64 = 100;
const DEFAULT_SLIDER_INITIAL: f64 = 0.5;

const TOP_LEVEL_KEYS: &[&str] = &[
    "theme",
    "keybinding_profile",
    "scan_duration_ms",
    "slider_initial",
    "report_dir",
    "accessibility",
    "profile",
];
const ACCESSIBILITY_KEYS: &[&str] = &["enabled", "use_ascii_borders"];
const PROFILE_KEYS: &[&str] = &[
    "theme",
    "keybinding_profile",
    "scan_duration_ms",
    "slider_initial",
    "report_dir",
];

/// Accessibility settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessibilityConfig {
    /// Accessible mode: no color-only cues.
    pub enabled: bool,
    /// Draw borders with ASCII characters.
    pub use_ascii_borders: bool,
}

/// A named set of overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeArg>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keybinding_profile: Option<KeybindingProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slider_initial: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Preferred TUI theme.
    pub theme: ThemeArg,
    /// Keybinding profile.
    pub keybinding_profile: KeybindingProfile,
    /// Simulated scan duration in milliseconds.
    pub scan_duration_ms: u64,
    /// Slider position after each completed scan.
    pub slider_initial: f64,
    /// Directory for exported reports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_dir: Option<PathBuf>,
    pub accessibility: AccessibilityConfig,
    /// Named profiles.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub profile: BTreeMap<String, ProfileConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemeArg::Auto,
            keybinding_profile: KeybindingProfile::Universal,
            scan_duration_ms: DEFAULT_SCAN_DURATION_MS,
            slider_initial: DEFAULT_SLIDER_INITIAL,
            report_dir: None,
            accessibility: AccessibilityConfig::default(),
            profile: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load from `explicit` or the platform config path.
    #[must_use]
    pub fn load(explicit: Option<&Path>, profile: Option<&str>) -> Self {
        match explicit.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load_from_path(path, profile),
            None => {
                log::debug!("No config directory available, using defaults and environment");
                Self::extract_or_default(
                    Figment::from(Serialized::defaults(Config::default()))
                        .merge(Env::prefixed(ENV_PREFIX).split("__")),
                    "environment",
                )
            }
        }
    }

    /// Load from a specific TOML file. A missing file is not an error.
    #[must_use]
    pub fn load_from_path(path: impl AsRef<Path>, profile: Option<&str>) -> Self {
        let path = path.as_ref();

        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match content.parse::<toml::Table>() {
                    Ok(table) => {
                        for warning in unknown_key_warnings(&table) {
                            log::warn!("{}: {}", path.display(), warning);
                        }
                    }
                    Err(e) => log::warn!("Invalid TOML in {}: {}", path.display(), e),
                },
                Err(e) => log::warn!("Cannot read {}: {}", path.display(), e),
            }
        } else {
            log::debug!("Config file {} not found, using defaults", path.display());
        }

        let mut figment =
            Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(path));

        if let Some(name) = profile {
            let file = Figment::from(Toml::file(path));
            match file.extract_inner::<ProfileConfig>(&format!("profile.{name}")) {
                Ok(overrides) => {
                    log::debug!("Applying config profile '{}'", name);
                    figment = figment.merge(Serialized::defaults(overrides));
                }
                Err(_) => log::warn!("Config profile '{}' not found, using base settings", name),
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::extract_or_default(figment, &path.display().to_string())
    }

    fn extract_or_default(figment: Figment, source: &str) -> Self {
        match figment.extract::<Config>() {
            Ok(config) => config.normalized(),
            Err(e) => {
                log::warn!("Invalid configuration ({}): {}; using defaults", source, e);
                Self::default()
            }
        }
    }

    /// Platform-specific configuration file path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "axiom", "axiom-intake")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply dashboard flags (highest precedence).
    pub fn merge_dashboard_args(&mut self, args: &DashboardArgs) {
        if let Some(theme) = args.theme {
            self.theme = theme;
        }
        if let Some(profile) = args.keybinding_profile {
            self.keybinding_profile = profile;
        }
        if let Some(ms) = args.scan_duration {
            self.scan_duration_ms = ms;
        }
        if let Some(dir) = &args.report_dir {
            self.report_dir = Some(dir.clone());
        }
        if args.accessible {
            self.accessibility.enabled = true;
            self.accessibility.use_ascii_borders = true;
        }
        *self = std::mem::take(self).normalized();
    }

    /// Clamp values into their valid ranges.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.scan_duration_ms = self.scan_duration_ms.max(MIN_SCAN_DURATION_MS);
        self.slider_initial = if self.slider_initial.is_finite() {
            self.slider_initial.clamp(0.0, 1.0)
        } else {
            DEFAULT_SLIDER_INITIAL
        };
        self
    }

    /// Report directory, defaulting to the current directory.
    #[must_use]
    pub fn report_dir(&self) -> PathBuf {
        self.report_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Warnings for keys this version does not understand, with suggestions.
#[must_use]
pub fn unknown_key_warnings(table: &toml::Table) -> Vec<String> {
    let mut warnings = Vec::new();

    for (key, value) in table {
        if !TOP_LEVEL_KEYS.contains(&key.as_str()) {
            warnings.push(describe_unknown(key, TOP_LEVEL_KEYS));
            continue;
        }
        match (key.as_str(), value) {
            ("accessibility", toml::Value::Table(section)) => {
                for sub in section.keys() {
                    if !ACCESSIBILITY_KEYS.contains(&sub.as_str()) {
                        warnings.push(describe_unknown(
                            &format!("accessibility.{sub}"),
                            ACCESSIBILITY_KEYS,
                        ));
                    }
                }
            }
            ("profile", toml::Value::Table(profiles)) => {
                for (name, profile) in profiles {
                    let Some(profile) = profile.as_table() else {
                        continue;
                    };
                    for sub in profile.keys() {
                        if !PROFILE_KEYS.contains(&sub.as_str()) {
                            warnings.push(describe_unknown(
                                &format!("profile.{name}.{sub}"),
                                PROFILE_KEYS,
                            ));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    warnings
}

fn describe_unknown(key: &str, known: &[&str]) -> String {
    let leaf = key.rsplit('.').next().unwrap_or(key);
    match suggest(leaf, known) {
        Some(s) => format!("unknown key '{key}' (did you mean '{s}'?)"),
        None => format!("unknown key '{key}'"),
    }
}

fn suggest<'a>(key: &str, known: &[&'a str]) -> Option<&'a str> {
    known
        .iter()
        .map(|k| (*k, strsim::jaro_winkler(key, k)))
        .filter(|(_, score)| *score > 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(k, _)| k)
}
