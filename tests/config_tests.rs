//! Integration tests for configuration loading.
//!
//! These tests cover defaults, TOML parsing, named profiles, environment
//! overrides, CLI flag overrides and validation with fuzzy suggestions.

use axiom_intake::cli::{Cli, Commands, ThemeArg};
use axiom_intake::config::{unknown_key_warnings, Config};
use axiom_intake::tui::keybindings::KeybindingProfile;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::tempdir;

// =============================================================================
// Helper Functions
// =============================================================================

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all AXIOM_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("AXIOM_") {
            std::env::remove_var(key);
        }
    }
}

// =============================================================================
// Basic Configuration Tests
// =============================================================================

#[test]
fn test_config_load_from_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
theme = "light"
keybinding_profile = "vim"
scan_duration_ms = 1200
slider_initial = 0.25
report_dir = "/var/reports"

[accessibility]
enabled = true
use_ascii_borders = true
"#;
    fs::write(&config_path, toml_content).unwrap();

    let config = Config::load_from_path(&config_path, None);

    assert_eq!(config.theme, ThemeArg::Light);
    assert_eq!(config.keybinding_profile, KeybindingProfile::Vim);
    assert_eq!(config.scan_duration_ms, 1200);
    assert_eq!(config.slider_initial, 0.25);
    assert_eq!(config.report_dir(), PathBuf::from("/var/reports"));
    assert!(config.accessibility.enabled);
    assert!(config.accessibility.use_ascii_borders);
}

#[test]
fn test_config_missing_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();

    let config = Config::load_from_path(temp_dir.path().join("nonexistent.toml"), None);
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_invalid_value_falls_back_to_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "theme = \"sepia\"\n").unwrap();

    let config = Config::load_from_path(&config_path, None);
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_values_are_clamped() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "scan_duration_ms = 5\nslider_initial = 3.0\n").unwrap();

    let config = Config::load_from_path(&config_path, None);
    assert_eq!(config.scan_duration_ms, 100);
    assert_eq!(config.slider_initial, 1.0);
}

// =============================================================================
// Profiles
// =============================================================================

#[test]
fn test_config_named_profile() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
scan_duration_ms = 3000

[profile.demo]
scan_duration_ms = 400
theme = "dark"
"#,
    )
    .unwrap();

    let base = Config::load_from_path(&config_path, None);
    assert_eq!(base.scan_duration_ms, 3000);

    let demo = Config::load_from_path(&config_path, Some("demo"));
    assert_eq!(demo.scan_duration_ms, 400);
    assert_eq!(demo.theme, ThemeArg::Dark);

    let missing = Config::load_from_path(&config_path, Some("nope"));
    assert_eq!(missing.scan_duration_ms, 3000);
}

// =============================================================================
// Override Hierarchy Tests
// =============================================================================

#[test]
fn test_config_hierarchy_file_env_cli() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "theme = \"light\"\nscan_duration_ms = 2000\n").unwrap();

    // Environment variables override the file
    std::env::set_var("AXIOM_THEME", "dark");
    std::env::set_var("AXIOM_ACCESSIBILITY__ENABLED", "true");

    let mut config = Config::load_from_path(&config_path, None);
    assert_eq!(config.theme, ThemeArg::Dark);
    assert_eq!(config.scan_duration_ms, 2000);
    assert!(config.accessibility.enabled);

    // CLI flags override environment variables
    let cli = Cli::try_parse_from([
        "axiom-intake",
        "dashboard",
        "--theme",
        "light",
        "--scan-duration",
        "250",
        "--keys",
        "standard",
    ])
    .unwrap();
    let Commands::Dashboard(args) = &cli.command else {
        panic!("expected dashboard command");
    };
    config.merge_dashboard_args(args);

    assert_eq!(config.theme, ThemeArg::Light);
    assert_eq!(config.scan_duration_ms, 250);
    assert_eq!(config.keybinding_profile, KeybindingProfile::Standard);

    clear_env();
}

#[test]
fn test_cli_accessible_flag_sets_both_switches() {
    let cli = Cli::try_parse_from(["axiom-intake", "dashboard", "--accessible"]).unwrap();
    let Commands::Dashboard(args) = &cli.command else {
        panic!("expected dashboard command");
    };

    let mut config = Config::default();
    config.merge_dashboard_args(args);
    assert!(config.accessibility.enabled);
    assert!(config.accessibility.use_ascii_borders);
}

#[test]
fn test_cli_rejects_short_scan_duration() {
    let result = Cli::try_parse_from(["axiom-intake", "dashboard", "--scan-duration", "50"]);
    assert!(result.is_err());
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_unknown_keys_suggest_closest_match() {
    let table: toml::Table = r#"
them = "dark"
scan_duration = 10

[accessibility]
enabeld = true

[profile.fast]
scan_duration_ms = 200
slider = 0.3
"#
    .parse()
    .unwrap();

    let warnings = unknown_key_warnings(&table);
    assert_eq!(warnings.len(), 4);
    assert!(warnings.iter().any(|w| w.contains("them") && w.contains("theme")));
    assert!(warnings
        .iter()
        .any(|w| w.contains("scan_duration") && w.contains("scan_duration_ms")));
    assert!(warnings
        .iter()
        .any(|w| w.contains("accessibility.enabeld") && w.contains("enabled")));
    assert!(warnings.iter().any(|w| w.contains("profile.fast.slider")));
}
