//! Command-line interface definitions for axiom-intake.
//!
//! Global options (verbosity, color, error format) apply to every subcommand.
//!
//! # Example
//!
//! ```bash
//! # Open the dashboard and upload a study right away
//! axiom-intake dashboard ~/studies/scan.jpg
//!
//! # Faster scans with reproducible confidence values
//! axiom-intake dashboard --scan-duration 800 --seed 7
//!
//! # Classify files without the dashboard, as JSON
//! axiom-intake classify --output json a.png b_edited.png
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::output::OutputFormat;
use crate::tui::keybindings::KeybindingProfile;

/// Forensic intake dashboard for medical image uploads.
///
/// Uploads a study, simulates a tamper scan and reveals a verdict with an
/// evidence region, a before/after comparison and session telemetry.
#[derive(Debug, Parser)]
#[command(name = "axiom-intake")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open the interactive intake dashboard
    Dashboard(DashboardArgs),
    /// Classify files and print a report without the dashboard
    Classify(ClassifyArgs),
}

/// Arguments for the dashboard subcommand.
#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Study to upload as soon as the dashboard opens
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Simulated scan duration in milliseconds (minimum 100)
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(100..))]
    pub scan_duration: Option<u64>,

    /// Seed for reproducible confidence values
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Color theme
    #[arg(long, value_enum)]
    pub theme: Option<ThemeArg>,

    /// Keybinding profile
    #[arg(long = "keys", value_enum, value_name = "PROFILE")]
    pub keybinding_profile: Option<KeybindingProfile>,

    /// Accessible mode: ASCII borders, no color-only cues
    #[arg(long)]
    pub accessible: bool,

    /// Directory for exported reports (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub report_dir: Option<PathBuf>,

    /// Write logs to this file while the dashboard is open
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Configuration file (default: platform config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Named profile from the configuration file
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,
}

/// Arguments for the classify subcommand.
#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Files to classify
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Seed for reproducible confidence values
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,
}

/// Theme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeArg {
    /// Detect from the terminal background
    #[default]
    Auto,
    /// Light text on a dark background
    Dark,
    /// Dark text on a light background
    Light,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_help() {
        let result = Cli::try_parse_from(["axiom-intake", "--help"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_dashboard_basic() {
        let cli = Cli::try_parse_from(["axiom-intake", "dashboard"]).unwrap();
        assert_eq!(cli.verbose, 0);
        match cli.command {
            Commands::Dashboard(args) => {
                assert!(args.file.is_none());
                assert!(args.scan_duration.is_none());
                assert!(!args.accessible);
            }
            _ => panic!("Expected Dashboard command"),
        }
    }

    #[test]
    fn test_cli_parse_dashboard_with_options() {
        let cli = Cli::try_parse_from([
            "axiom-intake",
            "-v",
            "dashboard",
            "scan.jpg",
            "--scan-duration",
            "800",
            "--seed",
            "7",
            "--theme",
            "light",
            "--keys",
            "vim",
            "--accessible",
            "--report-dir",
            "out",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Dashboard(args) => {
                assert_eq!(args.file, Some(PathBuf::from("scan.jpg")));
                assert_eq!(args.scan_duration, Some(800));
                assert_eq!(args.seed, Some(7));
                assert_eq!(args.theme, Some(ThemeArg::Light));
                assert_eq!(args.keybinding_profile, Some(KeybindingProfile::Vim));
                assert!(args.accessible);
                assert_eq!(args.report_dir, Some(PathBuf::from("out")));
            }
            _ => panic!("Expected Dashboard command"),
        }
    }

    #[test]
    fn test_cli_scan_duration_minimum() {
        let result = Cli::try_parse_from(["axiom-intake", "dashboard", "--scan-duration", "99"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_classify() {
        let cli = Cli::try_parse_from([
            "axiom-intake",
            "--json-errors",
            "classify",
            "a.png",
            "b.png",
            "--output",
            "csv",
        ])
        .unwrap();
        assert!(cli.json_errors);
        match cli.command {
            Commands::Classify(args) => {
                assert_eq!(args.files.len(), 2);
                assert_eq!(args.output, OutputFormat::Csv);
                assert!(args.seed.is_none());
            }
            _ => panic!("Expected Classify command"),
        }
    }

    #[test]
    fn test_cli_classify_requires_files() {
        let result = Cli::try_parse_from(["axiom-intake", "classify"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["axiom-intake", "-v", "-q", "dashboard"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_invalid_subcommand() {
        let result = Cli::try_parse_from(["axiom-intake", "scan", "/path"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_theme_arg_serde() {
        assert_eq!(serde_json::to_string(&ThemeArg::Dark).unwrap(), "\"dark\"");
        assert_eq!(ThemeArg::default(), ThemeArg::Auto);
    }
}
