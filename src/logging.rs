//! Logging infrastructure for axiom-intake.
//!
//! Structured logging uses the `log` facade and the `env_logger` backend.
//! Log levels are determined by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (error only) or `--verbose` (debug/trace)
//! 3. Default: info level
//!
//! # Terminal ownership
//!
//! While the dashboard owns the terminal, anything written to stderr would
//! corrupt the screen. [`LogTarget::File`] sends records to a file instead;
//! [`LogTarget::Suppressed`] keeps only errors, which surface after the
//! terminal is restored.
//!
//! # Example
//!
//! ```rust,no_run
//! use axiom_intake::logging::{init_logging, LogTarget};
//!
//! init_logging(1, false, LogTarget::Stderr).unwrap();
//! log::debug!("Debug info here");
//! ```

use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use env_logger::{Builder, Target};
use log::LevelFilter;

/// Where log records go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error (non-interactive commands).
    Stderr,
    /// Append to a file (dashboard with `--log-file`).
    File(PathBuf),
    /// Standard error, errors only (dashboard without a log file).
    Suppressed,
}

/// Initialize the logging subsystem.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
///
/// Only the first call in a process installs a logger; later calls are no-ops.
pub fn init_logging(verbose: u8, quiet: bool, target: LogTarget) -> io::Result<()> {
    let use_env = env::var("RUST_LOG").is_ok();

    let mut builder = Builder::new();

    if use_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet, &target));
    }

    match &target {
        LogTarget::Stderr | LogTarget::Suppressed => {
            builder.target(Target::Stderr);
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.target(Target::Pipe(Box::new(file)));
            builder.write_style(env_logger::WriteStyle::Never);
        }
    }

    configure_format(&mut builder, verbose);
    if builder.try_init().is_err() {
        // Already installed by an earlier command in this process.
        return Ok(());
    }

    if use_env {
        log::debug!(
            "Logging initialized from RUST_LOG environment variable: {:?}",
            env::var("RUST_LOG").ok()
        );
    } else {
        log::debug!(
            "Logging initialized at level {:?} ({:?})",
            determine_level(verbose, quiet, &target),
            target
        );
    }
    Ok(())
}

/// Determine the log level from CLI flags and target.
fn determine_level(verbose: u8, quiet: bool, target: &LogTarget) -> LevelFilter {
    if quiet || *target == LogTarget::Suppressed {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Debug builds: timestamp, level, module path from `-v` on.
/// Release builds: level and message only.
fn configure_format(builder: &mut Builder, verbose: u8) {
    #[cfg(debug_assertions)]
    {
        builder.format(move |buf, record| {
            let timestamp = buf.timestamp_seconds();
            let level = record.level();
            let level_style = buf.default_level_style(level);

            if verbose >= 1 {
                writeln!(
                    buf,
                    "{} {level_style}{:<5}{level_style:#} [{}] {}",
                    timestamp,
                    level,
                    record.module_path().unwrap_or("unknown"),
                    record.args()
                )
            } else {
                writeln!(
                    buf,
                    "{} {level_style}{:<5}{level_style:#} {}",
                    timestamp,
                    level,
                    record.args()
                )
            }
        });
    }

    #[cfg(not(debug_assertions))]
    {
        let _ = verbose;
        builder.format(|buf, record| {
            let level = record.level();
            let level_style = buf.default_level_style(level);
            writeln!(
                buf,
                "{level_style}{:<5}{level_style:#} {}",
                level,
                record.args()
            )
        });
    }
}

/// Get the current log level as a string.
pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determine_level_default() {
        assert_eq!(determine_level(0, false, &LogTarget::Stderr), LevelFilter::Info);
    }

    #[test]
    fn test_determine_level_verbose() {
        assert_eq!(determine_level(1, false, &LogTarget::Stderr), LevelFilter::Debug);
        assert_eq!(determine_level(3, false, &LogTarget::Stderr), LevelFilter::Trace);
    }

    #[test]
    fn test_determine_level_quiet_overrides_verbose() {
        assert_eq!(determine_level(2, true, &LogTarget::Stderr), LevelFilter::Error);
    }

    #[test]
    fn test_suppressed_target_is_error_only() {
        assert_eq!(determine_level(2, false, &LogTarget::Suppressed), LevelFilter::Error);
    }

    #[test]
    fn test_file_target_keeps_verbosity() {
        let target = LogTarget::File(PathBuf::from("axiom.log"));
        assert_eq!(determine_level(1, false, &target), LevelFilter::Debug);
    }

    #[test]
    fn test_current_level_name_values() {
        let name = current_level_name();
        assert!(
            ["off", "error", "warn", "info", "debug", "trace"].contains(&name),
            "Unexpected level name: {}",
            name
        );
    }
}
