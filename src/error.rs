//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the axiom-intake application.
///
/// - 0: Success (every artifact authentic, or the dashboard closed normally)
/// - 1: General error (unexpected failure)
/// - 2: Tampered artifact found (`classify` only)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// At least one classified artifact was tampered.
    TamperedFound = 2,
    /// Interrupted: the run was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "AX000",
            Self::GeneralError => "AX001",
            Self::TamperedFound => "AX002",
            Self::Interrupted => "AX130",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "AX001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Error chain, outermost cause first (excluding `message`)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            causes: err.chain().skip(1).map(ToString::to_string).collect(),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::TamperedFound.as_i32(), 2);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
        assert_eq!(ExitCode::GeneralError.code_prefix(), "AX001");
    }

    #[test]
    fn test_structured_error_chain() {
        let err = Err::<(), _>(std::io::Error::other("disk full"))
            .context("export failed")
            .unwrap_err();
        let structured = StructuredError::new(&err, ExitCode::GeneralError);

        assert_eq!(structured.message, "export failed");
        assert_eq!(structured.causes, vec!["disk full".to_string()]);
        assert!(!structured.interrupted);

        let json = serde_json::to_string(&structured).unwrap();
        assert!(json.contains("\"code\":\"AX001\""));
    }
}
