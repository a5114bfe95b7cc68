//! Completed scan records.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::scan::classify::{Classification, Confidence, Verdict};

/// One completed scan. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    file_name: String,
    timestamp: DateTime<Utc>,
    verdict: Verdict,
    confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    digest: Option<String>,
}

impl ScanRecord {
    /// Create a record. The timestamp is truncated to whole seconds.
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        timestamp: DateTime<Utc>,
        classification: Classification,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            timestamp: timestamp.trunc_subsecs(0),
            verdict: classification.verdict,
            confidence: classification.confidence,
            digest: None,
        }
    }

    /// Attach the SHA-256 digest of the scanned bytes.
    #[must_use]
    pub fn with_digest(mut self, digest: Option<String>) -> Self {
        self.digest = digest;
        self
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Completion time, second resolution.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    #[must_use]
    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    /// Hex SHA-256 of the scanned bytes, when a preview supplied one.
    #[must_use]
    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }
}
