//! Verdict heuristic for uploaded artifacts.
//!
//! # Overview
//!
//! The classifier does not look at image content. It assigns a verdict from
//! the file name alone:
//!
//! 1. Demo shortcuts: `scan.jpg` is always authentic at 99.3%, anything named
//!    `scan_tempered.*` is always tampered at 91.7%.
//! 2. Token match: names containing a manipulation token (`fake`, `edited`, ...)
//!    are tampered, everything else is authentic.
//! 3. Confidence for the token path is a base value plus a variance offset in
//!    `[0, 4)` drawn from a [`ConfidenceSource`].
//!
//! # Example
//!
//! ```
//! use axiom_intake::scan::classify::{Classifier, FixedOffset, Verdict};
//!
//! let mut classifier = Classifier::new(FixedOffset::new(0.5));
//! let result = classifier.classify("xray_manipulated.jpg");
//!
//! assert_eq!(result.verdict, Verdict::Tampered);
//! assert_eq!(result.confidence.as_percent(), 90.0);
//! ```

use std::fmt;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Demo file name that is always reported as authentic.
pub const DEMO_AUTHENTIC_NAME: &str = "scan.jpg";

/// Demo file name prefix that is always reported as tampered.
pub const DEMO_TAMPERED_PREFIX: &str = "scan_tempered.";

/// Tokens that mark a file name as manipulated.
pub const TAMPER_TOKENS: &[&str] = &[
    "tampered",
    "tempered",
    "fake",
    "edited",
    "manipulated",
    "forged",
];

const DEMO_AUTHENTIC_CONFIDENCE: Confidence = Confidence::from_tenths(993);
const DEMO_TAMPERED_CONFIDENCE: Confidence = Confidence::from_tenths(917);

/// Base confidence (in tenths) for authentic verdicts on the token path.
const AUTHENTIC_BASE_TENTHS: u16 = 960;
/// Base confidence (in tenths) for tampered verdicts on the token path.
const TAMPERED_BASE_TENTHS: u16 = 880;
/// Width of the variance window in tenths (4.0 percentage points).
const VARIANCE_TENTHS: f64 = 40.0;

/// Classification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// No manipulation detected.
    Authentic,
    /// Manipulation artifacts detected.
    Tampered,
}

impl Verdict {
    /// Whether this verdict flags the artifact.
    #[must_use]
    pub fn is_tampered(self) -> bool {
        matches!(self, Self::Tampered)
    }

    /// Upper-case label used in banners and reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Authentic => "AUTHENTIC",
            Self::Tampered => "TAMPERED",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentic => write!(f, "authentic"),
            Self::Tampered => write!(f, "tampered"),
        }
    }
}

/// Displayed confidence score with one decimal place.
///
/// Stored as integer tenths of a percent so that fixed demo values compare
/// exactly. Always within `(0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Confidence(u16);

impl Confidence {
    /// Smallest representable confidence (0.1%).
    pub const MIN: Confidence = Confidence(1);
    /// Largest representable confidence (100.0%).
    pub const MAX: Confidence = Confidence(1000);

    /// Create a confidence from tenths of a percent, clamped into `[0.1, 100.0]`.
    #[must_use]
    pub const fn from_tenths(tenths: u16) -> Self {
        if tenths < Self::MIN.0 {
            Self::MIN
        } else if tenths > Self::MAX.0 {
            Self::MAX
        } else {
            Self(tenths)
        }
    }

    /// Create a confidence from a percentage, rounded to one decimal.
    #[must_use]
    pub fn from_percent(percent: f64) -> Self {
        if !percent.is_finite() {
            return Self::MIN;
        }
        let tenths = (percent * 10.0).round().clamp(0.0, f64::from(Self::MAX.0));
        Self::from_tenths(tenths as u16)
    }

    /// Raw value in tenths of a percent.
    #[must_use]
    pub fn tenths(self) -> u16 {
        self.0
    }

    /// Value as a percentage.
    #[must_use]
    pub fn as_percent(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}%", self.0 / 10, self.0 % 10)
    }
}

impl Serialize for Confidence {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_percent())
    }
}

impl<'de> Deserialize<'de> for Confidence {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let percent = f64::deserialize(deserializer)?;
        Ok(Self::from_percent(percent))
    }
}

/// Verdict plus confidence for one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// The decided verdict.
    pub verdict: Verdict,
    /// Confidence attached to the verdict.
    pub confidence: Confidence,
}

/// Source of variance for the general confidence path.
///
/// Implementations return a value in `[0, 1)`. Tests pin the value with
/// [`FixedOffset`]; the dashboard uses [`ThreadRandom`] or [`SeededRandom`].
pub trait ConfidenceSource {
    /// Draw the next unit value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

/// Thread-local random source.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl ConfidenceSource for ThreadRandom {
    fn next_unit(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Reproducible random source seeded from a `u64`.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Create a seeded source.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ConfidenceSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Source that always returns the same unit value.
#[derive(Debug, Clone, Copy)]
pub struct FixedOffset(f64);

impl FixedOffset {
    /// Create a fixed source. The value is clamped into `[0, 1)`.
    #[must_use]
    pub fn new(unit: f64) -> Self {
        let unit = if unit.is_finite() { unit } else { 0.0 };
        Self(unit.clamp(0.0, 1.0 - f64::EPSILON))
    }
}

impl ConfidenceSource for FixedOffset {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

/// File-name classifier with an owned variance source.
pub struct Classifier {
    source: Box<dyn ConfidenceSource>,
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier").finish_non_exhaustive()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ThreadRandom)
    }
}

impl Classifier {
    /// Create a classifier drawing variance from `source`.
    #[must_use]
    pub fn new(source: impl ConfidenceSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Create a classifier that is reproducible when `seed` is given.
    #[must_use]
    pub fn with_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(SeededRandom::new(seed)),
            None => Self::default(),
        }
    }

    /// Classify a file name (or a path; only the last component is used).
    pub fn classify(&mut self, file_name: &str) -> Classification {
        classify_with(file_name, self.source.as_mut())
    }
}

/// Classify `file_name`, drawing variance from `source` when needed.
pub fn classify_with(file_name: &str, source: &mut dyn ConfidenceSource) -> Classification {
    let name = normalize_name(file_name);

    if let Some(classification) = demo_shortcut(&name) {
        log::debug!("Demo shortcut for '{}': {:?}", name, classification);
        return classification;
    }

    let verdict = if contains_tamper_token(&name) {
        Verdict::Tampered
    } else {
        Verdict::Authentic
    };

    let base = match verdict {
        Verdict::Authentic => AUTHENTIC_BASE_TENTHS,
        Verdict::Tampered => TAMPERED_BASE_TENTHS,
    };

    let unit = source.next_unit();
    let unit = if unit.is_finite() {
        unit.clamp(0.0, 1.0 - f64::EPSILON)
    } else {
        0.0
    };
    // Floor keeps the offset strictly below 4.0 after rounding to tenths.
    let offset = (unit * VARIANCE_TENTHS).floor() as u16;

    let classification = Classification {
        verdict,
        confidence: Confidence::from_tenths(base + offset),
    };
    log::trace!("Heuristic for '{}': {:?}", name, classification);
    classification
}

/// Whether `file_name` contains the tampered-demo marker.
#[must_use]
pub fn is_tampered_demo(file_name: &str) -> bool {
    normalize_name(file_name).contains(DEMO_TAMPERED_PREFIX.trim_end_matches('.'))
}

/// Lower-cased, NFC-normalized final path component.
fn normalize_name(file_name: &str) -> String {
    let last = Path::new(file_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    last.nfc().collect::<String>().to_lowercase()
}

fn demo_shortcut(name: &str) -> Option<Classification> {
    if name == DEMO_AUTHENTIC_NAME {
        Some(Classification {
            verdict: Verdict::Authentic,
            confidence: DEMO_AUTHENTIC_CONFIDENCE,
        })
    } else if name.starts_with(DEMO_TAMPERED_PREFIX) {
        Some(Classification {
            verdict: Verdict::Tampered,
            confidence: DEMO_TAMPERED_CONFIDENCE,
        })
    } else {
        None
    }
}

fn contains_tamper_token(name: &str) -> bool {
    TAMPER_TOKENS.iter().any(|token| name.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_fixed(name: &str, unit: f64) -> Classification {
        Classifier::new(FixedOffset::new(unit)).classify(name)
    }

    #[test]
    fn test_demo_authentic() {
        let result = classify_fixed("scan.jpg", 0.9);
        assert_eq!(result.verdict, Verdict::Authentic);
        assert_eq!(result.confidence, Confidence::from_tenths(993));
    }

    #[test]
    fn test_demo_authentic_case_insensitive() {
        let result = classify_fixed("SCAN.JPG", 0.1);
        assert_eq!(result.verdict, Verdict::Authentic);
        assert_eq!(result.confidence.as_percent(), 99.3);
    }

    #[test]
    fn test_demo_tampered_prefix() {
        for name in ["scan_tempered.png", "scan_tempered.jpg", "Scan_Tempered.TIFF"] {
            let result = classify_fixed(name, 0.0);
            assert_eq!(result.verdict, Verdict::Tampered, "{name}");
            assert_eq!(result.confidence.as_percent(), 91.7, "{name}");
        }
    }

    #[test]
    fn test_demo_rules_use_last_path_component() {
        let result = classify_fixed("/home/user/studies/scan.jpg", 0.5);
        assert_eq!(result.confidence.as_percent(), 99.3);
    }

    #[test]
    fn test_token_match_tampered() {
        for token in TAMPER_TOKENS {
            let name = format!("xray_{}.jpg", token.to_uppercase());
            assert_eq!(classify_fixed(&name, 0.0).verdict, Verdict::Tampered);
        }
    }

    #[test]
    fn test_no_token_is_authentic() {
        let result = classify_fixed("chest_xray_0042.png", 0.0);
        assert_eq!(result.verdict, Verdict::Authentic);
        assert_eq!(result.confidence.as_percent(), 96.0);
    }

    #[test]
    fn test_variance_window_bounds() {
        let low = classify_fixed("forged.png", 0.0);
        let high = classify_fixed("forged.png", 0.999_999);
        assert_eq!(low.confidence.as_percent(), 88.0);
        assert_eq!(high.confidence.as_percent(), 91.9);

        let high = classify_fixed("clean.png", 0.999_999);
        assert_eq!(high.confidence.as_percent(), 99.9);
    }

    #[test]
    fn test_scan_jpg_is_not_a_prefix_rule() {
        // "scan.jpg.bak" is not the demo file; falls back to the token path.
        let result = classify_fixed("scan.jpg.bak", 0.25);
        assert_eq!(result.verdict, Verdict::Authentic);
        assert_eq!(result.confidence.as_percent(), 97.0);
    }

    #[test]
    fn test_nfd_name_is_normalized() {
        // NFC composes "e" + U+0301 into "é", so the token no longer matches.
        let decomposed = "e\u{301}dited.png";
        assert_eq!(classify_fixed(decomposed, 0.0).verdict, Verdict::Authentic);
        assert_eq!(classify_fixed("edited.png", 0.0).verdict, Verdict::Tampered);
    }

    #[test]
    fn test_seeded_source_is_reproducible() {
        let mut a = Classifier::with_seed(Some(42));
        let mut b = Classifier::with_seed(Some(42));
        for _ in 0..20 {
            assert_eq!(a.classify("photo.png"), b.classify("photo.png"));
        }
    }

    #[test]
    fn test_fixed_offset_clamps() {
        assert_eq!(FixedOffset::new(-3.0).next_unit_value(), 0.0);
        assert!(FixedOffset::new(7.0).next_unit_value() < 1.0);
        assert_eq!(FixedOffset::new(f64::NAN).next_unit_value(), 0.0);
    }

    #[test]
    fn test_confidence_from_percent() {
        assert_eq!(Confidence::from_percent(99.34).tenths(), 993);
        assert_eq!(Confidence::from_percent(150.0), Confidence::MAX);
        assert_eq!(Confidence::from_percent(-1.0), Confidence::MIN);
        assert_eq!(Confidence::from_percent(f64::NAN), Confidence::MIN);
    }

    #[test]
    fn test_confidence_display() {
        assert_eq!(Confidence::from_tenths(917).to_string(), "91.7%");
        assert_eq!(Confidence::from_tenths(1000).to_string(), "100.0%");
    }

    #[test]
    fn test_confidence_serde_as_number() {
        let json = serde_json::to_string(&Confidence::from_tenths(993)).unwrap();
        assert_eq!(json, "99.3");
        let back: Confidence = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tenths(), 993);
    }

    #[test]
    fn test_is_tampered_demo() {
        assert!(is_tampered_demo("scan_tempered.png"));
        assert!(is_tampered_demo("/tmp/SCAN_TEMPERED_v2.png"));
        assert!(!is_tampered_demo("scan.jpg"));
    }

    impl FixedOffset {
        fn next_unit_value(mut self) -> f64 {
            self.next_unit()
        }
    }
}
