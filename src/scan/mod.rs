//! Scanning: verdict heuristic, completion timer and the session state machine.

pub mod classify;
pub mod session;
pub mod timer;

pub use classify::{
    classify_with, Classification, Classifier, Confidence, ConfidenceSource, FixedOffset,
    SeededRandom, ThreadRandom, Verdict,
};
pub use session::{
    ScanProgress, ScanSession, ScanStatus, SessionError, DEFAULT_SCAN_DURATION,
    MIN_SCAN_DURATION, SCAN_STEPS,
};
pub use timer::{CompletionTimer, TimerSlot};
