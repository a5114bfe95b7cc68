//! Single-slot completion timer.
//!
//! The session never owns more than one pending completion. Arming the slot
//! replaces whatever was there, so a superseded scan can never fire.

use std::time::{Duration, Instant};

/// A scheduled completion for one scan generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionTimer {
    /// Generation the timer belongs to.
    pub generation: u64,
    /// When the scan is due to complete.
    pub due: Instant,
}

/// Holds at most one [`CompletionTimer`].
#[derive(Debug, Clone, Default)]
pub struct TimerSlot {
    pending: Option<CompletionTimer>,
}

impl TimerSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a completion for `generation` at `now + duration`.
    ///
    /// Returns the timer it replaced, if any.
    pub fn arm(&mut self, generation: u64, now: Instant, duration: Duration) -> Option<CompletionTimer> {
        let replaced = self.pending.replace(CompletionTimer {
            generation,
            due: now + duration,
        });
        if let Some(old) = replaced {
            log::trace!("Timer for generation {} superseded", old.generation);
        }
        replaced
    }

    /// Drop the pending timer.
    pub fn cancel(&mut self) -> Option<CompletionTimer> {
        self.pending.take()
    }

    /// Pending timer, if any.
    #[must_use]
    pub fn pending(&self) -> Option<CompletionTimer> {
        self.pending
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the timer if it is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<CompletionTimer> {
        match self.pending {
            Some(timer) if now >= timer.due => self.pending.take(),
            _ => None,
        }
    }
}
