//! Before/after comparison slider.
//!
//! The slider tracks a split position in `[0, 1]`. Only a drag that starts on
//! the handle moves it: the caller checks [`CompareSlider::hits_handle`] before
//! calling [`CompareSlider::begin`], and clicks anywhere else are dropped.
//!
//! # Example
//!
//! ```
//! use axiom_intake::evidence::slider::{CompareSlider, PointerId};
//!
//! let mut slider = CompareSlider::new(0.5);
//! slider.set_container(0.0, 100.0);
//!
//! slider.begin(PointerId(1), 30.0);
//! slider.move_to(PointerId(1), 140.0);
//! slider.end(PointerId(1));
//!
//! assert_eq!(slider.position(), 1.0);
//! assert!(!slider.is_dragging());
//! ```

use super::clamp01;

/// Identifier of a pointing device (mouse button, touch point).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub u32);

/// Horizontal extent of the comparison container in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Container {
    pub left: f64,
    pub width: f64,
}

/// Pointer-driven split position for the comparison view.
#[derive(Debug, Clone)]
pub struct CompareSlider {
    position: f64,
    dragging: bool,
    captured: Option<PointerId>,
    container: Option<Container>,
}

impl Default for CompareSlider {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl CompareSlider {
    /// Create a slider at `initial` (clamped into `[0, 1]`).
    #[must_use]
    pub fn new(initial: f64) -> Self {
        Self {
            position: clamp01(initial),
            dragging: false,
            captured: None,
            container: None,
        }
    }

    /// Current split position in `[0, 1]`.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Pointer currently captured by a drag, if any.
    #[must_use]
    pub fn captured_pointer(&self) -> Option<PointerId> {
        self.captured
    }

    /// Update the container bounds. Called by the renderer on every layout.
    pub fn set_container(&mut self, left: f64, width: f64) {
        self.container = Some(Container { left, width });
    }

    /// Current container bounds, if a layout has been applied.
    #[must_use]
    pub fn container(&self) -> Option<Container> {
        self.container
    }

    /// Reset to `initial` and drop any drag. Used when the compared pair changes.
    pub fn reset(&mut self, initial: f64) {
        self.position = clamp01(initial);
        self.dragging = false;
        self.captured = None;
        log::trace!("Slider reset to {:.3}", self.position);
    }

    /// Whether `client_x` lands on the handle, within `tolerance` client units.
    #[must_use]
    pub fn hits_handle(&self, client_x: f64, tolerance: f64) -> bool {
        match self.container {
            Some(c) if c.width > 0.0 => {
                let handle_x = c.left + self.position * c.width;
                (client_x - handle_x).abs() <= tolerance.max(0.0)
            }
            _ => false,
        }
    }

    /// Start a drag with `pointer` at `client_x`.
    pub fn begin(&mut self, pointer: PointerId, client_x: f64) {
        self.captured = Some(pointer);
        self.dragging = true;
        self.update_from_client_x(client_x);
        log::trace!("Slider drag begin {:?} at {:.3}", pointer, self.position);
    }

    /// Continue a drag. Ignored unless dragging with the captured pointer.
    pub fn move_to(&mut self, pointer: PointerId, client_x: f64) {
        if !self.dragging || self.captured != Some(pointer) {
            return;
        }
        self.update_from_client_x(client_x);
    }

    /// Finish a drag. Ignored unless `pointer` is the captured pointer.
    pub fn end(&mut self, pointer: PointerId) {
        if self.captured != Some(pointer) {
            return;
        }
        self.captured = None;
        self.dragging = false;
        log::trace!("Slider drag end at {:.3}", self.position);
    }

    /// Move the split by `delta` from the keyboard. Ignored mid-drag.
    pub fn nudge(&mut self, delta: f64) {
        if self.dragging {
            return;
        }
        self.position = clamp01(self.position + delta);
    }

    /// Clip inset of the overlay image from the right edge, percent.
    #[must_use]
    pub fn clip_inset_percent(&self) -> f64 {
        (1.0 - self.position) * 100.0
    }

    /// Handle offset from the left edge, percent.
    #[must_use]
    pub fn handle_offset_percent(&self) -> f64 {
        self.position * 100.0
    }

    fn update_from_client_x(&mut self, client_x: f64) {
        let Some(c) = self.container else {
            return;
        };
        if c.width <= 0.0 || !c.width.is_finite() {
            return;
        }
        self.position = clamp01((client_x - c.left) / c.width);
    }
}
