//! Evidence presentation geometry.
//!
//! This module provides the pure geometry behind the forensic output panel:
//! - [`region`]: normalized regions, overlay boxes and zoom focal points
//! - [`slider`]: the before/after comparison slider controller
//!
//! Nothing here touches the terminal; the TUI reads these outputs and paints them.

pub mod region;
pub mod slider;

pub use region::{annotate, Annotation, Axis, RectBox, Region, ZoomFocus, ZOOM_MAGNIFICATION};
pub use slider::{CompareSlider, Container, PointerId};

/// Clamp into `[0, 1]`; NaN maps to 0.
pub(crate) fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(0.25), 0.25);
        assert_eq!(clamp01(7.0), 1.0);
        assert_eq!(clamp01(f64::NAN), 0.0);
    }
}
