//! Normalized evidence regions and their overlay geometry.
//!
//! A [`Region`] is a rectangle in image-relative coordinates (every component
//! in `[0, 1]`). [`annotate`] turns it into the two things the output panel
//! draws: a percentage bounding box over the source image and the focal point
//! of the magnified zoom view.

use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};

use super::clamp01;
use crate::scan::classify::is_tampered_demo;

/// Magnification of the zoom panel, in percent of the container size.
pub const ZOOM_MAGNIFICATION: f64 = 260.0;

/// Region reported for the tampered demo artifact.
pub const TAMPERED_DEMO_REGION: Region = Region {
    x: 0.58,
    y: 0.22,
    w: 0.22,
    h: 0.22,
};

/// Region reported for every other artifact in demo mode.
pub const DEFAULT_DEMO_REGION: Region = Region {
    x: 0.52,
    y: 0.28,
    w: 0.2,
    h: 0.2,
};

/// Normalized rectangle relative to an image's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Left edge, fraction of image width.
    pub x: f64,
    /// Top edge, fraction of image height.
    pub y: f64,
    /// Width, fraction of image width.
    pub w: f64,
    /// Height, fraction of image height.
    pub h: f64,
}

impl Region {
    /// Create a region, clamping each component into `[0, 1]`.
    #[must_use]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x: clamp01(x),
            y: clamp01(y),
            w: clamp01(w),
            h: clamp01(h),
        }
    }

    /// Copy of this region with every component clamped into `[0, 1]`.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self::new(self.x, self.y, self.w, self.h)
    }

    /// Demo region selection by file name.
    ///
    /// A real detector would supply the region instead; [`annotate`] does not
    /// care where it came from.
    #[must_use]
    pub fn for_demo(file_name: &str) -> Self {
        if is_tampered_demo(file_name) {
            TAMPERED_DEMO_REGION
        } else {
            DEFAULT_DEMO_REGION
        }
    }
}

/// Percentage bounding box for overlay placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl RectBox {
    /// Project the box onto a cell area.
    ///
    /// The result always lies inside `area` and is at least one cell in each
    /// dimension (for non-empty areas), so tiny regions stay visible.
    #[must_use]
    pub fn project(&self, area: Rect) -> Rect {
        if area.width == 0 || area.height == 0 {
            return Rect::new(area.x, area.y, 0, 0);
        }

        let scale = |pct: f64, extent: u16| -> u16 {
            ((pct / 100.0) * f64::from(extent))
                .round()
                .clamp(0.0, f64::from(extent)) as u16
        };

        let left = scale(self.left, area.width).min(area.width - 1);
        let top = scale(self.top, area.height).min(area.height - 1);
        let width = scale(self.width, area.width)
            .max(1)
            .min(area.width - left);
        let height = scale(self.height, area.height)
            .max(1)
            .min(area.height - top);

        Rect::new(area.x + left, area.y + top, width, height)
    }
}

/// Horizontal or vertical axis of the zoom focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Background-position style focal point for the zoom panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomFocus {
    /// Horizontal focus, percent.
    pub x: f64,
    /// Vertical focus, percent.
    pub y: f64,
    /// Magnification, percent of the container size.
    pub magnification: f64,
}

impl ZoomFocus {
    /// Image fraction displayed at container fraction `u` along `axis`.
    ///
    /// With a background `m` times the container size positioned at `p`
    /// percent, the pixel under container fraction `u` is image fraction
    /// `(u + (m - 1) * p) / m`. The focal point itself maps onto itself.
    #[must_use]
    pub fn source_fraction(&self, u: f64, axis: Axis) -> f64 {
        let p = match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        } / 100.0;
        let m = (self.magnification / 100.0).max(1.0);
        clamp01((clamp01(u) + (m - 1.0) * p) / m)
    }
}

/// Overlay geometry for one region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub rect_box: RectBox,
    pub zoom_focus: ZoomFocus,
}

/// Compute overlay geometry for a region.
///
/// Total over any input: components are clamped into `[0, 1]` first, so all
/// percentages lie in `[0, 100]`.
#[must_use]
pub fn annotate(region: &Region) -> Annotation {
    let r = region.clamped();

    let rect_box = RectBox {
        left: r.x * 100.0,
        top: r.y * 100.0,
        width: r.w * 100.0,
        height: r.h * 100.0,
    };

    let cx = clamp01(r.x + r.w / 2.0);
    let cy = clamp01(r.y + r.h / 2.0);

    Annotation {
        rect_box,
        zoom_focus: ZoomFocus {
            x: cx * 100.0,
            y: cy * 100.0,
            magnification: ZOOM_MAGNIFICATION,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_annotate_tampered_demo_region() {
        let annotation = annotate(&TAMPERED_DEMO_REGION);
        assert!(approx(annotation.rect_box.left, 58.0));
        assert!(approx(annotation.rect_box.top, 22.0));
        assert!(approx(annotation.rect_box.width, 22.0));
        assert!(approx(annotation.rect_box.height, 22.0));
        assert!(approx(annotation.zoom_focus.x, 69.0));
        assert!(approx(annotation.zoom_focus.y, 33.0));
        assert!(approx(annotation.zoom_focus.magnification, 260.0));
    }

    #[test]
    fn test_annotate_clamps_focus() {
        let region = Region {
            x: 0.9,
            y: 0.95,
            w: 0.5,
            h: 0.5,
        };
        let annotation = annotate(&region);
        assert!(approx(annotation.zoom_focus.x, 100.0));
        assert!(approx(annotation.zoom_focus.y, 100.0));
    }

    #[test]
    fn test_annotate_clamps_out_of_range_input() {
        let region = Region {
            x: -0.5,
            y: 2.0,
            w: 3.0,
            h: f64::NAN,
        };
        let annotation = annotate(&region);
        assert!(approx(annotation.rect_box.left, 0.0));
        assert!(approx(annotation.rect_box.top, 100.0));
        assert!(approx(annotation.rect_box.width, 100.0));
        assert!(approx(annotation.rect_box.height, 0.0));
    }

    #[test]
    fn test_demo_region_selection() {
        assert_eq!(Region::for_demo("scan_tempered.png"), TAMPERED_DEMO_REGION);
        assert_eq!(Region::for_demo("scan.jpg"), DEFAULT_DEMO_REGION);
        assert_eq!(Region::for_demo("anything_else.png"), DEFAULT_DEMO_REGION);
    }

    #[test]
    fn test_project_inside_area() {
        let area = Rect::new(10, 5, 40, 20);
        let projected = annotate(&TAMPERED_DEMO_REGION).rect_box.project(area);
        assert_eq!(projected.x, 10 + 23);
        assert_eq!(projected.y, 5 + 4);
        assert!(projected.right() <= area.right());
        assert!(projected.bottom() <= area.bottom());
        assert!(projected.width >= 1 && projected.height >= 1);
    }

    #[test]
    fn test_project_full_edge_region_stays_inside() {
        let area = Rect::new(0, 0, 10, 4);
        let region = Region::new(1.0, 1.0, 1.0, 1.0);
        let projected = annotate(&region).rect_box.project(area);
        assert_eq!(projected, Rect::new(9, 3, 1, 1));
    }

    #[test]
    fn test_project_empty_area() {
        let projected = annotate(&DEFAULT_DEMO_REGION)
            .rect_box
            .project(Rect::new(3, 3, 0, 5));
        assert_eq!(projected.width, 0);
        assert_eq!(projected.height, 0);
    }

    #[test]
    fn test_source_fraction_fixes_focus() {
        let focus = annotate(&TAMPERED_DEMO_REGION).zoom_focus;
        assert!(approx(focus.source_fraction(0.69, Axis::X), 0.69));
        assert!(approx(focus.source_fraction(0.33, Axis::Y), 0.33));
    }

    #[test]
    fn test_source_fraction_edges() {
        let focus = ZoomFocus {
            x: 0.0,
            y: 100.0,
            magnification: 260.0,
        };
        assert!(approx(focus.source_fraction(0.0, Axis::X), 0.0));
        assert!(approx(focus.source_fraction(1.0, Axis::X), 1.0 / 2.6));
        assert!(approx(focus.source_fraction(1.0, Axis::Y), 1.0));
    }
}
