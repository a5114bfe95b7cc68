//! Downscaled RGB raster used by the terminal views.

use image::DynamicImage;

/// Thumbnail bounding box width in pixels.
pub const THUMBNAIL_WIDTH: u32 = 96;
/// Thumbnail bounding box height in pixels.
pub const THUMBNAIL_HEIGHT: u32 = 72;

/// Small RGB raster, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl Thumbnail {
    /// Downscale `img` to fit the thumbnail box, preserving aspect ratio.
    #[must_use]
    pub fn from_image(img: &DynamicImage) -> Self {
        let rgb = img.thumbnail(THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT).to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb.pixels().map(|p| p.0).collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Build a thumbnail from raw pixels. Returns `None` on size mismatch.
    #[must_use]
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<[u8; 3]>) -> Option<Self> {
        if width == 0 || height == 0 || pixels.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at integer coordinates, clamped to the raster.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        self.pixels[y * self.width as usize + x]
    }

    /// Nearest pixel at image fractions `fx`, `fy` in `[0, 1]`.
    #[must_use]
    pub fn sample(&self, fx: f64, fy: f64) -> [u8; 3] {
        let to_index = |f: f64, extent: u32| -> u32 {
            let f = if f.is_finite() { f.clamp(0.0, 1.0) } else { 0.0 };
            ((f * f64::from(extent)).floor() as u32).min(extent - 1)
        };
        self.pixel(to_index(fx, self.width), to_index(fy, self.height))
    }
}
