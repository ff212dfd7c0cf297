#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_DEVICE_SIDE;

/// A point in logical (CSS pixel) surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn delta_from(self, other: Point) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }
}

/// Axis-aligned rectangle: origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Build a rectangle. Negative sizes are clamped to zero.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width: width.max(0.0), height: height.max(0.0) }
    }

    /// A `width` x `height` rectangle whose center is `center`.
    #[must_use]
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    /// Inclusive containment: points on any of the four edges are inside.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.width && pt.y >= self.y && pt.y <= self.y + self.height
    }

    /// Grow the rectangle outward by `margin` on every side.
    #[must_use]
    pub fn inflate(&self, margin: f64) -> Self {
        Self::new(self.x - margin, self.y - margin, self.width + margin * 2.0, self.height + margin * 2.0)
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Logical surface size plus the device pixel ratio supplied by the host.
///
/// Drawing code works in logical units; the backing store is
/// `width * pixel_ratio` by `height * pixel_ratio` device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self { width, height, pixel_ratio }
    }

    /// Backing-store size in whole device pixels, truncated like a canvas
    /// `width`/`height` assignment.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn device_size(&self) -> (u32, u32) {
        let w = (self.width * self.pixel_ratio).floor().max(0.0);
        let h = (self.height * self.pixel_ratio).floor().max(0.0);
        (w.min(f64::from(u32::MAX)) as u32, h.min(f64::from(u32::MAX)) as u32)
    }

    /// Convert a logical point to device pixels.
    #[must_use]
    pub fn logical_to_device(&self, pt: Point) -> Point {
        Point { x: pt.x * self.pixel_ratio, y: pt.y * self.pixel_ratio }
    }

    /// Whether the size and ratio are usable for a backing store: positive,
    /// finite, and at most [`MAX_DEVICE_SIDE`] device pixels per side.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let side = f64::from(MAX_DEVICE_SIDE) + 1.0;
        self.width.is_finite()
            && self.height.is_finite()
            && self.pixel_ratio.is_finite()
            && self.width > 0.0
            && self.height > 0.0
            && self.pixel_ratio > 0.0
            && self.width * self.pixel_ratio < side
            && self.height * self.pixel_ratio < side
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 320.0, height: 240.0, pixel_ratio: 1.0 }
    }
}
