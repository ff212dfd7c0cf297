//! Drawing surfaces.
//!
//! [`Surface`] is the small 2D-context subset the renderer needs. Coordinates
//! passed to drawing calls are logical; the surface maps them to device
//! pixels through its current scale, which [`Surface::resize`] resets to
//! identity.
//!
//! - [`PixelSurface`]: an RGBA raster. A device pixel is covered by a rectangle
//!   when its center lies inside the half-open device span `[x0, x1)`.
//! - [`RecordingSurface`]: logs every call as a [`DrawOp`].

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use crate::color::Color;
use crate::element::SurfaceError;
use crate::geom::{Point, Rect};

/// 2D drawing target.
pub trait Surface {
    /// Reallocate the backing store in device pixels and reset the transform.
    fn resize(&mut self, width: u32, height: u32);

    /// Backing-store size in device pixels.
    fn size(&self) -> (u32, u32);

    /// Multiply the current transform by a scale.
    fn scale(&mut self, x: f64, y: f64);

    /// Clear every pixel to transparent.
    fn clear(&mut self);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Stroke the outline of `rect`, centered on its edges.
    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64);

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, line_width: f64);

    /// Make the finished frame visible.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError`] if the frame has nowhere to go.
    fn present(&mut self) -> Result<(), SurfaceError>;
}

// =============================================================
// PixelSurface
// =============================================================

/// Software RGBA raster.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    scale: (f64, f64),
}

impl PixelSurface {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let mut surface = Self { width: 0, height: 0, pixels: Vec::new(), scale: (1.0, 1.0) };
        surface.resize(width, height);
        surface
    }

    /// Current transform scale factors.
    #[must_use]
    pub fn transform(&self) -> (f64, f64) {
        self.scale
    }

    /// Color at a device pixel, or `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    /// Binary PPM (`P6`) encoding, composited over white.
    #[must_use]
    pub fn to_ppm(&self) -> Vec<u8> {
        let header = format!("P6\n{} {}\n255\n", self.width, self.height);
        let mut out = Vec::with_capacity(header.len() + self.pixels.len() * 3);
        out.extend_from_slice(header.as_bytes());
        for px in &self.pixels {
            out.extend_from_slice(&px.over_white());
        }
        out
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Fill a span given in device coordinates.
    fn fill_device(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Color) {
        let (cx0, cx1) = (covered_start(x0, self.width), covered_start(x1, self.width));
        let (cy0, cy1) = (covered_start(y0, self.height), covered_start(y1, self.height));
        for y in cy0..cy1 {
            for x in cx0..cx1 {
                let i = self.index(x, y);
                if let Some(dst) = self.pixels.get_mut(i) {
                    *dst = blend(*dst, color);
                }
            }
        }
    }

    fn fill_logical(&mut self, rect: Rect, color: Color) {
        let (sx, sy) = self.scale;
        self.fill_device(rect.x * sx, rect.y * sy, rect.right() * sx, rect.bottom() * sy, color);
    }
}

impl Surface for PixelSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![Color::TRANSPARENT; width as usize * height as usize];
        self.scale = (1.0, 1.0);
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.scale = (self.scale.0 * x, self.scale.1 * y);
    }

    fn clear(&mut self) {
        self.pixels.fill(Color::TRANSPARENT);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fill_logical(rect, color);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64) {
        for strip in stroke_strips(rect, line_width) {
            self.fill_logical(strip, color);
        }
    }

    #[allow(clippy::float_cmp)]
    fn stroke_line(&mut self, from: Point, to: Point, color: Color, line_width: f64) {
        let half = line_width / 2.0;
        if from.y == to.y {
            let x = from.x.min(to.x);
            self.fill_logical(Rect::new(x, from.y - half, (to.x - from.x).abs(), line_width), color);
            return;
        }
        if from.x == to.x {
            let y = from.y.min(to.y);
            self.fill_logical(Rect::new(from.x - half, y, line_width, (to.y - from.y).abs()), color);
            return;
        }

        // Diagonal: stamp a line-width square at unit steps along the segment.
        let (dx, dy) = to.delta_from(from);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0);
        let mut i = 0.0;
        while i <= steps {
            let t = i / steps;
            let c = Point::new(from.x + dx * t, from.y + dy * t);
            self.fill_logical(Rect::centered(c, line_width, line_width), color);
            i += 1.0;
        }
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }
}

/// First device index whose pixel center lies at or right of `edge`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn covered_start(edge: f64, limit: u32) -> u32 {
    if edge.is_nan() {
        return 0;
    }
    (edge - 0.5).ceil().clamp(0.0, f64::from(limit)) as u32
}

/// Source-over compositing.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend(dst: Color, src: Color) -> Color {
    if src.a == 255 || dst.a == 0 {
        return src;
    }
    if src.a == 0 {
        return dst;
    }
    let sa = f64::from(src.a) / 255.0;
    let da = f64::from(dst.a) / 255.0 * (1.0 - sa);
    let out_a = sa + da;
    let mix = |s: u8, d: u8| -> u8 {
        let v = (f64::from(s) * sa + f64::from(d) * da) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    Color::rgba(mix(src.r, dst.r), mix(src.g, dst.g), mix(src.b, dst.b), (out_a * 255.0).round() as u8)
}

/// The four non-overlapping strips that make up a stroked rectangle outline.
pub(crate) fn stroke_strips(rect: Rect, line_width: f64) -> [Rect; 4] {
    let half = line_width / 2.0;
    let inner_h = rect.height - line_width;
    [
        Rect::new(rect.x - half, rect.y - half, rect.width + line_width, line_width),
        Rect::new(rect.x - half, rect.bottom() - half, rect.width + line_width, line_width),
        Rect::new(rect.x - half, rect.y + half, line_width, inner_h),
        Rect::new(rect.right() - half, rect.y + half, line_width, inner_h),
    ]
}

// =============================================================
// RecordingSurface
// =============================================================

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Resize { width: u32, height: u32 },
    Scale { x: f64, y: f64 },
    Clear,
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, color: Color, line_width: f64 },
    StrokeLine { from: Point, to: Point, color: Color, line_width: f64 },
    Present,
}

/// Surface that records calls instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    size: (u32, u32),
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drain the log.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Ops recorded since the most recent `Clear`, including it.
    #[must_use]
    pub fn last_frame(&self) -> &[DrawOp] {
        let start = self.ops.iter().rposition(|op| matches!(op, DrawOp::Clear)).unwrap_or(self.ops.len());
        &self.ops[start..]
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.ops.push(DrawOp::Resize { width, height });
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::Scale { x, y });
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64) {
        self.ops.push(DrawOp::StrokeRect { rect, color, line_width });
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, line_width: f64) {
        self.ops.push(DrawOp::StrokeLine { from, to, color, line_width });
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::Present);
        Ok(())
    }
}
