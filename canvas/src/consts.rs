//! Shared numeric and color constants for the canvas crate.

use crate::color::Color;

// ── Shapes ──────────────────────────────────────────────────────

/// Side length of a rectangle created by pointer-up, in logical pixels.
pub const NEW_SHAPE_SIZE: f64 = 20.0;

/// Stroke color of newly created shapes.
pub const DEFAULT_STROKE: Color = Color::BLACK;

/// Fill color of newly created shapes.
pub const DEFAULT_FILL: Color = Color::RED;

/// Line width used for shape strokes and overlays.
pub const STROKE_WIDTH: f64 = 1.0;

// ── Overlays ────────────────────────────────────────────────────

/// Outward offset of the hover outline from the shape bounds.
pub const HOVER_OUTLINE_MARGIN: f64 = 2.0;

/// Hover outline color.
pub const HOVER_OUTLINE_COLOR: Color = Color::BLUE;

/// Half-length of each crosshair arm.
pub const CROSSHAIR_ARM: f64 = 5.0;

/// Crosshair color.
pub const CROSSHAIR_COLOR: Color = Color::BLACK;

// ── Surface ─────────────────────────────────────────────────────

/// Largest backing-store side, in device pixels.
pub const MAX_DEVICE_SIDE: u32 = 8192;

// ── Identity ────────────────────────────────────────────────────

/// First identity handed out by a fresh allocator.
pub const FIRST_SHAPE_ID: u32 = 1;
