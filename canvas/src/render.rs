//! Rendering: mirrors the simulation state and redraws it every frame.
//!
//! The [`Renderer`] owns a mirror [`ProcessState`] that it only changes by
//! replaying patches, plus the surface it draws into. It never decides
//! anything about interaction; it draws what the mirror says.
//!
//! Layers, bottom to top:
//! 1. every shape in paint order, filled then stroked;
//! 2. the hover outline, right after the hovered shape;
//! 3. the crosshair at the pointer channel position.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use thiserror::Error;
use tracing::{info, warn};

use crate::consts::{CROSSHAIR_ARM, CROSSHAIR_COLOR, HOVER_OUTLINE_COLOR, HOVER_OUTLINE_MARGIN, STROKE_WIDTH};
use crate::doc::{Shape, ShapeKind};
use crate::element::SurfaceError;
use crate::geom::{Point, Viewport};
use crate::patch::{Patch, PatchError};
use crate::pointer::PointerChannel;
use crate::state::ProcessState;
use crate::surface::Surface;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("renderer already initialized")]
    AlreadyInitialized,
    #[error("renderer not initialized")]
    NotInitialized,
    #[error("invalid viewport {width}x{height} @ {pixel_ratio}")]
    InvalidViewport { width: f64, height: f64, pixel_ratio: f64 },
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

struct Target<S> {
    surface: S,
    viewport: Viewport,
    pointer: PointerChannel,
}

/// Mirror state plus the surface it is drawn to.
pub struct Renderer<S> {
    mirror: ProcessState,
    target: Option<Target<S>>,
}

impl<S: Surface> Default for Renderer<S> {
    fn default() -> Self {
        Self { mirror: ProcessState::new(), target: None }
    }
}

impl<S: Surface> Renderer<S> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the surface: size it to `viewport` in device pixels and scale it
    /// by the pixel ratio.
    ///
    /// # Errors
    ///
    /// [`RenderError::AlreadyInitialized`] on a second call, which would
    /// otherwise compound the scale. [`RenderError::InvalidViewport`] for a
    /// non-positive size or ratio, or a backing store larger than
    /// [`crate::consts::MAX_DEVICE_SIDE`] on either side. Nothing is
    /// allocated in that case.
    pub fn init(&mut self, mut surface: S, viewport: Viewport, pointer: PointerChannel) -> Result<(), RenderError> {
        if self.target.is_some() {
            return Err(RenderError::AlreadyInitialized);
        }
        if !viewport.is_valid() {
            return Err(RenderError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
                pixel_ratio: viewport.pixel_ratio,
            });
        }

        let (w, h) = viewport.device_size();
        surface.resize(w, h);
        surface.scale(viewport.pixel_ratio, viewport.pixel_ratio);
        info!(width = w, height = h, pixel_ratio = viewport.pixel_ratio, "render: surface initialized");

        self.target = Some(Target { surface, viewport, pointer });
        Ok(())
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.target.is_some()
    }

    /// Replay `patches` onto the mirror in order.
    ///
    /// Patches that reference missing shapes are logged and skipped.
    pub fn apply(&mut self, patches: &[Patch]) -> Vec<PatchError> {
        let errors = self.mirror.apply_patches(patches);
        for e in &errors {
            warn!(error = %e, "render: patch rejected");
        }
        errors
    }

    /// Redraw the whole scene and present it.
    ///
    /// # Errors
    ///
    /// [`RenderError::NotInitialized`] before [`Renderer::init`]; surface
    /// errors from presenting.
    pub fn draw_frame(&mut self) -> Result<(), RenderError> {
        let target = self.target.as_mut().ok_or(RenderError::NotInitialized)?;
        let pointer = target.pointer.read();
        draw(&mut target.surface, &self.mirror, pointer);
        target.surface.present()?;
        Ok(())
    }

    /// The mirror state.
    #[must_use]
    pub fn mirror(&self) -> &ProcessState {
        &self.mirror
    }

    #[must_use]
    pub fn surface(&self) -> Option<&S> {
        self.target.as_ref().map(|t| &t.surface)
    }

    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.target.as_ref().map(|t| t.viewport)
    }

    /// The pointer channel bound at init.
    #[must_use]
    pub fn pointer(&self) -> Option<&PointerChannel> {
        self.target.as_ref().map(|t| &t.pointer)
    }
}

/// Draw `state` with the crosshair at `pointer`. Does not present.
pub fn draw<S: Surface>(surface: &mut S, state: &ProcessState, pointer: Point) {
    surface.clear();

    for shape in state.scene.painted() {
        draw_shape(surface, shape);
        if state.hovered == Some(shape.id) {
            draw_hover(surface, shape);
        }
    }

    draw_crosshair(surface, pointer);
}

// =============================================================
// Layers
// =============================================================

fn draw_shape<S: Surface>(surface: &mut S, shape: &Shape) {
    match shape.kind {
        ShapeKind::Rect => {
            let bounds = shape.bounds();
            surface.fill_rect(bounds, shape.fill);
            surface.stroke_rect(bounds, shape.stroke, STROKE_WIDTH);
        }
    }
}

fn draw_hover<S: Surface>(surface: &mut S, shape: &Shape) {
    let outline = shape.bounds().inflate(HOVER_OUTLINE_MARGIN);
    surface.stroke_rect(outline, HOVER_OUTLINE_COLOR, STROKE_WIDTH);
}

fn draw_crosshair<S: Surface>(surface: &mut S, at: Point) {
    let Point { x, y } = at;
    surface.stroke_line(Point::new(x - CROSSHAIR_ARM, y), Point::new(x + CROSSHAIR_ARM, y), CROSSHAIR_COLOR, STROKE_WIDTH);
    surface.stroke_line(Point::new(x, y - CROSSHAIR_ARM), Point::new(x, y + CROSSHAIR_ARM), CROSSHAIR_COLOR, STROKE_WIDTH);
}
