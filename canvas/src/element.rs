//! Host canvas elements and the offscreen surfaces transferred from them.
//!
//! A [`CanvasElement`] belongs to the host. It can hand drawing control to an
//! [`OffscreenCanvas`] exactly once; the offscreen canvas may then move to
//! another thread, draw into its own raster, and publish each finished frame
//! back to the element on [`Surface::present`].

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use thiserror::Error;
use tracing::warn;

use crate::color::Color;
use crate::geom::{Point, Rect};
use crate::surface::{PixelSurface, Surface};

/// Host-assigned element identity.
pub type ElementId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("canvas element {0} already transferred control offscreen")]
    AlreadyTransferred(ElementId),
    #[error("canvas element {0} is gone; frame dropped")]
    Detached(ElementId),
}

/// A host-side canvas element.
#[derive(Debug)]
pub struct CanvasElement {
    id: ElementId,
    transferred: bool,
    frame: Arc<Mutex<PixelSurface>>,
}

impl CanvasElement {
    #[must_use]
    pub fn new(id: ElementId) -> Self {
        Self { id, transferred: false, frame: Arc::new(Mutex::new(PixelSurface::new(0, 0))) }
    }

    #[must_use]
    pub fn id(&self) -> ElementId {
        self.id
    }

    #[must_use]
    pub fn is_transferred(&self) -> bool {
        self.transferred
    }

    /// Hand drawing control to a new offscreen canvas.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::AlreadyTransferred`] on every call after the first.
    pub fn transfer_control_to_offscreen(&mut self) -> Result<OffscreenCanvas, SurfaceError> {
        if self.transferred {
            return Err(SurfaceError::AlreadyTransferred(self.id));
        }
        self.transferred = true;
        Ok(OffscreenCanvas {
            element: self.id,
            raster: PixelSurface::new(0, 0),
            sink: Arc::downgrade(&self.frame),
        })
    }

    /// Copy of the most recently presented frame.
    #[must_use]
    pub fn frame(&self) -> PixelSurface {
        self.frame.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// Drawing surface detached from its host element.
#[derive(Debug)]
pub struct OffscreenCanvas {
    element: ElementId,
    raster: PixelSurface,
    sink: Weak<Mutex<PixelSurface>>,
}

impl OffscreenCanvas {
    /// Id of the element this canvas was transferred from.
    #[must_use]
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// The working raster, including any unpresented drawing.
    #[must_use]
    pub fn raster(&self) -> &PixelSurface {
        &self.raster
    }
}

impl Surface for OffscreenCanvas {
    fn resize(&mut self, width: u32, height: u32) {
        self.raster.resize(width, height);
    }

    fn size(&self) -> (u32, u32) {
        self.raster.size()
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.raster.scale(x, y);
    }

    fn clear(&mut self) {
        self.raster.clear();
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.raster.fill_rect(rect, color);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64) {
        self.raster.stroke_rect(rect, color, line_width);
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, line_width: f64) {
        self.raster.stroke_line(from, to, color, line_width);
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        let sink = self.sink.upgrade().ok_or(SurfaceError::Detached(self.element))?;
        let mut frame = sink.lock().unwrap_or_else(PoisonError::into_inner);
        frame.clone_from(&self.raster);
        Ok(())
    }
}

/// Host-side record of elements whose control has been transferred.
///
/// Repeat requests for the same element are logged and ignored instead of
/// reaching the element.
#[derive(Debug, Default)]
pub struct HandoffGuard {
    transferred: HashSet<ElementId>,
}

impl HandoffGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Transfer `element` unless it was transferred before.
    pub fn claim(&mut self, element: &mut CanvasElement) -> Option<OffscreenCanvas> {
        if !self.transferred.insert(element.id()) {
            warn!(element = element.id(), "handoff: repeat transfer ignored");
            return None;
        }
        match element.transfer_control_to_offscreen() {
            Ok(canvas) => Some(canvas),
            Err(e) => {
                warn!(error = %e, "handoff: transfer failed");
                None
            }
        }
    }

    #[must_use]
    pub fn is_claimed(&self, id: ElementId) -> bool {
        self.transferred.contains(&id)
    }
}
