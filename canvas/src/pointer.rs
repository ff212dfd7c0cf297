//! Pointer channel: the latest pointer position in shared memory.
//!
//! Two `u16` cells (x then y) shared by every clone of a [`PointerChannel`].
//! The interactive surface writes on every move with no throttling; the
//! simulation and the crosshair overlay read once per frame. Each cell is an
//! independent relaxed atomic, so a reader can see x from one write and y from
//! a later one. Positional lag of a frame is the accepted cost of keeping the
//! channel lock-free.

#[cfg(test)]
#[path = "pointer_test.rs"]
mod pointer_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};

use crate::geom::Point;

/// Shared two-cell pointer coordinate buffer.
#[derive(Debug, Clone, Default)]
pub struct PointerChannel {
    cells: Arc<[AtomicU16; 2]>,
}

impl PointerChannel {
    /// Create a channel holding `(0, 0)`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw surface-local coordinates.
    pub fn write(&self, x: u16, y: u16) {
        self.cells[0].store(x, Ordering::Relaxed);
        self.cells[1].store(y, Ordering::Relaxed);
    }

    /// Store a client-space position, translated by the surface origin.
    ///
    /// Coordinates left of or above the surface clamp to zero.
    pub fn write_client(&self, client: Point, surface_origin: Point) {
        self.write(to_local(client.x - surface_origin.x), to_local(client.y - surface_origin.y));
    }

    /// Load the raw pair. The two loads are independent.
    #[must_use]
    pub fn read_raw(&self) -> (u16, u16) {
        (self.cells[0].load(Ordering::Relaxed), self.cells[1].load(Ordering::Relaxed))
    }

    /// Load the pair as a logical point.
    #[must_use]
    pub fn read(&self) -> Point {
        let (x, y) = self.read_raw();
        Point::new(f64::from(x), f64::from(y))
    }

    /// Whether two handles refer to the same shared cells.
    #[must_use]
    pub fn same_channel(&self, other: &PointerChannel) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_local(v: f64) -> u16 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, f64::from(u16::MAX)) as u16
}
