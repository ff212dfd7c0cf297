//! Input model: the interaction state machine.
//!
//! `Interaction` is the gesture currently tracked between pointer-down and
//! pointer-up. Dragging carries the anchor used to compute the next
//! frame-to-frame translation; the anchor moves with the pointer every tick.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::doc::ShapeId;
use crate::geom::Point;

/// Interaction state of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Interaction {
    /// No shape captured.
    #[default]
    Idle,
    /// A shape is captured and follows the pointer.
    Dragging {
        /// Id of the captured shape.
        id: ShapeId,
        /// Pointer position at the previous tick (or at capture).
        anchor: Point,
    },
}

impl Interaction {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Id of the captured shape, if dragging.
    #[must_use]
    pub fn dragged_id(&self) -> Option<ShapeId> {
        match self {
            Self::Idle => None,
            Self::Dragging { id, .. } => Some(*id),
        }
    }
}
