//! The process state shared (by value) between simulation and renderer.

use serde::{Deserialize, Serialize};

use crate::doc::{Scene, ShapeId};
use crate::input::Interaction;

/// Everything the simulation owns and the renderer mirrors.
///
/// Created empty and idle. The simulator holds the canonical copy; a renderer
/// rebuilds its own copy by replaying patches (see [`crate::patch`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessState {
    pub scene: Scene,
    pub interaction: Interaction,
    /// Shape under the pointer. Derived every idle tick; pinned while dragging.
    pub hovered: Option<ShapeId>,
}

impl ProcessState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
