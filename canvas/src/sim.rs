//! Simulation: the canonical interaction state machine and its per-frame tick.
//!
//! The simulator owns the [`ProcessState`], the id allocator, and a reader
//! handle on the pointer channel. Every entry point (the tick and each discrete
//! pointer event) edits the state through a [`Draft`] and returns the patches
//! that describe the edit. Callers decide when to ship them.
//!
//! Tick behaviour by state:
//! - Idle: hovered id := topmost shape under the pointer, or none.
//! - Dragging: move the captured shape by `pointer - anchor`, then move the
//!   anchor to the pointer. Translation accumulates frame by frame, so a
//!   pointer that grabbed the shape off its origin never causes a jump.

#[cfg(test)]
#[path = "sim_test.rs"]
mod sim_test;

use tracing::{debug, trace, warn};

use crate::doc::{IdAllocator, Shape, ShapeId};
use crate::geom::Point;
use crate::hit;
use crate::input::Interaction;
use crate::patch::{Draft, Patch};
use crate::pointer::PointerChannel;
use crate::state::ProcessState;

/// The simulation component.
pub struct Simulator {
    state: ProcessState,
    ids: IdAllocator,
    pointer: PointerChannel,
}

impl Simulator {
    /// Start with an empty, idle state reading `pointer` every tick.
    #[must_use]
    pub fn new(pointer: PointerChannel) -> Self {
        Self { state: ProcessState::new(), ids: IdAllocator::new(), pointer }
    }

    /// The canonical state.
    #[must_use]
    pub fn state(&self) -> &ProcessState {
        &self.state
    }

    /// The shared pointer channel this simulator reads.
    #[must_use]
    pub fn pointer(&self) -> &PointerChannel {
        &self.pointer
    }

    /// Advance one animation frame.
    pub fn tick(&mut self) -> Vec<Patch> {
        let pointer = self.pointer.read();
        let mut draft = Draft::new(&mut self.state);

        let interaction = draft.state().interaction;
        match interaction {
            Interaction::Idle => {
                let hovered = hit::topmost_at(&draft.state().scene, pointer);
                draft.set_hovered(hovered);
            }
            Interaction::Dragging { id, anchor } => {
                let (dx, dy) = pointer.delta_from(anchor);
                if !draft.translate_shape(id, dx, dy) {
                    trace!(%id, "sim: dragged shape missing; translation skipped");
                }
                draft.set_interaction(Interaction::Dragging { id, anchor: pointer });
            }
        }

        let patches = draft.finish();
        if !patches.is_empty() {
            trace!(count = patches.len(), "sim: tick produced patches");
        }
        patches
    }

    /// Pointer pressed at `pt`.
    ///
    /// Captures the hovered shape when idle; otherwise does nothing. A second
    /// press while dragging is ignored.
    pub fn pointer_down(&mut self, pt: Point) -> Vec<Patch> {
        if !self.state.interaction.is_idle() {
            return Vec::new();
        }
        let Some(id) = self.state.hovered else {
            return Vec::new();
        };
        if !self.state.scene.contains(id) {
            debug!(%id, "sim: hovered shape missing; pointerdown ignored");
            return Vec::new();
        }

        let mut draft = Draft::new(&mut self.state);
        draft.set_interaction(Interaction::Dragging { id, anchor: pt });
        debug!(%id, x = pt.x, y = pt.y, "sim: drag started");
        draft.finish()
    }

    /// Pointer released at `pt`.
    ///
    /// Ends a drag, or, when idle, creates a rectangle centered on `pt`.
    pub fn pointer_up(&mut self, pt: Point) -> Vec<Patch> {
        let mut draft = Draft::new(&mut self.state);

        let interaction = draft.state().interaction;
        match interaction {
            Interaction::Dragging { id, .. } => {
                draft.set_interaction(Interaction::Idle);
                debug!(%id, "sim: drag ended");
            }
            Interaction::Idle => {
                let Some(id) = self.ids.next_id() else {
                    warn!("sim: shape id space exhausted; pointerup ignored");
                    return draft.finish();
                };
                if draft.insert_shape(Shape::rect_centered(id, pt)) {
                    debug!(%id, x = pt.x, y = pt.y, "sim: shape created");
                }
            }
        }

        draft.finish()
    }

    /// Click at `pt`. Reserved; changes nothing.
    #[allow(clippy::unused_self)]
    pub fn click(&mut self, _pt: Point) -> Vec<Patch> {
        Vec::new()
    }

    /// Id of the captured shape, if dragging.
    #[must_use]
    pub fn dragging(&self) -> Option<ShapeId> {
        self.state.interaction.dragged_id()
    }
}
