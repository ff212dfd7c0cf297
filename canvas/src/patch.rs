//! Patches: the closed set of structural edits shipped from simulator to renderer.
//!
//! Mutations never touch [`ProcessState`] directly. They go through a
//! [`Draft`], which applies each edit and records the matching [`Patch`] in
//! the same step. Writes that leave a value unchanged record nothing, so a
//! tick that changes nothing yields an empty list.
//!
//! Replaying a draft's patches, in order, onto a copy of the state the draft
//! started from reproduces the state the draft left behind.

#[cfg(test)]
#[path = "patch_test.rs"]
mod patch_test;

use serde::{Deserialize, Serialize};

use crate::doc::{Shape, ShapeId};
use crate::input::Interaction;
use crate::state::ProcessState;

/// Error returned by [`ProcessState::apply_patch`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatchError {
    /// The patch names a shape the state does not hold.
    #[error("unknown shape id: {0}")]
    UnknownShape(ShapeId),
    /// An insert collides with an existing shape, or an order append repeats an id.
    #[error("duplicate shape id: {0}")]
    DuplicateShape(ShapeId),
}

/// A shape field that changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeField {
    X,
    Y,
}

/// One structural edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Patch {
    /// Set one field of an existing shape.
    SetShapeField { id: ShapeId, field: ShapeField, value: f64 },
    /// Add a shape to the map. Its paint-order entry follows as [`Patch::AppendOrder`].
    InsertShape { shape: Shape },
    /// Put an already-inserted id on top of the paint order.
    AppendOrder { id: ShapeId },
    /// Replace the hovered id.
    SetHovered { id: Option<ShapeId> },
    /// Replace the interaction state.
    SetInteraction { interaction: Interaction },
}

impl ProcessState {
    /// Apply one patch.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::UnknownShape`] when the patch names a missing
    /// shape and [`PatchError::DuplicateShape`] when it would break identity
    /// uniqueness. The state is unchanged on error.
    pub fn apply_patch(&mut self, patch: &Patch) -> Result<(), PatchError> {
        match patch {
            Patch::SetShapeField { id, field, value } => {
                let shape = self.scene.get_mut(*id).ok_or(PatchError::UnknownShape(*id))?;
                match field {
                    ShapeField::X => shape.x = *value,
                    ShapeField::Y => shape.y = *value,
                }
            }
            Patch::InsertShape { shape } => {
                if !self.scene.insert_entry(shape.clone()) {
                    return Err(PatchError::DuplicateShape(shape.id));
                }
            }
            Patch::AppendOrder { id } => {
                if !self.scene.contains(*id) {
                    return Err(PatchError::UnknownShape(*id));
                }
                if !self.scene.append_order(*id) {
                    return Err(PatchError::DuplicateShape(*id));
                }
            }
            Patch::SetHovered { id } => self.hovered = *id,
            Patch::SetInteraction { interaction } => self.interaction = *interaction,
        }
        Ok(())
    }

    /// Apply patches in order, skipping any that fail. Returns the failures.
    pub fn apply_patches(&mut self, patches: &[Patch]) -> Vec<PatchError> {
        patches
            .iter()
            .filter_map(|patch| self.apply_patch(patch).err())
            .collect()
    }
}

/// Recording wrapper around a mutable [`ProcessState`].
pub struct Draft<'a> {
    state: &'a mut ProcessState,
    patches: Vec<Patch>,
}

impl<'a> Draft<'a> {
    #[must_use]
    pub fn new(state: &'a mut ProcessState) -> Self {
        Self { state, patches: Vec::new() }
    }

    /// Read access to the state as edited so far.
    #[must_use]
    pub fn state(&self) -> &ProcessState {
        self.state
    }

    /// Set the hovered id. Records only on change.
    pub fn set_hovered(&mut self, id: Option<ShapeId>) {
        if self.state.hovered != id {
            self.state.hovered = id;
            self.patches.push(Patch::SetHovered { id });
        }
    }

    /// Set the interaction state. Records only on change.
    pub fn set_interaction(&mut self, interaction: Interaction) {
        if self.state.interaction != interaction {
            self.state.interaction = interaction;
            self.patches.push(Patch::SetInteraction { interaction });
        }
    }

    /// Move a shape by `(dx, dy)`. One patch per axis that actually moved.
    ///
    /// Returns `false` without recording if the shape is missing.
    #[allow(clippy::float_cmp)]
    pub fn translate_shape(&mut self, id: ShapeId, dx: f64, dy: f64) -> bool {
        let Some(shape) = self.state.scene.get_mut(id) else {
            return false;
        };
        let (x, y) = (shape.x + dx, shape.y + dy);
        if x != shape.x {
            shape.x = x;
            self.patches.push(Patch::SetShapeField { id, field: ShapeField::X, value: x });
        }
        if y != shape.y {
            shape.y = y;
            self.patches.push(Patch::SetShapeField { id, field: ShapeField::Y, value: y });
        }
        true
    }

    /// Insert a shape on top of the paint order as a single atomic edit.
    ///
    /// Returns `false` without recording if the id is taken.
    pub fn insert_shape(&mut self, shape: Shape) -> bool {
        let id = shape.id;
        if !self.state.scene.insert(shape.clone()) {
            return false;
        }
        self.patches.push(Patch::InsertShape { shape });
        self.patches.push(Patch::AppendOrder { id });
        true
    }

    /// Whether anything has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Finish editing and take the recorded patches.
    #[must_use]
    pub fn finish(self) -> Vec<Patch> {
        self.patches
    }
}
