//! Document model: shapes, the scene that owns them, and identity allocation.
//!
//! `Scene` pairs a lookup map with an explicit paint order. Paint order is
//! back-to-front: the last id is drawn last and wins hit-tests. Every id in the
//! order has an entry in the map; `Scene::insert` adds both halves in one call
//! so the converse never holds outside patch replay.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::consts::{DEFAULT_FILL, DEFAULT_STROKE, FIRST_SHAPE_ID, NEW_SHAPE_SIZE};
use crate::geom::{Point, Rect};

/// Unique identifier for a shape. Positive and never reused.
pub type ShapeId = u32;

/// The kind of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned rectangle.
    Rect,
}

/// A shape as stored in the scene and carried by insert patches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    /// Left edge in logical pixels.
    pub x: f64,
    /// Top edge in logical pixels.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub stroke: Color,
    pub fill: Color,
}

impl Shape {
    /// A default-styled rectangle of the standard creation size centered on `center`.
    #[must_use]
    pub fn rect_centered(id: ShapeId, center: Point) -> Self {
        let bounds = Rect::centered(center, NEW_SHAPE_SIZE, NEW_SHAPE_SIZE);
        Self {
            id,
            kind: ShapeKind::Rect,
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            stroke: DEFAULT_STROKE,
            fill: DEFAULT_FILL,
        }
    }

    /// Axis-aligned bounds.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Shapes keyed by identity plus their paint order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    shapes: HashMap<ShapeId, Shape>,
    order: Vec<ShapeId>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a shape and append it to the top of the paint order.
    ///
    /// Returns `false` and leaves the scene untouched if the id is taken.
    pub fn insert(&mut self, shape: Shape) -> bool {
        if self.shapes.contains_key(&shape.id) {
            return false;
        }
        self.order.push(shape.id);
        self.shapes.insert(shape.id, shape);
        true
    }

    /// Add a shape to the map only. Paint order is untouched.
    ///
    /// Used by patch replay, where the order append arrives as its own patch.
    pub(crate) fn insert_entry(&mut self, shape: Shape) -> bool {
        if self.shapes.contains_key(&shape.id) {
            return false;
        }
        self.shapes.insert(shape.id, shape);
        true
    }

    /// Append an existing id to the paint order.
    ///
    /// Returns `false` if the id has no entry or is already ordered.
    pub(crate) fn append_order(&mut self, id: ShapeId) -> bool {
        if !self.shapes.contains_key(&id) || self.order.contains(&id) {
            return false;
        }
        self.order.push(id);
        true
    }

    #[must_use]
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    #[must_use]
    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Paint order, back to front.
    #[must_use]
    pub fn order(&self) -> &[ShapeId] {
        &self.order
    }

    /// Shapes in paint order, back to front. Dangling ids are skipped.
    pub fn painted(&self) -> impl DoubleEndedIterator<Item = &Shape> {
        self.order.iter().filter_map(|id| self.shapes.get(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Monotonic shape identity counter.
///
/// Ids start at [`FIRST_SHAPE_ID`] and are never handed out twice by the same
/// allocator, whether or not the shape still exists. Once the id space is
/// spent the allocator yields `None` forever.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: Option<ShapeId>,
}

impl IdAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self { next: Some(FIRST_SHAPE_ID) }
    }

    /// Issue the next identity.
    pub fn next_id(&mut self) -> Option<ShapeId> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(id)
    }

    /// The identity the next call to [`IdAllocator::next_id`] will return.
    #[must_use]
    pub fn peek(&self) -> Option<ShapeId> {
        self.next
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
