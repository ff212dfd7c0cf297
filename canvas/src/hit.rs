#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::doc::{Scene, ShapeId, ShapeKind};
use crate::geom::Point;

/// The topmost shape whose bounds contain `pt`, scanning paint order front to back.
///
/// Containment is inclusive on all four edges. Ids missing from the scene map
/// are skipped.
#[must_use]
pub fn topmost_at(scene: &Scene, pt: Point) -> Option<ShapeId> {
    scene
        .painted()
        .rev()
        .find(|shape| match shape.kind {
            ShapeKind::Rect => shape.bounds().contains(pt),
        })
        .map(|shape| shape.id)
}
