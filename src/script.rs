//! Host input: the steps a session replays against the canvas.
//!
//! Scripts are JSON lines. Each line is one step shaped like the message it
//! produces, plus `move` (pointer-channel write) and `wait` (let frames pass).
//! All coordinates are surface-local:
//!
//! ```text
//! {"type":"move","x":45,"y":45}
//! {"type":"wait","frames":3}
//! {"type":"pointerdown","x":45,"y":45}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use canvas::geom::{Point, Viewport};
use canvas::message::Command;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Frames to let pass after each generated gesture phase.
const SETTLE_FRAMES: u32 = 3;

/// Drag distance bounds for demo gestures, in logical pixels.
const DEMO_DRAG_MAX: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Step {
    /// Pointer moved.
    Move { x: f64, y: f64 },
    Click { x: f64, y: f64 },
    #[serde(rename = "pointerdown")]
    PointerDown { x: f64, y: f64 },
    #[serde(rename = "pointerup")]
    PointerUp { x: f64, y: f64 },
    /// Let this many render frames pass.
    Wait { frames: u32 },
}

impl Step {
    /// The discrete command this step sends, if any.
    #[must_use]
    pub fn command(&self) -> Option<Command> {
        match *self {
            Self::Click { x, y } => Some(Command::Click(Point::new(x, y))),
            Self::PointerDown { x, y } => Some(Command::PointerDown(Point::new(x, y))),
            Self::PointerUp { x, y } => Some(Command::PointerUp(Point::new(x, y))),
            Self::Move { .. } | Self::Wait { .. } => None,
        }
    }
}

/// Parse a JSON-lines script.
///
/// # Errors
///
/// [`AppError::Script`] naming the first line that does not parse.
pub fn parse(text: &str) -> Result<Vec<Step>, AppError> {
    let mut steps = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let step = serde_json::from_str(line).map_err(|source| AppError::Script { line: i + 1, source })?;
        steps.push(step);
    }
    Ok(steps)
}

/// Create a shape at (50, 50), hover it, drag it by (10, 10), release.
#[must_use]
pub fn scenario() -> Vec<Step> {
    vec![
        Step::PointerUp { x: 50.0, y: 50.0 },
        Step::Wait { frames: SETTLE_FRAMES },
        Step::Move { x: 45.0, y: 45.0 },
        Step::Wait { frames: SETTLE_FRAMES },
        Step::PointerDown { x: 45.0, y: 45.0 },
        Step::Wait { frames: SETTLE_FRAMES },
        Step::Move { x: 55.0, y: 55.0 },
        Step::Wait { frames: SETTLE_FRAMES },
        Step::PointerUp { x: 55.0, y: 55.0 },
        Step::Wait { frames: SETTLE_FRAMES },
    ]
}

/// A random session of `gestures` gestures inside `viewport`.
///
/// Roughly half the gestures create a shape with a bare pointerup; the rest
/// press on a previously created shape, move in a few steps, and release.
pub fn demo<R: Rng>(gestures: usize, viewport: Viewport, rng: &mut R) -> Vec<Step> {
    let mut steps = Vec::new();
    let mut created: Vec<(f64, f64)> = Vec::new();
    let (w, h) = (viewport.width.max(1.0), viewport.height.max(1.0));

    for _ in 0..gestures {
        if created.is_empty() || rng.random_bool(0.5) {
            let (x, y) = (rng.random_range(0.0..w).round(), rng.random_range(0.0..h).round());
            steps.push(Step::PointerUp { x, y });
            steps.push(Step::Wait { frames: SETTLE_FRAMES });
            created.push((x, y));
            continue;
        }

        let i = rng.random_range(0..created.len());
        let (x, y) = created[i];
        steps.push(Step::Move { x, y });
        steps.push(Step::Wait { frames: SETTLE_FRAMES });
        steps.push(Step::PointerDown { x, y });
        steps.push(Step::Wait { frames: SETTLE_FRAMES });

        let (tx, ty) = (
            (x + rng.random_range(-DEMO_DRAG_MAX..=DEMO_DRAG_MAX)).clamp(0.0, w).round(),
            (y + rng.random_range(-DEMO_DRAG_MAX..=DEMO_DRAG_MAX)).clamp(0.0, h).round(),
        );
        let moves: u32 = rng.random_range(1..=4);
        for k in 1..=moves {
            let t = f64::from(k) / f64::from(moves);
            steps.push(Step::Move { x: (x + (tx - x) * t).round(), y: (y + (ty - y) * t).round() });
            steps.push(Step::Wait { frames: 1 });
        }
        steps.push(Step::PointerUp { x: tx, y: ty });
        steps.push(Step::Wait { frames: SETTLE_FRAMES });
        created[i] = (tx, ty);
    }
    steps
}
