//! The render-side engine: one interface over both deployment variants.
//!
//! - [`Mode::Split`]: the simulation runs elsewhere. The engine replays the
//!   patch lists it is handed and draws; discrete pointer events are the
//!   caller's to forward.
//! - [`Mode::Fused`]: the engine owns a [`Simulator`]. Discrete events run
//!   against it immediately and their patches are buffered; each frame ticks
//!   the simulator, applies the buffered and tick patches together, then draws.
//!
//! Both variants keep the renderer's mirror as the only state that is drawn,
//! so a fused engine exercises the same patch path as a split one.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::geom::{Point, Viewport};
use crate::patch::{Patch, PatchError};
use crate::pointer::PointerChannel;
use crate::render::{RenderError, Renderer};
use crate::sim::Simulator;
use crate::state::ProcessState;
use crate::surface::Surface;

/// Where the simulation runs relative to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Simulation in its own context, connected by messages.
    #[default]
    Split,
    /// Simulation in the render context.
    Fused,
}

impl Mode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Split => "split",
            Self::Fused => "fused",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one [`Engine::frame`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    /// Patches applied to the mirror this frame (fused only).
    pub applied: usize,
    /// Patches the mirror rejected.
    pub rejected: Vec<PatchError>,
}

/// Render-side engine.
pub struct Engine<S> {
    mode: Mode,
    renderer: Renderer<S>,
    sim: Option<Simulator>,
    pending: Vec<Patch>,
}

impl<S: Surface> Engine<S> {
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self { mode, renderer: Renderer::new(), sim: None, pending: Vec::new() }
    }

    /// An engine fed by a remote simulator.
    #[must_use]
    pub fn split() -> Self {
        Self::new(Mode::Split)
    }

    /// An engine that simulates locally.
    #[must_use]
    pub fn fused() -> Self {
        Self::new(Mode::Fused)
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Bind the surface and pointer channel. In fused mode this also starts
    /// the local simulator on the same channel.
    ///
    /// # Errors
    ///
    /// Propagates [`RenderError`] from the renderer; a second init fails with
    /// [`RenderError::AlreadyInitialized`] and leaves the engine as it was.
    pub fn init(&mut self, surface: S, viewport: Viewport, pointer: PointerChannel) -> Result<(), RenderError> {
        self.renderer.init(surface, viewport, pointer.clone())?;
        if self.mode == Mode::Fused {
            self.sim = Some(Simulator::new(pointer));
        }
        debug!(mode = %self.mode, "engine: initialized");
        Ok(())
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.renderer.is_initialized()
    }

    /// Replay a patch list from a remote simulator.
    ///
    /// A fused engine has no remote simulator; foreign patches would fork its
    /// mirror from the local simulation, so they are dropped.
    pub fn receive(&mut self, patches: &[Patch]) -> Vec<PatchError> {
        if self.mode == Mode::Fused {
            warn!(count = patches.len(), "engine: fused mode ignores remote patches");
            return Vec::new();
        }
        trace!(count = patches.len(), "engine: patches received");
        self.renderer.apply(patches)
    }

    /// Pointer pressed. Returns `true` when handled locally (fused mode).
    pub fn pointer_down(&mut self, pt: Point) -> bool {
        self.local(|sim| sim.pointer_down(pt))
    }

    /// Pointer released. Returns `true` when handled locally (fused mode).
    pub fn pointer_up(&mut self, pt: Point) -> bool {
        self.local(|sim| sim.pointer_up(pt))
    }

    /// Click. Returns `true` when handled locally (fused mode).
    pub fn click(&mut self, pt: Point) -> bool {
        self.local(|sim| sim.click(pt))
    }

    fn local(&mut self, event: impl FnOnce(&mut Simulator) -> Vec<Patch>) -> bool {
        let Some(sim) = self.sim.as_mut() else {
            return false;
        };
        self.pending.extend(event(sim));
        true
    }

    /// Advance one animation frame: tick (fused), then redraw.
    ///
    /// # Errors
    ///
    /// [`RenderError::NotInitialized`] before [`Engine::init`], or a surface
    /// error from presenting.
    pub fn frame(&mut self) -> Result<FrameOutcome, RenderError> {
        if !self.renderer.is_initialized() {
            return Err(RenderError::NotInitialized);
        }

        let mut outcome = FrameOutcome::default();
        if let Some(sim) = self.sim.as_mut() {
            let mut patches = std::mem::take(&mut self.pending);
            patches.extend(sim.tick());
            if !patches.is_empty() {
                outcome.applied = patches.len();
                outcome.rejected = self.renderer.apply(&patches);
            }
        }

        self.renderer.draw_frame()?;
        Ok(outcome)
    }

    /// The state being drawn.
    #[must_use]
    pub fn mirror(&self) -> &ProcessState {
        self.renderer.mirror()
    }

    /// The local simulator, in fused mode after init.
    #[must_use]
    pub fn simulator(&self) -> Option<&Simulator> {
        self.sim.as_ref()
    }

    #[must_use]
    pub fn renderer(&self) -> &Renderer<S> {
        &self.renderer
    }
}
