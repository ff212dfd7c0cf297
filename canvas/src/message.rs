//! Messages crossing execution contexts.
//!
//! Inbound traffic is a closed [`Command`] enum; each variant carries a fixed
//! payload. Outbound traffic from the simulation is [`Outbound`], which
//! serializes as `{"type":"patches","patches":[...]}`.

#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;

use std::cell::Cell;

use serde::{Deserialize, Serialize};

use crate::element::OffscreenCanvas;
use crate::geom::{Point, Viewport};
use crate::patch::Patch;
use crate::pointer::PointerChannel;

/// Tag of a [`Command`], used as the registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Init,
    Terminate,
    Click,
    PointerDown,
    PointerUp,
}

impl CommandKind {
    /// Every tag, in declaration order.
    pub const ALL: [CommandKind; 5] = [Self::Init, Self::Terminate, Self::Click, Self::PointerDown, Self::PointerUp];

    /// Wire name of the tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Terminate => "terminate",
            Self::Click => "click",
            Self::PointerDown => "pointerdown",
            Self::PointerUp => "pointerup",
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drawing-surface part of an init command.
pub struct SurfaceInit {
    /// The transferred surface. Taken by the first handler that claims it.
    canvas: Cell<Option<OffscreenCanvas>>,
    /// Logical size and device pixel ratio.
    pub viewport: Viewport,
}

impl SurfaceInit {
    #[must_use]
    pub fn new(canvas: OffscreenCanvas, viewport: Viewport) -> Self {
        Self { canvas: Cell::new(Some(canvas)), viewport }
    }

    /// Claim the transferred surface. Later calls return `None`.
    pub fn take_canvas(&self) -> Option<OffscreenCanvas> {
        self.canvas.take()
    }
}

impl std::fmt::Debug for SurfaceInit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceInit").field("viewport", &self.viewport).finish_non_exhaustive()
    }
}

/// Payload of [`Command::Init`].
#[derive(Debug)]
pub struct InitParams {
    /// The shared pointer channel.
    pub pointer: PointerChannel,
    /// Present on the render path; absent for the simulation.
    pub surface: Option<SurfaceInit>,
}

impl InitParams {
    /// Init for a simulation context: pointer channel only.
    #[must_use]
    pub fn simulation(pointer: PointerChannel) -> Self {
        Self { pointer, surface: None }
    }

    /// Init for a render context: pointer channel plus the transferred surface.
    #[must_use]
    pub fn render(pointer: PointerChannel, canvas: OffscreenCanvas, viewport: Viewport) -> Self {
        Self { pointer, surface: Some(SurfaceInit::new(canvas, viewport)) }
    }
}

/// A discrete event delivered over the command channel.
#[derive(Debug)]
pub enum Command {
    Init(InitParams),
    Terminate,
    Click(Point),
    PointerDown(Point),
    PointerUp(Point),
}

impl Command {
    #[must_use]
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Init(_) => CommandKind::Init,
            Self::Terminate => CommandKind::Terminate,
            Self::Click(_) => CommandKind::Click,
            Self::PointerDown(_) => CommandKind::PointerDown,
            Self::PointerUp(_) => CommandKind::PointerUp,
        }
    }
}

/// Message from the simulation back to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Outbound {
    /// Ordered patch list for one frame. Never empty.
    Patches { patches: Vec<Patch> },
}

impl Outbound {
    /// Wrap a patch list, or `None` when there is nothing to send.
    #[must_use]
    pub fn patches(patches: Vec<Patch>) -> Option<Self> {
        if patches.is_empty() { None } else { Some(Self::Patches { patches }) }
    }
}
