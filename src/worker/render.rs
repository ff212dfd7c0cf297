//! Render worker.
//!
//! On `init` it binds the transferred canvas to an [`Engine`]. In split mode
//! it also starts the simulation worker, hands it the pointer channel, and
//! forwards every later discrete event to it; patch lists coming back are
//! replayed onto the mirror as they arrive. In fused mode events go to the
//! engine's local simulator.
//!
//! Every animation frame redraws the whole scene and publishes a
//! [`FrameReport`] on a watch channel.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::cell::RefCell;
use std::rc::Rc;

use canvas::commander::{self, Commander, Unsubscribe};
use canvas::element::OffscreenCanvas;
use canvas::engine::{Engine, Mode};
use canvas::message::{Command, InitParams, Outbound};
use canvas::state::ProcessState;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, trace, warn};

use super::frames::AnimationFrames;
use super::{WorkerHandle, simulation};
use crate::error::AppError;

pub const NAME: &str = "render";

/// Snapshot published after every drawn frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Frames drawn so far.
    pub frames: u64,
    pub mode: Mode,
    /// The mirror as drawn in that frame.
    pub state: ProcessState,
}

#[derive(Debug, Clone, Copy)]
pub struct RenderSettings {
    pub mode: Mode,
    pub fps: u32,
}

struct Remote {
    handle: WorkerHandle,
    patches: Option<mpsc::UnboundedReceiver<Outbound>>,
}

struct RenderCore {
    settings: RenderSettings,
    engine: Engine<OffscreenCanvas>,
    remote: Option<Remote>,
    stopping: bool,
}

impl RenderCore {
    fn new(settings: RenderSettings) -> Self {
        Self { settings, engine: Engine::new(settings.mode), remote: None, stopping: false }
    }

    fn init(&mut self, params: &InitParams) {
        let Some(surface) = params.surface.as_ref() else {
            warn!("render: init without a surface ignored");
            return;
        };
        let Some(canvas) = surface.take_canvas() else {
            warn!("render: init surface already claimed");
            return;
        };
        if let Err(e) = self.engine.init(canvas, surface.viewport, params.pointer.clone()) {
            warn!(error = %e, "render: init rejected");
            return;
        }
        info!(mode = %self.settings.mode, "render: initialized");

        if self.settings.mode == Mode::Split {
            match simulation::spawn(self.settings.fps) {
                Ok((handle, patches)) => {
                    if let Err(e) = handle.send(Command::Init(InitParams::simulation(params.pointer.clone()))) {
                        warn!(error = %e, "render: simulation init failed");
                    }
                    self.remote = Some(Remote { handle, patches: Some(patches) });
                }
                Err(e) => warn!(error = %e, "render: simulation worker failed to start"),
            }
        }
    }

    fn event(&mut self, cmd: Command) {
        if !self.engine.is_initialized() {
            debug!(kind = %cmd.kind(), "render: event before init dropped");
            return;
        }
        let handled = match &cmd {
            Command::PointerDown(pt) => self.engine.pointer_down(*pt),
            Command::PointerUp(pt) => self.engine.pointer_up(*pt),
            Command::Click(pt) => self.engine.click(*pt),
            Command::Init(_) | Command::Terminate => false,
        };
        if handled {
            return;
        }
        if let Some(remote) = &self.remote {
            if let Err(e) = remote.handle.send(cmd) {
                warn!(error = %e, "render: forward to simulation failed");
            }
        }
    }

    fn terminate(&mut self) {
        self.stopping = true;
        if let Some(remote) = &self.remote {
            if let Err(e) = remote.handle.send(Command::Terminate) {
                debug!(error = %e, "render: simulation already gone");
            }
        }
    }
}

fn register(commander: &Commander, core: &Rc<RefCell<RenderCore>>) -> Vec<Unsubscribe> {
    let init = {
        let core = Rc::clone(core);
        commander.subscribe::<commander::Init, _>(move |params| core.borrow_mut().init(params))
    };
    let terminate = {
        let core = Rc::clone(core);
        commander.subscribe::<commander::Terminate, _>(move |()| core.borrow_mut().terminate())
    };
    let down = {
        let core = Rc::clone(core);
        commander.subscribe::<commander::PointerDown, _>(move |pt| core.borrow_mut().event(Command::PointerDown(*pt)))
    };
    let up = {
        let core = Rc::clone(core);
        commander.subscribe::<commander::PointerUp, _>(move |pt| core.borrow_mut().event(Command::PointerUp(*pt)))
    };
    let click = {
        let core = Rc::clone(core);
        commander.subscribe::<commander::Click, _>(move |pt| core.borrow_mut().event(Command::Click(*pt)))
    };
    vec![init, terminate, down, up, click]
}

async fn next_patches(stream: &mut Option<mpsc::UnboundedReceiver<Outbound>>) -> Option<Outbound> {
    match stream {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Run the render loop until terminated or the command channel closes.
pub async fn run(mut commands: mpsc::UnboundedReceiver<Command>, settings: RenderSettings, reports: watch::Sender<FrameReport>) {
    let core = Rc::new(RefCell::new(RenderCore::new(settings)));
    let commander = Commander::new();
    let _subscriptions = register(&commander, &core);
    let mut frames = AnimationFrames::new(settings.fps);
    let mut patches: Option<mpsc::UnboundedReceiver<Outbound>> = None;

    loop {
        tokio::select! {
            biased;
            cmd = commands.recv() => {
                let Some(cmd) = cmd else { break };
                debug!(kind = %cmd.kind(), "render: command");
                commander.dispatch(&cmd);

                let mut core = core.borrow_mut();
                if patches.is_none() {
                    patches = core.remote.as_mut().and_then(|r| r.patches.take());
                }
                if core.engine.is_initialized() && !frames.is_pending() {
                    frames.request();
                }
            }
            msg = next_patches(&mut patches) => {
                match msg {
                    Some(Outbound::Patches { patches: list }) => {
                        core.borrow_mut().engine.receive(&list);
                    }
                    None => {
                        debug!("render: simulation stream closed");
                        patches = None;
                    }
                }
            }
            frame = frames.next(), if frames.is_pending() => {
                let mut core = core.borrow_mut();
                match core.engine.frame() {
                    Ok(outcome) => {
                        trace!(frame, applied = outcome.applied, "render: frame");
                        reports.send_replace(FrameReport {
                            frames: frame,
                            mode: settings.mode,
                            state: core.engine.mirror().clone(),
                        });
                    }
                    Err(e) => warn!(error = %e, "render: frame failed"),
                }
                frames.request();
            }
        }

        if core.borrow().stopping {
            frames.cancel();
            break;
        }
    }

    shutdown(&core);
    info!(frames = frames.count(), "render: stopped");
}

fn shutdown(core: &Rc<RefCell<RenderCore>>) {
    let remote = {
        let mut core = core.borrow_mut();
        if !core.stopping {
            core.terminate();
        }
        core.remote.take()
    };
    if let Some(remote) = remote {
        if let Err(e) = remote.handle.join() {
            warn!(error = %e, "render: simulation did not stop cleanly");
        }
    }
}

/// Start the render worker.
///
/// # Errors
///
/// [`AppError::Io`] if the thread cannot be spawned.
pub fn spawn(settings: RenderSettings, reports: watch::Sender<FrameReport>) -> Result<WorkerHandle, AppError> {
    super::spawn(NAME, move |commands| run(commands, settings, reports))
}
