//! Simulation worker.
//!
//! Owns the canonical state once `init` delivers the pointer channel. Discrete
//! events run against the simulator as they arrive and their patches are
//! buffered; every animation frame the tick's patches are appended and the
//! whole list goes out as one [`Outbound`] message, or nothing when empty.
//!
//! Events that arrive before `init` are dropped.

#[cfg(test)]
#[path = "simulation_test.rs"]
mod simulation_test;

use std::cell::RefCell;
use std::rc::Rc;

use canvas::commander::{self, Commander, Unsubscribe};
use canvas::geom::Point;
use canvas::message::{Command, Outbound};
use canvas::patch::Patch;
use canvas::sim::Simulator;
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use super::WorkerHandle;
use super::frames::AnimationFrames;
use crate::error::AppError;

pub const NAME: &str = "simulation";

#[derive(Default)]
struct SimCore {
    sim: Option<Simulator>,
    buffered: Vec<Patch>,
    stopping: bool,
}

impl SimCore {
    fn event(&mut self, kind: &'static str, pt: Point, run: impl FnOnce(&mut Simulator, Point) -> Vec<Patch>) {
        let Some(sim) = self.sim.as_mut() else {
            debug!(kind, "sim: event before init dropped");
            return;
        };
        self.buffered.extend(run(sim, pt));
    }

    /// Drain buffered patches plus this tick's into one message.
    fn frame(&mut self) -> Option<Outbound> {
        let sim = self.sim.as_mut()?;
        let mut patches = std::mem::take(&mut self.buffered);
        patches.extend(sim.tick());
        Outbound::patches(patches)
    }
}

fn register(commander: &Commander, core: &Rc<RefCell<SimCore>>) -> Vec<Unsubscribe> {
    let init = {
        let core = Rc::clone(core);
        commander.subscribe::<commander::Init, _>(move |params| {
            let mut core = core.borrow_mut();
            if core.sim.is_some() {
                debug!("sim: repeated init ignored");
                return;
            }
            core.sim = Some(Simulator::new(params.pointer.clone()));
            info!("sim: initialized");
        })
    };
    let terminate = {
        let core = Rc::clone(core);
        commander.subscribe::<commander::Terminate, _>(move |()| {
            core.borrow_mut().stopping = true;
        })
    };
    let down = {
        let core = Rc::clone(core);
        commander.subscribe::<commander::PointerDown, _>(move |pt| {
            core.borrow_mut().event("pointerdown", *pt, Simulator::pointer_down);
        })
    };
    let up = {
        let core = Rc::clone(core);
        commander.subscribe::<commander::PointerUp, _>(move |pt| {
            core.borrow_mut().event("pointerup", *pt, Simulator::pointer_up);
        })
    };
    let click = {
        let core = Rc::clone(core);
        commander.subscribe::<commander::Click, _>(move |pt| {
            core.borrow_mut().event("click", *pt, Simulator::click);
        })
    };
    vec![init, terminate, down, up, click]
}

/// Run the simulation loop until terminated or the command channel closes.
pub async fn run(mut commands: mpsc::UnboundedReceiver<Command>, outbound: mpsc::UnboundedSender<Outbound>, fps: u32) {
    let core = Rc::new(RefCell::new(SimCore::default()));
    let commander = Commander::new();
    let _subscriptions = register(&commander, &core);
    let mut frames = AnimationFrames::new(fps);

    loop {
        tokio::select! {
            biased;
            cmd = commands.recv() => {
                let Some(cmd) = cmd else { break };
                debug!(kind = %cmd.kind(), "sim: command");
                commander.dispatch(&cmd);
                if core.borrow().sim.is_some() && !frames.is_pending() {
                    frames.request();
                }
            }
            frame = frames.next(), if frames.is_pending() => {
                let msg = core.borrow_mut().frame();
                if let Some(msg) = msg {
                    let Outbound::Patches { patches } = &msg;
                    trace!(frame, count = patches.len(), "sim: patches out");
                    if outbound.send(msg).is_err() {
                        debug!("sim: renderer gone");
                        break;
                    }
                }
                frames.request();
            }
        }

        if core.borrow().stopping {
            frames.cancel();
            break;
        }
    }

    info!(frames = frames.count(), "sim: stopped");
}

/// Start the simulation worker. Returns its handle and the patch stream.
///
/// # Errors
///
/// [`AppError::Io`] if the thread cannot be spawned.
pub fn spawn(fps: u32) -> Result<(WorkerHandle, mpsc::UnboundedReceiver<Outbound>), AppError> {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = super::spawn(NAME, move |commands| run(commands, tx, fps))?;
    Ok((handle, rx))
}
