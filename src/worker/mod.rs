//! Worker execution contexts.
//!
//! Each worker is a dedicated OS thread running a current-thread tokio
//! runtime. The body future is built on that thread, so it may hold `Rc`
//! state (the command registry, the engine) that never crosses threads.
//! Commands arrive over an unbounded channel; [`WorkerHandle`] is the sending
//! side plus the thread to join.

pub mod frames;
pub mod render;
pub mod simulation;

use std::future::Future;
use std::thread::JoinHandle;

use canvas::message::Command;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::error::AppError;

/// Sending side of a worker plus its thread.
#[derive(Debug)]
pub struct WorkerHandle {
    name: &'static str,
    commands: mpsc::UnboundedSender<Command>,
    thread: JoinHandle<()>,
}

impl WorkerHandle {
    /// Post a command. Ordering is preserved per sender.
    ///
    /// # Errors
    ///
    /// [`AppError::WorkerGone`] once the worker loop has exited.
    pub fn send(&self, cmd: Command) -> Result<(), AppError> {
        self.commands.send(cmd).map_err(|_| AppError::WorkerGone { worker: self.name })
    }

    /// Wait for the thread to finish. Blocks.
    ///
    /// # Errors
    ///
    /// [`AppError::WorkerPanicked`] if the body panicked.
    pub fn join(self) -> Result<(), AppError> {
        let name = self.name;
        drop(self.commands);
        self.thread.join().map_err(|_| {
            error!(worker = name, "worker panicked");
            AppError::WorkerPanicked { worker: name }
        })
    }
}

/// Start a worker thread running `body` to completion on its own runtime.
///
/// # Errors
///
/// [`AppError::Io`] if the thread cannot be spawned.
pub fn spawn<F, Fut>(name: &'static str, body: F) -> Result<WorkerHandle, AppError>
where
    F: FnOnce(mpsc::UnboundedReceiver<Command>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let thread = std::thread::Builder::new().name(name.to_owned()).spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread().enable_time().build() {
            Ok(rt) => rt,
            Err(e) => {
                error!(worker = name, error = %e, "worker runtime failed to start");
                return;
            }
        };
        debug!(worker = name, "worker started");
        runtime.block_on(body(rx));
        debug!(worker = name, "worker exited");
    })?;
    Ok(WorkerHandle { name, commands: tx, thread })
}
