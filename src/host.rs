//! The host side: owns the canvas element and the pointer channel, starts the
//! render worker, and feeds it input.
//!
//! Pointer moves never become messages; they are written straight into the
//! shared pointer channel, translated from client to surface-local
//! coordinates. Presses, releases and clicks are posted to the render worker.

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use std::time::Duration;

use canvas::element::{CanvasElement, ElementId, HandoffGuard};
use canvas::geom::{Point, Viewport};
use canvas::message::{Command, InitParams};
use canvas::pointer::PointerChannel;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::script::Step;
use crate::worker::WorkerHandle;
use crate::worker::render::{self, FrameReport, RenderSettings};

/// Identity of the single canvas element the host creates.
const CANVAS_ELEMENT: ElementId = 1;

struct Attached {
    worker: WorkerHandle,
    reports: watch::Receiver<FrameReport>,
}

pub struct Host {
    element: CanvasElement,
    guard: HandoffGuard,
    pointer: PointerChannel,
    viewport: Viewport,
    /// Client-space position of the surface's top-left corner.
    origin: Point,
    frame_period: Duration,
    attached: Option<Attached>,
}

impl Host {
    #[must_use]
    pub fn new(viewport: Viewport, frame_period: Duration) -> Self {
        Self {
            element: CanvasElement::new(CANVAS_ELEMENT),
            guard: HandoffGuard::new(),
            pointer: PointerChannel::new(),
            viewport,
            origin: Point::default(),
            frame_period,
            attached: None,
        }
    }

    /// Place the surface at `origin` in client space.
    #[must_use]
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Transfer the canvas to a new render worker and initialize it.
    ///
    /// Returns `false` when the element was already handed off; the repeat
    /// is ignored and no second worker starts.
    ///
    /// # Errors
    ///
    /// Worker spawn failures, or the worker exiting before init is posted.
    pub fn attach(&mut self, settings: RenderSettings) -> Result<bool, AppError> {
        let Some(canvas) = self.guard.claim(&mut self.element) else {
            return Ok(false);
        };

        let (tx, rx) = watch::channel(FrameReport { mode: settings.mode, ..FrameReport::default() });
        let worker = render::spawn(settings, tx)?;
        worker.send(Command::Init(InitParams::render(self.pointer.clone(), canvas, self.viewport)))?;
        info!(mode = %settings.mode, fps = settings.fps, "host: canvas attached");

        self.attached = Some(Attached { worker, reports: rx });
        Ok(true)
    }

    fn attached(&self) -> Result<&Attached, AppError> {
        self.attached.as_ref().ok_or(AppError::NotAttached)
    }

    /// Latest frame report.
    ///
    /// # Errors
    ///
    /// [`AppError::NotAttached`] before [`Host::attach`].
    pub fn report(&self) -> Result<FrameReport, AppError> {
        Ok(self.attached()?.reports.borrow().clone())
    }

    /// Post one discrete command to the render worker.
    ///
    /// # Errors
    ///
    /// [`AppError::NotAttached`], or [`AppError::WorkerGone`].
    pub fn send(&self, cmd: Command) -> Result<(), AppError> {
        self.attached()?.worker.send(cmd)
    }

    /// Pointer moved to `client` (client coordinates).
    pub fn pointer_moved(&self, client: Point) {
        self.pointer.write_client(client, self.origin);
    }

    /// Generous upper bound for `frames` frames to be drawn.
    fn timeout_for(&self, frames: u32) -> Duration {
        self.frame_period * frames.max(1).saturating_mul(20) + Duration::from_secs(1)
    }

    /// Wait until a published report satisfies `done`.
    ///
    /// # Errors
    ///
    /// [`AppError::Timeout`] after `timeout`, or [`AppError::WorkerGone`] if
    /// the render worker exits first.
    pub async fn wait_for(
        &mut self,
        timeout: Duration,
        done: impl FnMut(&FrameReport) -> bool,
    ) -> Result<FrameReport, AppError> {
        let attached = self.attached.as_mut().ok_or(AppError::NotAttached)?;
        match tokio::time::timeout(timeout, attached.reports.wait_for(done)).await {
            Ok(Ok(report)) => Ok(report.clone()),
            Ok(Err(_)) => Err(AppError::WorkerGone { worker: render::NAME }),
            Err(_) => Err(AppError::Timeout("render frames")),
        }
    }

    /// Let `n` more frames be drawn.
    ///
    /// # Errors
    ///
    /// As [`Host::wait_for`].
    pub async fn wait_frames(&mut self, n: u32) -> Result<FrameReport, AppError> {
        let target = self.report()?.frames + u64::from(n);
        let timeout = self.timeout_for(n);
        self.wait_for(timeout, |r| r.frames >= target).await
    }

    /// Replay `steps` in order. Step coordinates are surface-local; moves are
    /// reported through client space like any other pointer move.
    ///
    /// # Errors
    ///
    /// The first send or wait that fails.
    pub async fn play(&mut self, steps: &[Step]) -> Result<(), AppError> {
        for step in steps {
            match *step {
                Step::Move { x, y } => self.pointer_moved(Point::new(x + self.origin.x, y + self.origin.y)),
                Step::Wait { frames } => {
                    self.wait_frames(frames).await?;
                }
                Step::Click { .. } | Step::PointerDown { .. } | Step::PointerUp { .. } => {
                    if let Some(cmd) = step.command() {
                        debug!(kind = %cmd.kind(), "host: event");
                        self.send(cmd)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Terminate the workers, wait for them, and return the element holding
    /// the last presented frame.
    ///
    /// # Errors
    ///
    /// [`AppError::WorkerPanicked`] if a worker did not exit cleanly.
    pub async fn shutdown(mut self) -> Result<CanvasElement, AppError> {
        if let Some(attached) = self.attached.take() {
            if let Err(e) = attached.worker.send(Command::Terminate) {
                warn!(error = %e, "host: render worker already gone");
            }
            let worker = attached.worker;
            tokio::task::spawn_blocking(move || worker.join())
                .await
                .map_err(|_| AppError::WorkerPanicked { worker: render::NAME })??;
            info!("host: workers stopped");
        }
        Ok(self.element)
    }
}
