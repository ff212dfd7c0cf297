//! Animation-frame scheduling for a worker loop.
//!
//! A frame fires only after it has been requested, at most once per period.
//! The loop requests the next frame after finishing the current one, and
//! cancels the pending request on teardown. Late frames are skipped rather
//! than replayed in a burst.

#[cfg(test)]
#[path = "frames_test.rs"]
mod frames_test;

use std::time::Duration;

use tokio::time::{Interval, MissedTickBehavior};

pub struct AnimationFrames {
    ticker: Interval,
    requested: bool,
    count: u64,
}

impl AnimationFrames {
    /// A scheduler firing at most `fps` times per second.
    #[must_use]
    pub fn new(fps: u32) -> Self {
        let period = Duration::from_secs(1) / fps.max(1);
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { ticker, requested: false, count: 0 }
    }

    /// Ask for the next frame.
    pub fn request(&mut self) {
        self.requested = true;
    }

    /// Drop the pending request, if any.
    pub fn cancel(&mut self) {
        self.requested = false;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.requested
    }

    /// Frames fired so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Wait for the requested frame and return its number, starting at 1.
    ///
    /// Never resolves without a pending request; guard `select!` branches
    /// with [`AnimationFrames::is_pending`].
    pub async fn next(&mut self) -> u64 {
        if !self.requested {
            std::future::pending::<()>().await;
        }
        self.ticker.tick().await;
        self.requested = false;
        self.count += 1;
        self.count
    }
}
