#![forbid(unsafe_code)]

//! Suspension seam for animation timing.
//!
//! Animations resolve on elapsed time, not on a signal from the renderer.
//! The [`Timer`] trait is the only place that time is read, so hosts can swap
//! in their own scheduler (a browser `setTimeout` bridge, a frame clock) and
//! tests can drive time deterministically.
//!
//! [`TokioTimer`] is the default. Under `tokio::time::pause()` (or
//! `#[tokio::test(start_paused = true)]`) its sleeps advance simulated time
//! instantly and in order, which makes transition tests exact.

use std::fmt;
use std::time::Duration;

use futures::future::LocalBoxFuture;

/// Default interval of one rendering frame (~60 Hz).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Source of suspension points for timed work.
pub trait Timer {
    /// Resolve after `duration` has elapsed.
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;

    /// Resolve after one rendering frame.
    fn next_frame(&self) -> LocalBoxFuture<'static, ()> {
        self.sleep(DEFAULT_FRAME_INTERVAL)
    }
}

/// [`Timer`] backed by `tokio::time`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokioTimer {
    frame_interval: Duration,
}

impl TokioTimer {
    /// Create a timer with the default frame interval.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frame_interval: DEFAULT_FRAME_INTERVAL,
        }
    }

    /// Override the frame interval.
    #[must_use]
    pub const fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// The configured frame interval.
    #[inline]
    #[must_use]
    pub const fn frame_interval(&self) -> Duration {
        self.frame_interval
    }
}

impl Default for TokioTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TokioTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioTimer")
            .field("frame_interval_ms", &self.frame_interval.as_millis())
            .finish()
    }
}

impl Timer for TokioTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }

    fn next_frame(&self) -> LocalBoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(self.frame_interval))
    }
}
