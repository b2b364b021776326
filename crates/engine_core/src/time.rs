//! Frame pacing for the render loop.

use std::time::{Duration, Instant};

/// Tracks frame timing and decides when the next fixed-rate frame is due.
///
/// Scene motion advances by a constant amount per frame, so the loop only draws when the
/// fixed timestep has elapsed rather than on every redraw the window system offers.
#[derive(Debug)]
pub struct Time {
    /// Time of the last update.
    last_frame: Instant,
    /// Duration between the last two updates.
    delta: Duration,
    /// Frames drawn since start.
    frame_count: u64,
    /// Fixed frame interval (default 60 Hz).
    fixed_timestep: Duration,
    /// Accumulated time not yet consumed by fixed frames.
    accumulator: Duration,
    /// A fixed frame has been consumed but not drawn yet.
    frame_due: bool,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Longest stretch of wall time credited to the accumulator in one update, so a stalled
    /// window does not come back to a burst of catch-up frames.
    const MAX_CATCH_UP: Duration = Duration::from_millis(250);

    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            frame_count: 0,
            fixed_timestep: Duration::from_secs_f64(1.0 / 60.0),
            accumulator: Duration::ZERO,
            frame_due: false,
        }
    }

    /// Create a pacer ticking at `hz` frames per second.
    pub fn with_rate(hz: f64) -> Self {
        let mut time = Self::new();
        time.set_fixed_rate(hz);
        time
    }

    /// Sample the clock and credit the elapsed time.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.advance(now - self.last_frame);
        self.last_frame = now;
    }

    /// Credit `elapsed` wall time to the accumulator.
    pub fn advance(&mut self, elapsed: Duration) {
        self.delta = elapsed;
        self.accumulator += elapsed.min(Self::MAX_CATCH_UP);
    }

    /// Check if a fixed frame is due and consume its time.
    pub fn should_fixed_update(&mut self) -> bool {
        if self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            self.frame_count += 1;
            true
        } else {
            false
        }
    }

    /// Consume a fixed frame if one is due and hold it for the next draw. Returns true while
    /// a frame is waiting to be drawn, i.e. when a redraw should be requested.
    ///
    /// Several steps consumed before a draw collapse into one frame.
    pub fn schedule_frame(&mut self) -> bool {
        if self.should_fixed_update() {
            self.frame_due = true;
        }
        self.frame_due
    }

    /// Claim the frame held by [`Time::schedule_frame`]. False for redraws the window system
    /// raises on its own (resize, expose), which must not advance the scene.
    pub fn take_due_frame(&mut self) -> bool {
        std::mem::take(&mut self.frame_due)
    }

    /// Time left until the next fixed frame is due.
    pub fn until_next_frame(&self) -> Duration {
        self.fixed_timestep.saturating_sub(self.accumulator)
    }

    /// Fixed frames consumed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fixed_timestep(&self) -> Duration {
        self.fixed_timestep
    }

    /// Instantaneous rate implied by the last update.
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }

    /// Set the fixed frame rate in Hz. Non-positive rates are ignored.
    pub fn set_fixed_rate(&mut self, hz: f64) {
        if hz > 0.0 && hz.is_finite() {
            self.fixed_timestep = Duration::from_secs_f64(1.0 / hz);
        } else {
            log::warn!("Ignoring invalid frame rate {hz}");
        }
    }
}
