#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame and tick scheduling for the snake game.
//!
//! A move is split into a fixed number of frames. While running forward every
//! last frame of a move triggers a full world tick; after a loss the frames
//! play backwards once so the snake recoils from whatever it hit. The
//! scheduler itself is a pure state machine driven by [`Scheduler::on_frame`];
//! [`FrameClock`] converts wall-clock time into frame firings.

use std::time::Duration;

use tracing::debug;

/// Animation frames rendered per second of wall-clock time.
pub const FRAMES_PER_SECOND: u32 = 30;

/// Frame layout of a single move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cadence {
    frames_per_move: u32,
    frame_interval: Duration,
}

impl Cadence {
    /// Splits a move lasting `move_time` into whole frames.
    #[must_use]
    pub fn new(move_time: Duration) -> Self {
        let millis = u32::try_from(move_time.as_millis()).unwrap_or(u32::MAX);
        let frames_per_move =
            ((FRAMES_PER_SECOND as f32 * millis as f32 / 1000.0) as u32).max(1);
        let frame_interval = Duration::from_millis(u64::from(millis / frames_per_move).max(1));
        Self {
            frames_per_move,
            frame_interval,
        }
    }

    /// Number of frames in a move; every last frame triggers a tick.
    #[must_use]
    pub const fn frames_per_move(&self) -> u32 {
        self.frames_per_move
    }

    /// Wall-clock time between two frames.
    #[must_use]
    pub const fn frame_interval(&self) -> Duration {
        self.frame_interval
    }
}

/// Mutually exclusive scheduling states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first input of a game.
    Idle,
    /// Moving forward; `frame` counts up towards the next tick.
    Forward {
        /// Frames elapsed in the current move.
        frame: u32,
    },
    /// Playing the fatal move backwards; `frame` counts down to zero.
    Recoil {
        /// Frames left in the recoil.
        frame: u32,
    },
    /// Nothing left to animate.
    Stopped,
}

/// Work requested by a single frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameAction {
    /// No timer is running.
    Idle,
    /// Only the interpolation fraction changed.
    Redraw,
    /// A full move elapsed; the world must tick before redrawing.
    Tick,
}

/// Pure state machine that decides when the world ticks.
#[derive(Clone, Debug)]
pub struct Scheduler {
    cadence: Cadence,
    phase: Phase,
}

impl Scheduler {
    /// Creates an idle scheduler for moves lasting `move_time`.
    #[must_use]
    pub fn new(move_time: Duration) -> Self {
        Self {
            cadence: Cadence::new(move_time),
            phase: Phase::Idle,
        }
    }

    /// Frame layout in use.
    #[must_use]
    pub const fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Current scheduling state.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Reports whether a timer is currently firing frames.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Forward { .. } | Phase::Recoil { .. })
    }

    /// Starts the forward timer. Only an idle scheduler can start.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        debug!(
            frames_per_move = self.cadence.frames_per_move,
            "forward timer started"
        );
        self.phase = Phase::Forward { frame: 0 };
        true
    }

    /// Replaces the forward timer with the recoil timer.
    pub fn recoil(&mut self) {
        debug!("recoil timer started");
        self.phase = Phase::Recoil {
            frame: self.cadence.frames_per_move,
        };
    }

    /// Cancels every timer.
    pub fn stop(&mut self) {
        debug!(phase = ?self.phase, "timers stopped");
        self.phase = Phase::Stopped;
    }

    /// Returns to the idle state for a fresh game.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Advances the running timer by one frame.
    pub fn on_frame(&mut self) -> FrameAction {
        match self.phase {
            Phase::Idle | Phase::Stopped => FrameAction::Idle,
            Phase::Forward { frame } => {
                let frame = frame + 1;
                if frame >= self.cadence.frames_per_move {
                    self.phase = Phase::Forward { frame: 0 };
                    FrameAction::Tick
                } else {
                    self.phase = Phase::Forward { frame };
                    FrameAction::Redraw
                }
            }
            Phase::Recoil { frame } => {
                let frame = frame.saturating_sub(1);
                self.phase = if frame == 0 {
                    debug!("recoil finished");
                    Phase::Stopped
                } else {
                    Phase::Recoil { frame }
                };
                FrameAction::Redraw
            }
        }
    }

    /// Fraction of the current move to interpolate at.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        let frames = self.cadence.frames_per_move as f32;
        match self.phase {
            Phase::Idle => 0.0,
            Phase::Forward { frame } | Phase::Recoil { frame } => frame as f32 / frames,
            Phase::Stopped => 0.0,
        }
    }
}

/// Converts elapsed wall-clock time into whole frames.
#[derive(Clone, Debug)]
pub struct FrameClock {
    interval: Duration,
    accumulator: Duration,
}

impl FrameClock {
    /// Creates a clock firing once every `interval`.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            accumulator: Duration::ZERO,
        }
    }

    /// Time between two firings.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Adds elapsed time and returns how many frames became due.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        self.accumulator = self.accumulator.saturating_add(dt);
        let mut frames = 0;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            frames += 1;
        }
        frames
    }

    /// Drops any partially accumulated frame.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}
