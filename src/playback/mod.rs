//! Time-travel playback over a recorded trace
//!
//! [`PlaybackController`] owns the ordered snapshots, the current index, the
//! play/pause flag and the replay speed.
//!
//! # Invariants
//!
//! - `index < len` whenever the trace is non-empty, and `index == 0` otherwise
//! - `playing` is false whenever the trace is empty
//! - auto-advance clears `playing` when it reaches the last step
//! - at most one advance is scheduled at any time
//!
//! # Auto-advance
//!
//! The controller does not spawn timers. It keeps a single scheduled deadline
//! ([`Ticker`]) and the event loop calls [`PlaybackController::tick`] with
//! the current time. Every transition that changes `playing` or the speed
//! cancels the pending deadline before optionally scheduling a new one, so
//! advances can never overlap or accelerate. A late tick advances once and
//! reschedules from the time it ran.

use crate::snapshot::Snapshot;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub const DEFAULT_SPEED_MS: u64 = 500;
pub const MIN_SPEED_MS: u64 = 1;
pub const MAX_SPEED_MS: u64 = 10_000;

/// Single-slot schedule for the next automatic advance
#[derive(Debug, Default, Clone, Copy)]
struct Ticker {
    deadline: Option<Instant>,
}

impl Ticker {
    fn schedule(&mut self, at: Instant) {
        self.deadline = Some(at);
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }

    fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| now >= d)
    }
}

/// Transport state exposed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackStatus {
    pub index: usize,
    pub total: usize,
    pub playing: bool,
    pub speed_ms: u64,
}

/// State machine over an ordered sequence of snapshots
#[derive(Debug)]
pub struct PlaybackController {
    steps: Vec<Snapshot>,
    index: usize,
    playing: bool,
    speed: Duration,
    ticker: Ticker,
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED_MS)
    }
}

fn clamp_speed(ms: u64) -> Duration {
    Duration::from_millis(ms.clamp(MIN_SPEED_MS, MAX_SPEED_MS))
}

impl PlaybackController {
    pub fn new(speed_ms: u64) -> Self {
        PlaybackController {
            steps: Vec::new(),
            index: 0,
            playing: false,
            speed: clamp_speed(speed_ms),
            ticker: Ticker::default(),
        }
    }

    /// Replace the trace and rewind to the first step, paused
    pub fn load(&mut self, steps: Vec<Snapshot>) {
        info!(steps = steps.len(), "loaded trace");
        self.steps = steps;
        self.index = 0;
        self.stop();
    }

    /// Drop the trace entirely (new run)
    pub fn clear(&mut self) {
        debug!("cleared trace");
        self.steps.clear();
        self.index = 0;
        self.stop();
    }

    /// Rewind to the first step and pause; the trace is kept
    pub fn reset(&mut self) {
        self.index = 0;
        self.stop();
    }

    fn stop(&mut self) {
        self.playing = false;
        self.ticker.cancel();
    }

    fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Advance one step. Returns whether the index moved.
    ///
    /// At the last step this is a no-op on the index and clears `playing`.
    pub fn step_forward(&mut self) -> bool {
        if self.index < self.last_index() {
            self.index += 1;
            true
        } else {
            if self.playing {
                debug!(index = self.index, "playback reached the end");
            }
            self.stop();
            false
        }
    }

    /// Go back one step. Returns whether the index moved.
    pub fn step_backward(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `target`, clamped into the valid range
    pub fn seek(&mut self, target: i64) {
        let last = self.last_index() as i64;
        self.index = target.clamp(0, last) as usize;
    }

    pub fn jump_to_start(&mut self) {
        self.seek(0);
    }

    pub fn jump_to_end(&mut self) {
        self.seek(i64::MAX);
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.set_playing_at(playing, Instant::now());
    }

    /// Start or stop auto-advance; the first advance is due one period
    /// after `now`. No-op on an empty trace.
    pub fn set_playing_at(&mut self, playing: bool, now: Instant) {
        if self.steps.is_empty() {
            return;
        }
        self.ticker.cancel();
        self.playing = playing;
        if playing {
            self.ticker.schedule(now + self.speed);
        }
        debug!(playing, index = self.index, "playback toggled");
    }

    pub fn toggle_playing(&mut self) {
        self.set_playing(!self.playing);
    }

    pub fn set_speed(&mut self, speed_ms: u64) {
        self.set_speed_at(speed_ms, Instant::now());
    }

    /// Change the replay period. A pending advance is cancelled and, while
    /// playing, rescheduled one new period after `now`.
    pub fn set_speed_at(&mut self, speed_ms: u64, now: Instant) {
        self.speed = clamp_speed(speed_ms);
        self.ticker.cancel();
        if self.playing {
            self.ticker.schedule(now + self.speed);
        }
        debug!(speed_ms = self.speed_ms(), "playback speed changed");
    }

    /// Timer poll. Advances at most once when the scheduled deadline has
    /// passed and returns whether the index moved.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.playing || !self.ticker.is_due(now) {
            return false;
        }
        let moved = self.step_forward();
        if self.playing {
            if self.index == self.last_index() {
                // Last step reached by auto-advance
                self.stop();
            } else {
                self.ticker.schedule(now + self.speed);
            }
        }
        moved
    }

    /// When the next automatic advance is due, if one is scheduled
    pub fn next_deadline(&self) -> Option<Instant> {
        self.ticker.deadline
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.steps.get(self.index)
    }

    pub fn steps(&self) -> &[Snapshot] {
        &self.steps
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed_ms(&self) -> u64 {
        self.speed.as_millis() as u64
    }

    pub fn is_at_start(&self) -> bool {
        self.index == 0
    }

    pub fn is_at_end(&self) -> bool {
        !self.steps.is_empty() && self.index == self.last_index()
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            index: self.index,
            total: self.steps.len(),
            playing: self.playing,
            speed_ms: self.speed_ms(),
        }
    }
}
