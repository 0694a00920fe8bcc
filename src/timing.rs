//! Countdown, stopwatch and cadence-gate bookkeeping.
//!
//! Everything here is driven by instants sampled once per poll cycle. Nothing
//! blocks or schedules; callers ask "is it time yet" and move on.

use crate::time::TimeInstant;

/// Maps an encoder position to a duration in milliseconds.
///
/// Clockwise positions scale by `cw_scale_ms` per detent, counterclockwise by
/// `ccw_scale_ms`.
#[inline]
pub fn duration_for_position(position: i32, cw_scale_ms: u32, ccw_scale_ms: u32) -> i64 {
    let scale = if position < 0 { ccw_scale_ms } else { cw_scale_ms };
    i64::from(position.unsigned_abs()) * i64::from(scale)
}

/// Lets an action through at most once per `interval_ms`.
#[derive(Debug, Clone, Copy)]
pub struct CadenceGate<I: TimeInstant> {
    interval_ms: u32,
    last: I,
}

impl<I: TimeInstant> CadenceGate<I> {
    /// Creates a gate whose first opening is one interval after `now`.
    pub fn new(interval_ms: u32, now: I) -> Self {
        Self {
            interval_ms,
            last: now,
        }
    }

    /// Returns true and re-arms if a full interval has passed since the last
    /// opening.
    pub fn ready(&mut self, now: I) -> bool {
        if now.millis_since(self.last) >= u64::from(self.interval_ms) {
            self.last = now;
            true
        } else {
            false
        }
    }

    /// The configured interval.
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }
}

/// A signed countdown.
///
/// `remaining` only changes by subtracting the time between successive
/// samples while running, so it drops below zero by however far the last
/// cycle overshot. Going negative is the expiry signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Countdown<I: TimeInstant> {
    remaining_ms: i64,
    initial_ms: i64,
    last_sample: Option<I>,
}

impl<I: TimeInstant> Countdown<I> {
    /// A stopped countdown at zero.
    pub fn new() -> Self {
        Self {
            remaining_ms: 0,
            initial_ms: 0,
            last_sample: None,
        }
    }

    /// Shows `duration_ms` without running. Used while a duration is being
    /// dialed in.
    pub fn preview(&mut self, duration_ms: i64) {
        self.remaining_ms = duration_ms;
        self.last_sample = None;
    }

    /// Starts counting down from `duration_ms`.
    pub fn arm(&mut self, duration_ms: i64, now: I) {
        self.initial_ms = duration_ms;
        self.remaining_ms = duration_ms;
        self.last_sample = Some(now);
    }

    /// Freezes the countdown.
    pub fn pause(&mut self) {
        self.last_sample = None;
    }

    /// Restarts the sample clock without touching `remaining`.
    pub fn resume(&mut self, now: I) {
        self.last_sample = Some(now);
    }

    /// Subtracts the time since the previous sample. No-op while frozen.
    pub fn sample(&mut self, now: I) -> i64 {
        if let Some(last) = self.last_sample {
            let elapsed = now.millis_since(last) as i64;
            self.remaining_ms -= elapsed;
            self.last_sample = Some(now);
        }
        self.remaining_ms
    }

    /// Adds the initial duration back, for auto-repeating intervals.
    pub fn rearm(&mut self) {
        self.remaining_ms += self.initial_ms;
    }

    /// True once `remaining` is below zero.
    pub fn is_expired(&self) -> bool {
        self.remaining_ms < 0
    }

    /// True while the sample clock is running.
    pub fn is_running(&self) -> bool {
        self.last_sample.is_some()
    }

    pub fn remaining_ms(&self) -> i64 {
        self.remaining_ms
    }

    pub fn initial_ms(&self) -> i64 {
        self.initial_ms
    }
}

/// An accumulating stopwatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stopwatch<I: TimeInstant> {
    elapsed_ms: i64,
    last_sample: Option<I>,
}

impl<I: TimeInstant> Stopwatch<I> {
    pub fn new() -> Self {
        Self {
            elapsed_ms: 0,
            last_sample: None,
        }
    }

    /// Zeroes and starts.
    pub fn start(&mut self, now: I) {
        self.elapsed_ms = 0;
        self.last_sample = Some(now);
    }

    pub fn pause(&mut self) {
        self.last_sample = None;
    }

    pub fn resume(&mut self, now: I) {
        self.last_sample = Some(now);
    }

    /// Zeroes and stops.
    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
        self.last_sample = None;
    }

    /// Adds the time since the previous sample. No-op while stopped.
    pub fn sample(&mut self, now: I) -> i64 {
        if let Some(last) = self.last_sample {
            self.elapsed_ms += now.millis_since(last) as i64;
            self.last_sample = Some(now);
        }
        self.elapsed_ms
    }

    pub fn elapsed_ms(&self) -> i64 {
        self.elapsed_ms
    }

    pub fn is_running(&self) -> bool {
        self.last_sample.is_some()
    }
}
