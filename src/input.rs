//! Rotary encoder and push button input.
//!
//! The coordinator consumes the [`InputSource`] trait: one latched event and
//! an absolute encoder position per poll cycle. [`InputDecoder`] builds that
//! from a raw button line and a raw encoder counter, handling debounce and
//! long-press detection against the shared clock.

use crate::config::Config;
use crate::time::{TimeInstant, TimeSource};
use crate::types::{InputEvent, Level};

/// Source of latched input events.
///
/// Call [`tick`](InputSource::tick) once per poll cycle before handing the
/// source to the coordinator.
pub trait InputSource {
    /// Samples the hardware and latches at most one event.
    fn tick(&mut self);

    /// Absolute encoder position.
    fn position(&self) -> i32;

    /// Rebases the encoder so it reads `position` from now on.
    fn set_position(&mut self, position: i32);

    /// The event latched by the last [`tick`](InputSource::tick).
    fn last_event(&self) -> InputEvent;
}

/// Raw encoder and button lines.
///
/// Implement this for your GPIO/quadrature peripheral. The button is active
/// low: [`Level::Low`] means pressed.
pub trait RawInput {
    /// Current level of the button line.
    fn button_level(&mut self) -> Level;

    /// Detent count of the quadrature decoder.
    fn encoder_count(&mut self) -> i32;

    /// Overwrites the detent count.
    fn set_encoder_count(&mut self, count: i32);
}

/// Turns raw button levels and encoder counts into [`InputEvent`]s.
///
/// * A press edge is accepted once the line has been stable for
///   `debounce_ms`.
/// * A long press fires once while the button is still held past
///   `long_press_ms`; the release after it is swallowed.
/// * A short press fires on release if no long press fired.
/// * Any encoder movement latches a rotation, which wins over a button event
///   in the same cycle.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `R` - Raw input implementation type
pub struct InputDecoder<'t, I: TimeInstant, T: TimeSource<I>, R: RawInput> {
    raw: R,
    time_source: &'t T,
    long_press_ms: u32,
    debounce_ms: u32,
    stable: Level,
    candidate: Level,
    candidate_since: I,
    press_started: Option<I>,
    position: i32,
    event: InputEvent,
}

impl<'t, I: TimeInstant, T: TimeSource<I>, R: RawInput> InputDecoder<'t, I, T, R> {
    /// Creates a decoder using the thresholds from `config`.
    ///
    /// The current button level is taken as settled, so a button already held
    /// at boot (for example the one that woke the device) produces no event
    /// when released.
    pub fn new(mut raw: R, time_source: &'t T, config: &Config) -> Self {
        let level = raw.button_level();
        let position = raw.encoder_count();

        Self {
            raw,
            time_source,
            long_press_ms: config.long_press_ms,
            debounce_ms: config.debounce_ms,
            stable: level,
            candidate: level,
            candidate_since: time_source.now(),
            press_started: None,
            position,
            event: InputEvent::None,
        }
    }

    /// Returns true while a debounced press is being held.
    pub fn is_held(&self) -> bool {
        self.press_started.is_some()
    }

    /// Feeds a new level through the debouncer.
    ///
    /// Returns the new settled level when it changed in this call.
    fn debounce(&mut self, level: Level, now: I) -> Option<Level> {
        if level != self.candidate {
            self.candidate = level;
            self.candidate_since = now;
        }

        if self.candidate != self.stable
            && now.millis_since(self.candidate_since) >= u64::from(self.debounce_ms)
        {
            self.stable = self.candidate;
            return Some(self.stable);
        }
        None
    }
}

impl<I: TimeInstant, T: TimeSource<I>, R: RawInput> InputSource for InputDecoder<'_, I, T, R> {
    fn tick(&mut self) {
        self.event = InputEvent::None;
        let now = self.time_source.now();

        let level = self.raw.button_level();
        let edge = self.debounce(level, now);

        if edge == Some(Level::Low) {
            self.press_started = Some(now);
        }

        if let Some(started) = self.press_started {
            if self.stable == Level::Low && now.millis_since(started) > u64::from(self.long_press_ms)
            {
                trace!("long press");
                self.event = InputEvent::LongPress;
                self.press_started = None;
            }
        }

        if edge == Some(Level::High) && self.press_started.take().is_some() {
            trace!("short press");
            self.event = InputEvent::ShortPress;
        }

        let count = self.raw.encoder_count();
        if count != self.position {
            self.event = if count > self.position {
                InputEvent::RotateCw
            } else {
                InputEvent::RotateCcw
            };
            self.position = count;
        }
    }

    fn position(&self) -> i32 {
        self.position
    }

    fn set_position(&mut self, position: i32) {
        self.raw.set_encoder_count(position);
        self.position = position;
    }

    fn last_event(&self) -> InputEvent {
        self.event
    }
}
