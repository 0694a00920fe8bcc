#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Coordinator`**: The device state machine. Poll it once per loop iteration
//! - **`transition`**: The pure `(mode, trigger) -> (action, next mode)` table behind it
//! - **`FrameAnimator`**: Plays 30x30 XBM bitmap sequences on the display
//! - **`RingAnimator`**: Fades or pulses the LED ring between two color snapshots
//! - **`MelodyPlayer`**: Steps through buzzer note sequences
//! - **`InputDecoder`**: Debounces the button and turns encoder counts into events
//! - **`SuspendManager`**: Saves and restores `RetainedState` around deep sleep
//! - **`Display`**, **`LedRing`**, **`ToneOutput`**, **`SettingsStore`**,
//!   **`RawInput`**, **`RetainedMemory`**, **`PowerControl`**: Traits to implement
//!   for your hardware
//! - **`TimeSource`**: Trait to implement for your timing system
//!
//! The library uses `Srgb<f32>` (0.0-1.0 range) for all ring colors. When
//! implementing `LedRing`, convert these to your LEDs' native format.

#[macro_use]
mod fmt;

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub mod animation;
pub mod blend;
pub mod colors;
pub mod config;
pub mod coordinator;
pub mod gauge;
pub mod input;
pub mod melody;
pub mod peripherals;
pub mod sequence;
pub mod suspend;
pub mod table;
pub mod time;
pub mod timing;
pub mod types;

pub use animation::FrameAnimator;
pub use blend::{BlendStyle, RingAnimator};
pub use config::{Config, ConfigError, MAX_NETWORKS};
pub use coordinator::{Assets, Coordinator, Cycle};
pub use input::{InputDecoder, InputSource, RawInput};
pub use melody::{Melody, MelodyPlayer, Note};
pub use peripherals::{Display, LedRing, Outputs, SettingsStore, ToneOutput, format_clock};
pub use sequence::{BitmapSequence, FRAME_HEIGHT, FRAME_LEN, FRAME_WIDTH, Frame, PlayOptions};
pub use suspend::{
    BootState, PowerControl, RetainedMemory, RetainedState, SuspendManager, WakeCause, WakeTrigger,
};
pub use table::{Action, Transition, Trigger, transition};
pub use time::{Millis, MillisDuration, TimeDuration, TimeInstant, TimeSource};
pub use types::{InputEvent, Level, MenuEntry, OperatingMode, SequenceError};
