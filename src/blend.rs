//! Color-blend animations for the LED ring.
//!
//! Provides [`RingAnimator`], which owns the ring's pixel buffer and blends it
//! toward a target on a fixed cadence. Two styles exist:
//!
//! - **Fade**: `t = frame / frames` steps from 0 to 1, one frame per tick,
//!   then the job ends with the target on the ring.
//! - **Pulse**: `t` follows a raised cosine of wall-clock time, breathing
//!   between the two colors until stopped.

use core::num::NonZeroU16;

use palette::Srgb;

use crate::colors::{BLACK, blend};
use crate::peripherals::LedRing;
use crate::time::TimeInstant;
use crate::timing::CadenceGate;
use crate::types::SequenceError;

/// How a blend job moves between its two color snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlendStyle {
    /// Monotonic fade over a fixed number of frames.
    Fade { frames: NonZeroU16 },

    /// Endless sinusoidal breathing with the given period.
    Pulse { period_ms: u32 },
}

impl BlendStyle {
    /// Creates a fade over `frames` ticks.
    ///
    /// # Errors
    /// * `ZeroFrameBlend` - `frames` is zero
    pub fn fade(frames: u16) -> Result<Self, SequenceError> {
        NonZeroU16::new(frames)
            .map(|frames| BlendStyle::Fade { frames })
            .ok_or(SequenceError::ZeroFrameBlend)
    }
}

/// Per-pixel fade between two snapshots at `frame` of `frames`.
///
/// Frame 0 reproduces `initial`; frame `frames` reproduces `target`.
pub fn fade_frame<const N: usize>(
    initial: &[Srgb; N],
    target: &[Srgb; N],
    frame: u16,
    frames: NonZeroU16,
) -> [Srgb; N] {
    let t = f32::from(frame) / f32::from(frames.get());
    core::array::from_fn(|i| blend(initial[i], target[i], t))
}

/// Blend factor of a pulse `elapsed_ms` into its cycle. Starts at 0, peaks at
/// 1 half a period later.
pub fn pulse_factor(elapsed_ms: u64, period_ms: u32) -> f32 {
    if period_ms == 0 {
        return 0.0;
    }
    let phase = (elapsed_ms % u64::from(period_ms)) as f32 / period_ms as f32;
    (1.0 - libm::cosf(phase * 2.0 * core::f32::consts::PI)) / 2.0
}

#[derive(Debug, Clone, Copy)]
struct BlendJob<I: TimeInstant, const N: usize> {
    initial: [Srgb; N],
    target: [Srgb; N],
    style: BlendStyle,
    frame: u16,
    started_at: I,
    gate: CadenceGate<I>,
}

/// Drives a ring of `N` LEDs through blend animations.
///
/// The animator keeps a copy of whatever was last pushed to the ring so a new
/// fade can start from the colors actually on display.
pub struct RingAnimator<I: TimeInstant, const N: usize> {
    cadence_ms: u32,
    pixels: [Srgb; N],
    job: Option<BlendJob<I, N>>,
}

impl<I: TimeInstant, const N: usize> RingAnimator<I, N> {
    /// Creates an idle animator with a black buffer.
    pub fn new(cadence_ms: u32) -> Self {
        Self {
            cadence_ms,
            pixels: [BLACK; N],
            job: None,
        }
    }

    /// Fades from the current buffer to `target`.
    pub fn start_fade(&mut self, target: [Srgb; N], style: BlendStyle, now: I) {
        let initial = self.pixels;
        self.start(initial, target, style, now);
    }

    /// Breathes between `from` and `to` until stopped.
    pub fn start_pulse(&mut self, from: Srgb, to: Srgb, period_ms: u32, now: I) {
        self.start([from; N], [to; N], BlendStyle::Pulse { period_ms }, now);
    }

    fn start(&mut self, initial: [Srgb; N], target: [Srgb; N], style: BlendStyle, now: I) {
        if self.job.is_some() {
            debug!("ring animation replaced");
        }
        self.job = Some(BlendJob {
            initial,
            target,
            style,
            frame: 0,
            started_at: now,
            gate: CadenceGate::new(self.cadence_ms, now),
        });
    }

    /// Renders the next blend step if the cadence interval has passed.
    ///
    /// Returns true if the ring was updated.
    pub fn advance<R: LedRing>(&mut self, now: I, ring: &mut R) -> bool {
        let Some(job) = self.job.as_mut() else {
            return false;
        };

        if !job.gate.ready(now) {
            return false;
        }

        let finished = match job.style {
            BlendStyle::Fade { frames } => {
                self.pixels = fade_frame(&job.initial, &job.target, job.frame, frames);
                job.frame = job.frame.saturating_add(1);
                job.frame > frames.get()
            }
            BlendStyle::Pulse { period_ms } => {
                let t = pulse_factor(now.millis_since(job.started_at), period_ms);
                self.pixels = core::array::from_fn(|i| blend(job.initial[i], job.target[i], t));
                false
            }
        };

        if finished {
            debug!("ring animation finished");
            self.job = None;
        }

        self.push(ring);
        true
    }

    /// Shows a static frame, dropping any running job.
    pub fn show_static<R: LedRing>(&mut self, pixels: [Srgb; N], ring: &mut R) {
        self.job = None;
        self.pixels = pixels;
        self.push(ring);
    }

    /// Turns every LED off, dropping any running job.
    pub fn blank<R: LedRing>(&mut self, ring: &mut R) {
        self.job = None;
        self.pixels = [BLACK; N];
        ring.clear();
        ring.show();
    }

    /// Drops the running job, leaving the LEDs as they are.
    pub fn stop(&mut self) {
        self.job = None;
    }

    /// Returns true while a job is playing.
    pub fn is_running(&self) -> bool {
        self.job.is_some()
    }

    /// The colors last pushed to the ring.
    pub fn pixels(&self) -> &[Srgb; N] {
        &self.pixels
    }

    fn push<R: LedRing>(&self, ring: &mut R) {
        for (index, color) in self.pixels.iter().enumerate() {
            ring.set_pixel(index, *color);
        }
        ring.show();
    }
}
