//! Output adapter and storage traits.
//!
//! Implement these for your hardware. Every call is fire-and-forget: the
//! coordinator expects them to return quickly and never reports failures, so
//! adapters handle bus errors internally.

use core::fmt::Write;

use palette::Srgb;

/// Pixel display (a 128x64 monochrome OLED on the reference hardware).
pub trait Display {
    /// Width and height in pixels.
    fn size(&self) -> (u16, u16);

    /// Draws a time readout. `millis` may be negative for an expired
    /// countdown; see [`format_clock`].
    fn render_time(&mut self, millis: i64);

    /// Clears the screen and draws one XBM bitmap at the given position.
    fn render_bitmap(&mut self, bitmap: &[u8], x: u16, y: u16, width: u16, height: u16);

    /// Clears the screen and draws lines of text top to bottom.
    fn render_text(&mut self, lines: &[&str]);

    /// Enables or disables the panel's power-save mode.
    fn power_save(&mut self, on: bool);
}

/// Ring of addressable RGB LEDs.
pub trait LedRing {
    /// Sets one pixel in the pending frame.
    fn set_pixel(&mut self, index: usize, color: Srgb);

    /// Latches the pending frame to the LEDs.
    fn show(&mut self);

    /// Sets every pixel in the pending frame to black.
    fn clear(&mut self);
}

/// Piezo tone generator.
pub trait ToneOutput {
    /// Starts a square wave at `freq_hz` for `duration_ms`.
    fn play_tone(&mut self, freq_hz: u16, duration_ms: u16);

    /// Silences the buzzer.
    fn stop(&mut self);
}

/// Non-volatile key/value settings.
///
/// Written only on explicit confirmation; `commit` flushes pending writes.
pub trait SettingsStore {
    fn muted(&self) -> bool;

    fn set_muted(&mut self, muted: bool);

    /// Stores the identifier of the network to join.
    fn set_network(&mut self, id: &str);

    fn commit(&mut self);
}

/// The three output peripherals driven by the coordinator.
pub struct Outputs<D: Display, R: LedRing, Z: ToneOutput> {
    pub display: D,
    pub ring: R,
    pub tone: Z,
}

impl<D: Display, R: LedRing, Z: ToneOutput> Outputs<D, R, Z> {
    pub fn new(display: D, ring: R, tone: Z) -> Self {
        Self {
            display,
            ring,
            tone,
        }
    }
}

/// Formats milliseconds as `MM:SS.t`.
///
/// Negative values clamp to zero. Minutes are not wrapped into hours, so long
/// durations simply grow the minute field.
pub fn format_clock(millis: i64) -> heapless::String<16> {
    let millis = millis.max(0);
    let seconds = millis / 1000;
    let minutes = seconds / 60;
    let tenths = (millis % 1000) / 100;

    let mut out = heapless::String::new();
    // minute counts wider than 9 digits get truncated
    let _ = write!(out, "{:02}:{:02}.{}", minutes, seconds % 60, tenths);
    out
}
