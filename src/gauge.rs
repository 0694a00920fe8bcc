//! Static ring layouts shown when no blend animation is running.

use palette::Srgb;

use crate::colors::{AQUA, BLACK, blend};

/// Fills the ring in proportion to a dialed-in tick count.
///
/// Each LED stands for `d` ticks, where `d` is the smallest power of two that
/// fits the count on the ring; the LED after the last full one is partially
/// lit. `reversed` mirrors the layout for counterclockwise values.
pub fn selection_gauge<const N: usize>(ticks: u32, reversed: bool, color: Srgb) -> [Srgb; N] {
    let mut out = [BLACK; N];
    if N == 0 {
        return out;
    }

    let leds = N as u64;
    let ticks = u64::from(ticks);
    let mut per_led = 1u64;
    while ticks >= leds * per_led {
        per_led *= 2;
    }

    let full = (ticks / per_led) as usize;
    let rest = ticks % per_led;
    for pixel in out.iter_mut().take(full) {
        *pixel = color;
    }
    if full < N {
        out[full] = blend(BLACK, color, rest as f32 / per_led as f32);
    }

    if reversed {
        out.reverse();
    }
    out
}

/// Fills the ring with the fraction of `initial_ms` still remaining.
///
/// Each LED is split into ten brightness steps. Negative remainders show an
/// empty ring.
pub fn countdown_gauge<const N: usize>(
    remaining_ms: i64,
    initial_ms: i64,
    reversed: bool,
    color: Srgb,
) -> [Srgb; N] {
    let mut out = [BLACK; N];
    if N == 0 || initial_ms <= 0 {
        return out;
    }

    let steps = N as i64 * 10;
    let lit = remaining_ms.clamp(0, initial_ms) as i128 * steps as i128 / initial_ms as i128;
    let full = (lit / 10) as usize;
    let rest = (lit % 10) as f32;

    for pixel in out.iter_mut().take(full) {
        *pixel = color;
    }
    if full < N {
        out[full] = blend(BLACK, color, rest / 10.0);
    }

    if reversed {
        out.reverse();
    }
    out
}

/// Lights the pair of LEDs marking a menu slot.
pub fn menu_marker<const N: usize>(position: i32) -> [Srgb; N] {
    let mut out = [BLACK; N];
    let pairs = N / 2;
    if pairs == 0 {
        return out;
    }

    let start = (position.unsigned_abs() as usize % pairs) * 2;
    out[start] = AQUA;
    out[start + 1] = AQUA;
    out
}
