//! Ring palette and interpolation helper.
//!
//! All colors are `palette::Srgb` (0.0-1.0 per channel). LED ring adapters
//! convert to their native format (usually 8-bit GRB).

use palette::{Mix, Srgb};

pub const BLACK: Srgb = Srgb::new(0.0, 0.0, 0.0);
pub const WHITE: Srgb = Srgb::new(1.0, 1.0, 1.0);
pub const RED: Srgb = Srgb::new(1.0, 0.0, 0.0);
pub const GREEN: Srgb = Srgb::new(0.0, 1.0, 0.0);
pub const BLUE: Srgb = Srgb::new(0.0, 0.0, 1.0);
pub const YELLOW: Srgb = Srgb::new(1.0, 1.0, 0.0);
pub const AQUA: Srgb = Srgb::new(0.0, 1.0, 1.0);

/// Linear blend from `from` toward `to`.
///
/// `t` is clamped to 0.0-1.0; 0.0 yields `from`, 1.0 yields `to`.
#[inline]
pub fn blend(from: Srgb, to: Srgb, t: f32) -> Srgb {
    from.mix(to, t.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_endpoints_are_exact() {
        assert_eq!(blend(RED, BLUE, 0.0), RED);
        assert_eq!(blend(RED, BLUE, 1.0), BLUE);
    }

    #[test]
    fn blend_clamps_out_of_range_factor() {
        assert_eq!(blend(BLACK, WHITE, -2.0), BLACK);
        assert_eq!(blend(BLACK, WHITE, 3.0), WHITE);
    }
}
