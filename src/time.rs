//! Time abstraction traits for platform-agnostic timing.
//!
//! The core never reads absolute time. It only takes differences between
//! successive readings of a monotonic millisecond clock, so any counter that
//! implements these traits (including a wrapping 32-bit tick counter) works.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy {
    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    fn duration_since(&self, earlier: Self) -> Self::Duration;

    /// Milliseconds elapsed between `earlier` and `self`.
    #[inline]
    fn millis_since(&self, earlier: Self) -> u64 {
        self.duration_since(earlier).as_millis()
    }
}

/// Millisecond duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MillisDuration(pub u64);

impl TimeDuration for MillisDuration {
    fn as_millis(&self) -> u64 {
        self.0
    }
}

/// Reading of a free-running 32-bit millisecond counter.
///
/// The counter wraps after ~49.7 days. Differences are computed with wrapping
/// arithmetic, so intervals shorter than the wrap period stay correct across
/// the rollover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u32);

impl TimeInstant for Millis {
    type Duration = MillisDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        MillisDuration(self.0.wrapping_sub(earlier.0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::CadenceGate;

    #[test]
    fn millis_difference_survives_counter_wrap() {
        let before = Millis(u32::MAX - 9);
        let after = Millis(20);
        assert_eq!(after.millis_since(before), 30);
    }

    /// A platform clock only has to measure differences.
    #[derive(Clone, Copy)]
    struct Seconds(u64);

    #[derive(Clone, Copy)]
    struct SecondsDuration(u64);

    impl TimeDuration for SecondsDuration {
        fn as_millis(&self) -> u64 {
            self.0 * 1_000
        }
    }

    impl TimeInstant for Seconds {
        type Duration = SecondsDuration;

        fn duration_since(&self, earlier: Self) -> Self::Duration {
            SecondsDuration(self.0 - earlier.0)
        }
    }

    #[test]
    fn difference_only_clock_drives_cadence() {
        assert_eq!(Seconds(5).millis_since(Seconds(2)), 3_000);

        let mut gate = CadenceGate::new(2_000, Seconds(0));
        assert!(!gate.ready(Seconds(1)));
        assert!(gate.ready(Seconds(2)));
    }
}
