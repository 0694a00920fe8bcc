//! Deep-sleep suspend and resume.
//!
//! Only a [`RetainedState`] survives deep sleep. It is written once right
//! before suspending and read once at boot, through a two-word
//! [`RetainedMemory`] region.

use crate::types::{Level, OperatingMode};

/// Marker in the high bits of the first retained word. Anything else in
/// those bits means the region was never written or got corrupted.
const MAGIC: u32 = 0x5254_0000;
const MAGIC_MASK: u32 = 0xFFFF_0000;

/// The state carried across deep sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetainedState {
    pub mode: OperatingMode,
    pub position: i32,
}

impl RetainedState {
    pub fn new(mode: OperatingMode, position: i32) -> Self {
        Self { mode, position }
    }

    /// Packs the state into two retained words.
    pub fn to_words(self) -> [u32; 2] {
        [MAGIC | u32::from(self.mode.code()), self.position as u32]
    }

    /// Unpacks retained words. Returns `None` if the marker is missing or the
    /// mode code is unknown.
    pub fn from_words(words: [u32; 2]) -> Option<Self> {
        let [tagged, position] = words;
        if tagged & MAGIC_MASK != MAGIC {
            return None;
        }
        let code = u8::try_from(tagged & !MAGIC_MASK).ok()?;
        let mode = OperatingMode::from_code(code)?;
        Some(Self {
            mode,
            position: position as i32,
        })
    }
}

/// A memory region that keeps its contents through deep sleep.
pub trait RetainedMemory {
    fn read(&self) -> [u32; 2];

    fn write(&mut self, words: [u32; 2]);
}

/// Why the chip last started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeCause {
    /// The armed wake line changed level.
    External,
    /// Cold power-up.
    PowerOn,
    /// Reset, watchdog or any other source.
    Other,
}

/// A level-triggered wake condition on the button line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WakeTrigger {
    /// Level that wakes the chip.
    pub level: Level,
}

impl WakeTrigger {
    /// Wakes on the level opposite to `resting`.
    pub fn opposite_of(resting: Level) -> Self {
        Self {
            level: resting.inverted(),
        }
    }
}

/// Sleep controller and wake-source configuration.
pub trait PowerControl {
    fn wake_cause(&self) -> WakeCause;

    /// Current level of the button line.
    fn button_level(&self) -> Level;

    /// Disarms every wake source.
    fn disable_wake_sources(&mut self);

    fn arm_wake(&mut self, trigger: WakeTrigger);

    /// Powers down. Does not return on hardware.
    fn enter_deep_sleep(&mut self);
}

/// Where the coordinator starts after boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootState {
    pub mode: OperatingMode,
    pub position: i32,
    /// True when restored from retained memory after a wake.
    pub woke_from_sleep: bool,
}

impl Default for BootState {
    fn default() -> Self {
        Self {
            mode: OperatingMode::ModeSelect,
            position: 0,
            woke_from_sleep: false,
        }
    }
}

/// Saves and restores [`RetainedState`] around deep sleep.
///
/// # Type Parameters
/// * `M` - Retained memory implementation type
/// * `P` - Power control implementation type
pub struct SuspendManager<M: RetainedMemory, P: PowerControl> {
    memory: M,
    power: P,
}

impl<M: RetainedMemory, P: PowerControl> SuspendManager<M, P> {
    pub fn new(memory: M, power: P) -> Self {
        Self { memory, power }
    }

    /// Decides the boot mode and position.
    ///
    /// After an external wake the retained state is used, except that the
    /// sleep screen comes back as the menu. Any other wake cause, or retained
    /// contents that do not decode, start from the defaults.
    pub fn resume(&self) -> BootState {
        let cause = self.power.wake_cause();
        if cause != WakeCause::External {
            info!("cold start ({:?})", cause);
            return BootState::default();
        }

        let Some(state) = RetainedState::from_words(self.memory.read()) else {
            warn!("retained state invalid, using defaults");
            return BootState::default();
        };

        let mode = match state.mode {
            OperatingMode::PrepareSleep => OperatingMode::ModeSelect,
            mode => mode,
        };
        info!("resumed into {:?} at {}", mode, state.position);

        BootState {
            mode,
            position: state.position,
            woke_from_sleep: true,
        }
    }

    /// Saves `state`, arms the button as the only wake source and powers
    /// down.
    ///
    /// Outputs must already be blanked.
    pub fn suspend(&mut self, state: RetainedState) {
        info!("suspending in {:?} at {}", state.mode, state.position);
        self.memory.write(state.to_words());
        self.power.disable_wake_sources();
        let trigger = WakeTrigger::opposite_of(self.power.button_level());
        self.power.arm_wake(trigger);
        self.power.enter_deep_sleep();
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn power(&self) -> &P {
        &self.power
    }

    pub fn power_mut(&mut self) -> &mut P {
        &mut self.power
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_round_trip_negative_positions() {
        let state = RetainedState::new(OperatingMode::PulseSelect, -7);
        assert_eq!(RetainedState::from_words(state.to_words()), Some(state));
    }

    #[test]
    fn blank_or_garbage_words_are_rejected() {
        assert_eq!(RetainedState::from_words([0, 0]), None);
        assert_eq!(RetainedState::from_words([u32::MAX, 0]), None);
        assert_eq!(RetainedState::from_words([MAGIC | 14, 0]), None);
        assert_eq!(RetainedState::from_words([MAGIC | 0x1FF, 0]), None);
    }

    #[test]
    fn wake_trigger_inverts_resting_level() {
        assert_eq!(WakeTrigger::opposite_of(Level::High).level, Level::Low);
        assert_eq!(WakeTrigger::opposite_of(Level::Low).level, Level::High);
    }
}
