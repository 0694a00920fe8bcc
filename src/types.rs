//! Core types shared by the coordinator, the animation engines and the
//! suspend manager.

/// The device's operating mode. Exactly one is active at a time.
///
/// The discriminants are stable; they are what ends up in retained memory
/// across deep sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OperatingMode {
    /// Top-level menu, encoder picks a [`MenuEntry`].
    #[default]
    ModeSelect = 0,
    /// Dialing in a countdown duration.
    TimerSelect = 1,
    /// Countdown running.
    TimerRun = 2,
    /// Countdown frozen.
    TimerPaused = 3,
    /// Countdown crossed zero, alarm sounding.
    TimerFinished = 4,
    /// Dialing in a repeating interval.
    PulseSelect = 5,
    /// Interval timer running, re-arms itself on expiry.
    PulseRun = 6,
    /// Stopwatch armed at zero.
    StopwatchStart = 7,
    /// Stopwatch accumulating.
    StopwatchRun = 8,
    /// Stopwatch frozen.
    StopwatchPaused = 9,
    /// Picking a stored network identifier.
    WifiSelect = 10,
    /// Sound on/off.
    Settings = 11,
    /// Device information screen.
    Info = 12,
    /// Grace period before deep sleep.
    PrepareSleep = 13,
}

impl OperatingMode {
    const ALL: [OperatingMode; 14] = [
        OperatingMode::ModeSelect,
        OperatingMode::TimerSelect,
        OperatingMode::TimerRun,
        OperatingMode::TimerPaused,
        OperatingMode::TimerFinished,
        OperatingMode::PulseSelect,
        OperatingMode::PulseRun,
        OperatingMode::StopwatchStart,
        OperatingMode::StopwatchRun,
        OperatingMode::StopwatchPaused,
        OperatingMode::WifiSelect,
        OperatingMode::Settings,
        OperatingMode::Info,
        OperatingMode::PrepareSleep,
    ];

    /// Returns the stable raw code for this mode.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a raw mode code. Unknown codes yield `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Returns true for modes the inactivity watchdog may put to sleep.
    ///
    /// Running and paused timers and stopwatches are never interrupted.
    pub fn allows_auto_sleep(self) -> bool {
        matches!(
            self,
            OperatingMode::ModeSelect
                | OperatingMode::TimerSelect
                | OperatingMode::TimerFinished
                | OperatingMode::PulseSelect
                | OperatingMode::WifiSelect
                | OperatingMode::StopwatchStart
                | OperatingMode::Settings
                | OperatingMode::Info
        )
    }

    /// Returns true if the countdown clock is consuming time in this mode.
    pub fn is_counting_down(self) -> bool {
        matches!(self, OperatingMode::TimerRun | OperatingMode::PulseRun)
    }
}

/// Entries of the top-level menu, in encoder order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuEntry {
    Timer,
    Stopwatch,
    Settings,
    Sleep,
    Pulse,
    Wifi,
    Info,
}

impl MenuEntry {
    /// All entries, indexed by menu slot.
    pub const ALL: [MenuEntry; 7] = [
        MenuEntry::Timer,
        MenuEntry::Stopwatch,
        MenuEntry::Settings,
        MenuEntry::Sleep,
        MenuEntry::Pulse,
        MenuEntry::Wifi,
        MenuEntry::Info,
    ];

    /// Highest valid menu slot.
    pub const LAST_SLOT: i32 = (Self::ALL.len() - 1) as i32;

    /// Looks up the entry at a menu slot.
    pub fn from_slot(slot: i32) -> Option<Self> {
        usize::try_from(slot)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    /// The menu slot of this entry; also where the cursor lands when the
    /// entry's screen returns to the menu.
    pub fn slot(self) -> i32 {
        match self {
            MenuEntry::Timer => 0,
            MenuEntry::Stopwatch => 1,
            MenuEntry::Settings => 2,
            MenuEntry::Sleep => 3,
            MenuEntry::Pulse => 4,
            MenuEntry::Wifi => 5,
            MenuEntry::Info => 6,
        }
    }

    /// The mode entered when this entry is confirmed.
    pub fn target_mode(self) -> OperatingMode {
        match self {
            MenuEntry::Timer => OperatingMode::TimerSelect,
            MenuEntry::Stopwatch => OperatingMode::StopwatchStart,
            MenuEntry::Settings => OperatingMode::Settings,
            MenuEntry::Sleep => OperatingMode::PrepareSleep,
            MenuEntry::Pulse => OperatingMode::PulseSelect,
            MenuEntry::Wifi => OperatingMode::WifiSelect,
            MenuEntry::Info => OperatingMode::Info,
        }
    }

    /// Wraps an arbitrary encoder position into the menu range.
    #[inline]
    pub fn wrap(position: i32) -> i32 {
        position.rem_euclid(Self::LAST_SLOT + 1)
    }
}

/// A discrete input edge, latched once per poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    #[default]
    None,
    RotateCw,
    RotateCcw,
    ShortPress,
    LongPress,
}

/// Logic level of a digital line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// The opposite level.
    pub fn inverted(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

/// Sequence validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceError {
    /// No frames provided.
    EmptySequence,

    /// A blend was requested over zero frames.
    ZeroFrameBlend,

    /// A frame's byte length does not match the declared bitmap size.
    FrameSizeMismatch,
}

impl core::fmt::Display for SequenceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SequenceError::EmptySequence => {
                write!(f, "sequence must have at least one frame")
            }
            SequenceError::ZeroFrameBlend => {
                write!(f, "color blend must span at least one frame")
            }
            SequenceError::FrameSizeMismatch => {
                write!(f, "frame length does not match bitmap dimensions")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SequenceError {}
