//! Device tuning constants.

/// Largest network list the Wi-Fi screen can page through.
pub const MAX_NETWORKS: usize = 16;

/// Runtime configuration for the [`Coordinator`](crate::Coordinator).
///
/// `Default` matches the reference hardware. Adjust with the `with_*`
/// setters; [`Config::validate`] runs when the coordinator is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Milliseconds per clockwise encoder detent.
    pub cw_scale_ms: u32,
    /// Milliseconds per counterclockwise encoder detent.
    pub ccw_scale_ms: u32,
    /// Hold time before a press counts as long.
    pub long_press_ms: u32,
    /// Time the button line must be stable before an edge is accepted.
    pub debounce_ms: u32,
    /// Inactivity before an idle screen prepares to sleep.
    pub sleep_timeout_ms: u32,
    /// Time spent in the sleep screen before suspending.
    pub sleep_grace_ms: u32,
    /// Bitmap frame cadence.
    pub display_frame_ms: u32,
    /// LED ring blend cadence.
    pub ring_frame_ms: u32,
    /// Period of the finished-timer breathing effect.
    pub pulse_period_ms: u32,
    /// Fade length when moving between the menu and a screen.
    pub menu_fade_frames: u16,
    /// Fade length when entering the sleep screen.
    pub sleep_fade_frames: u16,
    /// Fade length when a countdown starts, pauses or resumes.
    pub timer_fade_frames: u16,
    /// Network identifiers offered on the Wi-Fi screen.
    pub networks: &'static [&'static str],
    /// Lines shown on the info screen.
    pub info_lines: &'static [&'static str],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cw_scale_ms: 10_000,
            ccw_scale_ms: 60_000,
            long_press_ms: 1_250,
            debounce_ms: 5,
            sleep_timeout_ms: 60_000,
            sleep_grace_ms: 2_000,
            display_frame_ms: 42,
            ring_frame_ms: 20,
            pulse_period_ms: 3_000,
            menu_fade_frames: 10,
            sleep_fade_frames: 20,
            timer_fade_frames: 100,
            networks: &["HomeNetwork", "Workshop", "Guest"],
            info_lines: &["ring-timer", concat!("v", env!("CARGO_PKG_VERSION"))],
        }
    }
}

impl Config {
    pub fn with_scales(mut self, cw_scale_ms: u32, ccw_scale_ms: u32) -> Self {
        self.cw_scale_ms = cw_scale_ms;
        self.ccw_scale_ms = ccw_scale_ms;
        self
    }

    pub fn with_long_press(mut self, long_press_ms: u32) -> Self {
        self.long_press_ms = long_press_ms;
        self
    }

    pub fn with_debounce(mut self, debounce_ms: u32) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn with_sleep(mut self, timeout_ms: u32, grace_ms: u32) -> Self {
        self.sleep_timeout_ms = timeout_ms;
        self.sleep_grace_ms = grace_ms;
        self
    }

    pub fn with_cadences(mut self, display_frame_ms: u32, ring_frame_ms: u32) -> Self {
        self.display_frame_ms = display_frame_ms;
        self.ring_frame_ms = ring_frame_ms;
        self
    }

    pub fn with_pulse_period(mut self, pulse_period_ms: u32) -> Self {
        self.pulse_period_ms = pulse_period_ms;
        self
    }

    pub fn with_fades(mut self, menu: u16, sleep: u16, timer: u16) -> Self {
        self.menu_fade_frames = menu;
        self.sleep_fade_frames = sleep;
        self.timer_fade_frames = timer;
        self
    }

    pub fn with_networks(mut self, networks: &'static [&'static str]) -> Self {
        self.networks = networks;
        self
    }

    pub fn with_info_lines(mut self, lines: &'static [&'static str]) -> Self {
        self.info_lines = lines;
        self
    }

    /// Checks the values the coordinator relies on.
    ///
    /// # Errors
    /// * `ZeroScale` - either duration scale is zero
    /// * `ZeroLongPress` - the long press threshold is zero
    /// * `ZeroCadence` - a frame cadence or the pulse period is zero
    /// * `ZeroTimeout` - the inactivity timeout is zero
    /// * `ZeroFadeFrames` - a ring fade spans zero frames
    /// * `TooManyNetworks` - more than [`MAX_NETWORKS`] identifiers
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cw_scale_ms == 0 || self.ccw_scale_ms == 0 {
            return Err(ConfigError::ZeroScale);
        }
        if self.long_press_ms == 0 {
            return Err(ConfigError::ZeroLongPress);
        }
        if self.display_frame_ms == 0 || self.ring_frame_ms == 0 || self.pulse_period_ms == 0 {
            return Err(ConfigError::ZeroCadence);
        }
        if self.sleep_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.menu_fade_frames == 0 || self.sleep_fade_frames == 0 || self.timer_fade_frames == 0
        {
            return Err(ConfigError::ZeroFadeFrames);
        }
        if self.networks.len() > MAX_NETWORKS {
            return Err(ConfigError::TooManyNetworks);
        }
        Ok(())
    }
}

/// Configuration errors, reported when the coordinator is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A duration scale is zero.
    ZeroScale,

    /// The long press threshold is zero.
    ZeroLongPress,

    /// A cadence or period is zero.
    ZeroCadence,

    /// The inactivity timeout is zero.
    ZeroTimeout,

    /// A ring fade spans zero frames.
    ZeroFadeFrames,

    /// The network list does not fit the selection range.
    TooManyNetworks,

    /// A bitmap is larger than the display.
    AssetTooLarge,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroScale => write!(f, "duration scale must be non-zero"),
            ConfigError::ZeroLongPress => write!(f, "long press threshold must be non-zero"),
            ConfigError::ZeroCadence => write!(f, "animation cadence must be non-zero"),
            ConfigError::ZeroTimeout => write!(f, "inactivity timeout must be non-zero"),
            ConfigError::ZeroFadeFrames => write!(f, "ring fade must span at least one frame"),
            ConfigError::TooManyNetworks => {
                write!(f, "at most {} networks are supported", MAX_NETWORKS)
            }
            ConfigError::AssetTooLarge => write!(f, "bitmap does not fit the display"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
