//! The mode/state coordinator.
//!
//! Provides [`Coordinator`], the single-threaded state machine at the center
//! of the device. Each [`poll`](Coordinator::poll) samples the clock once,
//! reconciles the latched input event and any due timers against the
//! transition table, then advances the animation engines and the melody
//! player. Nothing in a poll blocks.

use palette::Srgb;

use crate::animation::FrameAnimator;
use crate::blend::{BlendStyle, RingAnimator};
use crate::colors::{BLACK, BLUE, GREEN, RED, WHITE, YELLOW};
use crate::config::{Config, ConfigError};
use crate::gauge::{countdown_gauge, menu_marker, selection_gauge};
use crate::input::InputSource;
use crate::melody::{ALARM, CLICK, Melody, MelodyPlayer};
use crate::peripherals::{Display, LedRing, Outputs, SettingsStore, ToneOutput};
use crate::sequence::{BitmapSequence, Frame, PlayOptions};
use crate::suspend::{BootState, RetainedState};
use crate::table::{Action, Transition, Trigger, transition};
use crate::time::{TimeInstant, TimeSource};
use crate::timing::{Countdown, Stopwatch, duration_for_position};
use crate::types::{InputEvent, MenuEntry, OperatingMode, SequenceError};

/// The bitmap sequences the coordinator plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assets<'a> {
    /// One looping icon per menu slot.
    pub menu: [BitmapSequence<'a>; 7],
    /// Played forward on start/resume, backward on pause.
    pub play_pause: BitmapSequence<'a>,
    /// Loops while a finished timer is ringing.
    pub alarm: BitmapSequence<'a>,
}

impl<'a> Assets<'a> {
    pub fn new(
        menu: [BitmapSequence<'a>; 7],
        play_pause: BitmapSequence<'a>,
        alarm: BitmapSequence<'a>,
    ) -> Self {
        Self {
            menu,
            play_pause,
            alarm,
        }
    }

    /// Validates default-sized frame tables and builds the asset set.
    ///
    /// `menu` is indexed by menu slot.
    ///
    /// # Errors
    /// * `EmptySequence` - any of the tables is empty
    pub fn from_frames(
        menu: [&'a [Frame]; 7],
        play_pause: &'a [Frame],
        alarm: &'a [Frame],
    ) -> Result<Self, SequenceError> {
        let play_pause = BitmapSequence::new(play_pause)?;
        let mut icons = [play_pause; 7];
        for (icon, frames) in icons.iter_mut().zip(menu) {
            *icon = BitmapSequence::new(frames)?;
        }

        Ok(Self::new(icons, play_pause, BitmapSequence::new(alarm)?))
    }

    /// The looping icon for a menu entry.
    pub fn menu_icon(&self, entry: MenuEntry) -> BitmapSequence<'a> {
        self.menu[entry.slot() as usize]
    }

    fn all(&self) -> impl Iterator<Item = &BitmapSequence<'a>> {
        self.menu.iter().chain([&self.play_pause, &self.alarm])
    }
}

/// What the caller should do after a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cycle {
    /// Keep polling.
    Continue,
    /// Outputs are blanked; hand the state to
    /// [`SuspendManager::suspend`](crate::SuspendManager::suspend).
    Suspend(RetainedState),
}

/// The device state machine.
///
/// Owns the output peripherals, the settings store, both animation engines,
/// the melody player and all timer state. Input is borrowed per poll.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `'a` - Lifetime of the bitmap assets
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `D`, `R`, `Z` - Display, LED ring and tone output types
/// * `S` - Settings store type
/// * `N` - Number of LEDs on the ring
pub struct Coordinator<
    't,
    'a,
    I: TimeInstant,
    T: TimeSource<I>,
    D: Display,
    R: LedRing,
    Z: ToneOutput,
    S: SettingsStore,
    const N: usize,
> {
    time_source: &'t T,
    config: Config,
    assets: Assets<'a>,
    outputs: Outputs<D, R, Z>,
    storage: S,
    mode: OperatingMode,
    position: i32,
    countdown: Countdown<I>,
    stopwatch: Stopwatch<I>,
    frames: FrameAnimator<'a, I>,
    ring: RingAnimator<I, N>,
    melody: MelodyPlayer<I>,
    muted: bool,
    last_interaction: I,
    sleep_snapshot: RetainedState,
    booting: bool,
    menu_fade: BlendStyle,
    sleep_fade: BlendStyle,
    timer_fade: BlendStyle,
}

impl<
    't,
    'a,
    I: TimeInstant,
    T: TimeSource<I>,
    D: Display,
    R: LedRing,
    Z: ToneOutput,
    S: SettingsStore,
    const N: usize,
> Coordinator<'t, 'a, I, T, D, R, Z, S, N>
{
    /// Creates a coordinator starting in `boot.mode` at `boot.position`.
    ///
    /// Reads the muted flag from `storage` once. A boot state inside a
    /// running or paused screen is settled to that screen's select mode.
    ///
    /// # Errors
    /// * Any error from [`Config::validate`]
    /// * `AssetTooLarge` - a bitmap does not fit the display
    pub fn new(
        time_source: &'t T,
        config: Config,
        assets: Assets<'a>,
        outputs: Outputs<D, R, Z>,
        storage: S,
        boot: BootState,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let (width, height) = outputs.display.size();
        if assets
            .all()
            .any(|seq| seq.width() > width || seq.height() > height)
        {
            return Err(ConfigError::AssetTooLarge);
        }

        let now = time_source.now();
        let muted = storage.muted();
        let mode = settle(boot.mode);

        let mut coordinator = Self {
            time_source,
            config,
            assets,
            outputs,
            storage,
            mode,
            position: boot.position,
            countdown: Countdown::new(),
            stopwatch: Stopwatch::new(),
            frames: FrameAnimator::new(config.display_frame_ms),
            ring: RingAnimator::new(config.ring_frame_ms),
            melody: MelodyPlayer::new(),
            muted,
            last_interaction: now,
            sleep_snapshot: RetainedState::default(),
            booting: true,
            menu_fade: fade(config.menu_fade_frames)?,
            sleep_fade: fade(config.sleep_fade_frames)?,
            timer_fade: fade(config.timer_fade_frames)?,
        };
        if matches!(mode, OperatingMode::TimerSelect | OperatingMode::PulseSelect) {
            coordinator.countdown.preview(coordinator.dialed_ms());
        }

        info!(
            "coordinator ready in {:?} at {} (muted: {})",
            mode, boot.position, muted
        );
        Ok(coordinator)
    }

    /// Runs one cycle.
    ///
    /// Call [`InputSource::tick`] first. Returns [`Cycle::Suspend`] once the
    /// sleep grace period has run out; outputs are already blanked by then.
    pub fn poll<In: InputSource>(&mut self, input: &mut In) -> Cycle {
        let now = self.time_source.now();

        if self.booting {
            self.boot(now, input);
        }

        match self.mode {
            OperatingMode::TimerRun | OperatingMode::PulseRun => {
                let remaining = self.countdown.sample(now);
                trace!("remaining {} ms", remaining);
            }
            OperatingMode::StopwatchRun => {
                let elapsed = self.stopwatch.sample(now);
                trace!("elapsed {} ms", elapsed);
            }
            _ => {}
        }

        if let Some((trigger, position)) = self.input_trigger(input) {
            if let Some(found) = transition(self.mode, trigger, position) {
                if let Some(state) = self.apply(found, position, now, input) {
                    return Cycle::Suspend(state);
                }
                self.last_interaction = now;
                self.play(CLICK, now);
            }
        }

        if let Some(trigger) = self.time_trigger(now) {
            if let Some(found) = transition(self.mode, trigger, self.position) {
                if let Some(state) = self.apply(found, self.position, now, input) {
                    return Cycle::Suspend(state);
                }
            }
        }

        self.frames.advance(now, &mut self.outputs.display);
        if !self.frames.is_running() {
            self.render_screen();
        }

        self.ring.advance(now, &mut self.outputs.ring);
        if !self.ring.is_running() {
            if let Some(pixels) = self.idle_ring() {
                self.ring.show_static(pixels, &mut self.outputs.ring);
            }
        }

        self.melody.advance(now, &mut self.outputs.tone);
        Cycle::Continue
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    /// Countdown value shown on the timer screens.
    pub fn remaining_ms(&self) -> i64 {
        self.countdown.remaining_ms()
    }

    /// Duration the running countdown was armed with.
    pub fn initial_ms(&self) -> i64 {
        self.countdown.initial_ms()
    }

    pub fn stopwatch_ms(&self) -> i64 {
        self.stopwatch.elapsed_ms()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn outputs(&self) -> &Outputs<D, R, Z> {
        &self.outputs
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn frames(&self) -> &FrameAnimator<'a, I> {
        &self.frames
    }

    pub fn ring(&self) -> &RingAnimator<I, N> {
        &self.ring
    }

    pub fn melody(&self) -> &MelodyPlayer<I> {
        &self.melody
    }

    fn boot<In: InputSource>(&mut self, now: I, input: &mut In) {
        self.booting = false;
        self.outputs.display.power_save(false);
        self.last_interaction = now;

        if self.mode == OperatingMode::ModeSelect {
            self.position = MenuEntry::wrap(self.position);
            if let Some(entry) = MenuEntry::from_slot(self.position) {
                self.frames.start(
                    self.assets.menu_icon(entry),
                    PlayOptions::LOOP,
                    now,
                    &mut self.outputs.display,
                );
            }
        }
        input.set_position(self.position);
    }

    /// A latched press if there is one, otherwise a rotation if the encoder
    /// moved.
    ///
    /// Presses keep the current position; rotations carry the new one.
    fn input_trigger<In: InputSource>(&self, input: &In) -> Option<(Trigger, i32)> {
        match input.last_event() {
            InputEvent::ShortPress => return Some((Trigger::ShortPress, self.position)),
            InputEvent::LongPress => return Some((Trigger::LongPress, self.position)),
            _ => {}
        }

        let position = input.position();
        (position != self.position).then_some((Trigger::Rotate, position))
    }

    fn time_trigger(&self, now: I) -> Option<Trigger> {
        let idle_ms = now.millis_since(self.last_interaction);

        if self.mode.is_counting_down() && self.countdown.is_expired() {
            Some(Trigger::Expired)
        } else if self.mode == OperatingMode::PrepareSleep {
            (idle_ms > u64::from(self.config.sleep_grace_ms)).then_some(Trigger::GraceElapsed)
        } else if idle_ms > u64::from(self.config.sleep_timeout_ms) {
            Some(Trigger::Inactive)
        } else {
            None
        }
    }

    /// Carries out a transition. Returns the snapshot to retain when the
    /// action suspends.
    fn apply<In: InputSource>(
        &mut self,
        found: Transition,
        position: i32,
        now: I,
        input: &mut In,
    ) -> Option<RetainedState> {
        let from = self.mode;
        if from != found.next {
            info!("{:?} -> {:?} ({:?})", from, found.next, found.action);
        } else {
            debug!("{:?}: {:?}", from, found.action);
        }
        self.mode = found.next;

        match found.action {
            Action::BrowseMenu => {
                self.set_position(MenuEntry::wrap(position), input);
                if let Some(entry) = MenuEntry::from_slot(self.position) {
                    self.frames.start(
                        self.assets.menu_icon(entry),
                        PlayOptions::LOOP,
                        now,
                        &mut self.outputs.display,
                    );
                }
            }
            Action::EnterEntry(entry) => {
                self.frames.stop();
                self.set_position(0, input);
                self.countdown.preview(0);
                let fade = match entry {
                    MenuEntry::Sleep => {
                        self.sleep_snapshot = RetainedState::new(OperatingMode::PrepareSleep, 0);
                        self.sleep_fade
                    }
                    MenuEntry::Stopwatch => {
                        self.stopwatch.reset();
                        self.menu_fade
                    }
                    _ => self.menu_fade,
                };
                self.ring.start_fade([BLACK; N], fade, now);
            }
            Action::ReturnToMenu(entry) => self.return_to_menu(entry, now, input),
            Action::PreviewDuration => {
                self.position = position;
                self.countdown.preview(self.dialed_ms());
            }
            Action::StartCountdown => {
                let duration = self.dialed_ms();
                self.countdown.arm(duration, now);
                self.start_play_pause(PlayOptions::ONCE, now);
                self.fade_to_gauge(RED, now);
            }
            Action::PauseCountdown => {
                self.countdown.sample(now);
                self.countdown.pause();
                self.start_play_pause(PlayOptions::REVERSE, now);
                self.fade_to_gauge(YELLOW, now);
            }
            Action::ResumeCountdown => {
                self.countdown.resume(now);
                self.start_play_pause(PlayOptions::ONCE, now);
                self.fade_to_gauge(RED, now);
            }
            Action::RevertToSelect => {
                self.countdown.pause();
                self.countdown.preview(self.dialed_ms());
                if from.is_counting_down() {
                    self.start_play_pause(PlayOptions::REVERSE, now);
                }
                self.ring.stop();
            }
            Action::FinishCountdown => {
                info!("countdown finished");
                self.frames.start(
                    self.assets.alarm,
                    PlayOptions::LOOP,
                    now,
                    &mut self.outputs.display,
                );
                self.ring
                    .start_pulse(BLACK, WHITE, self.config.pulse_period_ms, now);
                self.play(ALARM, now);
                self.last_interaction = now;
            }
            Action::DismissAlarm => {
                self.melody.stop(&mut self.outputs.tone);
                self.frames.stop();
                self.ring.stop();
                self.position = position;
                self.countdown.preview(self.dialed_ms());
            }
            Action::RepeatInterval => {
                self.countdown.rearm();
                debug!("interval repeated, {} ms left", self.countdown.remaining_ms());
                self.play(CLICK, now);
            }
            Action::StartStopwatch => self.stopwatch.start(now),
            Action::PauseStopwatch => {
                self.stopwatch.sample(now);
                self.stopwatch.pause();
                self.start_play_pause(PlayOptions::REVERSE, now);
            }
            Action::ResumeStopwatch => {
                self.stopwatch.resume(now);
                self.start_play_pause(PlayOptions::ONCE, now);
            }
            Action::ResetStopwatch => {
                self.stopwatch.reset();
                self.set_position(0, input);
            }
            Action::BrowseNetworks => {
                let slots = self.config.networks.len() as i32 + 1;
                self.set_position(position.rem_euclid(slots), input);
            }
            Action::StoreNetwork => {
                let network = usize::try_from(position - 1)
                    .ok()
                    .and_then(|index| self.config.networks.get(index));
                if let Some(id) = network {
                    info!("network selected: {}", id);
                    self.storage.set_network(id);
                }
            }
            Action::FinishNetworks => {
                self.storage.commit();
                self.return_to_menu(MenuEntry::Wifi, now, input);
            }
            Action::BrowseSettings => self.position = position,
            Action::SaveSettings => {
                self.muted = position.rem_euclid(2) == 0;
                info!("muted: {}", self.muted);
                self.storage.set_muted(self.muted);
                self.storage.commit();
                self.return_to_menu(MenuEntry::Settings, now, input);
            }
            Action::ArmSleep => {
                info!("inactive, preparing to sleep");
                self.sleep_snapshot = RetainedState::new(from, self.position);
                self.frames.stop();
                self.melody.stop(&mut self.outputs.tone);
                self.ring.start_fade([BLACK; N], self.sleep_fade, now);
                self.last_interaction = now;
            }
            Action::Suspend => {
                self.frames.stop();
                self.melody.stop(&mut self.outputs.tone);
                self.ring.blank(&mut self.outputs.ring);
                self.outputs.display.power_save(true);
                self.last_interaction = now;
                return Some(self.sleep_snapshot);
            }
        }

        None
    }

    fn return_to_menu<In: InputSource>(&mut self, entry: MenuEntry, now: I, input: &mut In) {
        let slot = entry.slot();
        self.set_position(slot, input);
        self.frames.start(
            self.assets.menu_icon(entry),
            PlayOptions::LOOP,
            now,
            &mut self.outputs.display,
        );
        self.ring.start_fade(menu_marker::<N>(slot), self.menu_fade, now);
    }

    fn set_position<In: InputSource>(&mut self, position: i32, input: &mut In) {
        self.position = position;
        input.set_position(position);
    }

    fn start_play_pause(&mut self, options: PlayOptions, now: I) {
        self.frames.start(
            self.assets.play_pause,
            options,
            now,
            &mut self.outputs.display,
        );
    }

    fn fade_to_gauge(&mut self, color: Srgb, now: I) {
        let target = countdown_gauge::<N>(
            self.countdown.remaining_ms(),
            self.countdown.initial_ms(),
            self.position < 0,
            color,
        );
        self.ring.start_fade(target, self.timer_fade, now);
    }

    fn play(&mut self, melody: Melody, now: I) {
        if !self.muted {
            self.melody.start(melody, now, &mut self.outputs.tone);
        }
    }

    fn dialed_ms(&self) -> i64 {
        duration_for_position(
            self.position,
            self.config.cw_scale_ms,
            self.config.ccw_scale_ms,
        )
    }

    fn render_screen(&mut self) {
        let display = &mut self.outputs.display;
        match self.mode {
            OperatingMode::TimerSelect
            | OperatingMode::TimerRun
            | OperatingMode::TimerPaused
            | OperatingMode::TimerFinished
            | OperatingMode::PulseSelect
            | OperatingMode::PulseRun => display.render_time(self.countdown.remaining_ms()),
            OperatingMode::StopwatchStart
            | OperatingMode::StopwatchRun
            | OperatingMode::StopwatchPaused => display.render_time(self.stopwatch.elapsed_ms()),
            OperatingMode::WifiSelect => {
                let selected = usize::try_from(self.position - 1)
                    .ok()
                    .and_then(|index| self.config.networks.get(index))
                    .copied()
                    .unwrap_or("< back");
                display.render_text(&["Wi-Fi", selected]);
            }
            OperatingMode::Settings => {
                let sound = if self.position.rem_euclid(2) == 0 {
                    "off"
                } else {
                    "on"
                };
                display.render_text(&["Sound", sound]);
            }
            OperatingMode::Info => display.render_text(self.config.info_lines),
            OperatingMode::ModeSelect | OperatingMode::PrepareSleep => {}
        }
    }

    fn idle_ring(&self) -> Option<[Srgb; N]> {
        let reversed = self.position < 0;
        match self.mode {
            OperatingMode::ModeSelect => Some(menu_marker(self.position)),
            OperatingMode::TimerSelect | OperatingMode::PulseSelect => {
                let color = if reversed { BLUE } else { GREEN };
                Some(selection_gauge(
                    self.position.unsigned_abs(),
                    reversed,
                    color,
                ))
            }
            OperatingMode::TimerRun | OperatingMode::PulseRun => Some(countdown_gauge(
                self.countdown.remaining_ms(),
                self.countdown.initial_ms(),
                reversed,
                RED,
            )),
            OperatingMode::TimerPaused => Some(countdown_gauge(
                self.countdown.remaining_ms(),
                self.countdown.initial_ms(),
                reversed,
                YELLOW,
            )),
            _ => None,
        }
    }
}

fn fade(frames: u16) -> Result<BlendStyle, ConfigError> {
    BlendStyle::fade(frames).map_err(|_| ConfigError::ZeroFadeFrames)
}

/// Running and paused screens cannot be resumed without their timer state,
/// so they come back as the matching select screen.
fn settle(mode: OperatingMode) -> OperatingMode {
    match mode {
        OperatingMode::TimerRun | OperatingMode::TimerPaused => OperatingMode::TimerSelect,
        OperatingMode::PulseRun => OperatingMode::PulseSelect,
        OperatingMode::StopwatchRun | OperatingMode::StopwatchPaused => {
            OperatingMode::StopwatchStart
        }
        mode => mode,
    }
}
