//! Shared test infrastructure for ring-timer integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;

use palette::Srgb;
use ring_timer::{
    Assets, BitmapSequence, BootState, Config, Coordinator, Display, FRAME_LEN, Frame,
    InputEvent, InputSource, LedRing, Level, Outputs, PowerControl, RetainedMemory,
    SettingsStore, TimeDuration, TimeInstant, TimeSource, ToneOutput, WakeCause, WakeTrigger,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    fn as_millis(&self) -> u64 {
        self.0
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u64) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + millis));
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Outputs
// ============================================================================

pub const SCREEN_WIDTH: u16 = 128;
pub const SCREEN_HEIGHT: u16 = 64;

/// A bitmap draw call as seen by the display
#[derive(Debug, Clone, PartialEq)]
pub struct BitmapCall {
    pub bytes: heapless::Vec<u8, FRAME_LEN>,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// Mock display that remembers the last thing drawn
pub struct MockDisplay {
    pub last_time: Option<i64>,
    pub last_bitmap: Option<BitmapCall>,
    pub last_text: heapless::Vec<heapless::String<32>, 4>,
    pub bitmap_count: usize,
    pub power_save: bool,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self {
            last_time: None,
            last_bitmap: None,
            last_text: heapless::Vec::new(),
            bitmap_count: 0,
            power_save: false,
        }
    }

    /// First byte of the last bitmap, which the fixtures use as a tag
    pub fn last_tag(&self) -> Option<u8> {
        self.last_bitmap.as_ref().map(|call| call.bytes[0])
    }

    pub fn text_line(&self, index: usize) -> Option<&str> {
        self.last_text.get(index).map(|line| line.as_str())
    }
}

impl Display for MockDisplay {
    fn size(&self) -> (u16, u16) {
        (SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    fn render_time(&mut self, millis: i64) {
        self.last_time = Some(millis);
    }

    fn render_bitmap(&mut self, bitmap: &[u8], x: u16, y: u16, width: u16, height: u16) {
        let mut bytes = heapless::Vec::new();
        let _ = bytes.extend_from_slice(bitmap);
        self.last_bitmap = Some(BitmapCall {
            bytes,
            x,
            y,
            width,
            height,
        });
        self.bitmap_count += 1;
    }

    fn render_text(&mut self, lines: &[&str]) {
        self.last_text.clear();
        for line in lines {
            let mut text = heapless::String::new();
            let _ = text.push_str(line);
            let _ = self.last_text.push(text);
        }
    }

    fn power_save(&mut self, on: bool) {
        self.power_save = on;
    }
}

pub const RING_LEDS: usize = 16;

/// Mock LED ring that separates the pending frame from the latched one
pub struct MockRing {
    pending: [Srgb; RING_LEDS],
    pub shown: [Srgb; RING_LEDS],
    pub show_count: usize,
}

impl MockRing {
    pub fn new() -> Self {
        Self {
            pending: [BLACK; RING_LEDS],
            shown: [BLACK; RING_LEDS],
            show_count: 0,
        }
    }

    pub fn is_dark(&self) -> bool {
        self.shown.iter().all(|c| colors_equal(*c, BLACK))
    }
}

impl LedRing for MockRing {
    fn set_pixel(&mut self, index: usize, color: Srgb) {
        if let Some(pixel) = self.pending.get_mut(index) {
            *pixel = color;
        }
    }

    fn show(&mut self) {
        self.shown = self.pending;
        self.show_count += 1;
    }

    fn clear(&mut self) {
        self.pending = [BLACK; RING_LEDS];
    }
}

/// Mock buzzer recording every tone started
pub struct MockTone {
    pub playing: Option<u16>,
    pub history: heapless::Vec<u16, 64>,
    pub stop_count: usize,
}

impl MockTone {
    pub fn new() -> Self {
        Self {
            playing: None,
            history: heapless::Vec::new(),
            stop_count: 0,
        }
    }
}

impl ToneOutput for MockTone {
    fn play_tone(&mut self, freq_hz: u16, _duration_ms: u16) {
        self.playing = Some(freq_hz);
        let _ = self.history.push(freq_hz);
    }

    fn stop(&mut self) {
        self.playing = None;
        self.stop_count += 1;
    }
}

// ============================================================================
// Mock Storage
// ============================================================================

/// Mock settings store; writes become durable on commit
pub struct MockStore {
    pub muted: bool,
    pub pending_muted: Option<bool>,
    pub network: Option<heapless::String<32>>,
    pub pending_network: Option<heapless::String<32>>,
    pub commits: usize,
}

impl MockStore {
    pub fn new(muted: bool) -> Self {
        Self {
            muted,
            pending_muted: None,
            network: None,
            pending_network: None,
            commits: 0,
        }
    }
}

impl SettingsStore for MockStore {
    fn muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.pending_muted = Some(muted);
    }

    fn set_network(&mut self, id: &str) {
        let mut text = heapless::String::new();
        let _ = text.push_str(id);
        self.pending_network = Some(text);
    }

    fn commit(&mut self) {
        if let Some(muted) = self.pending_muted.take() {
            self.muted = muted;
        }
        if let Some(network) = self.pending_network.take() {
            self.network = Some(network);
        }
        self.commits += 1;
    }
}

/// Mock retained memory region
pub struct MockRetained {
    pub words: [u32; 2],
    pub writes: usize,
}

impl MockRetained {
    pub fn new() -> Self {
        Self {
            words: [0; 2],
            writes: 0,
        }
    }
}

impl RetainedMemory for MockRetained {
    fn read(&self) -> [u32; 2] {
        self.words
    }

    fn write(&mut self, words: [u32; 2]) {
        self.words = words;
        self.writes += 1;
    }
}

/// Mock sleep controller; `enter_deep_sleep` just records the call
pub struct MockPower {
    pub cause: WakeCause,
    pub level: Level,
    pub wake_sources_disabled: bool,
    pub armed: heapless::Vec<WakeTrigger, 4>,
    pub asleep: bool,
}

impl MockPower {
    pub fn new(cause: WakeCause) -> Self {
        Self {
            cause,
            level: Level::High,
            wake_sources_disabled: false,
            armed: heapless::Vec::new(),
            asleep: false,
        }
    }
}

impl PowerControl for MockPower {
    fn wake_cause(&self) -> WakeCause {
        self.cause
    }

    fn button_level(&self) -> Level {
        self.level
    }

    fn disable_wake_sources(&mut self) {
        self.wake_sources_disabled = true;
        self.armed.clear();
    }

    fn arm_wake(&mut self, trigger: WakeTrigger) {
        let _ = self.armed.push(trigger);
    }

    fn enter_deep_sleep(&mut self) {
        self.asleep = true;
    }
}

// ============================================================================
// Mock Input
// ============================================================================

/// Scripted input: queue an event, then `tick` latches it for one cycle
pub struct MockInput {
    position: i32,
    queued: InputEvent,
    latched: InputEvent,
}

impl MockInput {
    pub fn new() -> Self {
        Self {
            position: 0,
            queued: InputEvent::None,
            latched: InputEvent::None,
        }
    }

    pub fn press(&mut self) {
        self.queued = InputEvent::ShortPress;
    }

    pub fn long_press(&mut self) {
        self.queued = InputEvent::LongPress;
    }

    /// Turns the knob by `detents` (positive is clockwise)
    pub fn turn(&mut self, detents: i32) {
        self.position += detents;
        self.queued = if detents >= 0 {
            InputEvent::RotateCw
        } else {
            InputEvent::RotateCcw
        };
    }
}

impl InputSource for MockInput {
    fn tick(&mut self) {
        self.latched = self.queued;
        self.queued = InputEvent::None;
    }

    fn position(&self) -> i32 {
        self.position
    }

    fn set_position(&mut self, position: i32) {
        self.position = position;
    }

    fn last_event(&self) -> InputEvent {
        self.latched
    }
}

// ============================================================================
// Fixtures
// ============================================================================

const fn frame(tag: u8) -> Frame {
    [tag; FRAME_LEN]
}

/// Menu icons tagged 0x10 + slot, two frames each
pub static MENU_FRAMES: [[Frame; 2]; 7] = [
    [frame(0x10), frame(0x10)],
    [frame(0x11), frame(0x11)],
    [frame(0x12), frame(0x12)],
    [frame(0x13), frame(0x13)],
    [frame(0x14), frame(0x14)],
    [frame(0x15), frame(0x15)],
    [frame(0x16), frame(0x16)],
];

/// Play/pause frames tagged 0x20, 0x21, 0x22
pub static PLAY_PAUSE_FRAMES: [Frame; 3] = [frame(0x20), frame(0x21), frame(0x22)];

/// Alarm frames tagged 0x30, 0x31
pub static ALARM_FRAMES: [Frame; 2] = [frame(0x30), frame(0x31)];

pub fn menu_tag(slot: usize) -> u8 {
    0x10 + slot as u8
}

pub fn test_assets() -> Assets<'static> {
    let menu: [&'static [Frame]; 7] = [
        &MENU_FRAMES[0],
        &MENU_FRAMES[1],
        &MENU_FRAMES[2],
        &MENU_FRAMES[3],
        &MENU_FRAMES[4],
        &MENU_FRAMES[5],
        &MENU_FRAMES[6],
    ];
    Assets::from_frames(menu, &PLAY_PAUSE_FRAMES, &ALARM_FRAMES).unwrap()
}

pub fn sequence(frames: &'static [Frame]) -> BitmapSequence<'static> {
    BitmapSequence::new(frames).unwrap()
}

pub type TestCoordinator<'t> = Coordinator<
    't,
    'static,
    TestInstant,
    MockTimeSource,
    MockDisplay,
    MockRing,
    MockTone,
    MockStore,
    RING_LEDS,
>;

pub fn coordinator_with(
    clock: &MockTimeSource,
    config: Config,
    muted: bool,
    boot: BootState,
) -> TestCoordinator<'_> {
    let outputs = Outputs::new(MockDisplay::new(), MockRing::new(), MockTone::new());
    Coordinator::new(clock, config, test_assets(), outputs, MockStore::new(muted), boot).unwrap()
}

/// A coordinator on a cold boot with default config and sound on
pub fn coordinator(clock: &MockTimeSource) -> TestCoordinator<'_> {
    coordinator_with(clock, Config::default(), false, BootState::default())
}

/// Latches queued input and runs one poll
pub fn cycle(coordinator: &mut TestCoordinator<'_>, input: &mut MockInput) -> ring_timer::Cycle {
    input.tick();
    coordinator.poll(input)
}

/// Advances the clock in `step` increments, polling after each
pub fn run_for(
    clock: &MockTimeSource,
    coordinator: &mut TestCoordinator<'_>,
    input: &mut MockInput,
    millis: u64,
    step: u64,
) {
    let mut elapsed = 0;
    while elapsed < millis {
        let delta = step.min(millis - elapsed);
        clock.advance(delta);
        elapsed += delta;
        cycle(coordinator, input);
    }
}

// ============================================================================
// Re-export color constants from library for test convenience
// ============================================================================

#[allow(unused_imports)]
pub use ring_timer::colors::{AQUA, BLACK, BLUE, GREEN, RED, WHITE, YELLOW};

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Compare two colors with floating-point tolerance
pub fn colors_equal(a: Srgb, b: Srgb) -> bool {
    const EPSILON: f32 = 0.001;
    (a.red - b.red).abs() < EPSILON
        && (a.green - b.green).abs() < EPSILON
        && (a.blue - b.blue).abs() < EPSILON
}
