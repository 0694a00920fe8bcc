//! Integration tests for saving and restoring state around deep sleep

mod common;
use common::*;

use proptest::prelude::*;
use ring_timer::{
    BootState, Level, OperatingMode, RetainedState, SuspendManager, WakeCause, WakeTrigger,
};

fn manager(cause: WakeCause) -> SuspendManager<MockRetained, MockPower> {
    SuspendManager::new(MockRetained::new(), MockPower::new(cause))
}

#[test]
fn external_wake_restores_saved_state() {
    let mut suspend = manager(WakeCause::External);
    suspend.suspend(RetainedState::new(OperatingMode::TimerSelect, -4));
    assert_eq!(suspend.memory().writes, 1);

    let boot = suspend.resume();
    assert_eq!(
        boot,
        BootState {
            mode: OperatingMode::TimerSelect,
            position: -4,
            woke_from_sleep: true,
        }
    );
}

#[test]
fn sleep_screen_comes_back_as_menu() {
    let mut suspend = manager(WakeCause::External);
    suspend.suspend(RetainedState::new(OperatingMode::PrepareSleep, 0));

    let boot = suspend.resume();
    assert_eq!(boot.mode, OperatingMode::ModeSelect);
    assert!(boot.woke_from_sleep);
}

#[test]
fn power_on_ignores_retained_memory() {
    let mut memory = MockRetained::new();
    memory.words = RetainedState::new(OperatingMode::Info, 6).to_words();
    let suspend = SuspendManager::new(memory, MockPower::new(WakeCause::PowerOn));

    assert_eq!(suspend.resume(), BootState::default());
}

#[test]
fn blank_memory_after_external_wake_uses_defaults() {
    let suspend = manager(WakeCause::External);
    assert_eq!(suspend.resume(), BootState::default());
}

#[test]
fn wake_is_armed_on_the_opposite_level() {
    let mut suspend = manager(WakeCause::Other);
    suspend.power_mut().level = Level::Low;
    suspend.suspend(RetainedState::default());

    let power = suspend.power();
    assert!(power.wake_sources_disabled);
    assert_eq!(power.armed.as_slice(), &[WakeTrigger { level: Level::High }]);
    assert!(power.asleep);
}

#[test]
fn previously_armed_sources_are_cleared() {
    let mut suspend = manager(WakeCause::External);
    suspend.suspend(RetainedState::default());
    suspend.suspend(RetainedState::default());

    assert_eq!(suspend.power().armed.len(), 1);
    assert_eq!(suspend.power().armed[0].level, Level::Low);
}

#[test]
fn coordinator_snapshot_survives_a_suspend_cycle() {
    let clock = MockTimeSource::new();
    let mut input = MockInput::new();
    let mut c = coordinator(&clock);
    cycle(&mut c, &mut input);

    input.turn(4);
    cycle(&mut c, &mut input);
    input.press();
    cycle(&mut c, &mut input);
    input.turn(-1);
    cycle(&mut c, &mut input);
    assert_eq!(c.mode(), OperatingMode::PulseSelect);

    clock.advance(60_001);
    cycle(&mut c, &mut input);
    clock.advance(2_001);
    let ring_timer::Cycle::Suspend(state) = cycle(&mut c, &mut input) else {
        panic!("expected suspend");
    };

    let mut suspend = manager(WakeCause::External);
    suspend.suspend(state);
    let boot = suspend.resume();

    let woken = coordinator_with(&clock, ring_timer::Config::default(), false, boot);
    assert_eq!(woken.mode(), OperatingMode::PulseSelect);
    assert_eq!(woken.position(), -1);
    assert_eq!(woken.remaining_ms(), 60_000);
}

proptest! {
    #[test]
    fn retained_words_round_trip(code in 0u8..14, position in any::<i32>()) {
        let mode = OperatingMode::from_code(code).unwrap();
        let state = RetainedState::new(mode, position);
        prop_assert_eq!(RetainedState::from_words(state.to_words()), Some(state));
    }

    #[test]
    fn unknown_mode_codes_are_rejected(code in 14u32..0x1_0000, position in any::<u32>()) {
        prop_assert_eq!(RetainedState::from_words([0x5254_0000 | code, position]), None);
    }
}
