//! The mode transition table.
//!
//! Every behavior of the [`Coordinator`](crate::Coordinator) is a function of
//! the current mode and one trigger. This module only decides *what* happens;
//! the coordinator carries the resulting [`Action`] out.

use crate::types::{MenuEntry, OperatingMode};

/// Something that can move the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// The encoder position changed.
    Rotate,
    /// Button released before the long-press threshold.
    ShortPress,
    /// Button held past the long-press threshold.
    LongPress,
    /// The running countdown dropped below zero.
    Expired,
    /// The sleep screen has been shown for the grace period.
    GraceElapsed,
    /// No interaction for the inactivity timeout.
    Inactive,
}

/// Work the coordinator performs for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Wrap the position over the menu and show the slot's animation.
    BrowseMenu,
    /// Open a menu entry with the position reset to zero.
    EnterEntry(MenuEntry),
    /// Go back to the menu with the cursor on the given entry.
    ReturnToMenu(MenuEntry),
    /// Recompute the dialed-in duration from the position.
    PreviewDuration,
    /// Arm the countdown with the dialed-in duration.
    StartCountdown,
    PauseCountdown,
    ResumeCountdown,
    /// Stop counting and go back to dialing a duration.
    RevertToSelect,
    /// Sound the alarm.
    FinishCountdown,
    /// Silence the alarm and dial a new duration.
    DismissAlarm,
    /// Add the interval back and beep.
    RepeatInterval,
    StartStopwatch,
    PauseStopwatch,
    ResumeStopwatch,
    ResetStopwatch,
    /// Wrap the position over the network list.
    BrowseNetworks,
    /// Persist the network under the cursor.
    StoreNetwork,
    /// Flush storage and go back to the menu.
    FinishNetworks,
    BrowseSettings,
    /// Persist the mute choice and go back to the menu.
    SaveSettings,
    /// Start the sleep countdown after inactivity.
    ArmSleep,
    /// Blank everything and hand over to the suspend manager.
    Suspend,
}

/// Outcome of a table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub action: Action,
    pub next: OperatingMode,
}

impl Transition {
    const fn new(action: Action, next: OperatingMode) -> Self {
        Self { action, next }
    }
}

/// Looks up what `trigger` does in `mode`.
///
/// `position` is the encoder position after the trigger; it decides between
/// "back" and "confirm" on screens where slot 0 means back. Returns `None`
/// when the trigger has no effect in this mode.
pub fn transition(mode: OperatingMode, trigger: Trigger, position: i32) -> Option<Transition> {
    use Action::*;
    use OperatingMode as M;
    use Trigger::*;

    if trigger == Inactive {
        return mode
            .allows_auto_sleep()
            .then_some(Transition::new(ArmSleep, M::PrepareSleep));
    }

    let found = match (mode, trigger) {
        (M::ModeSelect, Rotate) => Transition::new(BrowseMenu, M::ModeSelect),
        (M::ModeSelect, ShortPress) => {
            let entry = MenuEntry::from_slot(MenuEntry::wrap(position))?;
            Transition::new(EnterEntry(entry), entry.target_mode())
        }

        (M::TimerSelect, Rotate) => Transition::new(PreviewDuration, M::TimerSelect),
        (M::TimerSelect, ShortPress) if position == 0 => {
            Transition::new(ReturnToMenu(MenuEntry::Timer), M::ModeSelect)
        }
        (M::TimerSelect, ShortPress) => Transition::new(StartCountdown, M::TimerRun),

        (M::TimerRun, Expired) => Transition::new(FinishCountdown, M::TimerFinished),
        (M::TimerRun, ShortPress) => Transition::new(PauseCountdown, M::TimerPaused),

        (M::TimerPaused, ShortPress) => Transition::new(ResumeCountdown, M::TimerRun),
        (M::TimerPaused, LongPress) => Transition::new(RevertToSelect, M::TimerSelect),

        (M::TimerFinished, ShortPress | Rotate) => {
            Transition::new(DismissAlarm, M::TimerSelect)
        }

        (M::PulseSelect, Rotate) => Transition::new(PreviewDuration, M::PulseSelect),
        (M::PulseSelect, ShortPress) if position == 0 => {
            Transition::new(ReturnToMenu(MenuEntry::Pulse), M::ModeSelect)
        }
        (M::PulseSelect, ShortPress) => Transition::new(StartCountdown, M::PulseRun),

        (M::PulseRun, Expired) => Transition::new(RepeatInterval, M::PulseRun),
        (M::PulseRun, ShortPress) => Transition::new(RevertToSelect, M::PulseSelect),

        (M::StopwatchStart, ShortPress) => Transition::new(StartStopwatch, M::StopwatchRun),
        (M::StopwatchStart, LongPress) => {
            Transition::new(ReturnToMenu(MenuEntry::Stopwatch), M::ModeSelect)
        }

        (M::StopwatchRun, ShortPress) => Transition::new(PauseStopwatch, M::StopwatchPaused),

        (M::StopwatchPaused, ShortPress) => Transition::new(ResumeStopwatch, M::StopwatchRun),
        (M::StopwatchPaused, LongPress) => Transition::new(ResetStopwatch, M::StopwatchStart),

        (M::WifiSelect, Rotate) => Transition::new(BrowseNetworks, M::WifiSelect),
        (M::WifiSelect, ShortPress) if position == 0 => {
            Transition::new(FinishNetworks, M::ModeSelect)
        }
        (M::WifiSelect, ShortPress) => Transition::new(StoreNetwork, M::WifiSelect),

        (M::Settings, Rotate) => Transition::new(BrowseSettings, M::Settings),
        (M::Settings, ShortPress) => Transition::new(SaveSettings, M::ModeSelect),

        (M::Info, ShortPress) => Transition::new(ReturnToMenu(MenuEntry::Info), M::ModeSelect),

        (M::PrepareSleep, GraceElapsed) => Transition::new(Suspend, M::PrepareSleep),
        (M::PrepareSleep, ShortPress) => {
            Transition::new(ReturnToMenu(MenuEntry::Sleep), M::ModeSelect)
        }

        _ => return None,
    };

    Some(found)
}
