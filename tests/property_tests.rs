//! Property tests for menu navigation and countdown bookkeeping

mod common;
use common::*;

use proptest::prelude::*;
use ring_timer::{MenuEntry, OperatingMode};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn menu_position_stays_in_range(turns in prop::collection::vec(-3i32..=3, 1..24)) {
        let clock = MockTimeSource::new();
        let mut input = MockInput::new();
        let mut c = coordinator(&clock);
        cycle(&mut c, &mut input);

        let mut expected = 0i32;
        for detents in turns {
            clock.advance(10);
            input.turn(detents);
            cycle(&mut c, &mut input);
            expected = (expected + detents).rem_euclid(7);

            prop_assert_eq!(c.mode(), OperatingMode::ModeSelect);
            prop_assert_eq!(c.position(), expected);
            prop_assert!(MenuEntry::from_slot(c.position()).is_some());
        }
    }

    #[test]
    fn countdown_loses_exactly_the_elapsed_time(
        detents in 1i32..30,
        steps in prop::collection::vec(1u64..250, 1..40),
    ) {
        let clock = MockTimeSource::new();
        let mut input = MockInput::new();
        let mut c = coordinator(&clock);
        cycle(&mut c, &mut input);

        input.press();
        cycle(&mut c, &mut input);
        input.turn(detents);
        cycle(&mut c, &mut input);
        input.press();
        cycle(&mut c, &mut input);

        let initial = i64::from(detents) * 10_000;
        prop_assert_eq!(c.initial_ms(), initial);

        let mut elapsed = 0i64;
        for step in steps {
            clock.advance(step);
            cycle(&mut c, &mut input);
            elapsed += step as i64;

            prop_assert_eq!(c.mode(), OperatingMode::TimerRun);
            prop_assert_eq!(c.remaining_ms(), initial - elapsed);
        }
    }
}
