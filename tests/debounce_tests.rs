//! Integration tests for the debounce state machine driven through App

mod common;
use common::*;

use tick_debounce::{BuildConfig, ButtonEvent, ButtonState, GateReason, PollOutcome, SharedState};

#[test]
fn boot_count_five_single_press_sequence() {
    let board = MockBoard::new(5);
    let shared = SharedState::new();
    let mut handlers = board.handlers();
    let mut app = board.app(&shared);

    // Pin levels: 1 = released, 0 = pressed
    let levels = [1u8, 1, 0, 0, 0, 1, 1, 1];
    let mut presses = 0;
    for level in levels {
        let transition = sample(&board, &mut handlers, &mut app, &shared, level == 0);
        if transition.event == Some(ButtonEvent::Press) {
            assert_eq!(transition.from, ButtonState::Released);
            assert_eq!(transition.to, ButtonState::Pushed);
            presses += 1;
        }
    }
    board.complete_write();

    assert_eq!(presses, 1);
    assert_eq!(app.press_count(), 6);
    assert_eq!(board.stored(0), 6);
    assert_eq!(board.primary.toggles.get(), 1);
    assert_eq!(app.state(), ButtonState::Released);
}

#[test]
fn state_walk_through_press_and_release() {
    let board = MockBoard::new(0);
    let shared = SharedState::new();
    let mut handlers = board.handlers();
    let mut app = board.app(&shared);

    let expected = [
        (true, ButtonState::Pushed),
        (true, ButtonState::Pushed),
        (false, ButtonState::MaybeReleased),
        (false, ButtonState::Released),
        (false, ButtonState::Released),
    ];

    for (pressed, state) in expected {
        let transition = sample(&board, &mut handlers, &mut app, &shared, pressed);
        assert_eq!(transition.to, state);
    }
}

#[test]
fn single_released_blip_during_hold_is_absorbed() {
    let board = MockBoard::new(10);
    let shared = SharedState::new();
    let mut handlers = board.handlers();
    let mut app = board.app(&shared);

    sample(&board, &mut handlers, &mut app, &shared, true);
    sample(&board, &mut handlers, &mut app, &shared, true);
    assert_eq!(board.primary.toggles.get(), 1);
    assert_eq!(app.press_count(), 11);

    // One-tick blip
    let blip = sample(&board, &mut handlers, &mut app, &shared, false);
    assert_eq!(blip.to, ButtonState::MaybeReleased);
    let back = sample(&board, &mut handlers, &mut app, &shared, true);
    assert_eq!(back.to, ButtonState::Pushed);
    assert_eq!(back.event, None);

    sample(&board, &mut handlers, &mut app, &shared, true);

    assert_eq!(board.primary.toggles.get(), 1);
    assert_eq!(app.press_count(), 11);
    assert_eq!(board.write_history.borrow().len(), 1);
}

#[test]
fn toggles_once_per_run_of_presses_after_confirmed_release() {
    for seed in [1u32, 7, 42, 1234, 0xDEAD_BEEF] {
        let board = MockBoard::new(0);
        let shared = SharedState::new();
        let mut handlers = board.handlers();
        let mut app = board.app(&shared);

        let levels = pin_levels(seed, 400);

        // Reference: a run of pressed samples counts if the button was
        // confirmed released before it; two released samples confirm release.
        let mut expected = 0u32;
        let mut confirmed_released = true;
        let mut released_run = 0;
        let mut previous = false;
        for &pressed in levels.iter() {
            if pressed {
                if !previous && confirmed_released {
                    expected += 1;
                }
                confirmed_released = false;
                released_run = 0;
            } else {
                released_run += 1;
                if released_run >= 2 {
                    confirmed_released = true;
                }
            }
            previous = pressed;
        }

        for &pressed in levels.iter() {
            sample(&board, &mut handlers, &mut app, &shared, pressed);
        }

        assert_eq!(board.primary.toggles.get(), expected, "seed {seed}");
        assert_eq!(app.press_count() as u32, expected % 256, "seed {seed}");
    }
}

#[test]
fn polls_between_ticks_are_gated() {
    let board = MockBoard::new(0);
    let shared = SharedState::new();
    let mut handlers = board.handlers();
    let mut app = board.app(&shared);

    // No tick yet since boot
    assert_eq!(app.poll(&shared), PollOutcome::Gated(GateReason::SameTick));

    fire_timer(&board, &mut handlers, &shared);
    board.set_pressed(true);
    assert!(matches!(app.poll(&shared), PollOutcome::Advanced(_)));

    // Cooldown of 2 ticks now running
    for _ in 0..10 {
        assert_eq!(app.poll(&shared), PollOutcome::Gated(GateReason::Cooldown));
    }
    fire_timer(&board, &mut handlers, &shared);
    assert_eq!(app.poll(&shared), PollOutcome::Gated(GateReason::Cooldown));
    fire_timer(&board, &mut handlers, &shared);
    assert!(matches!(app.poll(&shared), PollOutcome::Advanced(_)));
}

#[test]
fn same_tick_gate_holds_when_cooldown_already_expired() {
    let board = MockBoard::new(0);
    let shared = SharedState::new();
    let mut handlers = board.handlers();
    let mut app = board.app(&shared);

    fire_timer(&board, &mut handlers, &shared);
    assert!(matches!(app.poll(&shared), PollOutcome::Advanced(_)));

    // Force the cooldown back to zero without a tick
    shared.restart_cooldown(0);
    assert_eq!(app.poll(&shared), PollOutcome::Gated(GateReason::SameTick));
}

#[test]
fn never_advances_twice_per_tick_or_during_cooldown() {
    let board = MockBoard::new(0);
    let shared = SharedState::new();
    let mut handlers = board.handlers();
    let mut app = board.app(&shared);

    let levels = pin_levels(99, 300);
    let mut last_advance_tick: Option<u8> = None;
    let mut advances = 0;

    for (i, &pressed) in levels.iter().enumerate() {
        board.set_pressed(pressed);
        // Several polls per tick, as a free-running loop would do
        for _ in 0..3 {
            let cooldown_before = shared.cooldown();
            let tick_before = shared.tick();
            if let PollOutcome::Advanced(transition) = app.poll(&shared) {
                assert_eq!(cooldown_before, 0, "advanced during cooldown at sample {i}");
                assert_eq!(transition.tick, tick_before);
                assert_ne!(Some(transition.tick), last_advance_tick);
                last_advance_tick = Some(transition.tick);
                advances += 1;
            }
        }
        fire_timer(&board, &mut handlers, &shared);
    }

    // One advance every debounce period
    assert!(advances >= levels.len() / 2 - 1);
    assert!(advances <= levels.len() / 2 + 1);
}

#[test]
fn longer_debounce_period_spaces_advances() {
    let board = MockBoard::new(0);
    let shared = SharedState::new();
    let mut handlers = board.handlers();
    let config = BuildConfig::DEFAULT.with_debounce_period(5);
    let mut app = board.app_with(&shared, &config);

    let first = sample(&board, &mut handlers, &mut app, &shared, false);
    let second = sample(&board, &mut handlers, &mut app, &shared, false);

    assert_eq!(app.debouncer().period(), 5);
    assert_eq!(app.debouncer().last_done_tick(), second.tick);
    assert_eq!(second.tick.wrapping_sub(first.tick), 5);
}
