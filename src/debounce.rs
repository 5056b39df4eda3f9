//! Three-state button debouncer polled from the foreground loop.
//!
//! Provides [`Debouncer`], which samples the button at most once per elapsed
//! tick and never while a cooldown is running, and [`ButtonState`], whose
//! transition table turns raw samples into confirmed press and release
//! events.

use crate::shared::SharedState;

/// Debounced button state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    /// Button confirmed up.
    Released,
    /// Button confirmed down.
    Pushed,
    /// One released sample seen while pushed; a second one confirms release.
    MaybeReleased,
}

/// Confirmed button edge produced by a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// `Released` → `Pushed`.
    Press,
    /// `MaybeReleased` → `Released`.
    Release,
}

impl ButtonState {
    /// Applies one sample to the state.
    ///
    /// # Returns
    /// The next state and the confirmed edge, if this transition produced one.
    pub fn next(self, pressed: bool) -> (ButtonState, Option<ButtonEvent>) {
        match (self, pressed) {
            (ButtonState::Released, true) => (ButtonState::Pushed, Some(ButtonEvent::Press)),
            (ButtonState::Released, false) => (ButtonState::Released, None),
            (ButtonState::Pushed, true) => (ButtonState::Pushed, None),
            (ButtonState::Pushed, false) => (ButtonState::MaybeReleased, None),
            (ButtonState::MaybeReleased, true) => (ButtonState::Pushed, None),
            (ButtonState::MaybeReleased, false) => {
                (ButtonState::Released, Some(ButtonEvent::Release))
            }
        }
    }
}

/// Why a poll did not advance the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateReason {
    /// The cooldown from the previous advance is still running.
    Cooldown,
    /// No tick has elapsed since the previous advance.
    SameTick,
}

/// A single state machine advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: ButtonState,
    pub to: ButtonState,
    pub event: Option<ButtonEvent>,
    /// Tick at which the advance happened.
    pub tick: u8,
}

/// Result of polling the debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    /// The gate was closed; the sample was ignored.
    Gated(GateReason),
    /// The state machine consumed the sample.
    Advanced(Transition),
}

impl PollOutcome {
    /// Returns the confirmed edge, if the poll produced one.
    pub fn event(&self) -> Option<ButtonEvent> {
        match self {
            PollOutcome::Advanced(transition) => transition.event,
            PollOutcome::Gated(_) => None,
        }
    }
}

/// Rate-limited button state machine.
///
/// Owned by the foreground loop. The interrupt side only ever sees the
/// shared tick and cooldown it reads here.
#[derive(Debug, Clone)]
pub struct Debouncer {
    state: ButtonState,
    last_done_tick: u8,
    period: u8,
}

impl Debouncer {
    /// Creates a debouncer in the `Released` state.
    ///
    /// `boot_tick` is the current system tick; the first advance waits for
    /// the tick to move past it. `period` is the cooldown in ticks applied
    /// after every advance.
    pub fn new(boot_tick: u8, period: u8) -> Self {
        Self {
            state: ButtonState::Released,
            last_done_tick: boot_tick,
            period,
        }
    }

    /// Feeds one button sample through the gate and, if open, the state machine.
    pub fn poll(&mut self, shared: &SharedState, pressed: bool) -> PollOutcome {
        if shared.cooldown() != 0 {
            return PollOutcome::Gated(GateReason::Cooldown);
        }

        let tick = shared.tick();
        if tick == self.last_done_tick {
            return PollOutcome::Gated(GateReason::SameTick);
        }

        self.last_done_tick = tick;
        shared.restart_cooldown(self.period);

        let from = self.state;
        let (to, event) = from.next(pressed);
        self.state = to;

        if from != to {
            trace!("button {} -> {} at tick {}", from, to, tick);
        }

        PollOutcome::Advanced(Transition {
            from,
            to,
            event,
            tick,
        })
    }

    /// Returns the current debounced state.
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Returns the tick of the most recent advance.
    pub fn last_done_tick(&self) -> u8 {
        self.last_done_tick
    }

    /// Returns the cooldown period in ticks.
    pub fn period(&self) -> u8 {
        self.period
    }
}
