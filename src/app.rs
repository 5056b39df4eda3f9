//! Foreground polling loop.
//!
//! [`App`] owns everything the foreground touches: the debouncer, the press
//! counter, the primary indicator, and its own handles to the button and the
//! change interrupt.

use crate::change::ChangeInterrupt;
use crate::config::BuildConfig;
use crate::debounce::{ButtonEvent, ButtonState, Debouncer, PollOutcome};
use crate::io::{ButtonInput, Indicator};
use crate::persist::{NonVolatileStore, PRESS_COUNT_ADDRESS, PressCounter};
use crate::shared::SharedState;

/// How the foreground loop paces itself between polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitMode {
    /// Spin until the tick changes after every poll. Keeps polls phase
    /// aligned with the timer.
    BusySpin,
    /// Poll continuously and rely on the debouncer's gate.
    FreeRun,
}

/// Spins until the shared tick differs from `current`, then stores the new
/// tick in `current` and returns it.
pub fn wait_for_next_tick(shared: &SharedState, current: &mut u8) -> u8 {
    while *current == shared.tick() {
        core::hint::spin_loop();
    }
    *current = shared.tick();
    *current
}

/// Foreground application state.
///
/// # Type Parameters
/// * `B` - Button input
/// * `L` - Primary indicator
/// * `C` - Pin-change interrupt, for re-arming
/// * `S` - Non-volatile store holding the press counter
pub struct App<B, L, C, S>
where
    B: ButtonInput,
    L: Indicator,
    C: ChangeInterrupt,
    S: NonVolatileStore,
{
    button: B,
    indicator: L,
    change: C,
    counter: PressCounter<S>,
    debouncer: Debouncer,
}

impl<B, L, C, S> App<B, L, C, S>
where
    B: ButtonInput,
    L: Indicator,
    C: ChangeInterrupt,
    S: NonVolatileStore,
{
    /// Boots the foreground.
    ///
    /// Loads the press counter, switches the primary indicator on, starts the
    /// debouncer in `Released` at the current tick and arms the change
    /// interrupt.
    pub fn new(
        shared: &SharedState,
        config: &BuildConfig,
        button: B,
        mut indicator: L,
        change: C,
        store: S,
    ) -> Self {
        let counter = PressCounter::load(store, PRESS_COUNT_ADDRESS);
        indicator.set(true);
        change.arm();

        Self {
            button,
            indicator,
            change,
            counter,
            debouncer: Debouncer::new(shared.tick(), config.debounce_period),
        }
    }

    /// Samples the button once and advances the debouncer if its gate is open.
    ///
    /// A confirmed press toggles the primary indicator and persists the
    /// incremented count. A confirmed release re-arms the change interrupt;
    /// nothing re-arms it on press.
    pub fn poll(&mut self, shared: &SharedState) -> PollOutcome {
        let outcome = self.debouncer.poll(shared, self.button.is_pressed());

        match outcome.event() {
            Some(ButtonEvent::Press) => {
                self.indicator.toggle();
                let count = self.counter.record_press();
                debug!("press confirmed, count {}", count);
            }
            Some(ButtonEvent::Release) => {
                self.change.arm();
            }
            None => {}
        }

        outcome
    }

    /// Runs the foreground loop forever.
    pub fn run(&mut self, shared: &SharedState, mode: WaitMode) -> ! {
        info!("foreground running, {}", mode);

        let mut current_tick = shared.tick();
        loop {
            self.poll(shared);

            if mode == WaitMode::BusySpin {
                wait_for_next_tick(shared, &mut current_tick);
            }
        }
    }

    /// Returns the debounced button state.
    pub fn state(&self) -> ButtonState {
        self.debouncer.state()
    }

    /// Returns the in-memory press count.
    pub fn press_count(&self) -> u8 {
        self.counter.count()
    }

    /// Returns the debouncer.
    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    /// Returns the press counter.
    pub fn counter(&self) -> &PressCounter<S> {
        &self.counter
    }
}
