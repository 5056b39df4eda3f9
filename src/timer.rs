//! System tick timer.
//!
//! Provides [`TickTimer`], the interrupt-side handler for the periodic
//! countdown timer, and the [`CountdownTimer`] trait for the hardware it
//! services.

use crate::shared::SharedState;

/// Trait for abstracting the hardware countdown timer.
pub trait CountdownTimer {
    /// Returns true if the timer interrupt is enabled.
    fn is_enabled(&self) -> bool;

    /// Returns true if the timer has expired and its interrupt is pending.
    fn is_pending(&self) -> bool;

    /// Restarts the countdown from the configured reload value.
    fn reload(&mut self);

    /// Clears the pending flag.
    ///
    /// An expiry serviced without clearing this flag re-enters the handler
    /// forever.
    fn clear_pending(&mut self);
}

/// Interrupt-side handler for the tick timer.
pub struct TickTimer<T: CountdownTimer> {
    timer: T,
}

impl<T: CountdownTimer> TickTimer<T> {
    pub fn new(timer: T) -> Self {
        Self { timer }
    }

    /// Services a timer expiry if the timer is enabled and pending.
    ///
    /// Advances the shared tick and cooldown, reloads the countdown and
    /// clears the pending flag. Returns true if an expiry was serviced.
    pub fn service(&mut self, shared: &SharedState) -> bool {
        if !(self.timer.is_enabled() && self.timer.is_pending()) {
            return false;
        }

        shared.on_timer_expiry();
        self.timer.reload();
        self.timer.clear_pending();
        true
    }
}
