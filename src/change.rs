//! Button pin-change interrupt.
//!
//! The change interrupt fires on edges in both directions, so the handler
//! re-reads the pin and only reacts to the pressed level. After a press it
//! disarms itself; the foreground re-arms it once the debouncer confirms the
//! release. Bounce on the pressed edge therefore produces at most one
//! secondary-indicator toggle per confirmed press/release cycle.

use crate::io::{ButtonInput, Indicator};

/// Trait for abstracting the pin-change interrupt enable and pending bits.
///
/// The interrupt handler disarms and the foreground re-arms, so both contexts
/// hold a handle to the same hardware bit and every method takes `&self`.
/// Implementations must update the enable bit with a single register write
/// or an operation that cannot be torn by the other context.
pub trait ChangeInterrupt {
    /// Returns true if the change interrupt is enabled.
    fn is_armed(&self) -> bool;

    /// Returns true if a pin change is pending.
    fn is_pending(&self) -> bool;

    /// Enables the change interrupt.
    fn arm(&self);

    /// Disables the change interrupt.
    fn disarm(&self);

    /// Clears the pending flag.
    fn clear_pending(&self);
}

/// Outcome of a serviced change interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChangeEvent {
    /// Pin read pressed: secondary indicator toggled, interrupt disarmed.
    Pressed,
    /// Pin read released: edge ignored.
    Released,
}

/// Interrupt-side handler for the pin-change interrupt.
pub struct ChangeHandler<C, B, L>
where
    C: ChangeInterrupt,
    B: ButtonInput,
    L: Indicator,
{
    interrupt: C,
    button: B,
    indicator: L,
}

impl<C, B, L> ChangeHandler<C, B, L>
where
    C: ChangeInterrupt,
    B: ButtonInput,
    L: Indicator,
{
    /// Creates the handler and switches the secondary indicator on.
    pub fn new(interrupt: C, button: B, mut indicator: L) -> Self {
        indicator.set(true);

        Self {
            interrupt,
            button,
            indicator,
        }
    }

    /// Services a pending pin change if the interrupt is armed.
    ///
    /// # Returns
    /// * `Some(ChangeEvent)` - The change was serviced and its flag cleared
    /// * `None` - Not armed or not pending; nothing was touched
    pub fn service(&mut self) -> Option<ChangeEvent> {
        if !(self.interrupt.is_armed() && self.interrupt.is_pending()) {
            return None;
        }

        let event = if self.button.is_pressed() {
            self.indicator.toggle();
            self.interrupt.disarm();
            ChangeEvent::Pressed
        } else {
            ChangeEvent::Released
        };

        self.interrupt.clear_pending();
        Some(event)
    }
}
