//! Single interrupt service routine for all sources.
//!
//! Every interrupt entry checks the timer, the pin change and the store's
//! write completion, in that order, each behind its own enable and pending
//! check. Boards with one vector call [`InterruptHandlers::service`] from it;
//! boards with several vectors call it from each of them.

use crate::change::{ChangeEvent, ChangeHandler, ChangeInterrupt};
use crate::io::{ButtonInput, Indicator};
use crate::persist::{WriteCompleteHandler, WriteCompletion};
use crate::shared::SharedState;
use crate::timer::{CountdownTimer, TickTimer};

/// Sources serviced by one interrupt entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Serviced {
    pub timer: bool,
    pub change: Option<ChangeEvent>,
    pub write_complete: bool,
}

impl Serviced {
    /// Returns true if no source was serviced (a spurious entry).
    pub fn is_empty(&self) -> bool {
        !self.timer && self.change.is_none() && !self.write_complete
    }
}

/// All interrupt-side state.
///
/// # Type Parameters
/// * `T` - Countdown timer
/// * `C` - Pin-change interrupt
/// * `B` - Button input
/// * `L` - Secondary indicator
/// * `W` - Store write completion
pub struct InterruptHandlers<T, C, B, L, W>
where
    T: CountdownTimer,
    C: ChangeInterrupt,
    B: ButtonInput,
    L: Indicator,
    W: WriteCompletion,
{
    timer: TickTimer<T>,
    change: ChangeHandler<C, B, L>,
    write_complete: WriteCompleteHandler<W>,
}

impl<T, C, B, L, W> InterruptHandlers<T, C, B, L, W>
where
    T: CountdownTimer,
    C: ChangeInterrupt,
    B: ButtonInput,
    L: Indicator,
    W: WriteCompletion,
{
    /// Creates the handlers. Switches the secondary indicator on.
    pub fn new(timer: T, change: C, button: B, secondary: L, completion: W) -> Self {
        Self {
            timer: TickTimer::new(timer),
            change: ChangeHandler::new(change, button, secondary),
            write_complete: WriteCompleteHandler::new(completion),
        }
    }

    /// Services every enabled and pending source once.
    pub fn service(&mut self, shared: &SharedState) -> Serviced {
        let serviced = Serviced {
            timer: self.timer.service(shared),
            change: self.change.service(),
            write_complete: self.write_complete.service(),
        };

        if let Some(event) = serviced.change {
            debug!("pin change: {}", event);
        }

        serviced
    }
}
