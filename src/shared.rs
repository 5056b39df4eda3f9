//! State shared between interrupt handlers and the foreground loop.
//!
//! Every field is a single-byte atomic accessed with plain loads and stores,
//! never with read-modify-write instructions, so the same code runs on cores
//! that lack atomic RMW support (Cortex-M0, AVR, PIC). Correctness comes from
//! the writer discipline documented on each accessor rather than from a lock.

use core::sync::atomic::{AtomicU8, Ordering};

/// Context shared by the interrupt handlers and the foreground loop.
///
/// Construct once, typically as a `static`, and pass by reference to both
/// [`InterruptHandlers::service`](crate::InterruptHandlers::service) and
/// [`App::poll`](crate::App::poll).
#[derive(Debug)]
pub struct SharedState {
    tick: AtomicU8,
    cooldown: AtomicU8,
}

impl SharedState {
    /// Creates the power-on state: tick zero, no cooldown running.
    pub const fn new() -> Self {
        Self {
            tick: AtomicU8::new(0),
            cooldown: AtomicU8::new(0),
        }
    }

    /// Current system tick. Wraps from 255 to 0.
    #[inline]
    pub fn tick(&self) -> u8 {
        self.tick.load(Ordering::Acquire)
    }

    /// Ticks left before the debouncer may advance again.
    #[inline]
    pub fn cooldown(&self) -> u8 {
        self.cooldown.load(Ordering::Acquire)
    }

    /// Records one timer expiry.
    ///
    /// Interrupt context only. The tick has no other writer. The cooldown is
    /// only decremented from a positive value, and the foreground only stores
    /// into it after observing zero, so the two writers never overlap.
    pub fn on_timer_expiry(&self) {
        let cooldown = self.cooldown.load(Ordering::Relaxed);
        if cooldown > 0 {
            self.cooldown.store(cooldown - 1, Ordering::Release);
        }

        let tick = self.tick.load(Ordering::Relaxed);
        self.tick.store(tick.wrapping_add(1), Ordering::Release);
    }

    /// Starts a new cooldown window of `period` ticks.
    ///
    /// Foreground only, and only after [`cooldown`](Self::cooldown) returned zero.
    pub fn restart_cooldown(&self, period: u8) {
        self.cooldown.store(period, Ordering::Release);
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
