#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`SharedState`**: The tick and cooldown counters shared by interrupts and the foreground
//! - **`InterruptHandlers`**: Services the timer, pin-change and write-complete sources in a fixed order
//! - **`TickTimer`**: Reloads the countdown timer and advances the shared tick
//! - **`ChangeHandler`**: One-shot pin-change handler toggling the secondary indicator
//! - **`Debouncer`**: Tick-gated `Released`/`Pushed`/`MaybeReleased` state machine
//! - **`PressCounter`**: Press count persisted to a `NonVolatileStore`
//! - **`App`**: Foreground loop tying the debouncer, counter and primary indicator together
//! - **`BuildConfig`**: Fuse settings and timer constants fixed at build time
//!
//! Hardware is reached only through traits (`ButtonInput`, `Indicator`,
//! `CountdownTimer`, `ChangeInterrupt`, `NonVolatileStore`, `WriteCompletion`).
//! Implement them for your board and call `InterruptHandlers::service` from
//! your interrupt vectors.

#[macro_use]
mod log;

pub mod app;
pub mod change;
pub mod config;
pub mod debounce;
pub mod interrupts;
pub mod io;
pub mod persist;
pub mod shared;
pub mod timer;

pub use app::{App, WaitMode, wait_for_next_tick};
pub use change::{ChangeEvent, ChangeHandler, ChangeInterrupt};
pub use config::{BuildConfig, ConfigError, Oscillator, Prescaler, rc_oscillator_hz};
pub use debounce::{ButtonEvent, ButtonState, Debouncer, GateReason, PollOutcome, Transition};
pub use interrupts::{InterruptHandlers, Serviced};
pub use io::{ButtonInput, Indicator};
pub use persist::{
    NonVolatileStore, PRESS_COUNT_ADDRESS, PressCounter, WriteCompleteHandler, WriteCompletion,
};
pub use shared::SharedState;
pub use timer::{CountdownTimer, TickTimer};
