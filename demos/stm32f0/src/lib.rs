#![no_std]

//! STM32F072 implementations of the tick-debounce hardware traits.

pub mod button;
pub mod exti;
pub mod flash_store;
pub mod indicator;
pub mod tick_timer;
