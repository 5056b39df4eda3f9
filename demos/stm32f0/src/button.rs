use stm32f0xx_hal::gpio::{Input, PullUp, gpioc};
use stm32f0xx_hal::pac;
use tick_debounce::ButtonInput;

/// User button on PC13 (active low, pulled up)
///
/// Both the EXTI handler and the foreground loop read the button, so this is
/// a `Copy` handle that reads the input data register directly. It can only
/// be created from the configured HAL pin.
#[derive(Clone, Copy)]
pub struct UserButton {
    _private: (),
}

impl UserButton {
    pub fn new(pin: gpioc::PC13<Input<PullUp>>) -> Self {
        // The typed pin is only proof of configuration
        let _ = pin;
        Self { _private: () }
    }
}

impl ButtonInput for UserButton {
    fn is_pressed(&self) -> bool {
        // Reading IDR has no side effects
        let gpioc = unsafe { &*pac::GPIOC::ptr() };
        gpioc.idr.read().idr13().bit_is_clear()
    }
}
