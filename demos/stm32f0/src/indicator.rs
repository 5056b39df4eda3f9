use embedded_hal::digital::v2::{OutputPin, ToggleableOutputPin};
use tick_debounce::Indicator;

/// Indicator LED on a push-pull GPIO output
///
/// Wraps any HAL output pin that can be toggled. Pin errors are ignored;
/// the STM32F0 GPIO implementation is infallible.
pub struct BoardLed<P>
where
    P: OutputPin + ToggleableOutputPin,
{
    pin: P,
}

impl<P> BoardLed<P>
where
    P: OutputPin + ToggleableOutputPin,
{
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P> Indicator for BoardLed<P>
where
    P: OutputPin + ToggleableOutputPin,
{
    fn set(&mut self, on: bool) {
        if on {
            self.pin.set_high().ok();
        } else {
            self.pin.set_low().ok();
        }
    }

    fn toggle(&mut self) {
        self.pin.toggle().ok();
    }
}
