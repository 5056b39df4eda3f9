//! Pin abstraction traits for the button and the indicator LEDs.

/// Trait for abstracting the button input.
///
/// Both the change interrupt and the foreground loop sample the button, so
/// reading takes `&self`. Implementations map the active-low pin level to
/// "pressed" and handle any hardware errors internally.
pub trait ButtonInput {
    /// Returns true while the pin reads the pressed level (low).
    fn is_pressed(&self) -> bool;
}

/// Trait for abstracting an indicator LED.
pub trait Indicator {
    /// Drives the LED on or off.
    fn set(&mut self, on: bool);

    /// Inverts the current LED state.
    fn toggle(&mut self);
}
