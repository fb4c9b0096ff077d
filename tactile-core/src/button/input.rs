//! `embedded-hal` view of a configured button
//!
//! Lets drivers written against `embedded_hal::digital::InputPin`
//! (debouncers, keypad scanners) read a button without knowing about the
//! dispatcher.

use embedded_hal::digital::{ErrorType, InputPin};
use tactile_hal::GpioControl;

use super::dispatcher::{Button, Dispatcher};
use crate::Error;

/// Borrowed button readable as an `InputPin`
pub struct ButtonInput<'a, 'h, G: GpioControl> {
    dispatcher: &'a Dispatcher<'h>,
    gpio: &'a G,
    button: &'a Button<G::Port>,
}

impl<'a, 'h, G: GpioControl> ButtonInput<'a, 'h, G> {
    pub fn new(dispatcher: &'a Dispatcher<'h>, gpio: &'a G, button: &'a Button<G::Port>) -> Self {
        Self {
            dispatcher,
            gpio,
            button,
        }
    }
}

impl<G: GpioControl> ErrorType for ButtonInput<'_, '_, G> {
    type Error = Error;
}

impl<G: GpioControl> InputPin for ButtonInput<'_, '_, G> {
    fn is_high(&mut self) -> Result<bool, Error> {
        self.dispatcher.get_state(self.gpio, self.button)
    }

    fn is_low(&mut self) -> Result<bool, Error> {
        self.is_high().map(|high| !high)
    }
}
