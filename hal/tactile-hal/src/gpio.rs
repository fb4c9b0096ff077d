//! GPIO capability
//!
//! Electrical settings the button core derives for a pin, and the trait a
//! chip HAL implements to program them.

/// Pin operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Plain digital input, read by polling
    Input,
    /// Input that latches an interrupt on the falling edge
    InterruptFalling,
    /// Input that latches an interrupt on the rising edge
    InterruptRising,
    /// Input that latches an interrupt on both edges
    InterruptBoth,
}

impl PinMode {
    /// Check if this mode routes the pin to the external interrupt controller
    pub fn is_interrupt(&self) -> bool {
        !matches!(self, PinMode::Input)
    }
}

/// Internal pull resistor selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    #[default]
    None,
    Up,
    Down,
}

/// Output slew rate (also sets input filter on some parts)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    #[default]
    Low,
    Medium,
    Fast,
    VeryHigh,
}

/// Complete electrical configuration for one pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinSettings {
    pub mode: PinMode,
    pub pull: Pull,
    pub speed: Speed,
}

impl PinSettings {
    /// Polled button input: pulled down so an open switch reads low
    pub const fn polled_input() -> Self {
        Self {
            mode: PinMode::Input,
            pull: Pull::Down,
            speed: Speed::Fast,
        }
    }

    /// Interrupt-driven button input: falling edge, external pull expected
    pub const fn falling_edge() -> Self {
        Self {
            mode: PinMode::InterruptFalling,
            pull: Pull::None,
            speed: Speed::Low,
        }
    }
}

/// Identifies the GPIO bank type shared by the GPIO and clock capabilities
pub trait GpioBank {
    /// Opaque handle to a GPIO bank (not owned by the button core)
    type Port: Copy + PartialEq;
}

/// GPIO configuration and input capability
///
/// Implementations handle the actual register programming for the chip.
/// The button core only calls these at configuration time (and `read`
/// from `get_state`).
pub trait GpioControl: GpioBank {
    /// Program mode, pull and speed for one pin
    fn configure(
        &mut self,
        port: Self::Port,
        pin: crate::PinIndex,
        settings: PinSettings,
    ) -> Result<(), crate::HalError>;

    /// Return the pin to its reset configuration
    fn deconfigure(&mut self, port: Self::Port, pin: crate::PinIndex) -> Result<(), crate::HalError>;

    /// Read the current input level (true = high)
    fn read(&self, port: Self::Port, pin: crate::PinIndex) -> bool;
}
