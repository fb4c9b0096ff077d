//! Board button configuration
//!
//! Describes which pins a board uses as buttons. Stored as postcard binary
//! data (with the `serde` feature) or built in code by the firmware.

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use tactile_hal::{PinIndex, PIN_COUNT};

/// Maximum buttons per board
pub const MAX_BUTTONS: usize = 16;

/// Maximum length of a button name
pub const MAX_NAME_LEN: usize = 16;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Pin index outside the GPIO bank
    InvalidPin,
    /// Port letter outside `A..=K`
    InvalidPort,
    /// Same port and pin used twice, or two interrupt buttons on one pin index
    DuplicatePin,
    /// More than [`MAX_BUTTONS`] entries
    TooManyButtons,
    /// Binary encoding or decoding failed
    Encoding,
}

/// One button on the board
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ButtonConfig {
    /// Button name (e.g., "user", "mode", "wake")
    pub name: String<MAX_NAME_LEN>,
    /// GPIO bank letter
    pub port: char,
    /// Pin within the bank
    pub pin: u8,
    /// Use the EXTI interrupt instead of polling
    pub interrupt: bool,
}

impl ButtonConfig {
    /// Create a polled button
    pub fn polled(name: &str, port: char, pin: u8) -> Self {
        Self::new(name, port, pin, false)
    }

    /// Create an interrupt-driven button
    pub fn interrupt(name: &str, port: char, pin: u8) -> Self {
        Self::new(name, port, pin, true)
    }

    fn new(name: &str, port: char, pin: u8, interrupt: bool) -> Self {
        let mut label = String::new();
        for c in name.chars() {
            if label.push(c).is_err() {
                break;
            }
        }
        Self {
            name: label,
            port: port.to_ascii_uppercase(),
            pin,
            interrupt,
        }
    }

    /// Validated pin index
    pub fn pin_index(&self) -> Result<PinIndex, ConfigError> {
        PinIndex::new(self.pin).map_err(|_| ConfigError::InvalidPin)
    }

    /// Check pin and port ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !('A'..='K').contains(&self.port) {
            return Err(ConfigError::InvalidPort);
        }
        self.pin_index().map(|_| ())
    }
}

/// All buttons of a board
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ButtonSet {
    /// Configuration version for compatibility checks
    pub version: u8,
    pub buttons: Vec<ButtonConfig, MAX_BUTTONS>,
}

impl ButtonSet {
    pub const VERSION: u8 = 1;

    /// Create an empty set
    pub fn new() -> Self {
        Self {
            version: Self::VERSION,
            buttons: Vec::new(),
        }
    }

    /// Append a button
    pub fn push(&mut self, button: ButtonConfig) -> Result<(), ConfigError> {
        self.buttons
            .push(button)
            .map_err(|_| ConfigError::TooManyButtons)
    }

    /// Find a button by name
    pub fn find(&self, name: &str) -> Option<&ButtonConfig> {
        self.buttons.iter().find(|b| b.name.as_str() == name)
    }

    /// Check every entry and reject pin conflicts
    ///
    /// The EXTI multiplexer routes one port per pin index, so two interrupt
    /// buttons on the same index conflict even on different ports.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut exti_used = [false; PIN_COUNT];

        for (i, button) in self.buttons.iter().enumerate() {
            button.validate()?;

            let clash = self.buttons[..i]
                .iter()
                .any(|other| other.port == button.port && other.pin == button.pin);
            if clash {
                return Err(ConfigError::DuplicatePin);
            }

            if button.interrupt {
                let slot = &mut exti_used[button.pin as usize];
                if *slot {
                    return Err(ConfigError::DuplicatePin);
                }
                *slot = true;
            }
        }

        Ok(())
    }

    /// Encode to postcard binary, returning the used part of `buf`
    #[cfg(feature = "serde")]
    pub fn to_bytes<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Encoding)
    }

    /// Decode from postcard binary and validate
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let set: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Encoding)?;
        set.validate()?;
        Ok(set)
    }
}
