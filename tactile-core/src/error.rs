//! Button core error type

use tactile_hal::{HalError, OutOfRange};

/// Errors returned by button operations
///
/// Hardware failures are passed through unchanged, tagged with the
/// capability that reported them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Button handle was deconfigured, or no longer owns its registration
    InvalidHandle,
    /// Pin index outside the GPIO bank
    InvalidPin,
    /// Pin has no interrupt line
    UnsupportedLine,
    /// GPIO capability failed
    Gpio(HalError),
    /// Interrupt controller capability failed
    Interrupt(HalError),
}

impl From<OutOfRange> for Error {
    fn from(_: OutOfRange) -> Self {
        Error::UnsupportedLine
    }
}

impl embedded_hal::digital::Error for Error {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}
