//! Errors reported by hardware capabilities

/// Error from a platform capability (GPIO, clock, interrupt controller)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// Port handle does not name a GPIO bank on this chip
    InvalidPort,
    /// Peripheral is in use and cannot be reconfigured right now
    Busy,
    /// Hardware did not acknowledge in time
    Timeout,
    /// Other hardware fault
    Hardware,
}
