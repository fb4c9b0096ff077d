//! Peripheral clock capability

use crate::gpio::GpioBank;

/// Clock gating for GPIO banks
///
/// Both calls must be idempotent: enabling an already-running bank or
/// disabling a stopped one is not an error. Implementations that share a
/// bank between several users may reference-count instead.
pub trait ClockControl: GpioBank {
    /// Start the clock feeding `port`
    fn enable_clock(&mut self, port: Self::Port);

    /// Stop the clock feeding `port`
    fn disable_clock(&mut self, port: Self::Port);
}
