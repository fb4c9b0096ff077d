//! Interrupt controller and pending-flag capabilities

use crate::exti::{IrqLine, PinIndex, Priority};
use crate::HalError;

/// Interrupt controller access for the EXTI vectors
///
/// Enabling a line that is already enabled must succeed; several pins can
/// share one line.
pub trait InterruptController {
    /// Set the line priority and unmask it
    fn enable_line(&mut self, line: IrqLine, priority: Priority) -> Result<(), HalError>;

    /// Mask the line
    fn disable_line(&mut self, line: IrqLine) -> Result<(), HalError>;
}

/// Latched per-pin edge flags
///
/// Used from interrupt context, so implementations must not block.
pub trait PendingFlags {
    /// Check if an edge has been latched for `pin`
    fn is_pending(&self, pin: PinIndex) -> bool;

    /// Clear the latched edge for `pin`
    fn clear_pending(&mut self, pin: PinIndex);
}
