//! Tactile Hardware Abstraction Layer
//!
//! This crate defines the narrow hardware capabilities the button core
//! consumes, plus the fixed pin-to-interrupt-line topology of the external
//! interrupt controller. Chip-specific HALs (STM32F4, ...) implement the
//! traits; the core never touches registers itself.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (board firmware)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tactile-core (registry + dispatcher)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tactile-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ tactile-hal-  │
//!             │    stm32f4    │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::GpioControl`] - Pin mode/pull/speed programming and level reads
//! - [`clock::ClockControl`] - Peripheral clock gating per GPIO bank
//! - [`interrupt::InterruptController`] - Interrupt line enable/disable
//! - [`interrupt::PendingFlags`] - Latched edge flags per pin
//! - [`Platform`] - Everything the button core needs at configuration time

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod clock;
pub mod error;
pub mod exti;
pub mod gpio;
pub mod interrupt;

// Re-export key types at crate root for convenience
pub use clock::ClockControl;
pub use error::HalError;
pub use exti::{resolve_irq_line, IrqLine, OutOfRange, PinIndex, Priority, PIN_COUNT};
pub use gpio::{GpioBank, GpioControl, PinMode, PinSettings, Pull, Speed};
pub use interrupt::{InterruptController, PendingFlags};

/// Combined configuration-time capabilities
///
/// The button core configures pins, gates clocks and enables interrupt
/// lines through one platform handle. GPIO and clock capabilities share
/// the port type of [`GpioBank`], so any type implementing the three
/// underlying traits is a `Platform`.
pub trait Platform: GpioControl + ClockControl + InterruptController {}

// Blanket implementation for types that implement all three capabilities
impl<T: GpioControl + ClockControl + InterruptController> Platform for T {}
