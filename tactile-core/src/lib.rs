//! Board-agnostic button core
//!
//! This crate owns everything between "a pin was configured" and "the
//! registered handler ran":
//!
//! - Button configuration with electrical settings derived from the mode
//! - The dispatcher: one registry slot per EXTI pin line, last writer wins
//! - Interrupt entry points (`dispatch`, `line_sweep`, `sweep_all`)
//! - The suspend/resume lifecycle of a configured button
//! - Board button configuration types
//!
//! Hardware is reached only through the `tactile-hal` capability traits.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to later modules
mod fmt;

pub mod button;
pub mod config;
pub mod error;

pub use button::{
    Button, ButtonInput, ButtonKind, ButtonMode, ButtonState, ContextHandler, Dispatcher, EdgeHandler,
};
pub use error::Error;

// Host tests take the critical-section implementation from `std`
#[cfg(test)]
use critical_section as _;

// Re-export the HAL so firmware only needs one path for pin/line types
pub use tactile_hal as hal;
