//! STM32F4-specific HAL for Tactile
//!
//! Implements the `tactile-hal` capabilities on the STM32F4 registers,
//! reached through the `embassy-stm32` PAC:
//!
//! - GPIO mode/pull/speed programming and input reads
//! - RCC clock gating per GPIO bank, reference counted
//! - NVIC enable/priority for the seven EXTI vectors
//! - EXTI pending flags and SYSCFG port routing
//!
//! # Features
//!
//! - `stm32f401re`, `stm32f407vg`, `stm32f429zi` - Select the chip (one is required)
//! - `defmt` - Enable debug formatting support
//!
//! # Usage
//!
//! ```ignore
//! static BUTTONS: Dispatcher<'static> = Dispatcher::new();
//!
//! let mut hw = Stm32f4::new(cortex_m::Peripherals::take().unwrap().NVIC);
//! let user = BUTTONS.configure(&mut hw, Port::C, 13, ButtonMode::Interrupt(&ON_USER))?;
//!
//! #[interrupt]
//! fn EXTI15_10() {
//!     tactile_hal_stm32f4::on_exti_interrupt(&BUTTONS, IrqLine::Line10_15);
//! }
//! ```

#![cfg_attr(not(test), no_std)]

pub mod exti;
pub mod gpio;
pub mod nvic;
pub mod pins;
pub mod rcc;

use cortex_m::peripheral::NVIC;

pub use exti::{exti_interrupt, on_exti_interrupt, ExtiFlags};
pub use pins::{parse_pin_string, Port};

/// Platform handle for STM32F4 parts
///
/// Owns the NVIC (needed to program priorities) and the clock claim
/// counts. Implements every capability the button core needs.
pub struct Stm32f4 {
    nvic: NVIC,
    clock_claims: [u8; Port::COUNT],
}

impl Stm32f4 {
    /// Take over the NVIC; clock claims start at zero
    pub fn new(nvic: NVIC) -> Self {
        Self {
            nvic,
            clock_claims: [0; Port::COUNT],
        }
    }

    /// Outstanding clock claims on `port`
    pub fn clock_claims(&self, port: Port) -> u8 {
        self.clock_claims[port.index()]
    }

    /// Give the NVIC back
    pub fn free(self) -> NVIC {
        self.nvic
    }
}

impl tactile_hal::GpioBank for Stm32f4 {
    type Port = Port;
}
