//! NVIC access for the EXTI vectors

use cortex_m::peripheral::NVIC;
use tactile_hal::{HalError, InterruptController, IrqLine, Priority};

use crate::exti::exti_interrupt;
use crate::Stm32f4;

/// Priority bits implemented by STM32F4 (upper nibble of each byte)
pub const NVIC_PRIO_BITS: u8 = 4;

/// Encode a priority level into the NVIC priority byte
pub const fn priority_byte(priority: Priority) -> u8 {
    priority.level() << (8 - NVIC_PRIO_BITS)
}

impl InterruptController for Stm32f4 {
    fn enable_line(&mut self, line: IrqLine, priority: Priority) -> Result<(), HalError> {
        let irq = exti_interrupt(line);
        // SAFETY: button handlers share one priority and the dispatcher
        // tolerates interrupts at any point after registration
        unsafe {
            self.nvic.set_priority(irq, priority_byte(priority));
            NVIC::unmask(irq);
        }
        Ok(())
    }

    fn disable_line(&mut self, line: IrqLine) -> Result<(), HalError> {
        let irq = exti_interrupt(line);
        NVIC::mask(irq);
        NVIC::unpend(irq);
        Ok(())
    }
}
