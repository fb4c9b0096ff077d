//! EXTI vectors and pending flags

use embassy_stm32::pac;
use embassy_stm32::pac::Interrupt;
use tactile_core::Dispatcher;
use tactile_hal::{IrqLine, PendingFlags, PinIndex};

/// NVIC vector serving an EXTI line group
pub const fn exti_interrupt(line: IrqLine) -> Interrupt {
    match line {
        IrqLine::Line0 => Interrupt::EXTI0,
        IrqLine::Line1 => Interrupt::EXTI1,
        IrqLine::Line2 => Interrupt::EXTI2,
        IrqLine::Line3 => Interrupt::EXTI3,
        IrqLine::Line4 => Interrupt::EXTI4,
        IrqLine::Line5_9 => Interrupt::EXTI9_5,
        IrqLine::Line10_15 => Interrupt::EXTI15_10,
    }
}

/// EXTI pending register (write 1 to clear)
#[derive(Default)]
pub struct ExtiFlags;

impl ExtiFlags {
    pub const fn new() -> Self {
        Self
    }
}

impl PendingFlags for ExtiFlags {
    fn is_pending(&self, pin: PinIndex) -> bool {
        pac::EXTI.pr(0).read().line(pin.as_usize())
    }

    fn clear_pending(&mut self, pin: PinIndex) {
        // Plain write: zero bits are ignored by the hardware
        pac::EXTI.pr(0).write(|w| w.set_line(pin.as_usize(), true));
    }
}

/// Service an EXTI vector
///
/// Call from each of the seven EXTI interrupt handlers with the line that
/// handler serves.
pub fn on_exti_interrupt(dispatcher: &Dispatcher<'_>, line: IrqLine) {
    dispatcher.line_sweep(&mut ExtiFlags::new(), line);
}
