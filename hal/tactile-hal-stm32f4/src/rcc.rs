//! GPIO bank clock gating
//!
//! Clock claims are counted per bank; the clock stops only when the last
//! claim is released.

use embassy_stm32::pac;
use tactile_hal::ClockControl;

use crate::pins::Port;
use crate::Stm32f4;

/// Gate the AHB1 clock of a bank
///
/// Returns false if the selected chip has no such bank.
fn set_bank_clock(port: Port, on: bool) -> bool {
    pac::RCC.ahb1enr().modify(|w| match port {
        Port::A => w.set_gpioaen(on),
        Port::B => w.set_gpioben(on),
        Port::C => w.set_gpiocen(on),
        Port::D => w.set_gpioden(on),
        Port::E => w.set_gpioeen(on),
        Port::H => w.set_gpiohen(on),
        #[cfg(feature = "banks-fgi")]
        Port::F => w.set_gpiofen(on),
        #[cfg(feature = "banks-fgi")]
        Port::G => w.set_gpiogen(on),
        #[cfg(feature = "banks-fgi")]
        Port::I => w.set_gpioien(on),
        #[cfg(feature = "banks-jk")]
        Port::J => w.set_gpiojen(on),
        #[cfg(feature = "banks-jk")]
        Port::K => w.set_gpioken(on),
        #[allow(unreachable_patterns)]
        _ => {}
    });
    port.block().is_some()
}

impl ClockControl for Stm32f4 {
    fn enable_clock(&mut self, port: Port) {
        let claims = &mut self.clock_claims[port.index()];
        if *claims == 0 {
            if !critical_section::with(|_| set_bank_clock(port, true)) {
                return;
            }
            // Dummy read: the bank is usable two AHB cycles after enabling
            let _ = pac::RCC.ahb1enr().read();
        }
        *claims = claims.saturating_add(1);
    }

    fn disable_clock(&mut self, port: Port) {
        let claims = &mut self.clock_claims[port.index()];
        if *claims == 0 {
            return;
        }
        *claims -= 1;
        if *claims == 0 {
            critical_section::with(|_| set_bank_clock(port, false));
        }
    }
}

