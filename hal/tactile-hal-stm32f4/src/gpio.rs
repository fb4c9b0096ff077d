//! GPIO programming for STM32F4
//!
//! Interrupt modes also route the pin's EXTI line to the bank through
//! SYSCFG and set the edge triggers; plain inputs leave EXTI alone.

use embassy_stm32::pac;
use embassy_stm32::pac::gpio::vals;
use tactile_hal::{GpioControl, HalError, PinIndex, PinMode, PinSettings, Pull, Speed};

use crate::pins::Port;
use crate::Stm32f4;

/// PUPDR field value
pub const fn pupdr(pull: Pull) -> vals::Pupdr {
    match pull {
        Pull::None => vals::Pupdr::FLOATING,
        Pull::Up => vals::Pupdr::PULLUP,
        Pull::Down => vals::Pupdr::PULLDOWN,
    }
}

/// OSPEEDR field value
pub const fn ospeedr(speed: Speed) -> vals::Ospeedr {
    match speed {
        Speed::Low => vals::Ospeedr::LOWSPEED,
        Speed::Medium => vals::Ospeedr::MEDIUMSPEED,
        Speed::Fast => vals::Ospeedr::HIGHSPEED,
        Speed::VeryHigh => vals::Ospeedr::VERYHIGHSPEED,
    }
}

/// Rising and falling trigger enables for a mode
pub const fn edge_triggers(mode: PinMode) -> (bool, bool) {
    match mode {
        PinMode::Input => (false, false),
        PinMode::InterruptRising => (true, false),
        PinMode::InterruptFalling => (false, true),
        PinMode::InterruptBoth => (true, true),
    }
}

/// SYSCFG EXTICR register index and field within it for a pin
pub const fn exticr_slot(pin: PinIndex) -> (usize, usize) {
    let n = pin.as_usize();
    (n / 4, n % 4)
}

fn exti_routed_to(port: Port, pin: PinIndex) -> bool {
    let (reg, field) = exticr_slot(pin);
    pac::SYSCFG.exticr(reg).read().exti(field) as usize == port.index()
}

fn set_input(gpio: pac::gpio::Gpio, n: usize, pull: Pull, speed: Speed) {
    gpio.moder().modify(|w| w.set_moder(n, vals::Moder::INPUT));
    gpio.pupdr().modify(|w| w.set_pupdr(n, pupdr(pull)));
    gpio.ospeedr().modify(|w| w.set_ospeedr(n, ospeedr(speed)));
}

impl GpioControl for Stm32f4 {
    fn configure(&mut self, port: Port, pin: PinIndex, settings: PinSettings) -> Result<(), HalError> {
        let gpio = port.block().ok_or(HalError::InvalidPort)?;
        let n = pin.as_usize();

        critical_section::with(|_| {
            set_input(gpio, n, settings.pull, settings.speed);

            if settings.mode.is_interrupt() {
                pac::RCC.apb2enr().modify(|w| w.set_syscfgen(true));

                let (reg, field) = exticr_slot(pin);
                pac::SYSCFG
                    .exticr(reg)
                    .modify(|w| w.set_exti(field, port.index() as u8));

                let (rising, falling) = edge_triggers(settings.mode);
                pac::EXTI.rtsr(0).modify(|w| w.set_line(n, rising));
                pac::EXTI.ftsr(0).modify(|w| w.set_line(n, falling));
                pac::EXTI.imr(0).modify(|w| w.set_line(n, true));
            }
        });

        Ok(())
    }

    fn deconfigure(&mut self, port: Port, pin: PinIndex) -> Result<(), HalError> {
        let gpio = port.block().ok_or(HalError::InvalidPort)?;
        let n = pin.as_usize();

        critical_section::with(|_| {
            // Another bank may own this EXTI line
            if exti_routed_to(port, pin) {
                pac::EXTI.imr(0).modify(|w| w.set_line(n, false));
                pac::EXTI.rtsr(0).modify(|w| w.set_line(n, false));
                pac::EXTI.ftsr(0).modify(|w| w.set_line(n, false));
            }

            set_input(gpio, n, Pull::None, Speed::Low);
        });

        Ok(())
    }

    fn read(&self, port: Port, pin: PinIndex) -> bool {
        match port.block() {
            Some(gpio) => gpio.idr().read().idr(pin.as_usize()) == vals::Idr::HIGH,
            None => false,
        }
    }
}
