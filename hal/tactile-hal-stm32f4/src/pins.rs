//! GPIO bank identifiers and pin strings

use embassy_stm32::pac;

/// GPIO bank on STM32F4 parts (`A` through `K`; smaller parts stop earlier)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
}

impl Port {
    /// Number of banks in the family
    pub const COUNT: usize = 11;

    /// Bank number: RCC enable bit and SYSCFG EXTICR code
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Register block of the bank, if the selected chip has it
    pub fn block(self) -> Option<pac::gpio::Gpio> {
        let block = match self {
            Port::A => pac::GPIOA,
            Port::B => pac::GPIOB,
            Port::C => pac::GPIOC,
            Port::D => pac::GPIOD,
            Port::E => pac::GPIOE,
            Port::H => pac::GPIOH,
            #[cfg(feature = "banks-fgi")]
            Port::F => pac::GPIOF,
            #[cfg(feature = "banks-fgi")]
            Port::G => pac::GPIOG,
            #[cfg(feature = "banks-fgi")]
            Port::I => pac::GPIOI,
            #[cfg(feature = "banks-jk")]
            Port::J => pac::GPIOJ,
            #[cfg(feature = "banks-jk")]
            Port::K => pac::GPIOK,
            #[allow(unreachable_patterns)]
            _ => return None,
        };
        Some(block)
    }

    /// Bank from its letter (case-insensitive)
    pub fn from_char(c: char) -> Option<Self> {
        let port = match c.to_ascii_uppercase() {
            'A' => Port::A,
            'B' => Port::B,
            'C' => Port::C,
            'D' => Port::D,
            'E' => Port::E,
            'F' => Port::F,
            'G' => Port::G,
            'H' => Port::H,
            'I' => Port::I,
            'J' => Port::J,
            'K' => Port::K,
            _ => return None,
        };
        Some(port)
    }
}

/// Parse a pin string from config
///
/// Supports formats:
/// - "PA0" -> (Port A, Pin 0, false)
/// - "!PC13" -> (Port C, Pin 13, true/inverted)
pub fn parse_pin_string(s: &str) -> Option<(Port, u8, bool)> {
    let s = s.trim();

    let (s, inverted) = match s.strip_prefix('!') {
        Some(rest) => (rest, true),
        None => (s, false),
    };

    let rest = s.strip_prefix('P')?;
    let mut chars = rest.chars();
    let port = Port::from_char(chars.next()?)?;

    let pin: u8 = chars.as_str().parse().ok()?;
    if pin > 15 {
        return None;
    }

    Some((port, pin, inverted))
}
