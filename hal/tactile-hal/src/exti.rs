//! External interrupt topology
//!
//! Every GPIO bank has 16 pins. The external interrupt controller routes
//! pin `n` of the selected bank to EXTI line `n`, but the processor only
//! has seven interrupt vectors for those sixteen lines:
//!
//! | Pins   | Vector       |
//! |--------|--------------|
//! | 0..=4  | one each     |
//! | 5..=9  | `Line5_9`    |
//! | 10..=15| `Line10_15`  |
//!
//! The mapping is fixed by the silicon and has no state.

/// Number of pins per GPIO bank, and of EXTI pin lines
pub const PIN_COUNT: usize = 16;

/// Pin index was outside `0..PIN_COUNT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRange(pub u8);

/// Validated pin index within a GPIO bank
///
/// Holding a `PinIndex` proves the value is below [`PIN_COUNT`], so tables
/// sized by `PIN_COUNT` can be indexed without bounds failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinIndex(u8);

impl PinIndex {
    /// Create a pin index, rejecting values outside the bank
    pub const fn new(pin: u8) -> Result<Self, OutOfRange> {
        if (pin as usize) < PIN_COUNT {
            Ok(Self(pin))
        } else {
            Err(OutOfRange(pin))
        }
    }

    /// Raw pin number
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Pin number as a table index
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Single-bit mask for this pin in 16-bit port registers
    pub const fn mask(self) -> u16 {
        1 << self.0
    }

    /// Interrupt line this pin raises
    pub const fn irq_line(self) -> IrqLine {
        match self.0 {
            0 => IrqLine::Line0,
            1 => IrqLine::Line1,
            2 => IrqLine::Line2,
            3 => IrqLine::Line3,
            4 => IrqLine::Line4,
            5..=9 => IrqLine::Line5_9,
            _ => IrqLine::Line10_15,
        }
    }

    /// All pins in ascending order
    pub fn all() -> impl Iterator<Item = PinIndex> {
        (0..PIN_COUNT as u8).map(PinIndex)
    }
}

impl TryFrom<u8> for PinIndex {
    type Error = OutOfRange;

    fn try_from(pin: u8) -> Result<Self, Self::Error> {
        Self::new(pin)
    }
}

impl From<PinIndex> for u8 {
    fn from(pin: PinIndex) -> Self {
        pin.0
    }
}

/// Interrupt vector shared by a group of EXTI pin lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqLine {
    Line0,
    Line1,
    Line2,
    Line3,
    Line4,
    /// Pins 5 through 9
    Line5_9,
    /// Pins 10 through 15
    Line10_15,
}

impl IrqLine {
    /// Number of distinct interrupt lines
    pub const COUNT: usize = 7;

    /// All lines in ascending pin order
    pub const ALL: [IrqLine; Self::COUNT] = [
        IrqLine::Line0,
        IrqLine::Line1,
        IrqLine::Line2,
        IrqLine::Line3,
        IrqLine::Line4,
        IrqLine::Line5_9,
        IrqLine::Line10_15,
    ];

    /// Dense index in `0..COUNT`, for per-line tables
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowest and highest pin routed to this line (inclusive)
    pub const fn pin_range(self) -> (u8, u8) {
        match self {
            IrqLine::Line0 => (0, 0),
            IrqLine::Line1 => (1, 1),
            IrqLine::Line2 => (2, 2),
            IrqLine::Line3 => (3, 3),
            IrqLine::Line4 => (4, 4),
            IrqLine::Line5_9 => (5, 9),
            IrqLine::Line10_15 => (10, 15),
        }
    }

    /// Pins routed to this line, ascending
    pub fn pins(self) -> impl Iterator<Item = PinIndex> {
        let (first, last) = self.pin_range();
        (first..=last).map(PinIndex)
    }

    /// Check whether `pin` is routed to this line
    pub fn contains(self, pin: PinIndex) -> bool {
        let (first, last) = self.pin_range();
        (first..=last).contains(&pin.get())
    }

    /// Bitmask of all pins on this line
    pub fn pin_mask(self) -> u16 {
        self.pins().fold(0, |mask, pin| mask | pin.mask())
    }
}

/// Resolve the interrupt line for a raw pin number
///
/// Fails with [`OutOfRange`] for pins outside the bank. Callers that already
/// hold a [`PinIndex`] should use [`PinIndex::irq_line`], which cannot fail.
pub fn resolve_irq_line(pin: u8) -> Result<IrqLine, OutOfRange> {
    PinIndex::new(pin).map(PinIndex::irq_line)
}

/// Interrupt priority (4 implemented bits, 0 is most urgent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Priority(u8);

impl Priority {
    /// Most urgent priority
    pub const HIGHEST: Priority = Priority(0x00);

    /// Least urgent priority; all button lines use this level
    pub const LOWEST: Priority = Priority(0x0F);

    /// Create a priority, saturating at [`Priority::LOWEST`]
    pub const fn new(level: u8) -> Self {
        if level > Self::LOWEST.0 {
            Self::LOWEST
        } else {
            Self(level)
        }
    }

    /// Raw priority level
    pub const fn level(self) -> u8 {
        self.0
    }
}
