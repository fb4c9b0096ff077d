//! Pin-indexed handler table with per-line usage counts
//!
//! Pure bookkeeping: no hardware access and no locking. The dispatcher
//! wraps it in a critical-section mutex and turns the returned line
//! transitions into interrupt controller calls.

use tactile_hal::{IrqLine, PinIndex, PIN_COUNT};

use super::handler::EdgeHandler;

/// Identifies one registration so stale handles cannot touch a newer one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct Token(u32);

#[derive(Clone, Copy)]
struct Entry<'h> {
    handler: &'h dyn EdgeHandler,
    token: Token,
    /// Interrupt line enabled on behalf of this entry
    active: bool,
}

/// Result of inserting a handler
pub(crate) struct Inserted {
    pub token: Token,
    /// A previous registration on the same pin was replaced
    pub replaced: bool,
}

pub(crate) struct Registry<'h> {
    slots: [Option<Entry<'h>>; PIN_COUNT],
    /// Active entries per interrupt line
    line_users: [u8; IrqLine::COUNT],
    next_token: u32,
}

impl<'h> Registry<'h> {
    pub const fn new() -> Self {
        Self {
            slots: [None; PIN_COUNT],
            line_users: [0; IrqLine::COUNT],
            next_token: 1,
        }
    }

    /// Drop every registration
    ///
    /// The token counter keeps running so handles from before the reset
    /// never match a later registration.
    pub fn clear(&mut self) {
        self.slots = [None; PIN_COUNT];
        self.line_users = [0; IrqLine::COUNT];
    }

    /// Register `handler` for `pin` as active, replacing any previous entry
    pub fn insert(&mut self, pin: PinIndex, handler: &'h dyn EdgeHandler) -> Inserted {
        let token = Token(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);

        let previous = self.slots[pin.as_usize()].replace(Entry {
            handler,
            token,
            active: true,
        });

        // A replaced active entry hands its line usage to the new one
        if !previous.is_some_and(|old| old.active) {
            self.acquire_line(pin.irq_line());
        }

        Inserted {
            token,
            replaced: previous.is_some(),
        }
    }

    /// Remove the entry for `pin` if it still belongs to `token`
    ///
    /// Returns `None` if the entry is gone or was replaced, otherwise
    /// whether the pin's line lost its last active user.
    pub fn remove(&mut self, pin: PinIndex, token: Token) -> Option<bool> {
        let entry = self.owned(pin, token)?;
        self.slots[pin.as_usize()] = None;

        if entry.active {
            Some(self.release_line(pin.irq_line()))
        } else {
            Some(false)
        }
    }

    /// Mark the entry for `pin` active or inactive if it belongs to `token`
    ///
    /// Returns `None` if the entry is gone or was replaced. Otherwise, when
    /// deactivating, whether the line lost its last active user; when
    /// activating, whether this is the line's first active user.
    pub fn set_active(&mut self, pin: PinIndex, token: Token, active: bool) -> Option<bool> {
        let entry = self.owned(pin, token)?;
        if entry.active == active {
            return Some(false);
        }

        if let Some(slot) = self.slots[pin.as_usize()].as_mut() {
            slot.active = active;
        }

        let line = pin.irq_line();
        if active {
            Some(self.acquire_line(line))
        } else {
            Some(self.release_line(line))
        }
    }

    /// Check whether `token` still owns the entry for `pin`
    pub fn owns(&self, pin: PinIndex, token: Token) -> bool {
        self.owned(pin, token).is_some()
    }

    /// Handler to run for an edge on `pin`, if one is registered and active
    pub fn active_handler(&self, pin: PinIndex) -> Option<&'h dyn EdgeHandler> {
        match self.slots[pin.as_usize()] {
            Some(entry) if entry.active => Some(entry.handler),
            _ => None,
        }
    }

    /// Check whether `pin` has an entry (active or suspended)
    pub fn is_registered(&self, pin: PinIndex) -> bool {
        self.slots[pin.as_usize()].is_some()
    }

    /// Bitmask of pins with an entry
    pub fn registered_mask(&self) -> u16 {
        PinIndex::all()
            .filter(|pin| self.is_registered(*pin))
            .fold(0, |mask, pin| mask | pin.mask())
    }

    /// Number of active entries on `line`
    pub fn line_users(&self, line: IrqLine) -> u8 {
        self.line_users[line.index()]
    }

    fn owned(&self, pin: PinIndex, token: Token) -> Option<Entry<'h>> {
        self.slots[pin.as_usize()].filter(|entry| entry.token == token)
    }

    /// Returns true on the 0 -> 1 transition
    fn acquire_line(&mut self, line: IrqLine) -> bool {
        let users = &mut self.line_users[line.index()];
        *users = users.saturating_add(1);
        *users == 1
    }

    /// Returns true on the 1 -> 0 transition
    fn release_line(&mut self, line: IrqLine) -> bool {
        let users = &mut self.line_users[line.index()];
        if *users == 0 {
            return false;
        }
        *users -= 1;
        *users == 0
    }
}
