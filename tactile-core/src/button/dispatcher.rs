//! Button configuration and interrupt dispatch
//!
//! The [`Dispatcher`] is constructed once at boot (usually as a `static`)
//! and shared between base context and the EXTI vector handlers. Registry
//! changes and dispatch lookups both run inside a critical section, so an
//! interrupt never observes a half-written entry. Handlers are invoked
//! after the critical section ends.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use tactile_hal::{
    resolve_irq_line, GpioControl, IrqLine, PendingFlags, PinIndex, PinSettings, Platform,
    Priority,
};

use super::handler::EdgeHandler;
use super::registry::{Registry, Token};
use crate::Error;

/// Priority used for every button interrupt line
///
/// All button lines share one level so their handlers never preempt
/// each other.
pub const BUTTON_PRIORITY: Priority = Priority::LOWEST;

/// How a button is read
#[derive(Clone, Copy)]
pub enum ButtonMode<'h> {
    /// Read on demand with [`Dispatcher::get_state`]
    Polled,
    /// Falling edges invoke the handler from interrupt context
    Interrupt(&'h dyn EdgeHandler),
}

impl ButtonMode<'_> {
    /// Electrical settings for this mode
    pub fn settings(&self) -> PinSettings {
        match self {
            ButtonMode::Polled => PinSettings::polled_input(),
            ButtonMode::Interrupt(_) => PinSettings::falling_edge(),
        }
    }

    /// Mode without the handler
    pub fn kind(&self) -> ButtonKind {
        match self {
            ButtonMode::Polled => ButtonKind::Polled,
            ButtonMode::Interrupt(_) => ButtonKind::Interrupt,
        }
    }
}

/// Button mode, without its handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonKind {
    Polled,
    Interrupt,
}

/// Lifecycle state of a button handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    /// Pin configured, clock claimed, interrupt line enabled (if any)
    Active,
    /// Configuration retained but pin, clock and line released
    Suspended,
    /// Deconfigured; the handle can no longer be used
    Released,
}

/// Handle to one configured button
///
/// Only [`Dispatcher::configure`] creates buttons. Operations take the
/// handle by `&mut`, so a handle cannot be reconfigured from two places
/// at once.
#[derive(Debug)]
pub struct Button<P> {
    port: P,
    pin: PinIndex,
    /// Settings applied at configure time, re-applied verbatim on resume
    settings: PinSettings,
    kind: ButtonKind,
    /// Registration owned by this handle (interrupt mode only)
    token: Option<Token>,
    state: ButtonState,
}

impl<P: Copy> Button<P> {
    /// GPIO bank this button lives on
    pub fn port(&self) -> P {
        self.port
    }

    /// Pin within the bank
    pub fn pin(&self) -> PinIndex {
        self.pin
    }

    /// Electrical settings captured at configure time
    pub fn settings(&self) -> PinSettings {
        self.settings
    }

    pub fn kind(&self) -> ButtonKind {
        self.kind
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Check if the button is configured and not suspended
    pub fn is_active(&self) -> bool {
        self.state == ButtonState::Active
    }

    /// Check if the button was configured with an edge handler
    pub fn has_handler(&self) -> bool {
        self.token.is_some()
    }

    /// Interrupt line the button's pin raises
    pub fn irq_line(&self) -> IrqLine {
        self.pin.irq_line()
    }
}

/// Process-wide button registry and interrupt dispatcher
///
/// Holds at most one handler per pin index. Registering a second
/// interrupt-mode button on the same pin index replaces the first; the
/// replaced handle can then only be read or deconfigured.
pub struct Dispatcher<'h> {
    registry: Mutex<CriticalSectionRawMutex, RefCell<Registry<'h>>>,
}

impl Default for Dispatcher<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'h> Dispatcher<'h> {
    /// Create an empty dispatcher
    pub const fn new() -> Self {
        Self {
            registry: Mutex::new(RefCell::new(Registry::new())),
        }
    }

    /// Drop every registration
    ///
    /// Hardware is left as it is. Handles issued before the reset can still
    /// be read and deconfigured, but no longer own a registration.
    pub fn reset(&self) {
        self.registry.lock(|reg| reg.borrow_mut().clear());
    }

    /// Configure a pin as a button
    ///
    /// Claims the port clock, programs the pin, and for interrupt mode
    /// enables the pin's interrupt line at [`BUTTON_PRIORITY`] and registers
    /// the handler, replacing any handler already registered on that pin
    /// index. On failure the pin and clock claim are released again.
    pub fn configure<H: Platform>(
        &self,
        hw: &mut H,
        port: H::Port,
        pin: u8,
        mode: ButtonMode<'h>,
    ) -> Result<Button<H::Port>, Error> {
        let pin = PinIndex::new(pin).map_err(|_| Error::InvalidPin)?;
        let settings = mode.settings();

        hw.enable_clock(port);
        if let Err(e) = hw.configure(port, pin, settings) {
            hw.disable_clock(port);
            return Err(Error::Gpio(e));
        }

        let token = match mode {
            ButtonMode::Polled => None,
            ButtonMode::Interrupt(handler) => match self.register(hw, pin, handler) {
                Ok(token) => Some(token),
                Err(err) => {
                    if hw.deconfigure(port, pin).is_err() {
                        warn!("button: pin {} left configured after failure", pin);
                    }
                    hw.disable_clock(port);
                    return Err(err);
                }
            },
        };

        Ok(Button {
            port,
            pin,
            settings,
            kind: mode.kind(),
            token,
            state: ButtonState::Active,
        })
    }

    fn register<H: Platform>(
        &self,
        hw: &mut H,
        pin: PinIndex,
        handler: &'h dyn EdgeHandler,
    ) -> Result<Token, Error> {
        let line = resolve_irq_line(pin.get())?;
        hw.enable_line(line, BUTTON_PRIORITY)
            .map_err(Error::Interrupt)?;

        let inserted = self
            .registry
            .lock(|reg| reg.borrow_mut().insert(pin, handler));
        if inserted.replaced {
            debug!("button: pin {} handler replaced", pin);
        } else {
            debug!("button: pin {} registered on {}", pin, line);
        }
        Ok(inserted.token)
    }

    /// Release a button
    ///
    /// Removes its registration, masks the interrupt line once no other
    /// active button uses it, returns the pin to its reset configuration
    /// and drops the clock claim taken by `configure`.
    ///
    /// A handle whose registration was replaced by a newer button on the
    /// same pin index leaves the registry and the line alone but still
    /// releases its own pin and clock claim.
    pub fn deconfigure<H: Platform>(
        &self,
        hw: &mut H,
        btn: &mut Button<H::Port>,
    ) -> Result<(), Error> {
        self.check_live(btn)?;

        let was_active = btn.is_active();
        btn.state = ButtonState::Released;

        let mut result = Ok(());
        if let Some(token) = btn.token {
            match self
                .registry
                .lock(|reg| reg.borrow_mut().remove(btn.pin, token))
            {
                Some(last_user) => {
                    debug!("button: pin {} deregistered", btn.pin);
                    if last_user {
                        result = hw.disable_line(btn.irq_line()).map_err(Error::Interrupt);
                    }
                }
                None => debug!("button: pin {} superseded, releasing pin only", btn.pin),
            }
        }

        // A suspended pin was already returned to reset state
        if was_active {
            let released = hw.deconfigure(btn.port, btn.pin).map_err(Error::Gpio);
            hw.disable_clock(btn.port);
            result = result.and(released);
        }

        result
    }

    /// Suspend (`true`) or resume (`false`) a button
    ///
    /// Suspending keeps the registration but masks the line (when no other
    /// active button shares it), deconfigures the pin and releases the
    /// clock claim. Resuming reclaims the clock, re-applies the settings
    /// captured at configure time and re-enables the line. Requests that
    /// match the current state do nothing. A failed step undoes the earlier
    /// ones, so the button stays in the state it was in.
    ///
    /// A superseded handle cannot be suspended or resumed: resuming it
    /// would route the pin's interrupt line away from its successor.
    pub fn suspend<H: Platform>(
        &self,
        hw: &mut H,
        btn: &mut Button<H::Port>,
        on: bool,
    ) -> Result<(), Error> {
        self.check_live(btn)?;
        self.check_owner(btn)?;

        match (btn.state, on) {
            (ButtonState::Active, true) => self.enter_suspend(hw, btn),
            (ButtonState::Suspended, false) => self.leave_suspend(hw, btn),
            _ => Ok(()),
        }
    }

    fn enter_suspend<H: Platform>(&self, hw: &mut H, btn: &mut Button<H::Port>) -> Result<(), Error> {
        if let Some(token) = btn.token {
            let last_user = self
                .registry
                .lock(|reg| reg.borrow_mut().set_active(btn.pin, token, false));
            if last_user == Some(true) {
                if let Err(e) = hw.disable_line(btn.irq_line()) {
                    self.registry
                        .lock(|reg| reg.borrow_mut().set_active(btn.pin, token, true));
                    return Err(Error::Interrupt(e));
                }
            }
        }

        if let Err(e) = hw.deconfigure(btn.port, btn.pin) {
            if self.activate_line(hw, btn).is_err() {
                warn!("button: pin {} line left masked after failure", btn.pin);
            }
            return Err(Error::Gpio(e));
        }
        hw.disable_clock(btn.port);

        btn.state = ButtonState::Suspended;
        debug!("button: pin {} suspended", btn.pin);
        Ok(())
    }

    fn leave_suspend<H: Platform>(&self, hw: &mut H, btn: &mut Button<H::Port>) -> Result<(), Error> {
        hw.enable_clock(btn.port);
        if let Err(e) = hw.configure(btn.port, btn.pin, btn.settings) {
            hw.disable_clock(btn.port);
            return Err(Error::Gpio(e));
        }

        if let Err(err) = self.activate_line(hw, btn) {
            if hw.deconfigure(btn.port, btn.pin).is_err() {
                warn!("button: pin {} left configured after failure", btn.pin);
            }
            hw.disable_clock(btn.port);
            return Err(err);
        }

        btn.state = ButtonState::Active;
        debug!("button: pin {} resumed", btn.pin);
        Ok(())
    }

    /// Enable the button's line and mark its registration active
    fn activate_line<H: Platform>(&self, hw: &mut H, btn: &Button<H::Port>) -> Result<(), Error> {
        if let Some(token) = btn.token {
            hw.enable_line(btn.irq_line(), BUTTON_PRIORITY)
                .map_err(Error::Interrupt)?;
            self.registry
                .lock(|reg| reg.borrow_mut().set_active(btn.pin, token, true));
        }
        Ok(())
    }

    /// Read the button's pin level (true = high)
    ///
    /// Touches neither the registry nor any peripheral configuration.
    pub fn get_state<G: GpioControl>(&self, gpio: &G, btn: &Button<G::Port>) -> Result<bool, Error> {
        self.check_live(btn)?;
        Ok(gpio.read(btn.port, btn.pin))
    }

    /// Check whether `pin` has a registration (active or suspended)
    pub fn is_registered(&self, pin: PinIndex) -> bool {
        self.registry.lock(|reg| reg.borrow().is_registered(pin))
    }

    /// Number of active registrations keeping `line` enabled
    pub fn line_users(&self, line: IrqLine) -> u8 {
        self.registry.lock(|reg| reg.borrow().line_users(line))
    }

    /// Run the handler registered for `pin`
    ///
    /// Called from interrupt context after the pin's pending flag has been
    /// cleared. A pin without an active registration is ignored: its line
    /// can still fire once after being masked.
    pub fn dispatch(&self, pin: PinIndex) {
        let handler = self.registry.lock(|reg| reg.borrow().active_handler(pin));

        match handler {
            Some(handler) => handler.on_edge(),
            None => trace!("button: edge on unregistered pin {}", pin),
        }
    }

    /// Service every pending pin on `line`, in ascending pin order
    ///
    /// Each pending flag is cleared before its handler runs, so an edge
    /// arriving during a slow handler latches again instead of being lost
    /// or looping.
    pub fn line_sweep<F: PendingFlags>(&self, flags: &mut F, line: IrqLine) {
        for pin in line.pins() {
            if flags.is_pending(pin) {
                flags.clear_pending(pin);
                self.dispatch(pin);
            }
        }
    }

    /// Service every pending pin that has a registration, in ascending order
    ///
    /// For platforms that route all EXTI vectors into one handler.
    /// Pending flags of unregistered pins are left alone.
    pub fn sweep_all<F: PendingFlags>(&self, flags: &mut F) {
        let registered = self.registry.lock(|reg| reg.borrow().registered_mask());

        for pin in PinIndex::all() {
            if registered & pin.mask() != 0 && flags.is_pending(pin) {
                flags.clear_pending(pin);
                self.dispatch(pin);
            }
        }
    }

    /// Reject handles that were already deconfigured
    fn check_live<P: Copy>(&self, btn: &Button<P>) -> Result<(), Error> {
        if btn.state == ButtonState::Released {
            warn!("button: pin {} handle already released", btn.pin);
            return Err(Error::InvalidHandle);
        }
        Ok(())
    }

    /// Reject handles whose registration was replaced or reset
    fn check_owner<P: Copy>(&self, btn: &Button<P>) -> Result<(), Error> {
        if let Some(token) = btn.token {
            let owned = self.registry.lock(|reg| reg.borrow().owns(btn.pin, token));
            if !owned {
                warn!("button: pin {} handle superseded", btn.pin);
                return Err(Error::InvalidHandle);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};
    use std::vec::Vec;
    use tactile_hal::{ClockControl, GpioBank, HalError, InterruptController, PinMode, Pull};

    /// Capability call recorded by the mock platform
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        ClockOn(char),
        ClockOff(char),
        Configure(char, u8, PinSettings),
        Deconfigure(char, u8),
        LineOn(IrqLine, Priority),
        LineOff(IrqLine),
    }

    /// Mock platform recording every capability call
    #[derive(Default)]
    struct MockPlatform {
        calls: Vec<Call>,
        level: bool,
        fail_gpio: bool,
        fail_irq: bool,
        fail_mask: bool,
    }

    impl MockPlatform {
        fn take(&mut self) -> Vec<Call> {
            core::mem::take(&mut self.calls)
        }

        /// Clock claims taken minus claims released
        fn clock_balance(&self) -> i32 {
            self.calls
                .iter()
                .map(|call| match call {
                    Call::ClockOn(_) => 1,
                    Call::ClockOff(_) => -1,
                    _ => 0,
                })
                .sum()
        }
    }

    impl GpioBank for MockPlatform {
        type Port = char;
    }

    impl GpioControl for MockPlatform {
        fn configure(&mut self, port: char, pin: PinIndex, settings: PinSettings) -> Result<(), HalError> {
            if self.fail_gpio {
                return Err(HalError::Busy);
            }
            self.calls.push(Call::Configure(port, pin.get(), settings));
            Ok(())
        }

        fn deconfigure(&mut self, port: char, pin: PinIndex) -> Result<(), HalError> {
            self.calls.push(Call::Deconfigure(port, pin.get()));
            Ok(())
        }

        fn read(&self, _port: char, _pin: PinIndex) -> bool {
            self.level
        }
    }

    impl ClockControl for MockPlatform {
        fn enable_clock(&mut self, port: char) {
            self.calls.push(Call::ClockOn(port));
        }

        fn disable_clock(&mut self, port: char) {
            self.calls.push(Call::ClockOff(port));
        }
    }

    impl InterruptController for MockPlatform {
        fn enable_line(&mut self, line: IrqLine, priority: Priority) -> Result<(), HalError> {
            if self.fail_irq {
                return Err(HalError::Hardware);
            }
            self.calls.push(Call::LineOn(line, priority));
            Ok(())
        }

        fn disable_line(&mut self, line: IrqLine) -> Result<(), HalError> {
            if self.fail_mask {
                return Err(HalError::Hardware);
            }
            self.calls.push(Call::LineOff(line));
            Ok(())
        }
    }

    struct Counter(AtomicU32);

    impl Counter {
        const fn new() -> Self {
            Self(AtomicU32::new(0))
        }

        fn hits(&self) -> u32 {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl EdgeHandler for Counter {
        fn on_edge(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn pin(n: u8) -> PinIndex {
        PinIndex::new(n).unwrap()
    }

    #[test]
    fn test_polled_configuration() {
        let dispatcher = Dispatcher::new();
        let mut hw = MockPlatform::default();

        let btn = dispatcher.configure(&mut hw, 'A', 0, ButtonMode::Polled).unwrap();

        assert_eq!(
            hw.take(),
            [
                Call::ClockOn('A'),
                Call::Configure('A', 0, PinSettings::polled_input()),
            ]
        );
        assert_eq!(btn.kind(), ButtonKind::Polled);
        assert!(!btn.has_handler());
        assert!(!dispatcher.is_registered(pin(0)));
    }

    #[test]
    fn test_interrupt_configuration() {
        let counter = Counter::new();
        let dispatcher = Dispatcher::new();
        let mut hw = MockPlatform::default();

        let btn = dispatcher
            .configure(&mut hw, 'C', 13, ButtonMode::Interrupt(&counter))
            .unwrap();

        let calls = hw.take();
        assert_eq!(calls[0], Call::ClockOn('C'));
        match calls[1] {
            Call::Configure('C', 13, settings) => {
                assert_eq!(settings.mode, PinMode::InterruptFalling);
                assert_eq!(settings.pull, Pull::None);
            }
            other => panic!("unexpected call {:?}", other),
        }
        assert_eq!(calls[2], Call::LineOn(IrqLine::Line10_15, Priority::LOWEST));
        assert!(btn.has_handler());
        assert!(dispatcher.is_registered(pin(13)));
    }

    #[test]
    fn test_invalid_pin_touches_nothing() {
        let dispatcher = Dispatcher::new();
        let mut hw = MockPlatform::default();

        let result = dispatcher.configure(&mut hw, 'A', 16, ButtonMode::Polled);

        assert_eq!(result.unwrap_err(), Error::InvalidPin);
        assert!(hw.calls.is_empty());
    }

    #[test]
    fn test_gpio_failure_is_surfaced() {
        let counter = Counter::new();
        let dispatcher = Dispatcher::new();
        let mut hw = MockPlatform {
            fail_gpio: true,
            ..Default::default()
        };

        let result = dispatcher.configure(&mut hw, 'B', 4, ButtonMode::Interrupt(&counter));

        assert_eq!(result.unwrap_err(), Error::Gpio(HalError::Busy));
        assert!(!dispatcher.is_registered(pin(4)));
        assert_eq!(hw.take(), [Call::ClockOn('B'), Call::ClockOff('B')]);
    }

    #[test]
    fn test_irq_failure_does_not_register() {
        let counter = Counter::new();
        let dispatcher = Dispatcher::new();
        let mut hw = MockPlatform {
            fail_irq: true,
            ..Default::default()
        };

        let result = dispatcher.configure(&mut hw, 'B', 4, ButtonMode::Interrupt(&counter));

        assert_eq!(result.unwrap_err(), Error::Interrupt(HalError::Hardware));
        assert!(!dispatcher.is_registered(pin(4)));
        dispatcher.dispatch(pin(4));
        assert_eq!(counter.hits(), 0);

        // Pin and clock claim are handed back
        assert_eq!(hw.clock_balance(), 0);
        assert_eq!(hw.calls.last(), Some(&Call::ClockOff('B')));
        assert!(hw.calls.contains(&Call::Deconfigure('B', 4)));
    }

    #[test]
    fn test_dispatch_invokes_registered_handler_once() {
        let counter = Counter::new();
        let dispatcher = Dispatcher::new();
        let mut hw = MockPlatform::default();

        dispatcher
            .configure(&mut hw, 'A', 7, ButtonMode::Interrupt(&counter))
            .unwrap();
        dispatcher.dispatch(pin(7));

        assert_eq!(counter.hits(), 1);
    }

    #[test]
    fn test_dispatch_unregistered_pin_is_ignored() {
        let dispatcher = Dispatcher::new();
        dispatcher.dispatch(pin(9));
    }

    #[test]
    fn test_replacement_supersedes_old_handle() {
        let old = Counter::new();
        let new = Counter::new();
        let dispatcher = Dispatcher::new();
        let mut hw = MockPlatform::default();

        let mut first = dispatcher
            .configure(&mut hw, 'A', 6, ButtonMode::Interrupt(&old))
            .unwrap();
        let _second = dispatcher
            .configure(&mut hw, 'B', 6, ButtonMode::Interrupt(&new))
            .unwrap();
        hw.take();

        dispatcher.dispatch(pin(6));
        assert_eq!(old.hits(), 0);
        assert_eq!(new.hits(), 1);

        // The old handle cannot suspend its successor's line
        assert_eq!(dispatcher.suspend(&mut hw, &mut first, true), Err(Error::InvalidHandle));
        assert!(hw.calls.is_empty());

        // It can still be read and can release its own pin
        assert_eq!(dispatcher.get_state(&hw, &first), Ok(false));
        dispatcher.deconfigure(&mut hw, &mut first).unwrap();
        assert_eq!(hw.take(), [Call::Deconfigure('A', 6), Call::ClockOff('A')]);
        assert_eq!(first.state(), ButtonState::Released);

        // The successor keeps its registration and line
        assert!(dispatcher.is_registered(pin(6)));
        assert_eq!(dispatcher.line_users(IrqLine::Line5_9), 1);
        dispatcher.dispatch(pin(6));
        assert_eq!(new.hits(), 2);
    }

    #[test]
    fn test_deconfigure_sequence() {
        let counter = Counter::new();
        let dispatcher = Dispatcher::new();
        let mut hw = MockPlatform::default();

        let mut btn = dispatcher
            .configure(&mut hw, 'A', 2, ButtonMode::Interrupt(&counter))
            .unwrap();
        hw.take();

        dispatcher.deconfigure(&mut hw, &mut btn).unwrap();

        assert_eq!(
            hw.take(),
            [
                Call::LineOff(IrqLine::Line2),
                Call::Deconfigure('A', 2),
                Call::ClockOff('A'),
            ]
        );
        assert_eq!(btn.state(), ButtonState::Released);
        assert!(!dispatcher.is_registered(pin(2)));

        dispatcher.dispatch(pin(2));
        assert_eq!(counter.hits(), 0);
    }

    #[test]
    fn test_shared_line_stays_enabled_for_sibling() {
        let a = Counter::new();
        let b = Counter::new();
        let dispatcher = Dispatcher::new();
        let mut hw = MockPlatform::default();

        let mut btn_a = dispatcher
            .configure(&mut hw, 'A', 10, ButtonMode::Interrupt(&a))
            .unwrap();
        let mut btn_b = dispatcher
            .configure(&mut hw, 'A', 12, ButtonMode::Interrupt(&b))
            .unwrap();
        hw.take();

        dispatcher.deconfigure(&mut hw, &mut btn_a).unwrap();
        assert_eq!(hw.take(), [Call::Deconfigure('A', 10), Call::ClockOff('A')]);
        assert_eq!(dispatcher.line_users(IrqLine::Line10_15), 1);

        dispatcher.dispatch(pin(12));
        assert_eq!(b.hits(), 1);

        dispatcher.deconfigure(&mut hw, &mut btn_b).unwrap();
        assert_eq!(
            hw.take(),
            [
                Call::LineOff(IrqLine::Line10_15),
                Call::Deconfigure('A', 12),
                Call::ClockOff('A'),
            ]
        );
    }

    #[test]
    fn test_deconfigure_polled_button() {
        let dispatcher = Dispatcher::new();
        let mut hw = MockPlatform::default();

        let mut btn = dispatcher.configure(&mut hw, 'D', 1, ButtonMode::Polled).unwrap();
        hw.take();

        dispatcher.deconfigure(&mut hw, &mut btn).unwrap();
        assert_eq!(hw.take(), [Call::Deconfigure('D', 1), Call::ClockOff('D')]);
    }

    #[test]
    fn test_released_handle_is_rejected_without_hardware_calls() {
        let counter = Counter::new();
        let dispatcher = Dispatcher::new();
        let mut hw = MockPlatform::default();

        let mut btn = dispatcher
            .configure(&mut hw, 'A', 3, ButtonMode::Interrupt(&counter))
            .unwrap();
        dispatcher.deconfigure(&mut hw, &mut btn).unwrap();
        hw.take();

        assert_eq!(dispatcher.deconfigure(&mut hw, &mut btn), Err(Error::InvalidHandle));
        assert_eq!(dispatcher.suspend(&mut hw, &mut btn, true), Err(Error::InvalidHandle));
        assert_eq!(dispatcher.suspend(&mut hw, &mut btn, false), Err(Error::InvalidHandle));
        assert_eq!(dispatcher.get_state(&hw, &btn), Err(Error::InvalidHandle));
        assert!(hw.calls.is_empty());
    }

    #[test]
    fn test_suspend_and_resume_round_trip() {
        let counter = Counter::new();
        let dispatcher = Dispatcher::new();
        let mut hw = MockPlatform::default();

        let mut btn = dispatcher
            .configure(&mut hw, 'B', 0, ButtonMode::Interrupt(&counter))
            .unwrap();
        let configured = btn.settings();
        hw.take();

        dispatcher.suspend(&mut hw, &mut btn, true).unwrap();
        assert_eq!(
            hw.take(),
            [
                Call::LineOff(IrqLine::Line0),
                Call::Deconfigure('B', 0),
                Call::ClockOff('B'),
            ]
        );
        assert_eq!(btn.state(), ButtonState::Suspended);
        assert!(dispatcher.is_registered(pin(0)));

        dispatcher.dispatch(pin(0));
        assert_eq!(counter.hits(), 0);

        dispatcher.suspend(&mut hw, &mut btn, false).unwrap();
        assert_eq!(
            hw.take(),
            [
                Call::ClockOn('B'),
                Call::Configure('B', 0, configured),
                Call::LineOn(IrqLine::Line0, Priority::LOWEST),
            ]
        );
        assert!(btn.is_active());

        dispatcher.dispatch(pin(0));
        assert_eq!(counter.hits(), 1);
    }

    #[test]
    fn test_repeated_suspend_is_noop() {
        let dispatcher = Dispatcher::new();
        let mut hw = MockPlatform::default();

        let mut btn = dispatcher.configure(&mut hw, 'A', 8, ButtonMode::Polled).unwrap();
        dispatcher.suspend(&mut hw, &mut btn, false).unwrap();
        dispatcher.suspend(&mut hw, &mut btn, true).unwrap();
        hw.take();

        dispatcher.suspend(&mut hw, &mut btn, true).unwrap();
        assert!(hw.calls.is_empty());
    }

    #[test]
    fn test_deconfigure_from_suspended() {
        let counter = Counter::new();
        let dispatcher = Dispatcher::new();
        let mut hw = MockPlatform::default();

        let mut btn = dispatcher
            .configure(&mut hw, 'A', 1, ButtonMode::Interrupt(&counter))
            .unwrap();
        dispatcher.suspend(&mut hw, &mut btn, true).unwrap();
        hw.take();

        dispatcher.deconfigure(&mut hw, &mut btn).unwrap();

        // Line and pin were already released by the suspend
        assert!(hw.calls.is_empty());
        assert!(!dispatcher.is_registered(pin(1)));
        assert_eq!(btn.state(), ButtonState::Released);
    }

    #[test]
    fn test_get_state_reads_level_only() {
        let dispatcher = Dispatcher::new();
        let mut hw = MockPlatform::default();

        let btn = dispatcher.configure(&mut hw, 'A', 0, ButtonMode::Polled).unwrap();
        hw.take();

        hw.level = true;
        assert_eq!(dispatcher.get_state(&hw, &btn), Ok(true));
        hw.level = false;
        assert_eq!(dispatcher.get_state(&hw, &btn), Ok(false));
        assert!(hw.calls.is_empty());
        assert!(btn.is_active());
    }

    #[test]
    fn test_reset_invalidates_handles() {
        let counter = Counter::new();
        let dispatcher = Dispatcher::new();
        let mut hw = MockPlatform::default();

        let mut btn = dispatcher
            .configure(&mut hw, 'A', 5, ButtonMode::Interrupt(&counter))
            .unwrap();
        dispatcher.reset();

        assert!(!dispatcher.is_registered(pin(5)));
        assert_eq!(dispatcher.suspend(&mut hw, &mut btn, true), Err(Error::InvalidHandle));

        hw.take();
        dispatcher.deconfigure(&mut hw, &mut btn).unwrap();
        assert_eq!(hw.take(), [Call::Deconfigure('A', 5), Call::ClockOff('A')]);
    }

    #[test]
    fn test_failed_resume_returns_clock_claim() {
        let counter = Counter::new();
        let dispatcher = Dispatcher::new();
        let mut hw = MockPlatform::default();

        let mut btn = dispatcher
            .configure(&mut hw, 'B', 4, ButtonMode::Interrupt(&counter))
            .unwrap();
        dispatcher.suspend(&mut hw, &mut btn, true).unwrap();

        hw.fail_irq = true;
        assert_eq!(
            dispatcher.suspend(&mut hw, &mut btn, false),
            Err(Error::Interrupt(HalError::Hardware))
        );
        assert_eq!(btn.state(), ButtonState::Suspended);
        assert_eq!(hw.clock_balance(), 0);
        assert_eq!(dispatcher.line_users(IrqLine::Line4), 0);

        // A retry after the fault claims the clock exactly once
        hw.fail_irq = false;
        dispatcher.suspend(&mut hw, &mut btn, false).unwrap();
        assert!(btn.is_active());
        assert_eq!(hw.clock_balance(), 1);

        dispatcher.suspend(&mut hw, &mut btn, true).unwrap();
        assert_eq!(hw.clock_balance(), 0);
    }

    #[test]
    fn test_failed_resume_configure_returns_clock_claim() {
        let dispatcher = Dispatcher::new();
        let mut hw = MockPlatform::default();

        let mut btn = dispatcher.configure(&mut hw, 'E', 9, ButtonMode::Polled).unwrap();
        dispatcher.suspend(&mut hw, &mut btn, true).unwrap();

        hw.fail_gpio = true;
        assert_eq!(
            dispatcher.suspend(&mut hw, &mut btn, false),
            Err(Error::Gpio(HalError::Busy))
        );
        assert_eq!(btn.state(), ButtonState::Suspended);
        assert_eq!(hw.clock_balance(), 0);
    }

    #[test]
    fn test_failed_suspend_keeps_button_active() {
        let counter = Counter::new();
        let dispatcher = Dispatcher::new();
        let mut hw = MockPlatform::default();

        let mut btn = dispatcher
            .configure(&mut hw, 'C', 3, ButtonMode::Interrupt(&counter))
            .unwrap();
        hw.take();

        hw.fail_mask = true;
        assert_eq!(
            dispatcher.suspend(&mut hw, &mut btn, true),
            Err(Error::Interrupt(HalError::Hardware))
        );

        assert!(btn.is_active());
        assert!(hw.calls.is_empty());
        assert_eq!(dispatcher.line_users(IrqLine::Line3), 1);
        dispatcher.dispatch(pin(3));
        assert_eq!(counter.hits(), 1);

        hw.fail_mask = false;
        dispatcher.suspend(&mut hw, &mut btn, true).unwrap();
        assert_eq!(btn.state(), ButtonState::Suspended);
    }

    #[test]
    fn test_configure_deconfigure_cycles_balance_clock() {
        let counter = Counter::new();
        let dispatcher = Dispatcher::new();
        let mut hw = MockPlatform::default();

        for _ in 0..3 {
            let mut btn = dispatcher
                .configure(&mut hw, 'A', 0, ButtonMode::Interrupt(&counter))
                .unwrap();
            dispatcher.suspend(&mut hw, &mut btn, true).unwrap();
            dispatcher.suspend(&mut hw, &mut btn, false).unwrap();
            dispatcher.deconfigure(&mut hw, &mut btn).unwrap();
        }

        assert_eq!(hw.clock_balance(), 0);
    }
}
