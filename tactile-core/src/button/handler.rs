//! Edge handlers
//!
//! Handlers run in interrupt context. They must be short and must not
//! block; anything heavier should signal a task and return.

/// Callback invoked when a registered pin sees its configured edge
///
/// Handlers are shared between base and interrupt context, hence `Sync`.
/// State a handler needs lives in the handler itself (atomics, signals,
/// critical-section cells), not in extra globals.
pub trait EdgeHandler: Sync {
    /// Called once per detected edge, with the pending flag already cleared
    fn on_edge(&self);
}

// Plain functions and non-capturing or `Sync`-capturing closures
impl<F: Fn() + Sync> EdgeHandler for F {
    fn on_edge(&self) {
        self()
    }
}

/// Function paired with an opaque context value
///
/// Lets one handler function serve several buttons, each with its own
/// context (an index, a channel reference, a counter).
pub struct ContextHandler<C> {
    func: fn(&C),
    context: C,
}

impl<C> ContextHandler<C> {
    /// Pair `func` with `context`
    pub const fn new(func: fn(&C), context: C) -> Self {
        Self { func, context }
    }

    /// Access the context value
    pub fn context(&self) -> &C {
        &self.context
    }
}

impl<C: Sync> EdgeHandler for ContextHandler<C> {
    fn on_edge(&self) {
        (self.func)(&self.context)
    }
}
