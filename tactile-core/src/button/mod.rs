//! Button registry and interrupt dispatch
//!
//! A [`Dispatcher`] owns the pin-to-handler table. Base-context code
//! configures, suspends and releases [`Button`]s through it; the EXTI
//! vector handlers call its interrupt entry points.
//!
//! Lifecycle of an interrupt-mode button:
//!
//! ```text
//!  configure        suspend(true)
//! ───────────► Active ◄──────────► Suspended
//!                │   suspend(false)    │
//!                └──────┬──────────────┘
//!                       │ deconfigure
//!                       ▼
//!                   Released
//! ```

pub mod dispatcher;
pub mod handler;
pub mod input;
mod registry;

pub use dispatcher::{Button, ButtonKind, ButtonMode, ButtonState, Dispatcher};
pub use handler::{ContextHandler, EdgeHandler};
pub use input::ButtonInput;
