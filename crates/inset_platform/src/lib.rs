//! Inset Platform Abstraction Layer
//!
//! This crate provides the platform-agnostic vocabulary that keyboard
//! event sources, input widgets and scroll containers use to talk to an
//! inset coordinator.
//!
//! # Architecture
//!
//! - [`Platform`] - Runtime platform identification
//! - [`EventSource`] - Ordered delivery of keyboard, focus and viewport events
//! - [`Bounds`] / [`Viewport`] - Geometry reported by the host UI toolkit
//!
//! # Example
//!
//! ```ignore
//! use inset_platform::*;
//!
//! fn drive(source: impl EventSource) -> Result<()> {
//!     source.run(|event| {
//!         match event {
//!             Event::Keyboard(kb) if kb.kind == KeyboardEventKind::Show => {
//!                 // Keyboard is appearing
//!             }
//!             Event::Lifecycle(LifecycleEvent::Suspended) => {
//!                 return ControlFlow::Exit;
//!             }
//!             _ => {}
//!         }
//!         ControlFlow::Continue
//!     })
//! }
//! ```

mod error;
mod event;
mod geometry;
mod platform;

// Re-export all public types
pub use error::{PlatformError, Result};
pub use event::{
    ControlFlow, Event, EventSource, FocusEvent, KeyboardEvent, KeyboardEventKind,
    LifecycleEvent, ViewportEvent,
};
pub use geometry::{Bounds, ViewId, Viewport};
pub use platform::Platform;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{PlatformError, Result};
    pub use crate::event::{
        ControlFlow, Event, EventSource, FocusEvent, KeyboardEvent, KeyboardEventKind,
        LifecycleEvent, ViewportEvent,
    };
    pub use crate::geometry::{Bounds, ViewId, Viewport};
    pub use crate::platform::Platform;
}
