//! Inset Core
//!
//! Keeps the focused input of a scrollable form visible above the
//! on-screen keyboard, independent of any UI toolkit.
//!
//! # Components
//!
//! - **Platform policy** ([`policy`]) - native resize vs manual compensation,
//!   selected once at startup
//! - **Inset model** ([`keyboard`]) - keyboard visibility and occlusion height
//! - **Focus tracker** ([`focus`]) - the single focused view and its bounds
//! - **Scroll coordinator** ([`coordinator`]) - turns the above into one
//!   corrective scroll per keyboard transition
//!
//! # Example
//!
//! ```ignore
//! use inset_core::prelude::*;
//!
//! let config = resolve_or_fallback(&Platform::current());
//! let mut coordinator = ScrollCoordinator::new(config, Viewport::new(800.0, 2400.0));
//!
//! coordinator.on_focus_gained(ViewId(42), Bounds::new(450.0, 520.0), None);
//! if let Some(issued) = coordinator.on_keyboard_event(&KeyboardEvent::show(300.0, 0.0)) {
//!     coordinator.apply(&mut host, &issued);
//! }
//! ```

pub mod coordinator;
pub mod focus;
pub mod host;
pub mod keyboard;
pub mod policy;

mod error;
mod sanitize;


pub use coordinator::{
    compute_correction, CorrectionReason, IssuedCorrection, ScrollCoordinator, ScrollCorrection,
};
pub use error::{InsetError, Result};
pub use focus::{FocusTarget, FocusTracker};
pub use host::{ScrollHost, VirtualScrollHost};
pub use keyboard::{InsetModel, InsetUpdate, KeyboardPhase, KeyboardState};
pub use policy::{
    resolve, resolve_or_fallback, CompensationMode, DismissPolicy, PlatformConfig,
    PlatformOverrides, PolicyTable,
};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::coordinator::{
        compute_correction, CorrectionReason, IssuedCorrection, ScrollCoordinator,
        ScrollCorrection,
    };
    pub use crate::error::{InsetError, Result};
    pub use crate::focus::FocusTarget;
    pub use crate::host::{ScrollHost, VirtualScrollHost};
    pub use crate::keyboard::{KeyboardPhase, KeyboardState};
    pub use crate::policy::{
        resolve, resolve_or_fallback, CompensationMode, DismissPolicy, PlatformConfig,
        PolicyTable,
    };

    // Platform types
    pub use inset_platform::{
        Bounds, Event, FocusEvent, KeyboardEvent, KeyboardEventKind, Platform, ViewId, Viewport,
        ViewportEvent,
    };
}
