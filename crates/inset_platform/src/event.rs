//! Event source and platform events

use crate::error::PlatformError;
use crate::geometry::{Bounds, ViewId};

/// Event source abstraction
///
/// Platform backends (and test drivers) implement this trait to feed
/// keyboard, focus and viewport notifications to a coordinator. Events are
/// delivered one at a time, in arrival order, on the caller's thread.
pub trait EventSource {
    /// Run the event source
    ///
    /// Blocks until the source is exhausted or the handler returns
    /// `ControlFlow::Exit`.
    fn run<F>(self, handler: F) -> Result<(), PlatformError>
    where
        F: FnMut(Event) -> ControlFlow;
}

/// Control flow after handling an event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControlFlow {
    /// Keep delivering events
    #[default]
    Continue,
    /// Stop delivering events
    Exit,
}

/// Platform events
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// On-screen keyboard notification
    Keyboard(KeyboardEvent),
    /// Input focus change
    Focus(FocusEvent),
    /// Scroll container geometry change
    Viewport(ViewportEvent),
    /// Application lifecycle event
    Lifecycle(LifecycleEvent),
    /// Frame tick
    Frame,
}

impl From<KeyboardEvent> for Event {
    fn from(event: KeyboardEvent) -> Self {
        Event::Keyboard(event)
    }
}

impl From<FocusEvent> for Event {
    fn from(event: FocusEvent) -> Self {
        Event::Focus(event)
    }
}

impl From<ViewportEvent> for Event {
    fn from(event: ViewportEvent) -> Self {
        Event::Viewport(event)
    }
}

// ============================================================================
// Keyboard Events
// ============================================================================

/// Kind of keyboard notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyboardEventKind {
    /// Keyboard is about to appear (or has appeared)
    Show,
    /// Keyboard is about to disappear (or has disappeared)
    Hide,
    /// Keyboard frame changed (end of an animation, or a layout switch)
    FrameChange,
}

/// Keyboard notification with geometry
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// What happened
    pub kind: KeyboardEventKind,
    /// Height of the keyboard in logical points
    pub height: f32,
    /// Duration of the accompanying animation in milliseconds
    pub duration_ms: f32,
}

impl KeyboardEvent {
    /// Keyboard show notification
    pub fn show(height: f32, duration_ms: f32) -> Self {
        Self {
            kind: KeyboardEventKind::Show,
            height,
            duration_ms,
        }
    }

    /// Keyboard hide notification
    pub fn hide(duration_ms: f32) -> Self {
        Self {
            kind: KeyboardEventKind::Hide,
            height: 0.0,
            duration_ms,
        }
    }

    /// Keyboard frame change notification
    pub fn frame_change(height: f32) -> Self {
        Self {
            kind: KeyboardEventKind::FrameChange,
            height,
            duration_ms: 0.0,
        }
    }
}

// ============================================================================
// Focus Events
// ============================================================================

/// Input focus notifications from text input widgets
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FocusEvent {
    /// A view gained input focus
    Gained {
        /// The focused view
        view: ViewId,
        /// Measured bounds in the scroll container's content space
        bounds: Bounds,
        /// Per-view margin to keep above the keyboard (overrides the default)
        extra_offset: Option<f32>,
    },
    /// A view lost input focus
    Lost {
        /// The view that was blurred
        view: ViewId,
    },
    /// A view was re-measured (multiline growth, layout pass)
    BoundsChanged {
        /// The re-measured view
        view: ViewId,
        /// New bounds in content space
        bounds: Bounds,
    },
}

impl FocusEvent {
    /// Get the view this event refers to
    pub fn view(&self) -> ViewId {
        match self {
            FocusEvent::Gained { view, .. } => *view,
            FocusEvent::Lost { view } => *view,
            FocusEvent::BoundsChanged { view, .. } => *view,
        }
    }
}

// ============================================================================
// Viewport Events
// ============================================================================

/// Geometry reports from the hosting scroll container
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportEvent {
    /// Visible height changed (rotation, native resize)
    Resized {
        /// New visible height
        height: f32,
    },
    /// Total content height changed
    ContentResized {
        /// New content height
        content_height: f32,
    },
    /// Scroll offset changed (user scroll or applied correction)
    Scrolled {
        /// New scroll offset
        offset: f32,
    },
}

// ============================================================================
// Lifecycle Events
// ============================================================================

/// Application lifecycle events
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Application resumed (came to foreground)
    Resumed,
    /// Application suspended (went to background)
    Suspended,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_flow_default() {
        assert_eq!(ControlFlow::default(), ControlFlow::Continue);
    }

    #[test]
    fn test_keyboard_constructors() {
        let hide = KeyboardEvent::hide(250.0);
        assert_eq!(hide.kind, KeyboardEventKind::Hide);
        assert_eq!(hide.height, 0.0);

        let frame = KeyboardEvent::frame_change(300.0);
        assert_eq!(frame.kind, KeyboardEventKind::FrameChange);
        assert_eq!(frame.duration_ms, 0.0);
    }

    #[test]
    fn test_focus_event_view() {
        let gained = FocusEvent::Gained {
            view: ViewId(7),
            bounds: Bounds::new(0.0, 10.0),
            extra_offset: None,
        };
        assert_eq!(gained.view(), ViewId(7));
        assert_eq!(FocusEvent::Lost { view: ViewId(3) }.view(), ViewId(3));

        let moved = FocusEvent::BoundsChanged {
            view: ViewId(4),
            bounds: Bounds::new(0.0, 10.0),
        };
        assert_eq!(Event::from(moved), Event::Focus(moved));
        assert_eq!(moved.view(), ViewId(4));
    }
}
