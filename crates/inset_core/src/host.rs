//! Hosting scroll container
//!
//! The coordinator never scrolls anything itself. It hands a
//! [`ScrollCorrection`] to whatever owns the scroll view; the host clamps
//! it, runs any animation and reports its geometry back.

use inset_platform::Viewport;

use crate::coordinator::ScrollCorrection;

/// A scroll container that can execute corrections
pub trait ScrollHost {
    /// Current visible height and content extent
    fn viewport(&self) -> Viewport;

    /// Current scroll offset
    fn scroll_offset(&self) -> f32;

    /// Execute a correction
    ///
    /// The host is responsible for clamping `target_offset` into its
    /// scrollable range and for owning the animation lifecycle.
    fn scroll_to(&mut self, correction: &ScrollCorrection);
}

/// In-memory scroll container
///
/// Applies corrections instantly, clamped to the content extent, and keeps a
/// log of every offset it was asked to scroll to. Used by the CLI simulator
/// and in tests.
#[derive(Clone, Debug, Default)]
pub struct VirtualScrollHost {
    viewport: Viewport,
    offset: f32,
    history: Vec<ScrollCorrection>,
}

impl VirtualScrollHost {
    /// Create a host scrolled to the top
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            offset: 0.0,
            history: Vec::new(),
        }
    }

    /// Start at a given offset
    pub fn with_offset(mut self, offset: f32) -> Self {
        self.offset = self.viewport.clamp_offset(offset);
        self
    }

    /// Resize the visible area (rotation, native keyboard resize)
    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport.height = height;
        self.offset = self.viewport.clamp_offset(self.offset);
    }

    /// Change the content extent
    pub fn set_content_height(&mut self, content_height: f32) {
        self.viewport.content_height = content_height;
        self.offset = self.viewport.clamp_offset(self.offset);
    }

    /// Scroll as the user would
    pub fn user_scroll(&mut self, offset: f32) {
        self.offset = self.viewport.clamp_offset(offset);
    }

    /// Corrections received so far, unclamped
    pub fn history(&self) -> &[ScrollCorrection] {
        &self.history
    }
}

impl ScrollHost for VirtualScrollHost {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_offset(&self) -> f32 {
        self.offset
    }

    fn scroll_to(&mut self, correction: &ScrollCorrection) {
        self.offset = self.viewport.clamp_offset(correction.target_offset);
        self.history.push(*correction);
    }
}
