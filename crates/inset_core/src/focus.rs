//! Focus tracking
//!
//! Records the single input view that currently holds focus inside a
//! scroll container. Only the most recently focused view is tracked.

use inset_platform::{Bounds, ViewId};

use crate::error::{InsetError, Result};
use crate::sanitize;

/// The focused input whose visibility above the keyboard is preserved
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusTarget {
    /// Focused view
    pub view: ViewId,
    /// Bounds in the scroll container's content space
    pub bounds: Bounds,
    /// Per-view margin above the keyboard, overriding the platform default
    pub extra_offset: Option<f32>,
}

impl FocusTarget {
    /// Create a target without a per-view margin
    pub fn new(view: ViewId, bounds: Bounds) -> Self {
        Self {
            view,
            bounds,
            extra_offset: None,
        }
    }

    /// Set the per-view margin above the keyboard
    pub fn with_extra_offset(mut self, extra_offset: f32) -> Self {
        self.extra_offset = Some(extra_offset);
        self
    }

    /// Margin to keep above the keyboard given the platform default
    pub fn extra_or(&self, default_extra_height: f32) -> f32 {
        self.extra_offset.unwrap_or(default_extra_height)
    }
}

/// Tracks the current focus target
#[derive(Clone, Debug, Default)]
pub struct FocusTracker {
    current: Option<FocusTarget>,
}

impl FocusTracker {
    /// Create a tracker with nothing focused
    pub fn new() -> Self {
        Self::default()
    }

    /// A view gained focus
    ///
    /// Supersedes any previous target. Returns the target that was replaced.
    pub fn on_focus_gained(
        &mut self,
        view: ViewId,
        bounds: Bounds,
        extra_offset: Option<f32>,
    ) -> Option<FocusTarget> {
        let target = FocusTarget {
            view,
            bounds: sanitize::bounds(bounds),
            extra_offset: extra_offset.filter(|extra| {
                let finite = extra.is_finite();
                if !finite {
                    tracing::warn!("ignoring non-finite extra offset for view {}", view.to_raw());
                }
                finite
            })
            .map(|extra| sanitize::non_negative(extra, "extra offset")),
        };
        self.current.replace(target)
    }

    /// A view lost focus
    ///
    /// Fails with [`InsetError::StaleFocusReference`] when the view is not
    /// the current target, which happens when a blur arrives after another
    /// view already took focus. The tracker is left untouched in that case.
    pub fn on_focus_lost(&mut self, view: ViewId) -> Result<FocusTarget> {
        match self.current {
            Some(target) if target.view == view => {
                self.current = None;
                Ok(target)
            }
            _ => Err(InsetError::StaleFocusReference(view)),
        }
    }

    /// The focused view was re-measured
    ///
    /// Updates for any other view are ignored. Returns true if the current
    /// target's bounds changed.
    pub fn on_bounds_changed(&mut self, view: ViewId, bounds: Bounds) -> bool {
        match self.current.as_mut() {
            Some(target) if target.view == view => {
                let bounds = sanitize::bounds(bounds);
                let changed = target.bounds != bounds;
                target.bounds = bounds;
                changed
            }
            _ => false,
        }
    }

    /// The current target, if any
    pub fn current_target(&self) -> Option<&FocusTarget> {
        self.current.as_ref()
    }

    /// Check if a view is the current target
    pub fn is_focused(&self, view: ViewId) -> bool {
        self.current.is_some_and(|target| target.view == view)
    }

    /// Drop the current target
    pub fn clear(&mut self) -> Option<FocusTarget> {
        self.current.take()
    }
}
