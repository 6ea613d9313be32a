//! Scroll coordinator
//!
//! Combines keyboard state, the focus target and the platform policy into a
//! single corrective scroll per keyboard transition.
//!
//! # Recompute Triggers
//!
//! A correction is recomputed when focus changes, when the keyboard's
//! observable visibility or height changes, and when the container's
//! visible height changes. Scroll ticks only update the recorded offset;
//! recomputing on them would fight the user's own scrolling.
//!
//! # Staleness
//!
//! Every input change bumps an epoch. An [`IssuedCorrection`] remembers the
//! epoch it was computed at and is discarded by [`ScrollCoordinator::apply`]
//! once newer input has arrived. Reveal corrections are recomputed from the
//! latest state at the moment they are applied, never cached.

use inset_platform::{
    Bounds, Event, FocusEvent, KeyboardEvent, LifecycleEvent, ViewId, Viewport, ViewportEvent,
};

use crate::focus::{FocusTarget, FocusTracker};
use crate::host::ScrollHost;
use crate::keyboard::{InsetModel, KeyboardPhase, KeyboardState};
use crate::policy::{DismissPolicy, PlatformConfig};
use crate::sanitize;

// ============================================================================
// Scroll Correction
// ============================================================================

/// Scroll instruction for the hosting container
///
/// The offset is not clamped; the host clamps it to its scrollable range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollCorrection {
    /// Offset to scroll to
    pub target_offset: f32,
    /// Whether the host should animate the scroll
    pub animate: bool,
}

impl ScrollCorrection {
    /// Create a new correction
    pub fn new(target_offset: f32, animate: bool) -> Self {
        Self {
            target_offset,
            animate,
        }
    }
}

/// Why a correction was issued
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CorrectionReason {
    /// Bring the focus target above the keyboard
    Reveal,
    /// Return to the offset recorded before the keyboard session
    Restore,
}

/// A correction together with the input epoch it was computed at
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IssuedCorrection {
    /// The instruction
    pub correction: ScrollCorrection,
    /// Why it was issued
    pub reason: CorrectionReason,
    /// Epoch of the inputs it was computed from
    pub epoch: u64,
}

/// Compute the scroll needed to keep the focus target above the keyboard
///
/// Returns `None` when the keyboard is hidden, nothing is focused, or the
/// target's bottom edge already sits at or above the desired line
/// (`viewport.height - occlusion - extra`). Bounds are in content space,
/// so the current offset is subtracted before comparing.
///
/// `config` is expected to be sanitized: a negative extra scroll offset
/// would request the same correction again once applied.
pub fn compute_correction(
    keyboard: &KeyboardState,
    target: Option<&FocusTarget>,
    config: &PlatformConfig,
    viewport: &Viewport,
    current_offset: f32,
) -> Option<ScrollCorrection> {
    if !keyboard.visible {
        return None;
    }
    let target = target?;

    // With native resize the viewport already excludes the keyboard
    let occluded_top = viewport.height - config.mode.occlusion(keyboard);
    let extra = target.extra_or(config.default_extra_height);
    let desired_bottom = occluded_top - extra;

    let visible_bottom = target.bounds.offset(-current_offset).bottom;
    if visible_bottom <= desired_bottom {
        return None;
    }

    let delta = visible_bottom - desired_bottom;
    let target_offset = current_offset + delta + config.default_extra_scroll_offset;

    Some(ScrollCorrection {
        target_offset,
        animate: keyboard.animation_duration_ms > 0.0,
    })
}

// ============================================================================
// Scroll Coordinator
// ============================================================================

/// Keyboard inset coordinator for one scrollable surface
///
/// Owns all mutable state for its surface. Events are expected one at a
/// time, in arrival order, from a single event loop.
#[derive(Clone, Debug)]
pub struct ScrollCoordinator {
    config: PlatformConfig,
    inset: InsetModel,
    focus: FocusTracker,
    viewport: Viewport,
    scroll_offset: f32,
    epoch: u64,
    /// Offset to return to on dismiss (only with `DismissPolicy::RestoreOffset`)
    restore_offset: Option<f32>,
}

impl ScrollCoordinator {
    /// Create a coordinator for a container with the given geometry
    ///
    /// Negative or non-finite policy offsets are clamped to zero.
    pub fn new(config: PlatformConfig, viewport: Viewport) -> Self {
        Self {
            config: config.sanitized(),
            inset: InsetModel::new(),
            focus: FocusTracker::new(),
            viewport: Viewport::new(
                sanitize::non_negative(viewport.height, "viewport height"),
                sanitize::non_negative(viewport.content_height, "content height"),
            ),
            scroll_offset: 0.0,
            epoch: 0,
            restore_offset: None,
        }
    }

    /// Start from a known scroll offset
    pub fn with_scroll_offset(mut self, offset: f32) -> Self {
        self.on_scrolled(offset);
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Platform policy in use
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Observable keyboard state
    pub fn keyboard_state(&self) -> KeyboardState {
        self.inset.state()
    }

    /// Keyboard animation phase
    pub fn keyboard_phase(&self) -> KeyboardPhase {
        self.inset.phase()
    }

    /// Current focus target
    pub fn focus_target(&self) -> Option<&FocusTarget> {
        self.focus.current_target()
    }

    /// Last reported container geometry
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Last reported scroll offset
    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    /// Current input epoch
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Offset a dismiss would restore to, if one is recorded
    pub fn restore_offset(&self) -> Option<f32> {
        self.restore_offset
    }

    /// Check whether a correction was computed from the latest inputs
    pub fn is_current(&self, issued: &IssuedCorrection) -> bool {
        issued.epoch == self.epoch
    }

    /// Correction for the latest state, without recording anything
    ///
    /// Always `None` while a keyboard animation is in flight; the final
    /// frame settles the keyboard and triggers the recompute.
    pub fn correction(&self) -> Option<ScrollCorrection> {
        if self.inset.phase().is_animating() {
            return None;
        }
        compute_correction(
            &self.inset.state(),
            self.focus.current_target(),
            &self.config,
            &self.viewport,
            self.scroll_offset,
        )
    }

    /// Bottom padding the container should apply below its content
    pub fn bottom_padding(&self) -> f32 {
        self.config.bottom_padding(&self.inset.state())
    }

    // ------------------------------------------------------------------------
    // Event Handlers
    // ------------------------------------------------------------------------

    /// Dispatch a platform event
    pub fn handle_event(&mut self, event: &Event) -> Option<IssuedCorrection> {
        match event {
            Event::Keyboard(keyboard) => self.on_keyboard_event(keyboard),
            Event::Focus(FocusEvent::Gained {
                view,
                bounds,
                extra_offset,
            }) => self.on_focus_gained(*view, *bounds, *extra_offset),
            Event::Focus(FocusEvent::Lost { view }) => self.on_focus_lost(*view),
            Event::Focus(FocusEvent::BoundsChanged { view, bounds }) => {
                self.on_bounds_changed(*view, *bounds)
            }
            Event::Viewport(ViewportEvent::Resized { height }) => {
                self.on_viewport_resized(*height)
            }
            Event::Viewport(ViewportEvent::ContentResized { content_height }) => {
                self.on_content_resized(*content_height);
                None
            }
            Event::Viewport(ViewportEvent::Scrolled { offset }) => {
                self.on_scrolled(*offset);
                None
            }
            Event::Lifecycle(lifecycle) => {
                self.on_lifecycle(*lifecycle);
                None
            }
            Event::Frame => None,
        }
    }

    /// Keyboard notification
    pub fn on_keyboard_event(&mut self, event: &KeyboardEvent) -> Option<IssuedCorrection> {
        let phase = self.inset.phase();
        let update = self.inset.on_keyboard_event(event);

        if update.changed || phase != self.inset.phase() {
            self.bump();
        }
        if self.inset.phase().is_animating() {
            tracing::debug!("keyboard animating towards {}", self.inset.target_height());
        }
        if !update.changed {
            return None;
        }

        if update.state.visible {
            self.reveal()
        } else {
            self.restore(update.state.animation_duration_ms > 0.0)
        }
    }

    /// A view gained focus
    pub fn on_focus_gained(
        &mut self,
        view: ViewId,
        bounds: Bounds,
        extra_offset: Option<f32>,
    ) -> Option<IssuedCorrection> {
        if let Some(previous) = self.focus.on_focus_gained(view, bounds, extra_offset) {
            tracing::debug!(
                "focus moved from view {} to view {}",
                previous.view.to_raw(),
                view.to_raw()
            );
        }
        self.bump();
        self.reveal()
    }

    /// A view lost focus
    ///
    /// Blurs for views other than the current target are ignored.
    pub fn on_focus_lost(&mut self, view: ViewId) -> Option<IssuedCorrection> {
        if let Err(err) = self.focus.on_focus_lost(view) {
            tracing::debug!("{err}, ignoring blur");
            return None;
        }
        self.bump();

        let keyboard = self.inset.state();
        if keyboard.visible {
            self.restore(keyboard.animation_duration_ms > 0.0)
        } else {
            None
        }
    }

    /// The focused view was re-measured
    pub fn on_bounds_changed(&mut self, view: ViewId, bounds: Bounds) -> Option<IssuedCorrection> {
        if !self.focus.is_focused(view) {
            tracing::trace!("ignoring bounds of unfocused view {}", view.to_raw());
            return None;
        }
        if !self.focus.on_bounds_changed(view, bounds) {
            return None;
        }
        self.bump();
        self.reveal()
    }

    /// The container's visible height changed
    pub fn on_viewport_resized(&mut self, height: f32) -> Option<IssuedCorrection> {
        let height = sanitize::non_negative(height, "viewport height");
        if height == self.viewport.height {
            return None;
        }
        self.viewport.height = height;
        self.bump();
        self.reveal()
    }

    /// The container's content extent changed
    ///
    /// Content extent only matters to the host's clamping, so nothing is
    /// recomputed.
    pub fn on_content_resized(&mut self, content_height: f32) {
        self.viewport.content_height = sanitize::non_negative(content_height, "content height");
    }

    /// The container scrolled
    pub fn on_scrolled(&mut self, offset: f32) {
        if !offset.is_finite() {
            tracing::warn!("ignoring non-finite scroll offset {offset}");
            return;
        }
        tracing::trace!("scroll offset {offset}");
        self.scroll_offset = offset;
    }

    /// Application lifecycle change
    ///
    /// Suspending drops the focus target and any pending restore.
    pub fn on_lifecycle(&mut self, event: LifecycleEvent) {
        if event == LifecycleEvent::Suspended {
            self.focus.clear();
            self.restore_offset = None;
            self.bump();
        }
    }

    // ------------------------------------------------------------------------
    // Application
    // ------------------------------------------------------------------------

    /// Read the host's geometry, recompute and apply the correction
    ///
    /// Returns the correction that was handed to the host, if any.
    pub fn apply_to<H: ScrollHost>(&mut self, host: &mut H) -> Option<ScrollCorrection> {
        self.sync_from(host);
        let correction = self.correction()?;
        self.remember_restore_point();
        host.scroll_to(&correction);
        self.scroll_offset = host.scroll_offset();
        Some(correction)
    }

    /// Apply a previously issued correction if it is still current
    ///
    /// Stale corrections are dropped. Reveals are recomputed against the
    /// host's geometry rather than replayed.
    pub fn apply<H: ScrollHost>(
        &mut self,
        host: &mut H,
        issued: &IssuedCorrection,
    ) -> Option<ScrollCorrection> {
        if !self.is_current(issued) {
            tracing::debug!(
                "discarding stale correction from epoch {} (now {})",
                issued.epoch,
                self.epoch
            );
            return None;
        }
        match issued.reason {
            CorrectionReason::Reveal => self.apply_to(host),
            CorrectionReason::Restore => {
                host.scroll_to(&issued.correction);
                self.scroll_offset = host.scroll_offset();
                Some(issued.correction)
            }
        }
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn bump(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    fn sync_from<H: ScrollHost>(&mut self, host: &H) {
        self.on_scrolled(host.scroll_offset());
        let viewport = host.viewport();
        self.on_content_resized(viewport.content_height);
        let height = sanitize::non_negative(viewport.height, "viewport height");
        if height != self.viewport.height {
            self.viewport.height = height;
            self.bump();
        }
    }

    fn remember_restore_point(&mut self) {
        if self.config.dismiss == DismissPolicy::RestoreOffset && self.restore_offset.is_none() {
            self.restore_offset = Some(self.scroll_offset);
        }
    }

    fn reveal(&mut self) -> Option<IssuedCorrection> {
        let correction = self.correction()?;
        self.remember_restore_point();
        tracing::debug!(
            "reveal view {:?}: scroll {} -> {} (animate: {})",
            self.focus.current_target().map(|t| t.view.to_raw()),
            self.scroll_offset,
            correction.target_offset,
            correction.animate
        );
        Some(IssuedCorrection {
            correction,
            reason: CorrectionReason::Reveal,
            epoch: self.epoch,
        })
    }

    fn restore(&mut self, animate: bool) -> Option<IssuedCorrection> {
        let offset = self.restore_offset.take()?;
        tracing::debug!("restore scroll {} -> {}", self.scroll_offset, offset);
        Some(IssuedCorrection {
            correction: ScrollCorrection::new(offset, animate),
            reason: CorrectionReason::Restore,
            epoch: self.epoch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(top: f32, bottom: f32) -> FocusTarget {
        FocusTarget::new(ViewId(1), Bounds::new(top, bottom))
    }

    #[test]
    fn test_hidden_keyboard_never_corrects() {
        let config = PlatformConfig::manual_compensation();
        let viewport = Viewport::new(800.0, 2000.0);
        let t = target(700.0, 790.0);

        let hidden = KeyboardState::hidden();
        assert_eq!(compute_correction(&hidden, Some(&t), &config, &viewport, 0.0), None);
    }

    #[test]
    fn test_no_target_never_corrects() {
        let config = PlatformConfig::manual_compensation();
        let viewport = Viewport::new(800.0, 2000.0);
        let shown = KeyboardState::shown(300.0, 250.0);
        assert_eq!(compute_correction(&shown, None, &config, &viewport, 0.0), None);
    }

    #[test]
    fn test_visible_target_needs_no_correction() {
        let config = PlatformConfig::manual_compensation().extra_height(30.0);
        let viewport = Viewport::new(800.0, 2000.0);
        let shown = KeyboardState::shown(300.0, 250.0);

        // desired bottom is 470; exactly on the line is still visible
        let t = target(400.0, 470.0);
        assert_eq!(compute_correction(&shown, Some(&t), &config, &viewport, 0.0), None);
    }

    #[test]
    fn test_bounds_are_content_space() {
        let config = PlatformConfig::manual_compensation().extra_height(30.0);
        let viewport = Viewport::new(800.0, 2000.0);
        let shown = KeyboardState::shown(300.0, 250.0);

        // Same on-screen position as a target at 450..520 with no scroll
        let t = target(550.0, 620.0);
        let c = compute_correction(&shown, Some(&t), &config, &viewport, 100.0).unwrap();
        assert_eq!(c.target_offset, 150.0);
    }

    #[test]
    fn test_per_target_extra_overrides_default() {
        let config = PlatformConfig::manual_compensation().extra_height(30.0);
        let viewport = Viewport::new(800.0, 2000.0);
        let shown = KeyboardState::shown(300.0, 0.0);

        let t = target(450.0, 520.0).with_extra_offset(0.0);
        let c = compute_correction(&shown, Some(&t), &config, &viewport, 0.0).unwrap();
        assert_eq!(c.target_offset, 20.0);
        assert!(!c.animate);
    }

    #[test]
    fn test_stale_blur_keeps_target() {
        let mut coordinator = ScrollCoordinator::new(
            PlatformConfig::manual_compensation(),
            Viewport::new(800.0, 2000.0),
        );
        coordinator.on_focus_gained(ViewId(1), Bounds::new(100.0, 140.0), None);
        coordinator.on_focus_gained(ViewId(2), Bounds::new(200.0, 240.0), None);

        let epoch = coordinator.epoch();
        assert_eq!(coordinator.on_focus_lost(ViewId(1)), None);
        assert_eq!(coordinator.epoch(), epoch);
        assert_eq!(coordinator.focus_target().map(|t| t.view), Some(ViewId(2)));
    }

    #[test]
    fn test_scroll_ticks_do_not_recompute() {
        let mut coordinator = ScrollCoordinator::new(
            PlatformConfig::manual_compensation().extra_height(30.0),
            Viewport::new(800.0, 2000.0),
        );
        coordinator.on_keyboard_event(&KeyboardEvent::show(300.0, 0.0));
        coordinator.on_focus_gained(ViewId(1), Bounds::new(450.0, 520.0), None);

        let epoch = coordinator.epoch();
        let issued = coordinator.handle_event(&Event::Viewport(ViewportEvent::Scrolled {
            offset: 10.0,
        }));
        assert_eq!(issued, None);
        assert_eq!(coordinator.epoch(), epoch);
        assert_eq!(coordinator.scroll_offset(), 10.0);
    }

    #[test]
    fn test_bounds_change_event_dispatch() {
        let mut coordinator = ScrollCoordinator::new(
            PlatformConfig::manual_compensation().extra_height(30.0),
            Viewport::new(800.0, 2000.0),
        );
        coordinator.on_keyboard_event(&KeyboardEvent::show(300.0, 0.0));
        coordinator.on_focus_gained(ViewId(1), Bounds::new(100.0, 140.0), None);

        let issued = coordinator
            .handle_event(&Event::Focus(FocusEvent::BoundsChanged {
                view: ViewId(1),
                bounds: Bounds::new(100.0, 500.0),
            }))
            .unwrap();
        assert_eq!(issued.correction.target_offset, 30.0);
        assert_eq!(
            coordinator.focus_target().map(|t| t.bounds),
            Some(Bounds::new(100.0, 500.0))
        );
    }

    #[test]
    fn test_new_sanitizes_config() {
        let config = PlatformConfig::manual_compensation()
            .extra_height(-10.0)
            .extra_scroll_offset(-20.0);
        let coordinator = ScrollCoordinator::new(config, Viewport::new(800.0, 2000.0));
        assert_eq!(coordinator.config().default_extra_height, 0.0);
        assert_eq!(coordinator.config().default_extra_scroll_offset, 0.0);
    }

    #[test]
    fn test_suspend_clears_focus() {
        let mut coordinator = ScrollCoordinator::new(
            PlatformConfig::manual_compensation(),
            Viewport::new(800.0, 2000.0),
        );
        coordinator.on_focus_gained(ViewId(1), Bounds::new(100.0, 140.0), None);
        coordinator.handle_event(&Event::Lifecycle(LifecycleEvent::Suspended));
        assert!(coordinator.focus_target().is_none());
    }

    #[test]
    fn test_bottom_padding_follows_keyboard() {
        let mut coordinator = ScrollCoordinator::new(
            PlatformConfig::manual_compensation().extra_height(20.0),
            Viewport::new(800.0, 2000.0),
        );
        assert_eq!(coordinator.bottom_padding(), 0.0);
        coordinator.on_keyboard_event(&KeyboardEvent::show(300.0, 0.0));
        assert_eq!(coordinator.bottom_padding(), 320.0);
        coordinator.on_keyboard_event(&KeyboardEvent::hide(0.0));
        assert_eq!(coordinator.bottom_padding(), 0.0);
    }
}
