//! Keyboard inset model
//!
//! Tracks on-screen keyboard visibility and occlusion height from the
//! platform's show/hide/frame notifications.
//!
//! # State Machine
//!
//! ```text
//!           show (animated)           frame / show
//! Hidden ─────────────────► Showing ─────────────────► Shown
//!   ▲                          │                          │
//!   │                          │ hide                     │ hide (animated)
//!   │      frame(0) / hide     ▼                          ▼
//!   └───────────────────── Hiding ◄──────────────────────┘
//! ```
//!
//! Only `Hidden` and `Shown` are observable. `Showing` and `Hiding` hold
//! back recomputation until the final frame of the animation arrives.
//! Unanimated show/hide events settle immediately.

use inset_platform::{KeyboardEvent, KeyboardEventKind};

use crate::sanitize;

/// Observable keyboard state
///
/// `height` is never negative and is zero whenever `visible` is false.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KeyboardState {
    /// Whether the keyboard is on screen
    pub visible: bool,
    /// Height of the keyboard in logical points
    pub height: f32,
    /// Duration of the transition that produced this state
    pub animation_duration_ms: f32,
}

impl KeyboardState {
    /// Hidden keyboard
    pub fn hidden() -> Self {
        Self::default()
    }

    /// Visible keyboard with the given height
    pub fn shown(height: f32, animation_duration_ms: f32) -> Self {
        Self {
            visible: true,
            height,
            animation_duration_ms,
        }
    }

    /// Check if visibility or geometry differ
    ///
    /// Animation duration is ignored: it describes how a state was reached,
    /// not the state itself.
    pub fn same_geometry(&self, other: &KeyboardState) -> bool {
        self.visible == other.visible && self.height == other.height
    }
}

// ============================================================================
// Keyboard Phase FSM
// ============================================================================

/// Keyboard animation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyboardPhase {
    /// Keyboard off screen
    #[default]
    Hidden,
    /// Show animation in flight
    Showing,
    /// Keyboard on screen
    Shown,
    /// Hide animation in flight
    Hiding,
}

impl KeyboardPhase {
    /// Returns true for the observable phases
    pub fn is_steady(&self) -> bool {
        matches!(self, KeyboardPhase::Hidden | KeyboardPhase::Shown)
    }

    /// Returns true while an animation is in flight
    pub fn is_animating(&self) -> bool {
        !self.is_steady()
    }

    /// Handle an event and return the new phase, or None if no transition
    ///
    /// Expects an event whose height and duration are already clamped.
    pub fn on_event(&self, event: &KeyboardEvent) -> Option<Self> {
        use KeyboardEventKind::*;
        use KeyboardPhase::*;

        let has_height = event.height > 0.0;
        let animated = event.duration_ms > 0.0;

        match (self, event.kind) {
            // Hidden -> Showing/Shown: keyboard appears
            (Hidden, Show) if has_height && animated => Some(Showing),
            (Hidden, Show) if has_height => Some(Shown),
            // Some hosts only ever report frames
            (Hidden, FrameChange) if has_height => Some(Shown),

            // Showing -> Shown: final frame arrived
            (Showing, Show | FrameChange) if has_height => Some(Shown),
            (Showing, Show | FrameChange) => Some(Hidden),
            // Showing -> Hiding: hide overtook the show animation
            (Showing, Hide) if animated => Some(Hiding),
            (Showing, Hide) => Some(Hidden),

            // Shown -> Shown: geometry update, no phase change
            (Shown, FrameChange) if !has_height => Some(Hidden),
            (Shown, Hide) if animated => Some(Hiding),
            (Shown, Hide) => Some(Hidden),

            // Hiding -> Hidden: final frame arrived
            (Hiding, Hide) => Some(Hidden),
            (Hiding, FrameChange) if has_height => Some(Shown),
            (Hiding, FrameChange) => Some(Hidden),
            // Hiding -> Showing: show overtook the hide animation
            (Hiding, Show) if has_height && animated => Some(Showing),
            (Hiding, Show) if has_height => Some(Shown),

            _ => None,
        }
    }
}

// ============================================================================
// Inset Model
// ============================================================================

/// Result of feeding one keyboard event to the model
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InsetUpdate {
    /// Observable state after the event
    pub state: KeyboardState,
    /// Whether the observable visibility or height changed
    pub changed: bool,
}

/// Keyboard state owned by one coordinator
#[derive(Clone, Debug, Default)]
pub struct InsetModel {
    phase: KeyboardPhase,
    /// Last observable steady state
    settled: KeyboardState,
    /// Height the in-flight animation is heading to
    pending_height: f32,
    /// Duration of the animation in flight; the first one wins
    in_flight_ms: Option<f32>,
}

impl InsetModel {
    /// Create a model with the keyboard hidden
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    pub fn phase(&self) -> KeyboardPhase {
        self.phase
    }

    /// Last observable state
    pub fn state(&self) -> KeyboardState {
        self.settled
    }

    /// Feed a keyboard notification
    ///
    /// Geometry follows the latest event. The animation duration of a
    /// transition already in flight is kept when another transition
    /// interrupts it. Repeated identical events report `changed == false`.
    pub fn on_keyboard_event(&mut self, event: &KeyboardEvent) -> InsetUpdate {
        let event = KeyboardEvent {
            kind: event.kind,
            height: sanitize::non_negative(event.height, "keyboard height"),
            duration_ms: sanitize::non_negative(event.duration_ms, "keyboard duration"),
        };

        let previous = self.settled;
        let next = self.phase.on_event(&event).unwrap_or(self.phase);

        if next != self.phase {
            tracing::debug!("keyboard {:?} -> {:?} ({:?})", self.phase, next, event.kind);
        }

        self.pending_height = match event.kind {
            KeyboardEventKind::Hide => 0.0,
            _ => event.height,
        };

        match next {
            KeyboardPhase::Showing | KeyboardPhase::Hiding => {
                self.in_flight_ms.get_or_insert(event.duration_ms);
            }
            KeyboardPhase::Shown => {
                // A zero-height show while already shown carries no geometry
                let height = if self.pending_height > 0.0 {
                    self.pending_height
                } else {
                    self.settled.height
                };
                let duration = self.in_flight_ms.take().unwrap_or(event.duration_ms);
                self.settled = KeyboardState::shown(height, duration);
            }
            KeyboardPhase::Hidden => {
                let duration = self.in_flight_ms.take().unwrap_or(event.duration_ms);
                self.settled = KeyboardState {
                    animation_duration_ms: duration,
                    ..KeyboardState::hidden()
                };
            }
        }
        self.phase = next;

        let changed = !previous.same_geometry(&self.settled);
        if !changed {
            // Keep the reported duration stable across no-op events
            self.settled.animation_duration_ms = previous.animation_duration_ms;
        }

        InsetUpdate {
            state: self.settled,
            changed,
        }
    }

    /// Height the keyboard is animating towards, or the settled height
    pub fn target_height(&self) -> f32 {
        if self.phase.is_animating() {
            self.pending_height
        } else {
            self.settled.height
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        use KeyboardPhase::*;

        assert_eq!(Hidden.on_event(&KeyboardEvent::show(300.0, 250.0)), Some(Showing));
        assert_eq!(Hidden.on_event(&KeyboardEvent::show(300.0, 0.0)), Some(Shown));
        assert_eq!(Hidden.on_event(&KeyboardEvent::show(0.0, 250.0)), None);
        assert_eq!(Hidden.on_event(&KeyboardEvent::hide(250.0)), None);
        assert_eq!(Showing.on_event(&KeyboardEvent::frame_change(300.0)), Some(Shown));
        assert_eq!(Shown.on_event(&KeyboardEvent::frame_change(280.0)), None);
        assert_eq!(Shown.on_event(&KeyboardEvent::hide(250.0)), Some(Hiding));
        assert_eq!(Hiding.on_event(&KeyboardEvent::frame_change(0.0)), Some(Hidden));
        assert_eq!(Hiding.on_event(&KeyboardEvent::show(300.0, 250.0)), Some(Showing));
    }

    #[test]
    fn test_animated_show_gates_until_frame() {
        let mut model = InsetModel::new();

        let update = model.on_keyboard_event(&KeyboardEvent::show(300.0, 250.0));
        assert!(!update.changed);
        assert!(!update.state.visible);
        assert_eq!(model.phase(), KeyboardPhase::Showing);
        assert_eq!(model.target_height(), 300.0);

        let update = model.on_keyboard_event(&KeyboardEvent::frame_change(300.0));
        assert!(update.changed);
        assert_eq!(update.state, KeyboardState::shown(300.0, 250.0));
        assert_eq!(model.phase(), KeyboardPhase::Shown);
    }

    #[test]
    fn test_unanimated_show_settles_immediately() {
        let mut model = InsetModel::new();
        let update = model.on_keyboard_event(&KeyboardEvent::show(280.0, 0.0));
        assert!(update.changed);
        assert_eq!(update.state, KeyboardState::shown(280.0, 0.0));
    }

    #[test]
    fn test_repeated_events_are_idempotent() {
        let mut model = InsetModel::new();
        model.on_keyboard_event(&KeyboardEvent::show(300.0, 0.0));

        for _ in 0..3 {
            let update = model.on_keyboard_event(&KeyboardEvent::show(300.0, 0.0));
            assert!(!update.changed);
            assert_eq!(update.state.height, 300.0);
        }

        let update = model.on_keyboard_event(&KeyboardEvent::frame_change(300.0));
        assert!(!update.changed);
    }

    #[test]
    fn test_height_change_while_shown() {
        let mut model = InsetModel::new();
        model.on_keyboard_event(&KeyboardEvent::show(300.0, 0.0));

        // Switching to an emoji keyboard grows the frame
        let update = model.on_keyboard_event(&KeyboardEvent::frame_change(340.0));
        assert!(update.changed);
        assert_eq!(update.state.height, 340.0);
        assert_eq!(model.phase(), KeyboardPhase::Shown);
    }

    #[test]
    fn test_animated_hide() {
        let mut model = InsetModel::new();
        model.on_keyboard_event(&KeyboardEvent::show(300.0, 0.0));

        let update = model.on_keyboard_event(&KeyboardEvent::hide(200.0));
        assert!(!update.changed);
        assert!(update.state.visible);
        assert_eq!(model.phase(), KeyboardPhase::Hiding);

        let update = model.on_keyboard_event(&KeyboardEvent::frame_change(0.0));
        assert!(update.changed);
        assert_eq!(update.state.height, 0.0);
        assert!(!update.state.visible);
        assert_eq!(update.state.animation_duration_ms, 200.0);
    }

    #[test]
    fn test_hide_overtakes_show() {
        let mut model = InsetModel::new();
        model.on_keyboard_event(&KeyboardEvent::show(300.0, 250.0));

        // Hide arrives before the show animation's final frame
        let update = model.on_keyboard_event(&KeyboardEvent::hide(100.0));
        assert!(!update.changed);
        assert_eq!(model.phase(), KeyboardPhase::Hiding);
        assert_eq!(model.target_height(), 0.0);

        // Geometry follows the hide, duration stays with the show in flight
        let update = model.on_keyboard_event(&KeyboardEvent::frame_change(0.0));
        assert!(!update.changed);
        assert_eq!(update.state, KeyboardState::hidden());
        assert_eq!(model.phase(), KeyboardPhase::Hidden);
    }

    #[test]
    fn test_show_overtakes_hide_keeps_duration() {
        let mut model = InsetModel::new();
        model.on_keyboard_event(&KeyboardEvent::show(300.0, 0.0));
        model.on_keyboard_event(&KeyboardEvent::hide(200.0));

        model.on_keyboard_event(&KeyboardEvent::show(320.0, 400.0));
        assert_eq!(model.phase(), KeyboardPhase::Showing);

        let update = model.on_keyboard_event(&KeyboardEvent::frame_change(320.0));
        assert!(update.changed);
        assert_eq!(update.state, KeyboardState::shown(320.0, 200.0));
    }

    #[test]
    fn test_negative_height_is_clamped() {
        let mut model = InsetModel::new();
        let update = model.on_keyboard_event(&KeyboardEvent::show(-40.0, 0.0));
        assert!(!update.changed);
        assert_eq!(update.state, KeyboardState::hidden());
        assert_eq!(model.phase(), KeyboardPhase::Hidden);
    }

    #[test]
    fn test_frame_only_host() {
        let mut model = InsetModel::new();
        let update = model.on_keyboard_event(&KeyboardEvent::frame_change(260.0));
        assert!(update.changed);
        assert!(update.state.visible);

        let update = model.on_keyboard_event(&KeyboardEvent::frame_change(0.0));
        assert!(update.changed);
        assert!(!update.state.visible);
    }
}
