//! Session scripts
//!
//! A session script describes a scroll container and an ordered list of
//! keyboard, focus and viewport events:
//!
//! ```toml
//! platform = "ios"
//! viewport_height = 800.0
//! content_height = 2000.0
//!
//! [[events]]
//! kind = "focus"
//! view = 1
//! top = 450.0
//! bottom = 520.0
//!
//! [[events]]
//! kind = "show"
//! height = 300.0
//! duration_ms = 250.0
//!
//! [[events]]
//! kind = "frame"
//! height = 300.0
//! ```

use anyhow::{Context, Result};
use inset_core::{
    CorrectionReason, PlatformConfig, ScrollCoordinator, ScrollHost, VirtualScrollHost,
};
use inset_platform::{
    Bounds, ControlFlow, Event, EventSource, FocusEvent, KeyboardEvent, LifecycleEvent,
    PlatformError, ViewId, Viewport, ViewportEvent,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A scripted keyboard session
#[derive(Debug, Deserialize, Serialize)]
pub struct Session {
    /// Platform to resolve the policy for (overridden by `--platform`)
    #[serde(default)]
    pub platform: Option<String>,
    /// Visible height of the container
    pub viewport_height: f32,
    /// Total height of the scrollable content
    pub content_height: f32,
    /// Scroll offset before the first event
    #[serde(default)]
    pub initial_offset: f32,
    /// Events in delivery order
    #[serde(default)]
    pub events: Vec<SessionEvent>,
}

/// One scripted event
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SessionEvent {
    /// Keyboard show notification
    Show {
        height: f32,
        #[serde(default)]
        duration_ms: f32,
    },
    /// Keyboard hide notification
    Hide {
        #[serde(default)]
        duration_ms: f32,
    },
    /// Keyboard frame change
    Frame {
        height: f32,
    },
    /// View gained focus; bounds in content space
    Focus {
        view: u64,
        top: f32,
        bottom: f32,
        #[serde(default)]
        extra: Option<f32>,
    },
    /// View lost focus
    Blur {
        view: u64,
    },
    /// Focused view was re-measured
    Bounds {
        view: u64,
        top: f32,
        bottom: f32,
    },
    /// Container visible height changed
    Resize {
        height: f32,
    },
    /// Content height changed
    Content {
        content_height: f32,
    },
    /// User scrolled the container
    Scroll {
        offset: f32,
    },
    /// App went to the background
    Suspend,
    /// App returned to the foreground
    Resume,
}

impl From<&SessionEvent> for Event {
    fn from(event: &SessionEvent) -> Self {
        match *event {
            SessionEvent::Show {
                height,
                duration_ms,
            } => KeyboardEvent::show(height, duration_ms).into(),
            SessionEvent::Hide { duration_ms } => KeyboardEvent::hide(duration_ms).into(),
            SessionEvent::Frame { height } => KeyboardEvent::frame_change(height).into(),
            SessionEvent::Focus {
                view,
                top,
                bottom,
                extra,
            } => FocusEvent::Gained {
                view: ViewId(view),
                bounds: Bounds::new(top, bottom),
                extra_offset: extra,
            }
            .into(),
            SessionEvent::Blur { view } => FocusEvent::Lost { view: ViewId(view) }.into(),
            SessionEvent::Bounds { view, top, bottom } => FocusEvent::BoundsChanged {
                view: ViewId(view),
                bounds: Bounds::new(top, bottom),
            }
            .into(),
            SessionEvent::Resize { height } => ViewportEvent::Resized { height }.into(),
            SessionEvent::Content { content_height } => {
                ViewportEvent::ContentResized { content_height }.into()
            }
            SessionEvent::Scroll { offset } => ViewportEvent::Scrolled { offset }.into(),
            SessionEvent::Suspend => Event::Lifecycle(LifecycleEvent::Suspended),
            SessionEvent::Resume => Event::Lifecycle(LifecycleEvent::Resumed),
        }
    }
}

impl Session {
    /// Parse a session script
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let session: Session = toml::from_str(content).context("Failed to parse session")?;
        Ok(session)
    }

    /// Load a session script from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("In {}", path.display()))
    }

    /// Container geometry at the start of the session
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_height, self.content_height)
    }

    /// Event source replaying this session's events
    pub fn source(&self) -> ScriptedSource {
        ScriptedSource {
            events: self.events.iter().map(Event::from).collect(),
        }
    }
}

// ============================================================================
// Scripted Event Source
// ============================================================================

/// Event source that replays a fixed list of events
pub struct ScriptedSource {
    events: Vec<Event>,
}

impl EventSource for ScriptedSource {
    fn run<F>(self, mut handler: F) -> Result<(), PlatformError>
    where
        F: FnMut(Event) -> ControlFlow,
    {
        for event in self.events {
            if handler(event) == ControlFlow::Exit {
                break;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Simulation
// ============================================================================

/// A correction the simulated container executed
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    /// 1-based index of the event that caused it
    pub event: usize,
    /// Reveal or restore
    pub reason: CorrectionReason,
    /// Requested offset, before clamping
    pub requested: f32,
    /// Offset after the container clamped it
    pub offset: f32,
    /// Whether the container was asked to animate
    pub animate: bool,
}

/// Outcome of replaying a session
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    /// Corrections in the order they were applied
    pub steps: Vec<Step>,
    /// Container offset after the last event
    pub final_offset: f32,
    /// Bottom padding after the last event
    pub bottom_padding: f32,
}

/// Replay a session through a coordinator and a virtual container
pub fn simulate(session: &Session, config: PlatformConfig) -> Result<Report> {
    let viewport = session.viewport();
    let mut host = VirtualScrollHost::new(viewport).with_offset(session.initial_offset);
    let mut coordinator =
        ScrollCoordinator::new(config, viewport).with_scroll_offset(host.scroll_offset());

    let mut steps = Vec::new();
    let mut index = 0;

    session
        .source()
        .run(|event| {
            index += 1;

            // The container changes first, then reports to the coordinator
            let event = match event {
                Event::Viewport(ViewportEvent::Resized { height }) => {
                    host.set_viewport_height(height);
                    event
                }
                Event::Viewport(ViewportEvent::ContentResized { content_height }) => {
                    host.set_content_height(content_height);
                    event
                }
                Event::Viewport(ViewportEvent::Scrolled { offset }) => {
                    host.user_scroll(offset);
                    ViewportEvent::Scrolled {
                        offset: host.scroll_offset(),
                    }
                    .into()
                }
                other => other,
            };

            if let Some(issued) = coordinator.handle_event(&event) {
                if let Some(applied) = coordinator.apply(&mut host, &issued) {
                    tracing::debug!("event #{index}: {:?} {:?}", issued.reason, applied);
                    steps.push(Step {
                        event: index,
                        reason: issued.reason,
                        requested: applied.target_offset,
                        offset: host.scroll_offset(),
                        animate: applied.animate,
                    });
                }
            }
            ControlFlow::Continue
        })
        .context("Event source failed")?;

    Ok(Report {
        steps,
        final_offset: host.scroll_offset(),
        bottom_padding: coordinator.bottom_padding(),
    })
}
