//! Geometry primitives shared between event sources and the coordinator
//!
//! All vertical coordinates are logical points. Bounds are measured in the
//! scroll container's content space; viewport heights are the visible
//! extent of the container.

/// Opaque handle identifying a focusable view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

impl ViewId {
    /// Get the raw handle value
    pub fn to_raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for ViewId {
    fn from(raw: u64) -> Self {
        ViewId(raw)
    }
}

/// Vertical extent of a view in the scroll container's content space
///
/// Content space does not move when the container scrolls, so bounds stay
/// valid across scroll offsets. Subtract the current offset to get the
/// position within the visible viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    /// Top edge
    pub top: f32,
    /// Bottom edge
    pub bottom: f32,
}

impl Bounds {
    /// Create new bounds
    pub fn new(top: f32, bottom: f32) -> Self {
        Self { top, bottom }
    }

    /// Height of the view
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Check that both edges are finite and not inverted
    pub fn is_valid(&self) -> bool {
        self.top.is_finite() && self.bottom.is_finite() && self.bottom >= self.top
    }

    /// Shift both edges by `dy`
    pub fn offset(&self, dy: f32) -> Self {
        Self {
            top: self.top + dy,
            bottom: self.bottom + dy,
        }
    }
}

/// Visible extent of the hosting scroll container
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Visible height of the container
    pub height: f32,
    /// Total height of the scrollable content
    pub content_height: f32,
}

impl Viewport {
    /// Create a viewport with a known content height
    pub fn new(height: f32, content_height: f32) -> Self {
        Self {
            height,
            content_height,
        }
    }

    /// Largest offset the container can scroll to
    pub fn max_offset(&self) -> f32 {
        (self.content_height - self.height).max(0.0)
    }

    /// Clamp an offset into the scrollable range
    pub fn clamp_offset(&self, offset: f32) -> f32 {
        offset.clamp(0.0, self.max_offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_validity() {
        assert!(Bounds::new(10.0, 40.0).is_valid());
        assert!(Bounds::new(10.0, 10.0).is_valid());
        assert!(!Bounds::new(40.0, 10.0).is_valid());
        assert!(!Bounds::new(f32::NAN, 10.0).is_valid());
    }

    #[test]
    fn test_bounds_offset() {
        let b = Bounds::new(450.0, 520.0).offset(-50.0);
        assert_eq!(b, Bounds::new(400.0, 470.0));
        assert_eq!(b.height(), 70.0);
    }

    #[test]
    fn test_viewport_clamp() {
        let vp = Viewport::new(400.0, 1000.0);
        assert_eq!(vp.max_offset(), 600.0);
        assert_eq!(vp.clamp_offset(-20.0), 0.0);
        assert_eq!(vp.clamp_offset(700.0), 600.0);

        // Content shorter than the viewport cannot scroll at all
        let short = Viewport::new(400.0, 300.0);
        assert_eq!(short.max_offset(), 0.0);
        assert_eq!(short.clamp_offset(50.0), 0.0);
    }
}
