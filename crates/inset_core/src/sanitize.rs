//! Clamping for geometry reported by the host
//!
//! Bad values are clamped and logged, never propagated.

use inset_platform::Bounds;

use crate::error::InsetError;

/// Clamp a length to a finite, non-negative value
pub(crate) fn non_negative(value: f32, what: &str) -> f32 {
    if value.is_finite() && value >= 0.0 {
        return value;
    }
    let err = InsetError::OutOfRangeGeometry(format!("{what} = {value}"));
    tracing::warn!("{err}, clamping to zero");
    0.0
}

/// Repair non-finite or inverted bounds
///
/// Non-finite edges become zero and an inverted pair collapses onto its
/// top edge.
pub(crate) fn bounds(b: Bounds) -> Bounds {
    if b.is_valid() {
        return b;
    }
    let err = InsetError::OutOfRangeGeometry(format!(
        "bounds {{ top: {}, bottom: {} }}",
        b.top, b.bottom
    ));
    tracing::warn!("{err}, clamping");
    let top = if b.top.is_finite() { b.top } else { 0.0 };
    let bottom = if b.bottom.is_finite() { b.bottom } else { 0.0 };
    Bounds::new(top, bottom.max(top))
}
