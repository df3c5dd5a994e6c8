//! Distance field mapping detector distance to a visibility contribution.

/// Distance (world units) within which a detector fully reveals a unit.
pub const DETECT_DISTANCE: f32 = 5.0;

/// Width of the linear fade band past [`DETECT_DISTANCE`].
pub const DETECT_FADE: f32 = 1.0;

/// Units farther than this from the camera are always hidden.
pub const CAMERA_RANGE: f32 = 25.0;

/// Floating-point slack used for both the early-exit test against full
/// visibility and the dirty-check on written opacity.
///
/// Kept at exactly `0.01` so the fade curve matches existing fog assets.
pub const VISIBILITY_EPSILON: f32 = 0.01;

/// Visibility contribution of a single detector at `distance`.
///
/// Returns `1.0` inside [`DETECT_DISTANCE`], ramps linearly down to `0.0`
/// across the [`DETECT_FADE`] band, and `0.0` beyond it.
pub fn visibility(distance: f32) -> f32 {
    if distance < DETECT_DISTANCE {
        return 1.0;
    }

    if distance < DETECT_DISTANCE + DETECT_FADE {
        return (DETECT_FADE - (distance - DETECT_DISTANCE)) / DETECT_FADE;
    }

    0.0
}

/// Returns `true` if `value` counts as full visibility for the early exit.
#[inline]
pub fn is_fully_visible(value: f32) -> bool {
    (value - 1.0).abs() < VISIBILITY_EPSILON
}
