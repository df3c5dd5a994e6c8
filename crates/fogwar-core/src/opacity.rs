//! Per-subscriber opacity aggregation with camera culling and dirty-checking.

use glam::Vec3;

use crate::field::{CAMERA_RANGE, VISIBILITY_EPSILON};
use crate::snapshot::DetectorSnapshot;

/// What a single aggregation pass decided for one subscriber.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OpacityUpdate {
    /// Out of camera range; opacity forced to zero and always written.
    Culled,
    /// In range and changed enough to be written.
    Written(f32),
    /// In range but within tolerance of the last written value.
    Unchanged(f32),
}

impl OpacityUpdate {
    /// Logical opacity after the pass.
    pub fn opacity(&self) -> f32 {
        match *self {
            Self::Culled => 0.0,
            Self::Written(value) | Self::Unchanged(value) => value,
        }
    }

    /// Value to push to the material, if this pass writes.
    pub fn write_value(&self) -> Option<f32> {
        match *self {
            Self::Culled => Some(0.0),
            Self::Written(value) => Some(value),
            Self::Unchanged(_) => None,
        }
    }
}

/// Aggregation state carried by one subscriber between frames.
///
/// Independent of how the value reaches the material, so the same state
/// drives both the registry path and ECS components.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct OpacityState {
    opacity: f32,
    last_written: f32,
}

impl OpacityState {
    /// Fresh state: fully fogged, with zero recorded as already written.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opacity computed by the most recent pass.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Last value that passed the dirty-check.
    pub fn last_written(&self) -> f32 {
        self.last_written
    }

    /// Recomputes opacity for a subscriber at `position`.
    ///
    /// Units beyond [`CAMERA_RANGE`] from `camera` are culled to zero and
    /// bypass the dirty-check. Otherwise the peak detector visibility is
    /// compared against the last written value with a tolerance of
    /// [`VISIBILITY_EPSILON`].
    ///
    /// A cull counts as a write of zero, so `last_written` is reset and a
    /// unit re-entering range is compared against zero.
    pub fn evaluate(
        &mut self,
        position: Vec3,
        camera: Vec3,
        snapshot: &DetectorSnapshot,
    ) -> OpacityUpdate {
        if position.distance(camera) > CAMERA_RANGE {
            self.opacity = 0.0;
            self.last_written = 0.0;
            return OpacityUpdate::Culled;
        }

        let value = snapshot.scan(position).visibility();
        self.opacity = value;

        if (value - self.last_written).abs() < VISIBILITY_EPSILON {
            return OpacityUpdate::Unchanged(value);
        }

        self.last_written = value;
        OpacityUpdate::Written(value)
    }
}
