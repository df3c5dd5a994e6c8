//! Capability traits through which the fog system talks to the host engine.
//!
//! The core never sees the host's entity model. Each registered detector or
//! subscriber carries its own [`PositionSource`], and subscribers may carry a
//! [`ScalarParamSink`] bound to their render material.

use glam::Vec3;

/// Material parameter key for a unit's fog alpha.
pub const UNIT_ALPHA_KEY: &str = "fog_unit.alpha";

/// Material parameter key for the fog volume's overall opacity.
pub const FOG_OPACITY_KEY: &str = "fog_volume.opacity";

/// Read-through access to an entity's world-space position.
///
/// Called once per registered entry per tick; implementations should not
/// cache across frames.
pub trait PositionSource {
    /// Current world-space position.
    fn world_position(&self) -> Vec3;
}

/// Write access to a scalar parameter on an entity's render material.
pub trait ScalarParamSink {
    /// Sets the scalar parameter `key` to `value`.
    fn set_scalar(&mut self, key: &str, value: f32);
}

/// Scene collaborator wired once when the fog system starts.
pub trait FogScene {
    /// Enables the fog volume and returns its material parameters, or `None`
    /// if the scene has no fog volume.
    fn fog_volume(&mut self) -> Option<&mut dyn ScalarParamSink>;

    /// Enables the fog cameras and binds the perspective camera to the
    /// primary compositor slot.
    fn bind_cameras(&mut self) {}
}

/// A fixed point never moves.
impl PositionSource for Vec3 {
    fn world_position(&self) -> Vec3 {
        *self
    }
}

impl<T: PositionSource + ?Sized> PositionSource for Box<T> {
    fn world_position(&self) -> Vec3 {
        (**self).world_position()
    }
}

impl<T: ScalarParamSink + ?Sized> ScalarParamSink for Box<T> {
    fn set_scalar(&mut self, key: &str, value: f32) {
        (**self).set_scalar(key, value);
    }
}
