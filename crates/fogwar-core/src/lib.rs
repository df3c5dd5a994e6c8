//! Fog-of-war visibility core.
//!
//! Computes, once per frame, an opacity for every subscribed unit from its
//! distance to a capped set of moving detectors. The host engine supplies
//! positions through [`PositionSource`] and receives opacity through
//! [`ScalarParamSink`]; nothing here depends on a particular entity model.
//!
//! ```
//! use fogwar_core::{FogOfWarSystem, FogScene, ScalarParamSink, SharedScalar, UNIT_ALPHA_KEY};
//! use glam::Vec3;
//!
//! struct Scene;
//! impl FogScene for Scene {
//!     fn fog_volume(&mut self) -> Option<&mut dyn ScalarParamSink> {
//!         None
//!     }
//! }
//!
//! let mut fog = FogOfWarSystem::new(0.8, Vec3::new(0.0, 10.0, 0.0));
//! fog.start(&mut Scene).unwrap();
//!
//! let alpha = SharedScalar::new();
//! fog.add_detector("scout", Vec3::ZERO);
//! fog.add_subscriber("grunt", Vec3::new(5.5, 0.0, 0.0), alpha.clone());
//! fog.update().unwrap();
//!
//! assert!((alpha.get(UNIT_ALPHA_KEY).unwrap() - 0.5).abs() < 1e-6);
//! ```

mod detector;
mod error;
mod field;
pub mod handles;
mod host;
mod opacity;
mod registrar;
mod registry;
mod snapshot;
mod subscriber;
mod system;

pub use detector::DetectorRegistry;
pub use error::FogError;
pub use field::{
    CAMERA_RANGE, DETECT_DISTANCE, DETECT_FADE, VISIBILITY_EPSILON, is_fully_visible, visibility,
};
pub use handles::{SharedPosition, SharedScalar};
pub use host::{FOG_OPACITY_KEY, FogScene, PositionSource, ScalarParamSink, UNIT_ALPHA_KEY};
pub use opacity::{OpacityState, OpacityUpdate};
pub use registrar::{FogCommand, FogRegistrar};
pub use snapshot::{DetectorSlot, DetectorSnapshot, MAX_DETECTORS, Scan};
pub use subscriber::{FrameStats, Subscriber, SubscriberRegistry};
pub use system::{FogOfWarSystem, Phase};
