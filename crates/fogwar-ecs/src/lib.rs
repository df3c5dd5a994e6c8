//! ECS integration for the fog-of-war core.
//!
//! Detectors, subscribers, the camera rig and the fog volume are plain
//! components; spawning and despawning them is registration. The
//! [`FogSchedules`] runner drives a one-time startup stage and a per-tick
//! stage that snapshots detectors before updating subscribers.

mod components;
mod resources;
mod schedule;
mod systems;

pub use components::{
    DetectorBundle, FogAlpha, FogCamera, FogDetector, FogSubscriber, FogVolume, SubscriberBundle,
    WorldPos,
};
pub use resources::{FogFrameStats, FogSettings, FogSnapshot, register_fog_resources};
pub use schedule::{FogSchedule, FogSchedules};
pub use systems::{setup_fog_volume, snapshot_detectors, update_fog_subscribers};
