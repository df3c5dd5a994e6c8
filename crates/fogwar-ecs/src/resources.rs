//! Fog resources shared by the fog systems.

use bevy_ecs::prelude::*;
use fogwar_core::{DetectorSnapshot, FrameStats};

/// Fog tuning read once at startup.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct FogSettings {
    /// Opacity pushed to every [`FogVolume`](crate::FogVolume).
    pub fog_opacity: f32,
}

impl Default for FogSettings {
    fn default() -> Self {
        Self { fog_opacity: 0.8 }
    }
}

/// Detector positions captured at the start of the fog tick.
#[derive(Resource, Debug, Clone, Default)]
pub struct FogSnapshot(pub DetectorSnapshot);

/// Outcome of the most recent fog tick.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FogFrameStats(pub FrameStats);

/// Inserts every fog resource that is not already present.
///
/// Existing [`FogSettings`] are kept, so hosts can insert their own first.
pub fn register_fog_resources(world: &mut World) {
    world.init_resource::<FogSettings>();
    world.init_resource::<FogSnapshot>();
    world.init_resource::<FogFrameStats>();
}
