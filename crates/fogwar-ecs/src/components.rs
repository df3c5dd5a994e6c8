//! Fog components attached to host entities.

use bevy_ecs::prelude::*;
use fogwar_core::OpacityState;
use glam::Vec3;

/// The entity's world-space position. Read by the fog pass every tick;
/// written by whatever moves the entity.
#[derive(Component, Clone, Copy, Debug, PartialEq, Default)]
pub struct WorldPos(pub Vec3);

impl WorldPos {
    /// Creates a new [`WorldPos`] from coordinates.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }
}

/// Marks an entity whose position reveals nearby subscribers.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct FogDetector;

/// Marks an entity whose opacity follows detector proximity.
///
/// Carries the dirty-check state between ticks. Spawning the component
/// registers the entity; despawning or removing it unregisters.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct FogSubscriber {
    /// Aggregation state from the previous tick.
    pub state: OpacityState,
}

impl FogSubscriber {
    /// Opacity computed on the last tick.
    pub fn opacity(&self) -> f32 {
        self.state.opacity()
    }
}

/// The alpha scalar on a subscriber's render material.
///
/// Optional: a subscriber without it keeps its state but writes nowhere.
/// Only mutated when the value changes past the dirty-check, so
/// `Changed<FogAlpha>` filters see real updates only.
#[derive(Component, Clone, Copy, Debug, PartialEq, Default)]
pub struct FogAlpha(pub f32);

/// Marks the rig whose [`WorldPos`] is the camera reference for range culling.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct FogCamera;

/// The static fog volume drawn over the play area.
#[derive(Component, Clone, Copy, Debug, PartialEq, Default)]
pub struct FogVolume {
    /// Whether the volume's model is drawn.
    pub enabled: bool,
    /// Opacity applied to the volume's material at startup.
    pub opacity: f32,
}

/// Components for a detector entity.
#[derive(Bundle, Default)]
pub struct DetectorBundle {
    /// Detector marker.
    pub detector: FogDetector,
    /// World-space position.
    pub world_pos: WorldPos,
}

/// Components for a subscriber entity with a bound material.
#[derive(Bundle, Default)]
pub struct SubscriberBundle {
    /// Subscriber state.
    pub subscriber: FogSubscriber,
    /// Material alpha.
    pub alpha: FogAlpha,
    /// World-space position.
    pub world_pos: WorldPos,
}

impl DetectorBundle {
    /// A detector at `position`.
    pub fn at(position: Vec3) -> Self {
        Self {
            world_pos: WorldPos(position),
            ..Default::default()
        }
    }
}

impl SubscriberBundle {
    /// A subscriber at `position`, starting fully fogged.
    pub fn at(position: Vec3) -> Self {
        Self {
            world_pos: WorldPos(position),
            ..Default::default()
        }
    }
}
