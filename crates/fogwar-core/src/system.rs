//! Frame coordinator driving the fog pass once per tick.

use glam::Vec3;
use tracing::{debug, info, trace};

use crate::detector::DetectorRegistry;
use crate::error::FogError;
use crate::host::{FOG_OPACITY_KEY, FogScene, PositionSource, ScalarParamSink};
use crate::registrar::{CommandQueue, FogCommand, FogRegistrar};
use crate::snapshot::DetectorSnapshot;
use crate::subscriber::{FrameStats, SubscriberRegistry};

/// Lifecycle phase of a [`FogOfWarSystem`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, [`FogOfWarSystem::start`] not yet called.
    Uninitialized,
    /// Started; [`FogOfWarSystem::update`] may run.
    Running,
}

/// Owns both registries and the per-tick detector snapshot.
///
/// The host calls [`start`](Self::start) once, then [`update`](Self::update)
/// every tick. The system's own world position (its "rig") is the camera
/// reference for range culling.
pub struct FogOfWarSystem {
    fog_opacity: f32,
    rig: Box<dyn PositionSource>,
    phase: Phase,
    detectors: DetectorRegistry,
    subscribers: SubscriberRegistry,
    snapshot: DetectorSnapshot,
    commands: CommandQueue,
}

impl FogOfWarSystem {
    /// Creates an unstarted system with empty registries.
    ///
    /// `fog_opacity` is pushed to the fog volume on [`start`](Self::start).
    pub fn new(fog_opacity: f32, rig: impl PositionSource + 'static) -> Self {
        Self {
            fog_opacity,
            rig: Box::new(rig),
            phase: Phase::Uninitialized,
            detectors: DetectorRegistry::new(),
            subscribers: SubscriberRegistry::new(),
            snapshot: DetectorSnapshot::new(),
            commands: CommandQueue::new(),
        }
    }

    /// Wires the scene and enters [`Phase::Running`].
    ///
    /// Binds the fog cameras and sets the fog volume's opacity parameter.
    /// A scene without a fog volume is accepted.
    pub fn start(&mut self, scene: &mut dyn FogScene) -> Result<(), FogError> {
        if self.phase == Phase::Running {
            return Err(FogError::AlreadyStarted);
        }

        scene.bind_cameras();
        match scene.fog_volume() {
            Some(volume) => volume.set_scalar(FOG_OPACITY_KEY, self.fog_opacity),
            None => debug!("Scene has no fog volume; skipping opacity setup"),
        }

        self.phase = Phase::Running;
        info!(
            "Fog of war started (opacity {:.2}, {} detector(s), {} subscriber(s))",
            self.fog_opacity,
            self.detectors.len(),
            self.subscribers.len()
        );
        Ok(())
    }

    /// Runs one fog pass.
    ///
    /// Applies queued registrations, snapshots detector positions, then
    /// recomputes every subscriber against the rig's current position.
    ///
    /// # Errors
    ///
    /// [`FogError::NotStarted`] if [`start`](Self::start) has not run.
    pub fn update(&mut self) -> Result<FrameStats, FogError> {
        if self.phase != Phase::Running {
            return Err(FogError::NotStarted);
        }

        self.apply_commands();

        let camera = self.rig.world_position();
        self.snapshot.rebuild(self.detectors.positions());
        let stats = self.subscribers.update_all(camera, &self.snapshot);

        trace!(
            culled = stats.culled,
            written = stats.written,
            unchanged = stats.unchanged,
            detectors = self.snapshot.len(),
            "Fog pass complete"
        );
        Ok(stats)
    }

    /// Registers a detector. Duplicate names are ignored.
    pub fn add_detector(
        &mut self,
        name: impl Into<String>,
        source: impl PositionSource + 'static,
    ) -> bool {
        self.detectors.add(name, source)
    }

    /// Unregisters a detector. Unknown names are ignored.
    pub fn remove_detector(&mut self, name: &str) -> bool {
        self.detectors.remove(name)
    }

    /// Registers a subscriber writing its alpha to `target`.
    pub fn add_subscriber(
        &mut self,
        name: impl Into<String>,
        source: impl PositionSource + 'static,
        target: impl ScalarParamSink + 'static,
    ) -> bool {
        self.subscribers.add(name, source, target)
    }

    /// Unregisters a subscriber. Unknown names are ignored.
    pub fn remove_subscriber(&mut self, name: &str) -> bool {
        self.subscribers.remove(name)
    }

    /// Handle for queueing registrations from other threads.
    pub fn registrar(&self) -> FogRegistrar {
        self.commands.registrar()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Opacity pushed to the fog volume on start.
    pub fn fog_opacity(&self) -> f32 {
        self.fog_opacity
    }

    /// Camera reference position used for range culling.
    pub fn camera_position(&self) -> Vec3 {
        self.rig.world_position()
    }

    /// Registered detectors.
    pub fn detectors(&self) -> &DetectorRegistry {
        &self.detectors
    }

    /// Registered subscribers.
    pub fn subscribers(&self) -> &SubscriberRegistry {
        &self.subscribers
    }

    /// Mutable access to subscribers, e.g. to bind a late material.
    pub fn subscribers_mut(&mut self) -> &mut SubscriberRegistry {
        &mut self.subscribers
    }

    /// Snapshot built on the last [`update`](Self::update).
    pub fn snapshot(&self) -> &DetectorSnapshot {
        &self.snapshot
    }

    fn apply_commands(&mut self) {
        for command in self.commands.drain() {
            match command {
                FogCommand::AddDetector { name, source } => {
                    self.detectors.add_boxed(name, source);
                }
                FogCommand::RemoveDetector(name) => {
                    self.detectors.remove(&name);
                }
                FogCommand::AddSubscriber {
                    name,
                    source,
                    target,
                } => {
                    let target = target.map(|t| -> Box<dyn ScalarParamSink> { t });
                    self.subscribers.add_boxed(name, source, target);
                }
                FogCommand::RemoveSubscriber(name) => {
                    self.subscribers.remove(&name);
                }
            }
        }
    }
}
