//! Fog schedule labels and the startup/tick runner.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::{IntoSystemConfigs, ScheduleLabel};
use fogwar_core::{FogError, FrameStats};

use crate::{
    FogFrameStats, register_fog_resources, setup_fog_volume, snapshot_detectors,
    update_fog_subscribers,
};

/// Labels for the two fog stages.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FogSchedule {
    /// Runs once, before the first tick.
    Startup,
    /// Runs every simulation tick.
    Tick,
}

/// Startup and per-tick fog schedules with lifecycle enforcement.
///
/// [`tick`](Self::tick) fails fast until [`start`](Self::start) has run.
pub struct FogSchedules {
    startup: Schedule,
    tick: Schedule,
    started: bool,
}

impl FogSchedules {
    /// Creates the schedules with the built-in fog systems registered.
    pub fn new() -> Self {
        let mut startup = Schedule::new(FogSchedule::Startup);
        startup.add_systems(setup_fog_volume);

        let mut tick = Schedule::new(FogSchedule::Tick);
        tick.add_systems((snapshot_detectors, update_fog_subscribers).chain());

        Self {
            startup,
            tick,
            started: false,
        }
    }

    /// Register an extra system (or system tuple) into a stage.
    pub fn add_system<M>(&mut self, stage: FogSchedule, system: impl IntoSystemConfigs<M>) {
        match stage {
            FogSchedule::Startup => self.startup.add_systems(system),
            FogSchedule::Tick => self.tick.add_systems(system),
        };
    }

    /// Returns `true` once [`start`](Self::start) has completed.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Inserts missing fog resources and runs the startup stage once.
    pub fn start(&mut self, world: &mut World) -> Result<(), FogError> {
        if self.started {
            return Err(FogError::AlreadyStarted);
        }
        register_fog_resources(world);
        self.startup.run(world);
        self.started = true;
        Ok(())
    }

    /// Runs one fog tick and returns its stats.
    pub fn tick(&mut self, world: &mut World) -> Result<FrameStats, FogError> {
        if !self.started {
            return Err(FogError::NotStarted);
        }
        self.tick.run(world);
        Ok(world.resource::<FogFrameStats>().0)
    }
}

impl Default for FogSchedules {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DetectorBundle, FogAlpha, FogCamera, FogSettings, FogVolume, SubscriberBundle, WorldPos,
    };
    use glam::Vec3;

    #[derive(Resource, Default)]
    struct ExecutionLog {
        stages: Vec<&'static str>,
    }

    #[test]
    fn test_tick_before_start_fails_fast() {
        let mut world = World::new();
        let mut schedules = FogSchedules::new();
        assert_eq!(schedules.tick(&mut world), Err(FogError::NotStarted));
        assert!(!world.contains_resource::<FogFrameStats>());
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let mut world = World::new();
        let mut schedules = FogSchedules::new();
        schedules.start(&mut world).unwrap();
        assert!(schedules.is_started());
        assert_eq!(schedules.start(&mut world), Err(FogError::AlreadyStarted));
    }

    #[test]
    fn test_startup_runs_once_before_ticks() {
        let mut world = World::new();
        world.insert_resource(ExecutionLog::default());

        let mut schedules = FogSchedules::new();
        schedules.add_system(FogSchedule::Startup, |mut log: ResMut<ExecutionLog>| {
            log.stages.push("Startup");
        });
        schedules.add_system(FogSchedule::Tick, |mut log: ResMut<ExecutionLog>| {
            log.stages.push("Tick");
        });

        schedules.start(&mut world).unwrap();
        schedules.tick(&mut world).unwrap();
        schedules.tick(&mut world).unwrap();

        assert_eq!(
            world.resource::<ExecutionLog>().stages,
            vec!["Startup", "Tick", "Tick"]
        );
    }

    #[test]
    fn test_full_lifecycle() {
        let mut world = World::new();
        world.insert_resource(FogSettings { fog_opacity: 0.7 });
        let volume = world.spawn(FogVolume::default()).id();
        world.spawn((FogCamera, WorldPos(Vec3::new(0.0, 10.0, 0.0))));
        world.spawn(DetectorBundle::at(Vec3::ZERO));
        let unit = world.spawn(SubscriberBundle::at(Vec3::new(5.5, 0.0, 0.0))).id();

        let mut schedules = FogSchedules::new();
        schedules.start(&mut world).unwrap();
        assert_eq!(world.get::<FogVolume>(volume).unwrap().opacity, 0.7);

        let first = schedules.tick(&mut world).unwrap();
        let second = schedules.tick(&mut world).unwrap();

        assert_eq!(first.written, 1);
        assert_eq!(second.unchanged, 1);
        assert!((world.get::<FogAlpha>(unit).unwrap().0 - 0.5).abs() < 1e-6);
    }
}
