//! Seeded wander simulation feeding the fog system.

use fogwar_config::Config;
use fogwar_core::{
    FogError, FogOfWarSystem, FogScene, FrameStats, ScalarParamSink, SharedPosition, SharedScalar,
    is_fully_visible,
};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Height of the camera rig above the arena floor.
const RIG_HEIGHT: f32 = 20.0;

/// Radius of the rig's orbit around the arena centre.
const RIG_ORBIT_RADIUS: f32 = 8.0;

/// Radians per second the rig advances along its orbit.
const RIG_ORBIT_SPEED: f32 = 0.2;

/// Maximum heading change per second, in radians.
const WANDER_TURN_RATE: f32 = 1.5;

/// Scene with a single fog volume material.
struct DemoScene {
    volume: SharedScalar,
}

impl FogScene for DemoScene {
    fn fog_volume(&mut self) -> Option<&mut dyn ScalarParamSink> {
        Some(&mut self.volume)
    }

    fn bind_cameras(&mut self) {
        tracing::debug!("Demo scene has one headless camera; nothing to bind");
    }
}

/// An entity drifting across the arena floor.
struct Wanderer {
    position: SharedPosition,
    heading: f32,
}

impl Wanderer {
    fn spawn(rng: &mut Xoshiro256StarStar, half_extent: f32) -> Self {
        let x = rng.gen_range(-half_extent..=half_extent);
        let z = rng.gen_range(-half_extent..=half_extent);
        Self {
            position: SharedPosition::new(Vec3::new(x, 0.0, z)),
            heading: rng.gen_range(0.0..std::f32::consts::TAU),
        }
    }

    /// Turns by a random amount, moves forward, and bounces off the arena edge.
    fn step(&mut self, rng: &mut Xoshiro256StarStar, dt: f32, speed: f32, half_extent: f32) {
        let turn = WANDER_TURN_RATE * dt;
        if turn > 0.0 {
            self.heading += rng.gen_range(-turn..=turn);
        }

        let mut direction = Vec3::new(self.heading.cos(), 0.0, self.heading.sin());
        let mut next = self.position.get() + direction * speed * dt;

        if next.x.abs() > half_extent {
            next.x = next.x.clamp(-half_extent, half_extent);
            direction.x = -direction.x;
        }
        if next.z.abs() > half_extent {
            next.z = next.z.clamp(-half_extent, half_extent);
            direction.z = -direction.z;
        }

        self.heading = direction.z.atan2(direction.x);
        self.position.set(next);
    }
}

/// A fog subscriber and the material it writes to.
struct Unit {
    name: String,
    body: Wanderer,
    material: SharedScalar,
}

/// How many units are visible, partly faded or hidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Census {
    /// Units at full opacity.
    pub visible: usize,
    /// Units inside a detector's fade band.
    pub fading: usize,
    /// Units at zero opacity.
    pub fogged: usize,
}

/// Detectors and subscribers wandering under an orbiting camera rig.
pub struct Simulation {
    fog: FogOfWarSystem,
    rig: SharedPosition,
    volume: SharedScalar,
    detectors: Vec<Wanderer>,
    units: Vec<Unit>,
    rng: Xoshiro256StarStar,
    half_extent: f32,
    wander_speed: f32,
    elapsed: f32,
    ticks: u64,
}

impl Simulation {
    /// Starts the fog system and spawns entities from the configured seed.
    ///
    /// Detectors go through the [`FogRegistrar`](fogwar_core::FogRegistrar)
    /// queue and appear on the first tick; units register immediately.
    pub fn new(config: &Config) -> Result<Self, FogError> {
        let sim = &config.simulation;
        let mut rng = Xoshiro256StarStar::seed_from_u64(sim.seed);

        let rig = SharedPosition::new(Vec3::new(RIG_ORBIT_RADIUS, RIG_HEIGHT, 0.0));
        let mut fog = FogOfWarSystem::new(config.fog.fog_opacity, rig.clone());

        let mut scene = DemoScene {
            volume: SharedScalar::new(),
        };
        fog.start(&mut scene)?;

        let registrar = fog.registrar();
        let mut detectors = Vec::with_capacity(sim.detectors as usize);
        for i in 0..sim.detectors {
            let detector = Wanderer::spawn(&mut rng, sim.arena_half_extent);
            registrar.add_detector(format!("scout-{i}"), detector.position.clone())?;
            detectors.push(detector);
        }

        let mut units = Vec::with_capacity(sim.subscribers as usize);
        for i in 0..sim.subscribers {
            let unit = Unit {
                name: format!("unit-{i}"),
                body: Wanderer::spawn(&mut rng, sim.arena_half_extent),
                material: SharedScalar::new(),
            };
            fog.add_subscriber(
                unit.name.clone(),
                unit.body.position.clone(),
                unit.material.clone(),
            );
            units.push(unit);
        }

        tracing::info!(
            detectors = detectors.len(),
            units = units.len(),
            seed = sim.seed,
            "Simulation spawned"
        );

        Ok(Self {
            fog,
            rig,
            volume: scene.volume,
            detectors,
            units,
            rng,
            half_extent: sim.arena_half_extent,
            wander_speed: sim.wander_speed,
            elapsed: 0.0,
            ticks: 0,
        })
    }

    /// Moves every entity by `dt` seconds, then runs one fog pass.
    pub fn step(&mut self, dt: f32) -> Result<FrameStats, FogError> {
        for detector in &mut self.detectors {
            detector.step(&mut self.rng, dt, self.wander_speed, self.half_extent);
        }
        for unit in &mut self.units {
            unit.body.step(&mut self.rng, dt, self.wander_speed, self.half_extent);
        }

        self.elapsed += dt;
        let angle = self.elapsed * RIG_ORBIT_SPEED;
        self.rig.set(Vec3::new(
            RIG_ORBIT_RADIUS * angle.cos(),
            RIG_HEIGHT,
            RIG_ORBIT_RADIUS * angle.sin(),
        ));

        let stats = self.fog.update()?;
        self.ticks += 1;
        Ok(stats)
    }

    /// Counts units by their current opacity.
    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for unit in &self.units {
            let opacity = self
                .fog
                .subscribers()
                .get(&unit.name)
                .map_or(0.0, |s| s.opacity());
            if is_fully_visible(opacity) {
                census.visible += 1;
            } else if opacity > 0.0 {
                census.fading += 1;
            } else {
                census.fogged += 1;
            }
        }
        census
    }

    /// Total material writes across all units.
    pub fn material_writes(&self) -> u64 {
        self.units.iter().map(|unit| unit.material.writes()).sum()
    }

    /// The fog volume material set up at start.
    pub fn volume(&self) -> &SharedScalar {
        &self.volume
    }

    /// The underlying fog system.
    pub fn fog(&self) -> &FogOfWarSystem {
        &self.fog
    }

    /// Ticks simulated so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fogwar_core::{FOG_OPACITY_KEY, UNIT_ALPHA_KEY};

    fn small_config(seed: u64) -> Config {
        let mut config = Config::default();
        config.simulation.detectors = 4;
        config.simulation.subscribers = 16;
        config.simulation.seed = seed;
        config
    }

    #[test]
    fn test_volume_receives_fog_opacity() {
        let mut config = small_config(1);
        config.fog.fog_opacity = 0.65;
        let sim = Simulation::new(&config).unwrap();
        assert_eq!(sim.volume().get(FOG_OPACITY_KEY), Some(0.65));
    }

    #[test]
    fn test_queued_detectors_arrive_on_first_tick() {
        let mut sim = Simulation::new(&small_config(2)).unwrap();
        assert_eq!(sim.fog().detectors().len(), 0);
        assert_eq!(sim.fog().subscribers().len(), 16);

        sim.step(1.0 / 60.0).unwrap();
        assert_eq!(sim.fog().detectors().len(), 4);
        assert_eq!(sim.fog().snapshot().len(), 4);
        assert_eq!(sim.ticks(), 1);
    }

    #[test]
    fn test_extra_detectors_show_as_overflow() {
        let mut config = small_config(8);
        config.simulation.detectors = 30;
        let mut sim = Simulation::new(&config).unwrap();
        sim.step(1.0 / 60.0).unwrap();
        assert_eq!(sim.fog().detectors().len(), 30);
        assert_eq!(sim.fog().snapshot().overflow(), 5);
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let mut a = Simulation::new(&small_config(7)).unwrap();
        let mut b = Simulation::new(&small_config(7)).unwrap();
        for _ in 0..120 {
            assert_eq!(a.step(1.0 / 60.0).unwrap(), b.step(1.0 / 60.0).unwrap());
        }
        assert_eq!(a.census(), b.census());
        assert_eq!(a.material_writes(), b.material_writes());
    }

    #[test]
    fn test_census_covers_every_unit() {
        let mut sim = Simulation::new(&small_config(3)).unwrap();
        for _ in 0..30 {
            sim.step(1.0 / 30.0).unwrap();
        }
        let census = sim.census();
        assert_eq!(census.visible + census.fading + census.fogged, 16);
    }

    #[test]
    fn test_units_stay_in_arena() {
        let mut config = small_config(4);
        config.simulation.wander_speed = 50.0;
        let half = config.simulation.arena_half_extent;
        let mut sim = Simulation::new(&config).unwrap();
        for _ in 0..200 {
            sim.step(0.1).unwrap();
        }
        for unit in &sim.units {
            let p = unit.body.position.get();
            assert!(p.x.abs() <= half && p.z.abs() <= half, "escaped: {p}");
        }
    }

    #[test]
    fn test_written_alpha_matches_opacity() {
        let mut sim = Simulation::new(&small_config(5)).unwrap();
        sim.step(1.0 / 60.0).unwrap();
        for unit in &sim.units {
            let opacity = sim.fog().subscribers().get(&unit.name).unwrap().opacity();
            let written = unit.material.get(UNIT_ALPHA_KEY).unwrap_or(0.0);
            assert!((opacity - written).abs() <= fogwar_core::VISIBILITY_EPSILON);
        }
    }

    #[test]
    fn test_no_detectors_leaves_everything_fogged() {
        let mut config = small_config(6);
        config.simulation.detectors = 0;
        let mut sim = Simulation::new(&config).unwrap();
        let stats = sim.step(1.0 / 60.0).unwrap();
        assert_eq!(sim.census().fogged, 16);
        assert_eq!(stats.written, 0);
        // Only culled units write; in-range zeros match the initial state.
        assert_eq!(sim.material_writes(), stats.culled as u64);
    }
}
