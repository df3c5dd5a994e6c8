//! Registry of fogged units and the per-frame opacity pass over them.

use glam::Vec3;

use crate::host::{PositionSource, ScalarParamSink, UNIT_ALPHA_KEY};
use crate::opacity::{OpacityState, OpacityUpdate};
use crate::registry::NamedSlots;
use crate::snapshot::DetectorSnapshot;

/// A unit whose material alpha follows detector proximity.
pub struct Subscriber {
    source: Box<dyn PositionSource>,
    target: Option<Box<dyn ScalarParamSink>>,
    state: OpacityState,
}

impl Subscriber {
    /// Creates a subscriber. A `None` target turns every write into a no-op.
    pub fn new(
        source: Box<dyn PositionSource>,
        target: Option<Box<dyn ScalarParamSink>>,
    ) -> Self {
        Self {
            source,
            target,
            state: OpacityState::new(),
        }
    }

    /// Opacity computed on the last pass.
    pub fn opacity(&self) -> f32 {
        self.state.opacity()
    }

    /// Aggregation state, including the last written value.
    pub fn state(&self) -> &OpacityState {
        &self.state
    }

    /// Returns `true` if writes reach a material.
    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    /// Recomputes opacity against `snapshot` and writes it if required.
    pub fn update_opacity(&mut self, camera: Vec3, snapshot: &DetectorSnapshot) -> OpacityUpdate {
        let position = self.source.world_position();
        let update = self.state.evaluate(position, camera, snapshot);

        if let Some(value) = update.write_value()
            && let Some(target) = self.target.as_mut()
        {
            target.set_scalar(UNIT_ALPHA_KEY, value);
        }

        update
    }
}

/// Tally of one [`SubscriberRegistry::update_all`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Subscribers hidden by the camera-range cull.
    pub culled: usize,
    /// In-range subscribers whose opacity was written.
    pub written: usize,
    /// In-range subscribers skipped by the dirty-check.
    pub unchanged: usize,
}

impl FrameStats {
    /// Total subscribers processed.
    pub fn total(&self) -> usize {
        self.culled + self.written + self.unchanged
    }

    /// Counts one subscriber's outcome.
    pub fn record(&mut self, update: OpacityUpdate) {
        match update {
            OpacityUpdate::Culled => self.culled += 1,
            OpacityUpdate::Written(_) => self.written += 1,
            OpacityUpdate::Unchanged(_) => self.unchanged += 1,
        }
    }
}

/// Subscribers indexed by unique name.
pub struct SubscriberRegistry {
    subscribers: NamedSlots<Subscriber>,
}

impl SubscriberRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            subscribers: NamedSlots::new(),
        }
    }

    /// Registers a subscriber whose material writes go to `target`.
    ///
    /// A taken name is left untouched. Returns `true` if added.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        source: impl PositionSource + 'static,
        target: impl ScalarParamSink + 'static,
    ) -> bool {
        self.add_boxed(name.into(), Box::new(source), Some(Box::new(target)))
    }

    /// Registers a subscriber with no material bound yet.
    pub fn add_untargeted(
        &mut self,
        name: impl Into<String>,
        source: impl PositionSource + 'static,
    ) -> bool {
        self.add_boxed(name.into(), Box::new(source), None)
    }

    pub(crate) fn add_boxed(
        &mut self,
        name: String,
        source: Box<dyn PositionSource>,
        target: Option<Box<dyn ScalarParamSink>>,
    ) -> bool {
        let added = self
            .subscribers
            .insert_if_absent(name, || Subscriber::new(source, target));
        if added {
            tracing::debug!("Subscriber registered ({} total)", self.subscribers.len());
        }
        added
    }

    /// Binds (or rebinds) the material target of an existing subscriber.
    ///
    /// The cached last-written value is kept, so the next write happens only
    /// once opacity moves past the dirty-check tolerance. Returns `false` if
    /// `name` is not registered.
    pub fn bind_target(&mut self, name: &str, target: impl ScalarParamSink + 'static) -> bool {
        match self.subscribers.get_mut(name) {
            Some(subscriber) => {
                subscriber.target = Some(Box::new(target));
                true
            }
            None => false,
        }
    }

    /// Unregisters `name`. Returns `true` if it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let removed = self.subscribers.remove(name).is_some();
        if removed {
            tracing::debug!(
                "Subscriber '{name}' removed ({} left)",
                self.subscribers.len()
            );
        }
        removed
    }

    /// Returns the subscriber registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Subscriber> {
        self.subscribers.get(name)
    }

    /// Returns `true` if a subscriber is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.subscribers.contains(name)
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns `true` if no subscribers are registered.
    pub fn is_empty(&self) -> bool {
        self.subscribers.len() == 0
    }

    /// Registered names in iteration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.subscribers.names()
    }

    /// Recomputes every subscriber's opacity against one frame's snapshot.
    pub fn update_all(&mut self, camera: Vec3, snapshot: &DetectorSnapshot) -> FrameStats {
        let mut stats = FrameStats::default();
        for subscriber in self.subscribers.values_mut() {
            stats.record(subscriber.update_opacity(camera, snapshot));
        }
        stats
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handles::{SharedPosition, SharedScalar};

    fn in_range_camera() -> Vec3 {
        Vec3::new(0.0, 10.0, 0.0)
    }

    #[test]
    fn test_duplicate_subscriber_is_ignored() {
        let mut registry = SubscriberRegistry::new();
        let first = SharedScalar::new();
        let second = SharedScalar::new();
        registry.add("grunt", Vec3::X, first.clone());
        assert!(!registry.add("grunt", Vec3::X, second.clone()));
        assert_eq!(registry.len(), 1);

        let snapshot = DetectorSnapshot::from_positions([Vec3::ZERO]);
        registry.update_all(in_range_camera(), &snapshot);
        assert_eq!(first.get(UNIT_ALPHA_KEY), Some(1.0));
        assert_eq!(second.writes(), 0);
    }

    #[test]
    fn test_remove_restores_registry() {
        let mut registry = SubscriberRegistry::new();
        registry.add_untargeted("a", Vec3::ZERO);
        registry.add_untargeted("b", Vec3::ZERO);
        assert!(registry.remove("b"));
        assert!(!registry.remove("b"));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_update_all_writes_alpha() {
        let mut registry = SubscriberRegistry::new();
        let near = SharedScalar::new();
        let fade = SharedScalar::new();
        registry.add("near", Vec3::new(3.0, 0.0, 0.0), near.clone());
        registry.add("fade", Vec3::new(5.5, 0.0, 0.0), fade.clone());

        let snapshot = DetectorSnapshot::from_positions([Vec3::ZERO]);
        let stats = registry.update_all(in_range_camera(), &snapshot);

        assert_eq!(stats.written, 2);
        assert_eq!(near.get(UNIT_ALPHA_KEY), Some(1.0));
        let fade_alpha = fade.get(UNIT_ALPHA_KEY).unwrap();
        assert!((fade_alpha - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_second_pass_is_suppressed() {
        let mut registry = SubscriberRegistry::new();
        let alpha = SharedScalar::new();
        registry.add("grunt", Vec3::new(5.5, 0.0, 0.0), alpha.clone());
        let snapshot = DetectorSnapshot::from_positions([Vec3::ZERO]);

        registry.update_all(in_range_camera(), &snapshot);
        let first = registry.get("grunt").unwrap().opacity();
        let stats = registry.update_all(in_range_camera(), &snapshot);
        let second = registry.get("grunt").unwrap().opacity();

        assert_eq!(alpha.writes(), 1);
        assert_eq!(stats.unchanged, 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_culled_subscriber_writes_zero() {
        let mut registry = SubscriberRegistry::new();
        let alpha = SharedScalar::new();
        registry.add("far", Vec3::ZERO, alpha.clone());
        let snapshot = DetectorSnapshot::from_positions([Vec3::ZERO]);

        let stats = registry.update_all(Vec3::new(40.0, 0.0, 0.0), &snapshot);
        registry.update_all(Vec3::new(40.0, 0.0, 0.0), &snapshot);

        assert_eq!(stats.culled, 1);
        assert_eq!(alpha.get(UNIT_ALPHA_KEY), Some(0.0));
        assert_eq!(alpha.writes(), 2);
    }

    #[test]
    fn test_untargeted_subscriber_keeps_bookkeeping() {
        let mut registry = SubscriberRegistry::new();
        registry.add_untargeted("ghost", Vec3::new(3.0, 0.0, 0.0));
        let snapshot = DetectorSnapshot::from_positions([Vec3::ZERO]);

        let stats = registry.update_all(in_range_camera(), &snapshot);
        let ghost = registry.get("ghost").unwrap();

        assert_eq!(stats.written, 1);
        assert!(!ghost.has_target());
        assert_eq!(ghost.opacity(), 1.0);
        assert_eq!(ghost.state().last_written(), 1.0);
    }

    #[test]
    fn test_bound_target_receives_later_changes() {
        let mut registry = SubscriberRegistry::new();
        let position = SharedPosition::new(Vec3::new(3.0, 0.0, 0.0));
        registry.add_untargeted("ghost", position.clone());
        let snapshot = DetectorSnapshot::from_positions([Vec3::ZERO]);
        registry.update_all(in_range_camera(), &snapshot);

        let alpha = SharedScalar::new();
        assert!(registry.bind_target("ghost", alpha.clone()));
        assert!(!registry.bind_target("nobody", SharedScalar::new()));

        // Still fully visible: the cached value suppresses the write.
        registry.update_all(in_range_camera(), &snapshot);
        assert_eq!(alpha.writes(), 0);

        position.set(Vec3::new(5.5, 0.0, 0.0));
        registry.update_all(in_range_camera(), &snapshot);
        assert_eq!(alpha.writes(), 1);
    }

    #[test]
    fn test_frame_stats_total() {
        let stats = FrameStats {
            culled: 2,
            written: 3,
            unchanged: 4,
        };
        assert_eq!(stats.total(), 9);
    }
}
