//! Registry of detectors that reveal units around them.

use glam::Vec3;

use crate::host::PositionSource;
use crate::registry::NamedSlots;

/// Detectors indexed by unique name.
///
/// Positions are read live from each detector's [`PositionSource`] whenever
/// [`positions`](Self::positions) is iterated.
pub struct DetectorRegistry {
    detectors: NamedSlots<Box<dyn PositionSource>>,
}

impl DetectorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            detectors: NamedSlots::new(),
        }
    }

    /// Registers a detector under `name`. A taken name is left untouched.
    ///
    /// Returns `true` if the detector was added.
    pub fn add(&mut self, name: impl Into<String>, source: impl PositionSource + 'static) -> bool {
        self.add_boxed(name.into(), Box::new(source))
    }

    pub(crate) fn add_boxed(&mut self, name: String, source: Box<dyn PositionSource>) -> bool {
        let added = self.detectors.insert_if_absent(name, || source);
        if added {
            tracing::debug!("Detector registered ({} total)", self.detectors.len());
        }
        added
    }

    /// Unregisters `name`. Returns `true` if it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let removed = self.detectors.remove(name).is_some();
        if removed {
            tracing::debug!("Detector '{name}' removed ({} left)", self.detectors.len());
        }
        removed
    }

    /// Returns `true` if a detector is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.detectors.contains(name)
    }

    /// Number of registered detectors, including any past snapshot capacity.
    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    /// Returns `true` if no detectors are registered.
    pub fn is_empty(&self) -> bool {
        self.detectors.len() == 0
    }

    /// Registered names in iteration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.detectors.names()
    }

    /// Current world positions in iteration order.
    ///
    /// The order is stable while the registry is unchanged; it says nothing
    /// about detector identity across additions or removals.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.detectors
            .values()
            .map(|source| source.world_position())
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
