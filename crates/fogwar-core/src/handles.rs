//! Thread-safe handles for hosts without their own entity model.
//!
//! Clones share state, so the host keeps one clone to drive the entity and
//! hands the other to the fog system.

use std::sync::Arc;

use glam::Vec3;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::host::{PositionSource, ScalarParamSink};

/// A world position the host can move between frames.
#[derive(Clone, Debug, Default)]
pub struct SharedPosition(Arc<Mutex<Vec3>>);

impl SharedPosition {
    /// Creates a handle at `position`.
    pub fn new(position: Vec3) -> Self {
        Self(Arc::new(Mutex::new(position)))
    }

    /// Moves the entity to `position`.
    pub fn set(&self, position: Vec3) {
        *self.0.lock() = position;
    }

    /// Offsets the entity by `delta`.
    pub fn translate(&self, delta: Vec3) {
        *self.0.lock() += delta;
    }

    /// Current position.
    pub fn get(&self) -> Vec3 {
        *self.0.lock()
    }
}

impl PositionSource for SharedPosition {
    fn world_position(&self) -> Vec3 {
        self.get()
    }
}

#[derive(Debug, Default)]
struct ScalarParams {
    values: FxHashMap<String, f32>,
    writes: u64,
}

/// Material scalar parameters that record every write.
#[derive(Clone, Debug, Default)]
pub struct SharedScalar(Arc<Mutex<ScalarParams>>);

impl SharedScalar {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value written under `key`.
    pub fn get(&self, key: &str) -> Option<f32> {
        self.0.lock().values.get(key).copied()
    }

    /// Number of writes received across all keys.
    pub fn writes(&self) -> u64 {
        self.0.lock().writes
    }
}

impl ScalarParamSink for SharedScalar {
    fn set_scalar(&mut self, key: &str, value: f32) {
        let mut params = self.0.lock();
        params.values.insert(key.to_owned(), value);
        params.writes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_clones_share_state() {
        let host = SharedPosition::new(Vec3::ZERO);
        let fog = host.clone();
        host.translate(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(fog.world_position(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_scalar_counts_writes() {
        let host = SharedScalar::new();
        let mut fog = host.clone();
        assert_eq!(host.get("alpha"), None);

        fog.set_scalar("alpha", 0.25);
        fog.set_scalar("alpha", 0.75);

        assert_eq!(host.get("alpha"), Some(0.75));
        assert_eq!(host.writes(), 2);
    }
}
