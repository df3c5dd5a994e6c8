//! Fixed-capacity per-frame snapshot of detector positions.

use glam::Vec3;

use crate::field::{is_fully_visible, visibility};

/// Maximum number of detectors considered in a single frame.
///
/// Detectors past this count are ignored for the frame they overflow in.
pub const MAX_DETECTORS: usize = 25;

/// One slot of a [`DetectorSnapshot`].
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct DetectorSlot {
    /// Whether a live detector filled this slot this frame.
    pub occupied: bool,
    /// World position of the detector, or zero when unoccupied.
    pub position: Vec3,
}

/// Outcome of scanning a snapshot from one observer position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scan {
    /// Highest visibility seen, `None` when no occupied slot was examined.
    pub peak: Option<f32>,
    /// Number of occupied slots examined before the scan ended.
    pub examined: usize,
}

impl Scan {
    /// Peak visibility, with "no detector" resolving to fully fogged.
    pub fn visibility(&self) -> f32 {
        self.peak.unwrap_or(0.0)
    }
}

/// Detector positions frozen for one frame.
///
/// Rebuilt in place at the start of every tick and read by every
/// subscriber afterwards. The buffer never reallocates.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorSnapshot {
    slots: [DetectorSlot; MAX_DETECTORS],
    occupied: usize,
    overflow: usize,
}

impl DetectorSnapshot {
    /// An empty snapshot with every slot unoccupied.
    pub fn new() -> Self {
        Self {
            slots: [DetectorSlot::default(); MAX_DETECTORS],
            occupied: 0,
            overflow: 0,
        }
    }

    /// Builds a snapshot from positions in enumeration order.
    pub fn from_positions(positions: impl IntoIterator<Item = Vec3>) -> Self {
        let mut snapshot = Self::new();
        snapshot.rebuild(positions);
        snapshot
    }

    /// Overwrites every slot from `positions`.
    ///
    /// The first [`MAX_DETECTORS`] positions fill slots in order; the rest
    /// are counted in [`overflow`](Self::overflow) and otherwise dropped.
    /// Remaining slots are reset to unoccupied at the origin.
    pub fn rebuild(&mut self, positions: impl IntoIterator<Item = Vec3>) {
        let mut positions = positions.into_iter();
        let mut filled = 0;

        for slot in &mut self.slots {
            match positions.next() {
                Some(position) => {
                    *slot = DetectorSlot {
                        occupied: true,
                        position,
                    };
                    filled += 1;
                }
                None => *slot = DetectorSlot::default(),
            }
        }

        self.occupied = filled;
        self.overflow = positions.count();

        if self.overflow > 0 {
            tracing::debug!(
                "Detector snapshot full: {} detector(s) ignored this frame",
                self.overflow
            );
        }
    }

    /// All slots, occupied or not.
    pub fn slots(&self) -> &[DetectorSlot; MAX_DETECTORS] {
        &self.slots
    }

    /// Positions of occupied slots in snapshot order.
    pub fn occupied(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.slots
            .iter()
            .filter(|slot| slot.occupied)
            .map(|slot| slot.position)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.occupied
    }

    /// Returns `true` if no detector is visible this frame.
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Detectors that did not fit in the snapshot on the last rebuild.
    pub fn overflow(&self) -> usize {
        self.overflow
    }

    /// Scans occupied slots for the highest visibility at `observer`.
    ///
    /// Stops at the first slot that reaches full visibility, since nothing
    /// can exceed it.
    pub fn scan(&self, observer: Vec3) -> Scan {
        let mut peak: Option<f32> = None;
        let mut examined = 0;

        for detector in self.occupied() {
            examined += 1;
            let value = visibility(observer.distance(detector));
            if peak.is_none_or(|best| value > best) {
                peak = Some(value);
            }
            if is_fully_visible(value) {
                break;
            }
        }

        Scan { peak, examined }
    }
}

impl Default for DetectorSnapshot {
    fn default() -> Self {
        Self::new()
    }
}
