//! Fog systems.
//!
//! Each system documents which fog schedule it belongs to and what it
//! reads and writes.

use bevy_ecs::prelude::*;
use fogwar_core::FrameStats;

use crate::{
    FogAlpha, FogCamera, FogDetector, FogFrameStats, FogSettings, FogSnapshot, FogSubscriber,
    FogVolume, WorldPos,
};

/// Enables every fog volume and applies the configured opacity.
///
/// **Schedule:** Startup (reads `FogSettings`, writes `FogVolume`).
pub fn setup_fog_volume(settings: Res<FogSettings>, mut volumes: Query<&mut FogVolume>) {
    let mut count = 0;
    for mut volume in &mut volumes {
        volume.enabled = true;
        volume.opacity = settings.fog_opacity;
        count += 1;
    }

    if count == 0 {
        tracing::debug!("No fog volume in world; skipping opacity setup");
    } else {
        tracing::info!(
            "Fog volume ready ({count} volume(s), opacity {:.2})",
            settings.fog_opacity
        );
    }
}

/// Captures every detector position into [`FogSnapshot`].
///
/// **Schedule:** Tick, first (reads `WorldPos` of detectors, writes `FogSnapshot`).
pub fn snapshot_detectors(
    detectors: Query<&WorldPos, With<FogDetector>>,
    mut snapshot: ResMut<FogSnapshot>,
) {
    snapshot.0.rebuild(detectors.iter().map(|pos| pos.0));
}

/// Recomputes each subscriber's opacity against the snapshot.
///
/// **Schedule:** Tick, after [`snapshot_detectors`] (reads `FogCamera`
/// position and `FogSnapshot`; writes `FogSubscriber`, `FogAlpha`,
/// `FogFrameStats`). Skips the pass when there is not exactly one camera.
pub fn update_fog_subscribers(
    camera: Query<&WorldPos, With<FogCamera>>,
    snapshot: Res<FogSnapshot>,
    mut stats: ResMut<FogFrameStats>,
    mut subscribers: Query<(&WorldPos, &mut FogSubscriber, Option<&mut FogAlpha>)>,
) {
    let camera = match camera.get_single() {
        Ok(pos) => pos.0,
        Err(err) => {
            tracing::debug!("Fog pass skipped: {err}");
            stats.0 = FrameStats::default();
            return;
        }
    };

    let mut frame = FrameStats::default();
    for (pos, mut subscriber, alpha) in &mut subscribers {
        let update = subscriber.state.evaluate(pos.0, camera, &snapshot.0);
        if let Some(value) = update.write_value()
            && let Some(mut alpha) = alpha
        {
            alpha.0 = value;
        }
        frame.record(update);
    }
    stats.0 = frame;
}
