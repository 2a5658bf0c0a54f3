use crate::shared::constants::{MILLIS_PER_SECOND, VISIBILITY_LOOKAHEAD_MS};
use crate::tracking::domain::box_interpolator::{self, TailPolicy};
use crate::tracking::domain::face_track::{FaceTrack, VisibleFace};
use crate::tracking::domain::visibility::{find_visible_tracks, is_sorted_by_start};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackerConfig {
    /// How far past the query time the visibility scan looks before stopping.
    /// Negative values are treated as 0 by the tracker.
    pub lookahead_ms: i64,
    pub tail_policy: TailPolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            lookahead_ms: VISIBILITY_LOOKAHEAD_MS,
            tail_policy: TailPolicy::default(),
        }
    }
}

/// Answers which faces are on screen at a playback time, and where.
///
/// Built once per viewed asset from its full track list. Tracks are
/// stable-sorted by start time on construction, so the early-exit scan in
/// [`find_visible_tracks`] cannot skip an active track; ties keep their
/// input order. Queries are pure: the tracker holds no per-query state.
#[derive(Clone, Debug, Default)]
pub struct FaceVisibilityTracker {
    tracks: Vec<FaceTrack>,
    config: TrackerConfig,
}

impl FaceVisibilityTracker {
    pub fn new(tracks: Vec<FaceTrack>) -> Self {
        Self::with_config(tracks, TrackerConfig::default())
    }

    /// Accepts a missing track list, e.g. when an asset has none yet.
    pub fn from_optional(tracks: Option<Vec<FaceTrack>>) -> Self {
        Self::new(tracks.unwrap_or_default())
    }

    pub fn with_config(mut tracks: Vec<FaceTrack>, mut config: TrackerConfig) -> Self {
        if config.lookahead_ms < 0 {
            log::warn!(
                "Negative lookahead of {} ms would skip active tracks, using 0",
                config.lookahead_ms
            );
            config.lookahead_ms = 0;
        }
        if !is_sorted_by_start(&tracks) {
            log::debug!("Sorting {} face tracks by start time", tracks.len());
            tracks.sort_by_key(|t| t.start_time);
        }
        Self { tracks, config }
    }

    pub fn tracks(&self) -> &[FaceTrack] {
        &self.tracks
    }

    pub fn config(&self) -> TrackerConfig {
        self.config
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Visible faces at a playback position given in seconds.
    pub fn faces_at(&self, time_seconds: f64) -> Vec<VisibleFace> {
        self.faces_at_millis(seconds_to_millis(time_seconds))
    }

    pub fn faces_at_millis(&self, time_ms: i64) -> Vec<VisibleFace> {
        find_visible_tracks(&self.tracks, time_ms, self.config.lookahead_ms)
            .into_iter()
            .filter_map(|track| {
                let Some(bounding_box) =
                    box_interpolator::box_at(&track.positions, time_ms, self.config.tail_policy)
                else {
                    log::debug!("Face track {} has no positions, skipping", track.id);
                    return None;
                };
                Some(VisibleFace {
                    id: track.id.clone(),
                    keyframe_reference: track.keyframe_reference.clone(),
                    bounding_box,
                })
            })
            .collect()
    }
}

/// Rounds to the nearest millisecond. NaN maps to 0.
pub fn seconds_to_millis(time_seconds: f64) -> i64 {
    (time_seconds * MILLIS_PER_SECOND).round() as i64
}
