use serde::{Deserialize, Serialize};

use crate::shared::bounding_box::BoundingBox;

/// Representative image of a track, as served by the archive API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyframe {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// One sample of a track's bounding box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Milliseconds from the start of the video.
    pub time: i64,
    #[serde(rename = "roi")]
    pub bounding_box: BoundingBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<i64>,
}

impl Position {
    pub fn new(time: i64, bounding_box: BoundingBox) -> Self {
        Self {
            time,
            bounding_box,
            frame: None,
        }
    }
}

/// One detected face followed across a video.
///
/// `start_time` and `end_time` are inclusive and in milliseconds. Positions
/// are expected to be non-empty and sorted by time, but nothing here enforces
/// it; see [`crate::tracking::domain::track_validator`] for a strict check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceTrack {
    #[serde(rename = "uri")]
    pub id: String,
    #[serde(rename = "keyframe", default)]
    pub keyframe_reference: Option<Keyframe>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyframe_pos: Option<i64>,
    #[serde(alias = "startTimeMillis")]
    pub start_time: i64,
    #[serde(alias = "endTimeMillis")]
    pub end_time: i64,
    #[serde(default)]
    pub positions: Vec<Position>,
}

impl FaceTrack {
    /// Inclusive on both ends.
    pub fn is_active_at(&self, time_ms: i64) -> bool {
        self.start_time <= time_ms && time_ms <= self.end_time
    }
}

/// A track present at a query time, with its box interpolated to that time.
///
/// Serialized in the overlay shape renderers consume:
/// `{"id", "keyframe", "position": {"x", "y", "w", "h"}}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(into = "OverlayFace")]
pub struct VisibleFace {
    pub id: String,
    pub keyframe_reference: Option<Keyframe>,
    pub bounding_box: BoundingBox,
}

#[derive(Serialize)]
struct OverlayFace {
    id: String,
    keyframe: Option<Keyframe>,
    position: OverlayRect,
}

#[derive(Serialize)]
struct OverlayRect {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl From<VisibleFace> for OverlayFace {
    fn from(face: VisibleFace) -> Self {
        let b = face.bounding_box;
        Self {
            id: face.id,
            keyframe: face.keyframe_reference,
            position: OverlayRect {
                x: b.x,
                y: b.y,
                w: b.width,
                h: b.height,
            },
        }
    }
}
