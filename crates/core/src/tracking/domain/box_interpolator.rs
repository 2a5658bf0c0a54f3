use serde::{Deserialize, Serialize};

use crate::shared::bounding_box::BoundingBox;
use crate::tracking::domain::face_track::Position;

/// What to blend toward when the query time is past every stored sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TailPolicy {
    /// Hold the last known box.
    #[default]
    Clamp,
    /// Legacy behaviour: pair the last sample with the first one. The
    /// resulting blend extrapolates and rarely makes geometric sense; kept
    /// only for output compatibility with older overlay data.
    Wrap,
}

impl std::fmt::Display for TailPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TailPolicy::Clamp => write!(f, "clamp"),
            TailPolicy::Wrap => write!(f, "wrap"),
        }
    }
}

impl std::str::FromStr for TailPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clamp" => Ok(TailPolicy::Clamp),
            "wrap" => Ok(TailPolicy::Wrap),
            other => Err(format!("tail policy must be 'clamp' or 'wrap', got '{other}'")),
        }
    }
}

/// Finds the samples surrounding `time_ms`.
///
/// `before` starts at the first sample and advances until a sample with
/// `time >= time_ms` is seen, which becomes `after`. When no such sample
/// exists, `after` is chosen by `tail`. Returns `None` only for an empty
/// slice.
pub fn bracket(
    positions: &[Position],
    time_ms: i64,
    tail: TailPolicy,
) -> Option<(&Position, &Position)> {
    let first = positions.first()?;
    let mut before = first;
    for position in positions {
        if position.time >= time_ms {
            return Some((before, position));
        }
        before = position;
    }
    let after = match tail {
        TailPolicy::Clamp => before,
        TailPolicy::Wrap => first,
    };
    Some((before, after))
}

/// Blends two samples at `time_ms`.
///
/// Exact timestamp matches return the stored box untouched, so querying on a
/// sample never accumulates floating-point error.
pub fn interpolate(before: &Position, after: &Position, time_ms: i64) -> BoundingBox {
    if before.time == time_ms {
        return before.bounding_box;
    }
    if after.time == time_ms {
        return after.bounding_box;
    }
    if after.time == before.time {
        return before.bounding_box;
    }

    let p = (time_ms - before.time) as f64 / (after.time - before.time) as f64;
    before.bounding_box.lerp(&after.bounding_box, p)
}

/// Box of a track at `time_ms`, or `None` when it has no samples.
pub fn box_at(positions: &[Position], time_ms: i64, tail: TailPolicy) -> Option<BoundingBox> {
    bracket(positions, time_ms, tail).map(|(before, after)| interpolate(before, after, time_ms))
}
