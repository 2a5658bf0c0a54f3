use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tracking::domain::face_track::FaceTrack;

/// A problem that degrades tracker output without making it fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackIssue {
    NoPositions { track: String },
    InvertedBounds { track: String, start: i64, end: i64 },
    PositionsOutOfOrder { track: String, index: usize },
    PositionOutsideBounds { track: String, time: i64 },
    NonFiniteBox { track: String, time: i64 },
    TracksNotSortedByStart { index: usize },
}

impl std::fmt::Display for TrackIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackIssue::NoPositions { track } => write!(f, "track {track} has no positions"),
            TrackIssue::InvertedBounds { track, start, end } => {
                write!(f, "track {track} starts at {start}ms after it ends at {end}ms")
            }
            TrackIssue::PositionsOutOfOrder { track, index } => {
                write!(f, "track {track} position {index} is earlier than the one before it")
            }
            TrackIssue::PositionOutsideBounds { track, time } => {
                write!(f, "track {track} has a position at {time}ms outside its time bounds")
            }
            TrackIssue::NonFiniteBox { track, time } => {
                write!(f, "track {track} has a non-finite box at {time}ms")
            }
            TrackIssue::TracksNotSortedByStart { index } => {
                write!(f, "track {index} starts before the track listed before it")
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Log issues and continue.
    #[default]
    Lenient,
    /// Reject any track set with issues.
    Strict,
}

#[derive(Error, Debug)]
#[error("{} face track issue(s), first: {}", .issues.len(), first_issue(.issues))]
pub struct ValidationError {
    pub issues: Vec<TrackIssue>,
}

fn first_issue(issues: &[TrackIssue]) -> String {
    issues.first().map(ToString::to_string).unwrap_or_default()
}

/// Collects every issue in `tracks`, in track order.
pub fn validate(tracks: &[FaceTrack]) -> Vec<TrackIssue> {
    let mut issues = Vec::new();

    for (i, pair) in tracks.windows(2).enumerate() {
        if pair[1].start_time < pair[0].start_time {
            issues.push(TrackIssue::TracksNotSortedByStart { index: i + 1 });
        }
    }

    for track in tracks {
        let id = || track.id.clone();

        if track.start_time > track.end_time {
            issues.push(TrackIssue::InvertedBounds {
                track: id(),
                start: track.start_time,
                end: track.end_time,
            });
        }

        if track.positions.is_empty() {
            issues.push(TrackIssue::NoPositions { track: id() });
            continue;
        }

        for (i, pair) in track.positions.windows(2).enumerate() {
            if pair[1].time < pair[0].time {
                issues.push(TrackIssue::PositionsOutOfOrder {
                    track: id(),
                    index: i + 1,
                });
            }
        }

        for position in &track.positions {
            if !track.is_active_at(position.time) {
                issues.push(TrackIssue::PositionOutsideBounds {
                    track: id(),
                    time: position.time,
                });
            }
            if !position.bounding_box.is_finite() {
                issues.push(TrackIssue::NonFiniteBox {
                    track: id(),
                    time: position.time,
                });
            }
        }
    }

    issues
}

/// Applies `mode` to the issues found in `tracks`.
///
/// Lenient mode logs each issue as a warning and always succeeds.
pub fn check(tracks: &[FaceTrack], mode: ValidationMode) -> Result<(), ValidationError> {
    let issues = validate(tracks);
    if issues.is_empty() {
        return Ok(());
    }
    match mode {
        ValidationMode::Strict => Err(ValidationError { issues }),
        ValidationMode::Lenient => {
            for issue in &issues {
                log::warn!("{issue}");
            }
            Ok(())
        }
    }
}
