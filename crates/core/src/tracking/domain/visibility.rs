use crate::tracking::domain::face_track::FaceTrack;

/// Tracks active at `time_ms`, in input order.
///
/// Assumes `tracks` is sorted by ascending `start_time`: the scan stops at the
/// first track starting more than `lookahead_ms` after `time_ms`. On unsorted
/// input, active tracks listed after that point are silently missed.
/// [`FaceVisibilityTracker`](super::face_tracker::FaceVisibilityTracker) sorts
/// on construction so it never hits that case.
pub fn find_visible_tracks(
    tracks: &[FaceTrack],
    time_ms: i64,
    lookahead_ms: i64,
) -> Vec<&FaceTrack> {
    let horizon = time_ms.saturating_add(lookahead_ms);
    let mut visible = Vec::new();
    for track in tracks {
        if track.is_active_at(time_ms) {
            visible.push(track);
        } else if track.start_time > horizon {
            break;
        }
    }
    visible
}

pub fn is_sorted_by_start(tracks: &[FaceTrack]) -> bool {
    tracks.windows(2).all(|w| w[0].start_time <= w[1].start_time)
}
