use crate::tracking::domain::face_track::VisibleFace;
use crate::tracking::domain::face_tracker::FaceVisibilityTracker;

/// Caller-owned overlay state for one playing video.
///
/// Holds the last playback position pushed in and the faces computed for it,
/// so renderers can read the current overlay without re-querying the tracker.
/// Each update replaces the previous result wholesale.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaybackState {
    current_time: f64,
    visible_faces: Vec<VisibleFace>,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the visible faces for `time_seconds` and returns them.
    pub fn update_current_time(
        &mut self,
        tracker: &FaceVisibilityTracker,
        time_seconds: f64,
    ) -> &[VisibleFace] {
        self.current_time = time_seconds;
        self.visible_faces = tracker.faces_at(time_seconds);
        &self.visible_faces
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn visible_faces(&self) -> &[VisibleFace] {
        &self.visible_faces
    }

    /// Back to time zero with no faces, e.g. when the video source changes.
    pub fn reset(&mut self) {
        self.current_time = 0.0;
        self.visible_faces.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::bounding_box::BoundingBox;
    use crate::tracking::domain::face_track::{FaceTrack, Position};

    fn tracker() -> FaceVisibilityTracker {
        let track = |id: &str, start: i64, end: i64| FaceTrack {
            id: id.to_string(),
            keyframe_reference: None,
            keyframe_pos: None,
            start_time: start,
            end_time: end,
            positions: vec![Position::new(start, BoundingBox::new(1.0, 1.0, 1.0, 1.0))],
        };
        FaceVisibilityTracker::new(vec![track("a", 0, 1000), track("b", 2000, 3000)])
    }

    #[test]
    fn test_starts_empty() {
        let state = PlaybackState::new();
        assert_eq!(state.current_time(), 0.0);
        assert!(state.visible_faces().is_empty());
    }

    #[test]
    fn test_update_returns_and_stores_faces() {
        let tracker = tracker();
        let mut state = PlaybackState::new();

        let returned: Vec<String> = state
            .update_current_time(&tracker, 0.5)
            .iter()
            .map(|f| f.id.clone())
            .collect();

        assert_eq!(returned, vec!["a"]);
        assert_eq!(state.current_time(), 0.5);
        assert_eq!(state.visible_faces()[0].id, "a");
    }

    #[test]
    fn test_update_replaces_previous_result() {
        let tracker = tracker();
        let mut state = PlaybackState::new();

        state.update_current_time(&tracker, 0.5);
        state.update_current_time(&tracker, 2.5);
        assert_eq!(state.visible_faces().len(), 1);
        assert_eq!(state.visible_faces()[0].id, "b");

        state.update_current_time(&tracker, 1.5);
        assert!(state.visible_faces().is_empty());
    }

    #[test]
    fn test_same_time_twice_is_idempotent() {
        let tracker = tracker();
        let mut state = PlaybackState::new();
        let first = state.update_current_time(&tracker, 2.2).to_vec();
        let second = state.update_current_time(&tracker, 2.2).to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reset_clears_state() {
        let tracker = tracker();
        let mut state = PlaybackState::new();
        state.update_current_time(&tracker, 0.5);
        state.reset();
        assert_eq!(state, PlaybackState::new());
    }
}
