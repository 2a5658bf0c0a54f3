pub mod box_interpolator;
pub mod face_track;
pub mod face_track_source;
pub mod face_tracker;
pub mod playback_state;
pub mod track_validator;
pub mod visibility;
