use std::fs;
use std::path::{Path, PathBuf};

use crate::tracking::domain::face_track::FaceTrack;
use crate::tracking::domain::face_track_source::{FaceTrackSource, FaceTrackSourceError};

/// Reads a saved `face-tracks` API response from disk.
///
/// The file holds the tracks of a single asset, so the asset id passed to
/// [`FaceTrackSource::load`] is only used for logging.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FaceTrackSource for JsonFileSource {
    fn load(&self, asset_id: &str) -> Result<Vec<FaceTrack>, FaceTrackSourceError> {
        let json = fs::read_to_string(&self.path).map_err(|source| FaceTrackSourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let tracks = parse_face_tracks(&json)?;
        log::info!(
            "Loaded {} face tracks for {asset_id} from {}",
            tracks.len(),
            self.path.display()
        );
        Ok(tracks)
    }
}

/// Parses the JSON array returned by the `face-tracks` resource.
pub fn parse_face_tracks(json: &str) -> Result<Vec<FaceTrack>, FaceTrackSourceError> {
    serde_json::from_str(json).map_err(FaceTrackSourceError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TRACKS: &str = r#"[
        {"uri": "t1", "startTime": 0, "endTime": 1000,
         "positions": [{"frame": 0, "time": 0, "roi": [0, 0, 10, 10]},
                       {"frame": 25, "time": 1000, "roi": [0, 0, 20, 20]}]},
        {"uri": "t2", "startTime": 500, "endTime": 900,
         "keyframe": {"thumbnailUrl": "http://img/t2.jpg"},
         "positions": [{"time": 500, "roi": [5, 5, 5, 5]}]}
    ]"#;

    #[test]
    fn test_parse_face_tracks() {
        let tracks = parse_face_tracks(TRACKS).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, "t1");
        assert_eq!(tracks[1].positions[0].frame, None);
        assert_eq!(
            tracks[1]
                .keyframe_reference
                .as_ref()
                .unwrap()
                .thumbnail_url
                .as_deref(),
            Some("http://img/t2.jpg")
        );
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_face_tracks("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_face_tracks("{not json").unwrap_err();
        assert!(matches!(err, FaceTrackSourceError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TRACKS.as_bytes()).unwrap();

        let source = JsonFileSource::new(file.path());
        let tracks = source.load("asset").unwrap();

        assert_eq!(tracks.len(), 2);
        assert_eq!(source.path(), file.path());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let err = JsonFileSource::new(&path).load("asset").unwrap_err();

        match err {
            FaceTrackSourceError::Io { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
