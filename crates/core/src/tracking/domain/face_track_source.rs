use std::path::PathBuf;

use thiserror::Error;

use crate::tracking::domain::face_track::FaceTrack;

#[derive(Error, Debug)]
pub enum FaceTrackSourceError {
    #[error("failed to read face tracks from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed face track data: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
}

/// Domain interface for fetching every face track of one video asset.
///
/// Called once per viewing session, before the tracker is built.
pub trait FaceTrackSource: Send {
    fn load(&self, asset_id: &str) -> Result<Vec<FaceTrack>, FaceTrackSourceError>;
}
