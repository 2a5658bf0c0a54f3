use std::time::Duration;

use crate::shared::constants::{ASSET_URI_SCHEME, FACE_TRACKS_RESOURCE};
use crate::tracking::domain::face_track::FaceTrack;
use crate::tracking::domain::face_track_source::{FaceTrackSource, FaceTrackSourceError};
use crate::tracking::infrastructure::json_file_source::parse_face_tracks;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches face tracks from the archive REST API:
/// `GET {base_url}/face-tracks/axes:{asset_id}`.
pub struct HttpApiSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpApiSource {
    pub fn new(base_url: &str) -> Result<Self, FaceTrackSourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|source| FaceTrackSourceError::Request {
                url: base_url.to_string(),
                source,
            })?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: &str, client: reqwest::blocking::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// The archive rejects asset ids with a trailing slash, so it is dropped.
    pub fn face_tracks_url(&self, asset_id: &str) -> String {
        let id = asset_id.strip_suffix('/').unwrap_or(asset_id);
        let id = id.strip_prefix(ASSET_URI_SCHEME).unwrap_or(id);
        format!(
            "{}/{FACE_TRACKS_RESOURCE}/{ASSET_URI_SCHEME}{id}",
            self.base_url
        )
    }
}

impl FaceTrackSource for HttpApiSource {
    fn load(&self, asset_id: &str) -> Result<Vec<FaceTrack>, FaceTrackSourceError> {
        let url = self.face_tracks_url(asset_id);
        log::debug!("GET {url}");

        let request_error = |source: reqwest::Error| FaceTrackSourceError::Request {
            url: url.clone(),
            source,
        };
        let response = self.client.get(&url).send().map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FaceTrackSourceError::Status {
                url: url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(request_error)?;
        let tracks = parse_face_tracks(&body)?;
        log::info!("Fetched {} face tracks for {asset_id}", tracks.len());
        Ok(tracks)
    }
}
