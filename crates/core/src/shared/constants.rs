/// Visibility scans stop at the first track starting this far past the query.
pub const VISIBILITY_LOOKAHEAD_MS: i64 = 10_000;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// REST resource serving the face tracks of one asset.
pub const FACE_TRACKS_RESOURCE: &str = "face-tracks";

/// Asset identifiers are namespaced on the archive API.
pub const ASSET_URI_SCHEME: &str = "axes:";

pub const MILLIS_PER_SECOND: f64 = 1000.0;
