use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Identifies a track: the camera directory name and the track directory name.
/// Orders by camera first, then track, both lexicographically.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackKey {
    pub camera_id: String,
    pub track_id: String,
}

impl TrackKey {
    pub fn new(camera_id: impl Into<String>, track_id: impl Into<String>) -> Self {
        TrackKey { camera_id: camera_id.into(), track_id: track_id.into() }
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.camera_id, self.track_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub key: TrackKey,
    /// Image files, sorted by file name.
    pub image_paths: Vec<PathBuf>,
}

impl Track {
    pub fn camera_id(&self) -> &str {
        &self.key.camera_id
    }

    pub fn track_id(&self) -> &str {
        &self.key.track_id
    }
}
