use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the labeling core. None of them are fatal to the
/// application; the GUI reports them and leaves state as it was.
#[derive(Error, Debug)]
pub enum LabelError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to decode image {path:?}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to parse config {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Track index {index} out of range (1..={len}).")]
    TrackIndexOutOfRange { index: usize, len: usize },

    #[error("No previous track.")]
    NoPreviousTrack,

    #[error("No track is selected.")]
    NoCurrentTrack,

    #[error("Failed to delete track directory:\n{path:?}\n{source}")]
    RemoveTrack {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy image to clipboard.\n{0}")]
    Clipboard(String),
}

impl LabelError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LabelError::Io { path: path.into(), source }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        LabelError::Csv { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, LabelError>;
