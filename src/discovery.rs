//! Track discovery: `root/<camera_id>/<track_id>/<images>`.

use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LabelError, Result};
use crate::types::track::{Track, TrackKey};

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// True for `.jpg`, `.jpeg` and `.png`, ignoring case.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|ext| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Sub-directories of `dir` as `(name, path)`, sorted by name.
/// Files and names that are not valid UTF-8 are skipped.
fn sorted_subdirs(dir: &Path) -> std::io::Result<Vec<(String, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => dirs.push((name, path)),
            Err(name) => warn!("Skipping non UTF-8 directory name {:?}", name),
        }
    }
    dirs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(dirs)
}

/// Image files directly inside `dir`, sorted by file name.
pub fn list_track_images(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut images: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_image_file(p))
        .collect();
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

/// Walks camera directories and their track directories under `root`.
///
/// A track is kept only when its directory holds at least one image. The
/// result is ordered by camera id, then track id.
pub fn scan_tracks(root: &Path) -> Result<Vec<Track>> {
    let cameras = sorted_subdirs(root).map_err(|e| LabelError::io(root, e))?;
    let mut tracks = Vec::new();

    for (camera_id, camera_path) in cameras {
        let track_dirs = match sorted_subdirs(&camera_path) {
            Ok(dirs) => dirs,
            Err(e) => {
                warn!("Could not read camera directory {:?}: {}", camera_path, e);
                continue;
            }
        };
        for (track_id, track_path) in track_dirs {
            let image_paths = match list_track_images(&track_path) {
                Ok(images) => images,
                Err(e) => {
                    warn!("Could not read track directory {:?}: {}", track_path, e);
                    continue;
                }
            };
            if image_paths.is_empty() {
                debug!("No images in {:?}, not a track", track_path);
                continue;
            }
            tracks.push(Track { key: TrackKey::new(camera_id.clone(), track_id), image_paths });
        }
    }
    Ok(tracks)
}

/// Directory of a track on disk.
pub fn track_dir(root: &Path, key: &TrackKey) -> PathBuf {
    root.join(&key.camera_id).join(&key.track_id)
}
