//! Application state for one labeling run: the track list, the label map that
//! mirrors the labels file, the current position, the form being edited and
//! the ephemeral image selection. Every GUI handler goes through here.

use log::{error, info, warn};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::discovery::{scan_tracks, track_dir};
use crate::error::{LabelError, Result};
use crate::layout::progress::TrackStatus;
use crate::stats::{summarize, DistributionSummary};
use crate::storage::labels_csv::{ensure_label_file, load_labels, save_labels};
use crate::types::label::{Gender, Label, LabelMap, SKIP_AGE};
use crate::types::track::{Track, TrackKey};
use crate::validation::{parse_age_input, save_gate, SaveGate};

/// Gender and raw age text of the track on screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub gender: Gender,
    pub age_text: String,
}

impl FormState {
    fn from_label(label: Option<&Label>) -> Self {
        match label {
            Some(label) => FormState { gender: label.gender(), age_text: label.age_text() },
            None => FormState::default(),
        }
    }

    /// The label "Save & Next" would store. An age that does not parse is stored as 0.
    pub fn to_label(&self) -> Label {
        let age = parse_age_input(&self.age_text).value().unwrap_or(0.0);
        if age == SKIP_AGE {
            Label::Skipped
        } else {
            Label::Labeled { gender: self.gender, age }
        }
    }
}

/// Outcome of moving forward after a save or skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved,
    /// Already on the last track; it stays current.
    ReachedEnd,
}

#[derive(Debug)]
pub struct LabelingSession {
    root: PathBuf,
    output_csv: PathBuf,
    tracks: Vec<Track>,
    labels: LabelMap,
    current: usize,
    form: FormState,
    selected: BTreeSet<PathBuf>,
}

impl LabelingSession {
    /// Scans `root`, loads existing labels from `output_csv` (creating it with
    /// a header if needed) and shows the first track.
    pub fn open(root: impl Into<PathBuf>, output_csv: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let output_csv = output_csv.into();
        let tracks = scan_tracks(&root)?;
        let labels = load_labels(&output_csv)?;
        ensure_label_file(&output_csv)?;
        info!("Found {} tracks under {:?}, {} existing labels", tracks.len(), root, labels.len());

        let mut session = LabelingSession {
            root,
            output_csv,
            tracks,
            labels,
            current: 0,
            form: FormState::default(),
            selected: BTreeSet::new(),
        };
        session.show_current();
        Ok(session)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output_csv(&self) -> &Path {
        &self.output_csv
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        (self.current < self.tracks.len()).then_some(self.current)
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.current)
    }

    pub fn label_for(&self, key: &TrackKey) -> Option<&Label> {
        self.labels.get(key)
    }

    pub fn title(&self) -> String {
        match self.current_track() {
            Some(track) => format!(
                "Camera: {} | Track: {}   [{}/{}]",
                track.camera_id(),
                track.track_id(),
                self.current + 1,
                self.tracks.len()
            ),
            None => "No Tracks Found".to_string(),
        }
    }

    // --- form ---

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.form.gender = gender;
    }

    pub fn set_age_text(&mut self, text: impl Into<String>) {
        self.form.age_text = text.into();
    }

    pub fn save_gate(&self) -> SaveGate {
        save_gate(self.form.gender, &self.form.age_text)
    }

    // --- navigation ---

    /// Resets form and selection for the track now under `current`.
    fn show_current(&mut self) {
        self.selected.clear();
        self.load_form();
    }

    fn load_form(&mut self) {
        let label = self.current_track().and_then(|t| self.labels.get(&t.key));
        self.form = FormState::from_label(label);
    }

    /// Zero-based jump, used by the progress bar.
    pub fn jump_to(&mut self, index: usize) -> Result<()> {
        if index >= self.tracks.len() {
            return Err(LabelError::TrackIndexOutOfRange { index: index + 1, len: self.tracks.len() });
        }
        self.current = index;
        self.show_current();
        Ok(())
    }

    /// One-based jump from the "Go to track" field.
    pub fn go_to(&mut self, one_based: usize) -> Result<()> {
        if one_based == 0 || one_based > self.tracks.len() {
            return Err(LabelError::TrackIndexOutOfRange { index: one_based, len: self.tracks.len() });
        }
        self.jump_to(one_based - 1)
    }

    pub fn previous(&mut self) -> Result<()> {
        if self.current == 0 || self.tracks.is_empty() {
            return Err(LabelError::NoPreviousTrack);
        }
        self.current -= 1;
        self.show_current();
        Ok(())
    }

    fn advance(&mut self) -> Advance {
        if self.current + 1 < self.tracks.len() {
            self.current += 1;
            self.show_current();
            Advance::Moved
        } else {
            self.load_form();
            Advance::ReachedEnd
        }
    }

    // --- mutations ---

    /// Sets the label of `key` and rewrites the file. The in-memory map is
    /// restored if the write fails.
    fn commit(&mut self, key: TrackKey, label: Label) -> Result<()> {
        let previous = self.labels.insert(key.clone(), label);
        if let Err(e) = save_labels(&self.output_csv, &self.labels) {
            match previous {
                Some(old) => self.labels.insert(key, old),
                None => self.labels.remove(&key),
            };
            return Err(e);
        }
        Ok(())
    }

    /// Stores the form as the current track's label and moves on. The save
    /// gate is not re-checked here.
    pub fn save_and_next(&mut self) -> Result<Advance> {
        let key = self.current_track().ok_or(LabelError::NoCurrentTrack)?.key.clone();
        let label = self.form.to_label();
        let summary = format!("{} / {}", label.gender_text(), label.age_text());
        self.commit(key.clone(), label)?;
        info!("Saved {} as {}", key, summary);
        Ok(self.advance())
    }

    /// Marks the current track as skipped, whatever the form holds, and moves on.
    pub fn skip_track(&mut self) -> Result<Advance> {
        let key = self.current_track().ok_or(LabelError::NoCurrentTrack)?.key.clone();
        self.commit(key.clone(), Label::Skipped)?;
        info!("Skipped {}", key);
        Ok(self.advance())
    }

    /// Deletes the current track's directory, then drops it from the list and
    /// its label from the file. Nothing changes if the directory cannot be
    /// removed. Once it is gone the removal stands: a failed rewrite of the
    /// labels file is logged and the stale row goes with the next successful save.
    pub fn remove_current_track(&mut self) -> Result<TrackKey> {
        let key = self.current_track().ok_or(LabelError::NoCurrentTrack)?.key.clone();
        let dir = track_dir(&self.root, &key);
        fs::remove_dir_all(&dir).map_err(|source| LabelError::RemoveTrack { path: dir.clone(), source })?;
        info!("Deleted track directory: {:?}", dir);

        self.tracks.remove(self.current);
        if self.current >= self.tracks.len() {
            self.current = self.tracks.len().saturating_sub(1);
        }
        self.show_current();

        if self.labels.remove(&key).is_some() {
            if let Err(e) = save_labels(&self.output_csv, &self.labels) {
                error!("Removed {} but could not rewrite {:?}: {}", key, self.output_csv, e);
            }
        }
        Ok(key)
    }

    // --- image selection ---

    /// Flips the selection of an image of the current track, returning the new state.
    pub fn toggle_selection(&mut self, path: &Path) -> bool {
        if self.selected.remove(path) {
            false
        } else {
            self.selected.insert(path.to_path_buf());
            true
        }
    }

    pub fn is_selected(&self, path: &Path) -> bool {
        self.selected.contains(path)
    }

    pub fn selected_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.selected.iter()
    }

    /// Deletes the selected image files of the current track. Files that
    /// cannot be removed stay in the track. Returns the deleted paths.
    pub fn delete_selected_images(&mut self) -> Vec<PathBuf> {
        let Some(track) = self.tracks.get_mut(self.current) else {
            return Vec::new();
        };
        let mut deleted = Vec::new();
        for path in std::mem::take(&mut self.selected) {
            match fs::remove_file(&path) {
                Ok(()) => {
                    info!("Deleted file: {:?}", path);
                    track.image_paths.retain(|p| p != &path);
                    deleted.push(path);
                }
                Err(e) => {
                    error!("Error deleting file {:?}: {}", path, e);
                }
            }
        }
        if track.image_paths.is_empty() {
            warn!("Track {} has no images left", track.key);
        }
        deleted
    }

    // --- overview ---

    pub fn status_of(&self, index: usize) -> TrackStatus {
        TrackStatus::of(self.tracks.get(index).and_then(|t| self.labels.get(&t.key)))
    }

    pub fn statuses(&self) -> Vec<TrackStatus> {
        (0..self.tracks.len()).map(|i| self.status_of(i)).collect()
    }

    pub fn distribution(&self) -> DistributionSummary {
        summarize(&self.labels, self.tracks.iter().map(|t| &t.key))
    }
}
