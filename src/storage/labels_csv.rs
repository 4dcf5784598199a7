//! The labels file: `camera_id,track_id,gender,age`, one row per labeled or
//! skipped track. It is the single source of truth and is rewritten in full
//! after every change.

use log::{debug, warn};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::{LabelError, Result};
use crate::types::label::{Gender, Label, LabelMap, SKIP_AGE};
use crate::types::track::TrackKey;

pub const HEADER: [&str; 4] = ["camera_id", "track_id", "gender", "age"];

/// Reads the labels file. A missing or empty file gives an empty map.
///
/// Rows with fewer than four columns are ignored. Rows the typed labels
/// cannot represent are kept as [`Label::Raw`] so a rewrite does not lose
/// them. A later row for the same track replaces an earlier one.
pub fn load_labels(path: &Path) -> Result<LabelMap> {
    let mut labels = LabelMap::new();
    if !path.is_file() {
        return Ok(labels);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| LabelError::csv(path, e))?;

    for (row_idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| LabelError::csv(path, e))?;
        if record.len() < 4 {
            debug!("Row {} in {:?} has {} columns, ignored", row_idx + 2, path, record.len());
            continue;
        }
        let key = TrackKey::new(&record[0], &record[1]);
        let label = parse_row_label(&record[2], &record[3]);
        if let Label::Raw { gender, age } = &label {
            warn!(
                "Row {} in {:?}: gender '{}' / age '{}' for {} kept as is",
                row_idx + 2,
                path,
                gender,
                age,
                key
            );
        }
        labels.insert(key, label);
    }
    Ok(labels)
}

fn parse_row_label(gender: &str, age: &str) -> Label {
    let raw = || Label::Raw { gender: gender.to_string(), age: age.to_string() };
    let (Ok(value), Some(parsed_gender)) = (age.trim().parse::<f64>(), Gender::parse_column(gender)) else {
        return raw();
    };
    if value != SKIP_AGE {
        Label::Labeled { gender: parsed_gender, age: value }
    } else if parsed_gender.is_chosen() {
        raw()
    } else {
        Label::Skipped
    }
}

/// Creates the file with just the header row when it does not exist yet.
pub fn ensure_label_file(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    save_labels(path, &LabelMap::new())
}

/// Rewrites the whole file from `labels`.
///
/// Rows go to a temporary file next to `path` which then replaces it, so an
/// interrupted write leaves the previous file intact.
pub fn save_labels(path: &Path, labels: &LabelMap) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| LabelError::io(dir, e))?;

    {
        let mut writer = csv::Writer::from_writer(&mut tmp);
        writer.write_record(HEADER).map_err(|e| LabelError::csv(path, e))?;
        for (key, label) in labels {
            writer
                .write_record([
                    key.camera_id.as_str(),
                    key.track_id.as_str(),
                    label.gender_text(),
                    label.age_text().as_str(),
                ])
                .map_err(|e| LabelError::csv(path, e))?;
        }
        writer.flush().map_err(|e| LabelError::io(path, e))?;
    }

    tmp.as_file_mut().flush().map_err(|e| LabelError::io(path, e))?;
    tmp.persist(path).map_err(|e| LabelError::io(path, e.error))?;
    debug!("Wrote {} label rows to {:?}", labels.len(), path);
    Ok(())
}
