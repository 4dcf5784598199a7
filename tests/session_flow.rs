use image::{Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use track_labeler_gui::layout::progress::TrackStatus;
use track_labeler_gui::storage::labels_csv::load_labels;
use track_labeler_gui::validation::SaveGate;
use track_labeler_gui::{Advance, Gender, Label, LabelError, LabelingSession, TrackKey};

fn write_png(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbImage::from_pixel(20, 40, Rgb([10, 20, 30])).save(path).unwrap();
}

/// cam1/{1,2}, cam2/{7}, plus noise that must not become tracks.
fn build_tree(root: &Path) {
    write_png(&root.join("cam1/1/f_0001_0_0_10_20.png"));
    write_png(&root.join("cam1/1/f_0002_0_0_10_20.png"));
    write_png(&root.join("cam1/2/a.png"));
    write_png(&root.join("cam2/7/b.png"));
    fs::create_dir_all(root.join("cam2/8")).unwrap();
    fs::write(root.join("cam2/8/notes.txt"), "no images").unwrap();
    fs::write(root.join("README"), "top level file").unwrap();
}

fn open(tmp: &TempDir) -> (PathBuf, PathBuf, LabelingSession) {
    let root = tmp.path().join("data");
    build_tree(&root);
    let csv = tmp.path().join("labels.csv");
    let session = LabelingSession::open(&root, &csv).unwrap();
    (root, csv, session)
}

/// Like `open`, with a labels file already holding `rows` (no header).
fn open_with_rows(tmp: &TempDir, rows: &str) -> (PathBuf, PathBuf, LabelingSession) {
    let root = tmp.path().join("data");
    build_tree(&root);
    let csv = tmp.path().join("labels.csv");
    fs::write(&csv, format!("camera_id,track_id,gender,age\n{}", rows)).unwrap();
    let session = LabelingSession::open(&root, &csv).unwrap();
    (root, csv, session)
}

#[test]
fn opening_scans_tracks_and_creates_label_file() {
    let tmp = TempDir::new().unwrap();
    let (_root, csv, session) = open(&tmp);

    let keys: Vec<String> = session.tracks().iter().map(|t| t.key.to_string()).collect();
    assert_eq!(keys, vec!["cam1/1", "cam1/2", "cam2/7"]);
    assert_eq!(session.current_index(), Some(0));
    assert_eq!(session.title(), "Camera: cam1 | Track: 1   [1/3]");
    assert_eq!(fs::read_to_string(&csv).unwrap().trim(), "camera_id,track_id,gender,age");
}

#[test]
fn save_then_reload_reproduces_label() {
    let tmp = TempDir::new().unwrap();
    let (root, csv, mut session) = open(&tmp);

    session.set_gender(Gender::Female);
    session.set_age_text("42");
    assert_eq!(session.save_gate(), SaveGate::Enabled);
    assert_eq!(session.save_and_next().unwrap(), Advance::Moved);
    assert_eq!(session.current_index(), Some(1));
    assert_eq!(session.form().age_text, "");

    let reopened = LabelingSession::open(&root, &csv).unwrap();
    assert_eq!(
        reopened.label_for(&TrackKey::new("cam1", "1")),
        Some(&Label::Labeled { gender: Gender::Female, age: 42.0 })
    );
    assert_eq!(reopened.form().gender, Gender::Female);
    assert_eq!(reopened.form().age_text, "42");
}

#[test]
fn skip_ignores_chosen_gender() {
    let tmp = TempDir::new().unwrap();
    let (_root, csv, mut session) = open(&tmp);

    session.set_gender(Gender::Male);
    session.set_age_text("30");
    session.skip_track().unwrap();

    let labels = load_labels(&csv).unwrap();
    assert_eq!(labels[&TrackKey::new("cam1", "1")], Label::Skipped);
    let text = fs::read_to_string(&csv).unwrap();
    assert!(text.lines().any(|l| l == "cam1,1,,-1"));
    assert_eq!(session.status_of(0), TrackStatus::Skipped);
}

#[test]
fn last_track_stays_current_after_save() {
    let tmp = TempDir::new().unwrap();
    let (_root, _csv, mut session) = open(&tmp);

    session.go_to(3).unwrap();
    session.set_gender(Gender::Male);
    session.set_age_text("25");
    assert_eq!(session.save_and_next().unwrap(), Advance::ReachedEnd);
    assert_eq!(session.current_index(), Some(2));
    assert_eq!(session.form().age_text, "25");
    assert_eq!(session.status_of(2), TrackStatus::Labeled);
}

#[test]
fn navigation_errors_leave_state_alone() {
    let tmp = TempDir::new().unwrap();
    let (_root, _csv, mut session) = open(&tmp);

    assert!(matches!(session.previous(), Err(LabelError::NoPreviousTrack)));
    assert!(matches!(
        session.go_to(4),
        Err(LabelError::TrackIndexOutOfRange { index: 4, len: 3 })
    ));
    assert!(session.go_to(0).is_err());
    assert_eq!(session.current_index(), Some(0));

    session.go_to(2).unwrap();
    session.previous().unwrap();
    assert_eq!(session.current_index(), Some(0));
}

#[test]
fn removing_track_deletes_directory_and_label() {
    let tmp = TempDir::new().unwrap();
    let (root, csv, mut session) = open(&tmp);

    session.jump_to(1).unwrap();
    session.set_gender(Gender::Male);
    session.set_age_text("60");
    session.save_and_next().unwrap();
    session.jump_to(1).unwrap();

    let removed = session.remove_current_track().unwrap();
    assert_eq!(removed, TrackKey::new("cam1", "2"));
    assert!(!root.join("cam1/2").exists());
    assert_eq!(session.len(), 2);
    assert_eq!(session.current_index(), Some(1));
    assert!(!load_labels(&csv).unwrap().contains_key(&removed));

    // Removing the last track moves back to the new last one.
    let removed = session.remove_current_track().unwrap();
    assert_eq!(removed, TrackKey::new("cam2", "7"));
    assert_eq!(session.current_index(), Some(0));
}

#[test]
fn failed_removal_changes_nothing() {
    let tmp = TempDir::new().unwrap();
    let (root, _csv, mut session) = open(&tmp);

    fs::remove_dir_all(root.join("cam1/1")).unwrap();
    assert!(matches!(session.remove_current_track(), Err(LabelError::RemoveTrack { .. })));
    assert_eq!(session.len(), 3);
    assert_eq!(session.current_index(), Some(0));
}

#[test]
fn removal_stands_when_label_file_cannot_be_rewritten() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("data");
    build_tree(&root);
    let out_dir = tmp.path().join("out");
    fs::create_dir_all(&out_dir).unwrap();
    let csv = out_dir.join("labels.csv");
    let mut session = LabelingSession::open(&root, &csv).unwrap();
    session.skip_track().unwrap();
    session.jump_to(0).unwrap();

    fs::remove_dir_all(&out_dir).unwrap();
    let removed = session.remove_current_track().unwrap();
    assert_eq!(removed, TrackKey::new("cam1", "1"));
    assert!(!root.join("cam1/1").exists());
    assert_eq!(session.len(), 2);
    assert_eq!(session.label_for(&removed), None);
}

#[test]
fn removing_every_track_leaves_empty_session() {
    let tmp = TempDir::new().unwrap();
    let (_root, _csv, mut session) = open(&tmp);

    for _ in 0..3 {
        session.remove_current_track().unwrap();
    }
    assert!(session.is_empty());
    assert_eq!(session.current_index(), None);
    assert_eq!(session.title(), "No Tracks Found");
    assert!(matches!(session.skip_track(), Err(LabelError::NoCurrentTrack)));
}

#[test]
fn selection_resets_on_track_change_and_deletes_files() {
    let tmp = TempDir::new().unwrap();
    let (_root, _csv, mut session) = open(&tmp);

    let first = session.current_track().unwrap().image_paths[0].clone();
    assert!(session.toggle_selection(&first));
    assert!(session.is_selected(&first));
    assert!(!session.toggle_selection(&first));
    assert!(session.toggle_selection(&first));

    session.go_to(2).unwrap();
    assert!(!session.is_selected(&first));
    session.go_to(1).unwrap();

    session.toggle_selection(&first);
    let deleted = session.delete_selected_images();
    assert_eq!(deleted, vec![first.clone()]);
    assert!(!first.exists());
    assert_eq!(session.current_track().unwrap().image_paths.len(), 1);
    assert_eq!(session.selected_paths().count(), 0);
}

#[test]
fn distribution_counts_progress() {
    let tmp = TempDir::new().unwrap();
    let (_root, _csv, mut session) = open(&tmp);

    session.set_gender(Gender::Male);
    session.set_age_text("30");
    session.save_and_next().unwrap();
    session.skip_track().unwrap();

    let summary = session.distribution();
    assert_eq!(summary.labeled, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.unlabeled, 1);
    assert_eq!(summary.genders.male, 1);
    assert_eq!(
        session.statuses(),
        vec![TrackStatus::Labeled, TrackStatus::Skipped, TrackStatus::Unlabeled]
    );
}

#[test]
fn labels_for_tracks_not_on_disk_are_not_progress() {
    let tmp = TempDir::new().unwrap();
    let (_root, _csv, session) = open_with_rows(&tmp, "old,1,male,30\nold,2,female,40\nold,3,,-1\n");

    let summary = session.distribution();
    assert_eq!(summary.total_tracks, 3);
    assert_eq!((summary.labeled, summary.skipped, summary.unlabeled), (0, 0, 3));
    assert_eq!(session.statuses(), vec![TrackStatus::Unlabeled; 3]);
}

#[test]
fn reopened_session_shows_preloaded_statuses() {
    let tmp = TempDir::new().unwrap();
    let (_root, _csv, mut session) = open_with_rows(
        &tmp,
        "cam1,1,female,33\ncam1,2,male,-1\ncam2,7,male,thirty\n",
    );

    assert_eq!(
        session.statuses(),
        vec![TrackStatus::Labeled, TrackStatus::Skipped, TrackStatus::Unlabeled]
    );
    let summary = session.distribution();
    assert_eq!((summary.labeled, summary.skipped, summary.unlabeled), (1, 1, 1));
    assert_eq!(session.form().gender, Gender::Female);
    assert_eq!(session.form().age_text, "33");

    session.jump_to(1).unwrap();
    assert_eq!(session.form().gender, Gender::Male);
    assert_eq!(session.form().age_text, "-1");

    session.jump_to(2).unwrap();
    assert_eq!(session.form().age_text, "thirty");
    assert_eq!(session.save_gate(), SaveGate::Disabled);
}

#[test]
fn unrecognised_rows_survive_an_unrelated_save() {
    let tmp = TempDir::new().unwrap();
    let (root, csv, mut session) = open_with_rows(
        &tmp,
        "cam2,7,male,thirty\nold,8,other,40\ncam1,2,male,-1\n",
    );

    session.set_gender(Gender::Male);
    session.set_age_text("20");
    session.save_and_next().unwrap();

    let text = fs::read_to_string(&csv).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "camera_id,track_id,gender,age",
            "cam1,1,male,20",
            "cam1,2,male,-1",
            "cam2,7,male,thirty",
            "old,8,other,40",
        ]
    );

    let reopened = LabelingSession::open(&root, &csv).unwrap();
    assert_eq!(
        reopened.label_for(&TrackKey::new("old", "8")),
        Some(&Label::Raw { gender: "other".into(), age: "40".into() })
    );
}
