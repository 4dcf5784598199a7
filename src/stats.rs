use serde::Serialize;
use std::collections::BTreeMap;

use crate::layout::progress::TrackStatus;
use crate::types::label::{Gender, Label, LabelMap};
use crate::types::track::TrackKey;
use crate::validation::is_valid_age;

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct GenderCounts {
    pub male: usize,
    pub female: usize,
    pub unset: usize,
}

/// Summary of the labels collected so far.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct DistributionSummary {
    pub total_tracks: usize,
    pub labeled: usize,
    pub skipped: usize,
    pub unlabeled: usize,
    pub genders: GenderCounts,
    /// Whole-year bins (`floor(age)`) to number of tracks, genuine ages only.
    pub age_histogram: BTreeMap<u32, usize>,
    pub mean_age: Option<f64>,
}

impl DistributionSummary {
    pub fn has_ages(&self) -> bool {
        !self.age_histogram.is_empty()
    }
}

/// Progress counts cover the tracks in `tracks` only, using the same status
/// as the progress bar. Gender and age figures cover every typed label in the
/// file, including tracks that are no longer on disk.
pub fn summarize<'a>(labels: &LabelMap, tracks: impl IntoIterator<Item = &'a TrackKey>) -> DistributionSummary {
    let mut summary = DistributionSummary::default();
    for key in tracks {
        summary.total_tracks += 1;
        match TrackStatus::of(labels.get(key)) {
            TrackStatus::Labeled => summary.labeled += 1,
            TrackStatus::Skipped => summary.skipped += 1,
            TrackStatus::Unlabeled => summary.unlabeled += 1,
        }
    }

    let mut age_sum = 0.0f64;
    let mut age_count = 0usize;
    for label in labels.values() {
        let Label::Labeled { gender, age } = label else {
            continue;
        };
        match gender {
            Gender::Male => summary.genders.male += 1,
            Gender::Female => summary.genders.female += 1,
            Gender::Unset => summary.genders.unset += 1,
        }
        if is_valid_age(*age) {
            *summary.age_histogram.entry(age.floor() as u32).or_insert(0) += 1;
            age_sum += age;
            age_count += 1;
        }
    }

    if age_count > 0 {
        summary.mean_age = Some(age_sum / age_count as f64);
    }
    summary
}
