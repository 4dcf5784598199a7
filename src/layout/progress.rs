//! Progress bar geometry: one segment per track, colored by label status.

use crate::types::label::{Label, SKIP_AGE};

/// Vertical inset of the segments inside the bar.
pub const BAR_INSET: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackStatus {
    Unlabeled,
    Labeled,
    Skipped,
}

impl TrackStatus {
    /// Status from the stored age alone: `-1` is skipped, any other number is
    /// labeled, and no entry or an age that is not a number is unlabeled.
    pub fn of(label: Option<&Label>) -> Self {
        match label.and_then(Label::age_value) {
            None => TrackStatus::Unlabeled,
            Some(age) if age == SKIP_AGE => TrackStatus::Skipped,
            Some(_) => TrackStatus::Labeled,
        }
    }

    /// Fill color as RGB.
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            TrackStatus::Unlabeled => [0, 0, 0],
            TrackStatus::Labeled => [0, 128, 0],
            TrackStatus::Skipped => [255, 255, 0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub status: TrackStatus,
    pub is_current: bool,
}

impl Segment {
    /// Bounds are inclusive on every side.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
    }
}

/// Splits a `width` x `height` bar into one segment per status.
pub fn layout_segments(
    width: f32,
    height: f32,
    statuses: &[TrackStatus],
    current: Option<usize>,
) -> Vec<Segment> {
    if statuses.is_empty() {
        return Vec::new();
    }
    let n = statuses.len() as f32;
    let y1 = BAR_INSET;
    let y2 = y1 + (height - 2.0 * BAR_INSET).max(1.0);

    statuses
        .iter()
        .enumerate()
        .map(|(i, &status)| Segment {
            index: i,
            x1: (i as f32 * width / n).floor(),
            y1,
            x2: ((i + 1) as f32 * width / n).floor(),
            y2,
            status,
            is_current: current == Some(i),
        })
        .collect()
}

/// Track under a point; the first matching segment wins on shared edges.
pub fn hit_test(segments: &[Segment], x: f32, y: f32) -> Option<usize> {
    segments.iter().find(|s| s.contains(x, y)).map(|s| s.index)
}
