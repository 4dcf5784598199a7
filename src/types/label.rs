use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::track::TrackKey;

/// Age written to the labels file for a skipped track.
pub const SKIP_AGE: f64 = -1.0;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unset,
}

impl Gender {
    /// Value stored in the `gender` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unset => "",
        }
    }

    /// Anything other than `male` / `female` reads back as `Unset`.
    pub fn from_column(value: &str) -> Self {
        Gender::parse_column(value).unwrap_or_default()
    }

    /// Strict form of [`Gender::from_column`]: `None` for values the tool
    /// never writes itself.
    pub fn parse_column(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "" => Some(Gender::Unset),
            _ => None,
        }
    }

    pub fn is_chosen(&self) -> bool {
        *self != Gender::Unset
    }
}

/// Annotation stored for a track. A track without an entry is unlabeled.
#[derive(Debug, Clone, PartialEq)]
pub enum Label {
    Labeled { gender: Gender, age: f64 },
    Skipped,
    /// A row from the labels file that does not fit the variants above (an
    /// age that is not a number, a gender the tool does not know, a `-1` age
    /// with a gender). Kept as read and written back unchanged.
    Raw { gender: String, age: String },
}

impl Label {
    pub fn gender(&self) -> Gender {
        match self {
            Label::Labeled { gender, .. } => *gender,
            Label::Skipped => Gender::Unset,
            Label::Raw { gender, .. } => Gender::from_column(gender),
        }
    }

    /// Numeric age as persisted, `-1` for a skipped track, `None` for a raw
    /// row whose age is not a number.
    pub fn age_value(&self) -> Option<f64> {
        match self {
            Label::Labeled { age, .. } => Some(*age),
            Label::Skipped => Some(SKIP_AGE),
            Label::Raw { age, .. } => age.trim().parse().ok(),
        }
    }

    /// Text of the `gender` column.
    pub fn gender_text(&self) -> &str {
        match self {
            Label::Raw { gender, .. } => gender.as_str(),
            other => other.gender().as_str(),
        }
    }

    /// Decimal text of the age column (`35`, `35.5`, `-1`).
    pub fn age_text(&self) -> String {
        match self {
            Label::Labeled { age, .. } => format_age(*age),
            Label::Skipped => "-1".to_string(),
            Label::Raw { age, .. } => age.clone(),
        }
    }
}

pub fn format_age(age: f64) -> String {
    format!("{}", age)
}

/// Labels keyed by track, kept sorted so the rewritten file is stable.
pub type LabelMap = BTreeMap<TrackKey, Label>;
