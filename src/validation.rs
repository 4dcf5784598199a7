use crate::types::label::{Gender, SKIP_AGE};

/// Whether "Save & Next" may be pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveGate {
    Disabled,
    Enabled,
}

impl SaveGate {
    pub fn is_enabled(&self) -> bool {
        *self == SaveGate::Enabled
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgeInput {
    Empty,
    Invalid,
    Value(f64),
}

impl AgeInput {
    pub fn value(&self) -> Option<f64> {
        match self {
            AgeInput::Value(v) => Some(*v),
            _ => None,
        }
    }
}

pub fn parse_age_input(text: &str) -> AgeInput {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return AgeInput::Empty;
    }
    match trimmed.parse::<f64>() {
        Ok(v) => AgeInput::Value(v),
        Err(_) => AgeInput::Invalid,
    }
}

/// Keystroke filter for the age field: the proposed text must be empty, a
/// number, or the start of one (`-`, `.`, `-.`) so `-1` can be typed.
pub fn is_numeric_input(proposed: &str) -> bool {
    matches!(proposed, "" | "-" | "." | "-.") || proposed.parse::<f64>().is_ok()
}

/// A genuine age lies in (0, 101).
pub fn is_valid_age(age: f64) -> bool {
    age > 0.0 && age < 101.0
}

/// Enabled for the skip sentinel, or for a chosen gender with a valid age.
pub fn save_gate(gender: Gender, age_text: &str) -> SaveGate {
    match parse_age_input(age_text).value() {
        Some(age) if age == SKIP_AGE => SaveGate::Enabled,
        Some(age) if gender.is_chosen() && is_valid_age(age) => SaveGate::Enabled,
        _ => SaveGate::Disabled,
    }
}
