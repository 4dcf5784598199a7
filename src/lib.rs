// Declare all modules that are part of this library
pub mod config;
pub mod error;
pub mod types {
    pub mod label;
    pub mod track;
}
pub mod parsing;
pub mod discovery;
pub mod imaging;
pub mod storage;
pub mod validation;
pub mod layout;
pub mod stats;
pub mod clipboard;
pub mod session;

pub use error::{LabelError, Result};
pub use session::{Advance, FormState, LabelingSession};
pub use types::label::{Gender, Label, LabelMap};
pub use types::track::{Track, TrackKey};
