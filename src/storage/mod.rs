pub mod labels_csv;

pub use labels_csv::{ensure_label_file, load_labels, save_labels};
