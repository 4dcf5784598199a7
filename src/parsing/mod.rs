pub mod bbox;

// Re-export the file name parser for convenience
pub use bbox::{parse_bbox_from_file_name, parse_bbox_from_path, CropBox, PixelRect};
