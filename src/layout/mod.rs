pub mod grid;
pub mod progress;

pub use grid::{column_count, layout_grid, GridLayout};
pub use progress::{layout_segments, Segment, TrackStatus};
