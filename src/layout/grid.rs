//! Reflowable thumbnail grid. Pure arithmetic over image sizes, recomputed
//! whenever the container width or the set of images changes.

/// Space left under the last row.
pub const BOTTOM_MARGIN: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CellRect {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    /// Position of the image in the input slice.
    pub index: usize,
    pub row: usize,
    pub col: usize,
    pub rect: CellRect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub cell_width: f32,
    pub cells: Vec<GridCell>,
    pub row_heights: Vec<f32>,
    pub total_height: f32,
}

/// `floor(width / min_cell_width)`, never less than one.
pub fn column_count(width: f32, min_cell_width: f32) -> usize {
    if !(min_cell_width > 0.0) || !(width > 0.0) {
        return 1;
    }
    ((width / min_cell_width).floor() as usize).max(1)
}

/// Height of an image of `size` scaled to `cell_width`, keeping its aspect ratio.
/// A zero height counts as a square image.
pub fn scaled_height(size: (u32, u32), cell_width: f32) -> f32 {
    let (w, h) = size;
    let ratio = if h == 0 { 1.0 } else { w as f32 / h as f32 };
    if ratio <= 0.0 {
        return cell_width;
    }
    (cell_width / ratio).floor()
}

/// Places images left-to-right, top-to-bottom in `width`.
///
/// Every image takes the full cell width; a row is as tall as its tallest
/// scaled image.
pub fn layout_grid(width: f32, min_cell_width: f32, sizes: &[(u32, u32)]) -> GridLayout {
    let columns = column_count(width, min_cell_width);
    let cell_width = (width.max(0.0) / columns as f32).floor();

    let row_heights: Vec<f32> = sizes
        .chunks(columns)
        .map(|row| {
            row.iter()
                .map(|&size| scaled_height(size, cell_width))
                .fold(0.0, f32::max)
        })
        .collect();

    let mut cells = Vec::with_capacity(sizes.len());
    let mut y = 0.0;
    for (row, (chunk, row_height)) in sizes.chunks(columns).zip(&row_heights).enumerate() {
        for (col, &size) in chunk.iter().enumerate() {
            cells.push(GridCell {
                index: row * columns + col,
                row,
                col,
                rect: CellRect {
                    x: col as f32 * cell_width,
                    y,
                    width: cell_width,
                    height: scaled_height(size, cell_width),
                },
            });
        }
        y += row_height;
    }

    GridLayout {
        columns,
        cell_width,
        cells,
        total_height: row_heights.iter().sum::<f32>() + BOTTOM_MARGIN,
        row_heights,
    }
}

impl GridLayout {
    /// Index of the image drawn under a point relative to the grid's top-left corner.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<usize> {
        self.cells.iter().find(|c| c.rect.contains(x, y)).map(|c| c.index)
    }
}
