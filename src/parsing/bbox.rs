use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Crop box encoded in an image file name, in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// Pixel rectangle inside an image, ready for `image::imageops::crop_imm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropBox {
    /// Rounds the box to whole pixels and clamps it to a `width` x `height`
    /// image. Returns `None` when nothing of the box is left.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<PixelRect> {
        let coords = [self.left, self.top, self.right, self.bottom];
        if coords.iter().any(|c| !c.is_finite()) {
            return None;
        }
        let clamp = |v: f32, max: u32| v.round().clamp(0.0, max as f32) as u32;
        let x0 = clamp(self.left, width);
        let y0 = clamp(self.top, height);
        let x1 = clamp(self.right, width);
        let y1 = clamp(self.bottom, height);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(PixelRect { x: x0, y: y0, width: x1 - x0, height: y1 - y0 })
    }
}

fn bbox_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // At least two leading tokens, then four box tokens; the last one loses its extension.
    RE.get_or_init(|| {
        Regex::new(
            r"^.*_.*_(?P<left>[^_]+)_(?P<top>[^_]+)_(?P<right>[^_]+)_(?P<bottom>[^_]+?)(?:\.[^._]*)?$",
        )
        .expect("crop box pattern is valid")
    })
}

/// Reads `..._<left>_<top>_<right>_<bottom>.<ext>` from a file name.
///
/// The name must split on `_` into at least six tokens and the last four must
/// parse as numbers, otherwise there is no box and the image is shown whole.
pub fn parse_bbox_from_file_name(file_name: &str) -> Option<CropBox> {
    let caps = bbox_regex().captures(file_name)?;
    let num = |name: &str| caps.name(name)?.as_str().parse::<f32>().ok();
    Some(CropBox {
        left: num("left")?,
        top: num("top")?,
        right: num("right")?,
        bottom: num("bottom")?,
    })
}

pub fn parse_bbox_from_path(path: &Path) -> Option<CropBox> {
    path.file_name().and_then(|n| n.to_str()).and_then(parse_bbox_from_file_name)
}
