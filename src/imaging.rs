//! Decoding of track images for display.

use image::DynamicImage;
use log::warn;
use std::path::{Path, PathBuf};

use crate::error::{LabelError, Result};
use crate::parsing::bbox::parse_bbox_from_path;

/// An image ready to upload as a texture.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub path: PathBuf,
    /// Size after cropping, before any downscaling. Used for layout.
    pub display_size: (u32, u32),
    /// Size of `rgba`.
    pub pixel_size: (u32, u32),
    pub rgba: Vec<u8>,
}

/// Crops `img` to the box in its file name, if there is a usable one.
pub fn crop_to_file_name_box(img: DynamicImage, path: &Path) -> DynamicImage {
    let Some(bbox) = parse_bbox_from_path(path) else {
        return img;
    };
    match bbox.clamp_to(img.width(), img.height()) {
        Some(r) => img.crop_imm(r.x, r.y, r.width, r.height),
        None => {
            warn!("Crop box {:?} does not fit {:?} ({}x{}), showing whole image", bbox, path, img.width(), img.height());
            img
        }
    }
}

/// Shrinks `img` so neither side exceeds `max_side`. Smaller images are untouched.
pub fn limit_size(img: DynamicImage, max_side: u32) -> DynamicImage {
    if max_side == 0 || (img.width() <= max_side && img.height() <= max_side) {
        return img;
    }
    img.thumbnail(max_side, max_side)
}

pub fn decode_image(img: DynamicImage, path: &Path, max_side: u32) -> DecodedImage {
    let cropped = crop_to_file_name_box(img, path);
    let display_size = (cropped.width(), cropped.height());
    let rgba = limit_size(cropped, max_side).to_rgba8();
    DecodedImage {
        path: path.to_path_buf(),
        display_size,
        pixel_size: rgba.dimensions(),
        rgba: rgba.into_raw(),
    }
}

pub fn load_track_image(path: &Path, max_side: u32) -> Result<DecodedImage> {
    let img = image::open(path).map_err(|source| LabelError::Image { path: path.to_path_buf(), source })?;
    Ok(decode_image(img, path, max_side))
}

/// Loads every image of a track, logging and skipping the ones that fail.
pub fn load_track_images(paths: &[PathBuf], max_side: u32) -> Vec<DecodedImage> {
    paths
        .iter()
        .filter_map(|p| match load_track_image(p, max_side) {
            Ok(img) => Some(img),
            Err(e) => {
                warn!("Could not open {:?}: {}", p, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::fs;
    use tempfile::TempDir;

    fn write_png(path: &Path, w: u32, h: u32) {
        RgbImage::from_pixel(w, h, Rgb([200, 10, 10])).save(path).unwrap();
    }

    #[test]
    fn crops_by_file_name() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("frame_0001_10_20_50_100.png");
        write_png(&path, 200, 200);
        let img = load_track_image(&path, 512).unwrap();
        assert_eq!(img.display_size, (40, 80));
        assert_eq!(img.rgba.len(), 40 * 80 * 4);
    }

    #[test]
    fn unparseable_name_keeps_full_image() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("person.png");
        write_png(&path, 30, 60);
        assert_eq!(load_track_image(&path, 512).unwrap().display_size, (30, 60));
    }

    #[test]
    fn box_outside_image_keeps_full_image() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a_b_500_500_600_600.png");
        write_png(&path, 30, 60);
        assert_eq!(load_track_image(&path, 512).unwrap().display_size, (30, 60));
    }

    #[test]
    fn large_images_are_downscaled_for_upload_only() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("big.png");
        write_png(&path, 400, 200);
        let img = load_track_image(&path, 100).unwrap();
        assert_eq!(img.display_size, (400, 200));
        assert_eq!(img.pixel_size, (100, 50));
    }

    #[test]
    fn corrupt_images_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let good = tmp.path().join("good.png");
        let bad = tmp.path().join("bad.png");
        write_png(&good, 8, 8);
        fs::write(&bad, b"not a png").unwrap();
        let loaded = load_track_images(&[bad, good.clone()], 512);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].path, good);
    }
}
