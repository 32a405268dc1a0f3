//! Image store adapter.
//!
//! Every pixel-format concern of the pipeline lives here: probing a file for
//! its encoding, color type and dimensions, deciding whether it is a valid
//! corpus member, and producing fixed-size center crops.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::{imageops, ColorType, DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use thiserror::Error;

/// The single encoding/color-mode pair accepted as a valid corpus image.
pub const ACCEPTED_FORMAT: ImageFormat = ImageFormat::Jpeg;
pub const ACCEPTED_COLOR: ColorType = ColorType::Rgb8;

/// Errors that can occur while reading or writing image files.
#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to decode image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to save image {path:?}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Crop window must be non-zero")]
    EmptyWindow,
}

/// Shape of an image relative to its own axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
}

/// What a header-only probe reveals about an image file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Container format guessed from the file contents, not its extension.
    pub format: Option<ImageFormat>,
    pub color: ColorType,
}

impl ImageInfo {
    /// True when the file is encoded with the accepted format and color type.
    pub fn is_accepted(&self) -> bool {
        self.format == Some(ACCEPTED_FORMAT) && self.color == ACCEPTED_COLOR
    }

    pub fn orientation(&self) -> Orientation {
        match self.width.cmp(&self.height) {
            std::cmp::Ordering::Greater => Orientation::Landscape,
            std::cmp::Ordering::Less => Orientation::Portrait,
            std::cmp::Ordering::Equal => Orientation::Square,
        }
    }
}

/// Open `path` and read its header without decoding pixel data.
pub fn probe(path: &Path) -> Result<ImageInfo, ImageStoreError> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|source| ImageStoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let format = reader.format();
    let decoder = reader
        .into_decoder()
        .map_err(|source| ImageStoreError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    let (width, height) = decoder.dimensions();

    Ok(ImageInfo {
        width,
        height,
        format,
        color: decoder.color_type(),
    })
}

/// Decode the full image at `path`.
pub fn open(path: &Path) -> Result<DynamicImage, ImageStoreError> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|source| ImageStoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    reader.decode().map_err(|source| ImageStoreError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Top-left corner of a `window`-sized square centered on a `width` x `height`
/// image. Half-pixel offsets round to the nearest even value, and offsets are
/// negative when the window is larger than the image.
pub fn center_crop_origin(width: u32, height: u32, window: u32) -> (i64, i64) {
    (
        half_round_even(width as i64 - window as i64),
        half_round_even(height as i64 - window as i64),
    )
}

fn half_round_even(value: i64) -> i64 {
    let floor = value.div_euclid(2);
    if value.rem_euclid(2) == 1 && floor.rem_euclid(2) == 1 {
        floor + 1
    } else {
        floor
    }
}

/// Crop a `window` x `window` square centered on `img`.
///
/// The result always has exactly the window size. Where the window extends
/// past the source, the uncovered area is black.
pub fn center_crop(img: &DynamicImage, window: u32) -> Result<DynamicImage, ImageStoreError> {
    if window == 0 {
        return Err(ImageStoreError::EmptyWindow);
    }
    let (width, height) = (img.width(), img.height());
    let (left, top) = center_crop_origin(width, height, window);

    let fits = left >= 0
        && top >= 0
        && left + window as i64 <= width as i64
        && top + window as i64 <= height as i64;
    if fits {
        return Ok(img.crop_imm(left as u32, top as u32, window, window));
    }

    let mut canvas = DynamicImage::new(window, window, img.color());
    imageops::replace(&mut canvas, img, -left, -top);
    Ok(canvas)
}

/// Center-crop the image at `src` and save the crop at `dst`.
///
/// The output format follows the extension of `dst`. Returns the source
/// dimensions.
pub fn crop_to_file(src: &Path, dst: &Path, window: u32) -> Result<(u32, u32), ImageStoreError> {
    let img = open(src)?;
    let cropped = center_crop(&img, window)?;

    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(|source| ImageStoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    cropped.save(dst).map_err(|source| ImageStoreError::Save {
        path: dst.to_path_buf(),
        source,
    })?;

    Ok((img.width(), img.height()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_rgb_jpeg(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 100, 50]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_probe_accepts_rgb_jpeg() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.jpg");
        write_rgb_jpeg(&path, 30, 20);

        let info = probe(&path).unwrap();
        assert_eq!(info.width, 30);
        assert_eq!(info.height, 20);
        assert_eq!(info.format, Some(ImageFormat::Jpeg));
        assert!(info.is_accepted());
        assert_eq!(info.orientation(), Orientation::Landscape);
    }

    #[test]
    fn test_probe_rejects_png_disguised_as_jpg() {
        let dir = TempDir::new().unwrap();
        let png = dir.path().join("real.png");
        RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 255]))
            .save(&png)
            .unwrap();
        let disguised = dir.path().join("disguised.jpg");
        fs::copy(&png, &disguised).unwrap();

        let info = probe(&disguised).unwrap();
        assert_eq!(info.format, Some(ImageFormat::Png));
        assert!(!info.is_accepted());
    }

    #[test]
    fn test_probe_rejects_grayscale_jpeg() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gray.jpg");
        image::GrayImage::from_pixel(10, 12, image::Luma([90]))
            .save(&path)
            .unwrap();

        let info = probe(&path).unwrap();
        assert_eq!(info.format, Some(ImageFormat::Jpeg));
        assert_eq!(info.color, ColorType::L8);
        assert!(!info.is_accepted());
        assert_eq!(info.orientation(), Orientation::Portrait);
    }

    #[test]
    fn test_probe_garbage_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.jpg");
        fs::write(&path, b"definitely not an image").unwrap();

        assert!(probe(&path).is_err());
    }

    #[test]
    fn test_probe_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = probe(&dir.path().join("nope.jpg")).unwrap_err();
        assert!(matches!(err, ImageStoreError::Io { .. }));
    }

    #[test]
    fn test_center_crop_origin() {
        assert_eq!(center_crop_origin(300, 400, 264), (18, 68));
        assert_eq!(center_crop_origin(265, 265, 264), (0, 0));
        assert_eq!(center_crop_origin(40, 30, 50), (-5, -10));
        assert_eq!(center_crop_origin(41, 30, 50), (-4, -10));
    }

    #[test]
    fn test_center_crop_origin_rounds_half_to_even() {
        // 39 / 2 = 19.5 -> 20, 37 / 2 = 18.5 -> 18
        assert_eq!(center_crop_origin(303, 301, 264), (20, 18));
        // -9 / 2 = -4.5 -> -4, -11 / 2 = -5.5 -> -6
        assert_eq!(center_crop_origin(41, 39, 50), (-4, -6));
    }

    #[test]
    fn test_center_crop_within_bounds_takes_middle() {
        let mut img = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));
        img.put_pixel(4, 4, Rgb([255, 255, 255]));
        let img = DynamicImage::ImageRgb8(img);

        let cropped = center_crop(&img, 2).unwrap();
        assert_eq!(cropped.dimensions(), (2, 2));
        assert_eq!(cropped.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(cropped.get_pixel(1, 1), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_center_crop_larger_window_pads_black() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Rgb([255, 0, 0])));

        let cropped = center_crop(&img, 50).unwrap();
        assert_eq!(cropped.dimensions(), (50, 50));
        assert_eq!(cropped.color(), ColorType::Rgb8);
        // origin is (-5, -10): source covers x in 5..45, y in 10..40
        assert_eq!(cropped.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(cropped.get_pixel(5, 10), Rgba([255, 0, 0, 255]));
        assert_eq!(cropped.get_pixel(44, 39), Rgba([255, 0, 0, 255]));
        assert_eq!(cropped.get_pixel(45, 40), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_center_crop_zero_window_rejected() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        assert!(matches!(
            center_crop(&img, 0),
            Err(ImageStoreError::EmptyWindow)
        ));
    }

    #[test]
    fn test_crop_to_file_writes_window_sized_jpeg() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src.jpg");
        write_rgb_jpeg(&src, 300, 280);
        let dst = dir.path().join("out").join("nested").join("dst.jpg");

        let dims = crop_to_file(&src, &dst, 264).unwrap();
        assert_eq!(dims, (300, 280));

        let info = probe(&dst).unwrap();
        assert_eq!((info.width, info.height), (264, 264));
        assert!(info.is_accepted());
    }
}
