//! Image metadata module
//!
//! This module provides:
//! - EXIF summaries (orientation, capture time, camera, dimensions)
//! - Capture time extraction with a file system fallback
//! - Rotation of images without lossy re-encoding

pub mod exif;
pub mod orientation;
pub mod rewrite;

pub use self::exif::{ExifSummary, read_exif_summary};
pub use orientation::{Orientation, Rotation};

use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use image::ImageFormat;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Source of the extracted timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    /// Extracted from EXIF metadata
    Exif,
    /// From file system modification time
    FileSystem,
}

/// Result of timestamp extraction
#[derive(Debug, Clone)]
pub struct ExtractedTime {
    pub timestamp: NaiveDateTime,
    pub source: TimeSource,
}

/// Extract the capture time of an image.
///
/// EXIF DateTimeOriginal, DateTimeDigitized and DateTime are tried in that
/// order before falling back to the file modification time.
pub fn extract_time(path: &Path) -> Result<ExtractedTime> {
    if let Ok(time) = self::exif::extract_exif_time(path) {
        debug!(?path, "Extracted time from EXIF");
        return Ok(ExtractedTime {
            timestamp: time,
            source: TimeSource::Exif,
        });
    }

    let modified = fs::metadata(path)?.modified()?;
    let datetime: chrono::DateTime<chrono::Local> = modified.into();

    warn!(?path, "Using file system modification time as fallback");

    Ok(ExtractedTime {
        timestamp: datetime.naive_local(),
        source: TimeSource::FileSystem,
    })
}

/// Pixel dimensions as stored in the file.
///
/// Decodable formats are measured from their headers; RAW files fall back
/// to the EXIF dimension tags.
pub fn stored_dimensions(path: &Path) -> Option<(u32, u32)> {
    if let Ok(dimensions) = image::image_dimensions(path) {
        return Some(dimensions);
    }
    read_exif_summary(path).ok().and_then(|s| s.dimensions)
}

/// How a pending rotation is written for a given file type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationStrategy {
    /// Patch or insert the Orientation tag in the JPEG APP1 segment
    JpegExif,
    /// Patch or append the Orientation tag in a TIFF-based file
    TiffExif,
    /// Patch or insert the Orientation tag in the PNG `eXIf` chunk
    PngExif,
    /// Rotate pixels and re-encode in a lossless format
    LosslessReencode(ImageFormat),
    /// Rotation cannot be written without quality loss
    Unsupported,
}

impl RotationStrategy {
    /// Pick the strategy from a file extension
    pub fn for_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "jpg" | "jpeg" | "jpe" => RotationStrategy::JpegExif,
            "tif" | "tiff" | "dng" | "nef" | "nrw" | "cr2" | "arw" | "pef" | "orf" | "rw2"
            | "srw" => RotationStrategy::TiffExif,
            "png" => RotationStrategy::PngExif,
            "bmp" => RotationStrategy::LosslessReencode(ImageFormat::Bmp),
            _ => RotationStrategy::Unsupported,
        }
    }
}

/// Write `source` to `dest` with `rotation` applied on top of its current
/// orientation. `source` is only read.
pub fn write_rotated(source: &Path, dest: &Path, rotation: Rotation) -> Result<()> {
    let rotation_error = |message: String| Error::Rotation {
        path: source.to_path_buf(),
        message,
    };

    match RotationStrategy::for_path(source) {
        RotationStrategy::JpegExif => {
            let data = fs::read(source)?;
            let current = rewrite::jpeg_orientation(&data).map_err(rotation_error)?;
            let value = combined_orientation(source, current, rotation);
            let out = rewrite::set_jpeg_orientation(&data, value).map_err(rotation_error)?;
            fs::write(dest, out)?;
        }
        RotationStrategy::TiffExif => {
            let mut data = fs::read(source)?;
            let current = rewrite::tiff_orientation(&data).map_err(rotation_error)?;
            let value = combined_orientation(source, current, rotation);
            rewrite::set_tiff_orientation(&mut data, value).map_err(rotation_error)?;
            fs::write(dest, data)?;
        }
        RotationStrategy::PngExif => {
            let data = fs::read(source)?;
            let current = rewrite::png_orientation(&data).map_err(rotation_error)?;
            let value = combined_orientation(source, current, rotation);
            let out = rewrite::set_png_orientation(&data, value).map_err(rotation_error)?;
            fs::write(dest, out)?;
        }
        RotationStrategy::LosslessReencode(format) => {
            let img = image::open(source)?;
            let rotated = match rotation {
                Rotation::None => img,
                Rotation::Clockwise90 => img.rotate90(),
                Rotation::Half => img.rotate180(),
                Rotation::Clockwise270 => img.rotate270(),
            };
            rotated.save_with_format(dest, format)?;
        }
        RotationStrategy::Unsupported => {
            return Err(rotation_error(
                "this format cannot be rotated without re-encoding".to_string(),
            ));
        }
    }

    debug!(source = %source.display(), dest = %dest.display(), %rotation, "Rotation written");
    Ok(())
}

fn combined_orientation(path: &Path, current: Option<u16>, rotation: Rotation) -> u16 {
    let current = match current {
        Some(value) => Orientation::from_exif(u32::from(value)).unwrap_or_else(|| {
            warn!(?path, value, "Invalid EXIF orientation, treating as normal");
            Orientation::NORMAL
        }),
        None => Orientation::NORMAL,
    };
    current.rotated(rotation).to_exif()
}
