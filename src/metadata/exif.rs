//! EXIF reading for images under review

use crate::error::{Error, Result};
use crate::metadata::orientation::Orientation;
use chrono::NaiveDateTime;
use exif::{Exif, In, Reader, Tag};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::trace;

/// EXIF tags to try for date extraction, in priority order
const DATE_TAGS: &[Tag] = &[
    Tag::DateTimeOriginal,    // When the original image was taken
    Tag::DateTimeDigitized,   // When the image was digitized
    Tag::DateTime,            // File modification date/time
];

/// The EXIF fields shown while reviewing and used for naming
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExifSummary {
    pub orientation: Option<Orientation>,
    pub taken: Option<NaiveDateTime>,
    pub camera: Option<String>,
    /// Pixel dimensions as stored, before orientation is applied
    pub dimensions: Option<(u32, u32)>,
}

/// Parse the EXIF block of a file
fn read_exif(path: &Path) -> Result<Exif> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| Error::ExifRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Read the summary fields from a file's EXIF data
pub fn read_exif_summary(path: &Path) -> Result<ExifSummary> {
    let exif = read_exif(path)?;

    let orientation = exif
        .get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        .and_then(Orientation::from_exif);

    let camera = {
        let make = ascii_field(&exif, Tag::Make);
        let model = ascii_field(&exif, Tag::Model);
        match (make, model) {
            (Some(make), Some(model)) if model.starts_with(&make) => Some(model),
            (Some(make), Some(model)) => Some(format!("{} {}", make, model)),
            (make, model) => make.or(model),
        }
    };

    let width = exif
        .get_field(Tag::PixelXDimension, In::PRIMARY)
        .or_else(|| exif.get_field(Tag::ImageWidth, In::PRIMARY))
        .and_then(|f| f.value.get_uint(0));
    let height = exif
        .get_field(Tag::PixelYDimension, In::PRIMARY)
        .or_else(|| exif.get_field(Tag::ImageLength, In::PRIMARY))
        .and_then(|f| f.value.get_uint(0));

    Ok(ExifSummary {
        orientation,
        taken: date_from_exif(&exif),
        camera,
        dimensions: width.zip(height),
    })
}

/// Extract creation time from EXIF metadata
pub fn extract_exif_time(path: &Path) -> Result<NaiveDateTime> {
    let exif = read_exif(path)?;

    date_from_exif(&exif).ok_or_else(|| Error::ExifRead {
        path: path.to_path_buf(),
        message: "No valid date tag found in EXIF data".to_string(),
    })
}

fn date_from_exif(exif: &Exif) -> Option<NaiveDateTime> {
    for tag in DATE_TAGS {
        if let Some(field) = exif.get_field(*tag, In::PRIMARY)
            && let Some(datetime) = parse_exif_datetime(&field.display_value().to_string())
        {
            trace!(?tag, "Found EXIF date");
            return Some(datetime);
        }
    }
    None
}

fn ascii_field(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        exif::Value::Ascii(parts) => parts
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).trim_end_matches('\0').trim().to_string())
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// Parse EXIF datetime string format: "YYYY:MM:DD HH:MM:SS"
pub(crate) fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    // EXIF format: "2024:01:15 14:30:00" or with quotes
    let s = s.trim().trim_matches('"');

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S") {
        return Some(dt);
    }

    // With subseconds
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S%.f") {
        return Some(dt);
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
    ];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    None
}
