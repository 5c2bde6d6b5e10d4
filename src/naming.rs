//! Destination file naming
//!
//! Two schemes are supported:
//! - `original`: keep the file name; a custom name replaces the stem
//! - `dated`: `{yymmdd}-{name}-{h|v}.{ext}` where `name` is a custom name or
//!   a running 8-digit sequence number
//!
//! Companion files (RAW sibling, sidecars) always receive the primary's new
//! stem so they stay paired after the move.

use crate::category::validate_segment;
use crate::config::NamingScheme;
use crate::error::{Error, Result};
use crate::metadata::{self, Orientation};
use crate::queue::ImageItem;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Sequence numbers embedded in dated names: `240115-00000042-h.jpg`
const SEQUENCE_PATTERN: &str = r"-(\d{8})-";

/// Names chosen for one item, not yet committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedNames {
    /// File name for the primary image
    pub primary: String,
    /// `(source, file name)` for every companion file
    pub companions: Vec<(PathBuf, String)>,
    /// Sequence number consumed by this plan
    sequence: Option<u64>,
    /// Custom name consumed by this plan
    custom: Option<String>,
}

/// Chooses destination names and tracks sequence and custom-name counters
#[derive(Debug, Clone)]
pub struct Namer {
    scheme: NamingScheme,
    next_sequence: u64,
    name_counts: HashMap<String, u32>,
}

impl Namer {
    pub fn new(scheme: NamingScheme) -> Self {
        Self {
            scheme,
            next_sequence: 1,
            name_counts: HashMap::new(),
        }
    }

    /// Create a namer whose sequence continues after the highest number
    /// already present under `output_dir`
    pub fn for_output(scheme: NamingScheme, output_dir: &Path) -> Result<Self> {
        let mut namer = Self::new(scheme);
        if scheme == NamingScheme::Dated && output_dir.exists() {
            namer.next_sequence = max_sequence_in(output_dir)? + 1;
            info!(next_sequence = namer.next_sequence, "Initialized sequence counter");
        }
        Ok(namer)
    }

    pub fn scheme(&self) -> NamingScheme {
        self.scheme
    }

    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Check a custom name before it is attached to an item
    pub fn validate_custom_name(name: &str) -> Result<()> {
        validate_segment(name).map_err(|reason| Error::InvalidName {
            name: name.to_string(),
            reason,
        })
    }

    /// Work out the destination names for an item without consuming counters
    pub fn plan(&self, item: &ImageItem) -> Result<PlannedNames> {
        let custom = item
            .custom_name
            .as_deref()
            .map(|name| {
                Self::validate_custom_name(name)?;
                let count = self.name_counts.get(name).copied().unwrap_or(0) + 1;
                Ok::<_, Error>(if count == 1 {
                    name.to_string()
                } else {
                    format!("{}-{}", name, count)
                })
            })
            .transpose()?;

        let (stem, lowercase_ext, sequence) = match self.scheme {
            NamingScheme::Original => match &custom {
                Some(custom) => (custom.clone(), false, None),
                None => {
                    return Ok(PlannedNames {
                        primary: item.file_name(),
                        companions: item
                            .companions()
                            .map(|p| (p.clone(), file_name_of(p)))
                            .collect(),
                        sequence: None,
                        custom: None,
                    });
                }
            },
            NamingScheme::Dated => {
                let taken = metadata::extract_time(&item.path)?;
                let date_part = taken.timestamp.format("%y%m%d");
                let (name_part, sequence) = match &custom {
                    Some(custom) => (custom.clone(), None),
                    None => (format!("{:08}", self.next_sequence), Some(self.next_sequence)),
                };
                let stem = format!("{}-{}-{}", date_part, name_part, orientation_char(item));
                (stem, true, sequence)
            }
        };

        let old_stem = item.stem();
        let rename = |path: &Path| {
            let mut suffix = companion_suffix(path, &old_stem);
            if lowercase_ext {
                suffix = suffix.to_lowercase();
            }
            format!("{}{}", stem, suffix)
        };

        Ok(PlannedNames {
            primary: rename(&item.path),
            companions: item.companions().map(|p| (p.clone(), rename(p))).collect(),
            sequence,
            custom: item.custom_name.clone(),
        })
    }

    /// Consume the counters used by a committed plan
    pub fn confirm(&mut self, planned: &PlannedNames) {
        if let Some(sequence) = planned.sequence {
            self.next_sequence = self.next_sequence.max(sequence + 1);
        }
        if let Some(custom) = &planned.custom {
            *self.name_counts.entry(custom.clone()).or_insert(0) += 1;
        }
    }
}

/// `h` for landscape, `v` for portrait, after orientation and rotation
fn orientation_char(item: &ImageItem) -> char {
    let Some((width, height)) = metadata::stored_dimensions(&item.path) else {
        return 'h';
    };
    let exif_orientation = metadata::read_exif_summary(&item.path)
        .ok()
        .and_then(|s| s.orientation)
        .unwrap_or(Orientation::NORMAL);
    let effective = exif_orientation.rotated(item.rotation);
    let (width, height) = if effective.rotation.swaps_dimensions() {
        (height, width)
    } else {
        (width, height)
    };
    if width >= height { 'h' } else { 'v' }
}

/// Everything after the shared stem: `.CR2`, `.CR2.xmp`, `.xmp`
fn companion_suffix(path: &Path, stem: &str) -> String {
    let name = file_name_of(path);
    match name.strip_prefix(stem) {
        Some(rest) if rest.starts_with('.') => rest.to_string(),
        _ => path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default(),
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Highest sequence number found in file names under `dir`
pub fn max_sequence_in(dir: &Path) -> Result<u64> {
    let pattern = Regex::new(SEQUENCE_PATTERN)?;
    let mut max = 0;
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        for capture in pattern.captures_iter(&name) {
            if let Ok(number) = capture[1].parse::<u64>() {
                max = max.max(number);
            }
        }
    }
    debug!(dir = %dir.display(), max, "Scanned existing sequence numbers");
    Ok(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Rotation;
    use crate::metadata::rewrite::fixtures::{jpeg, tiff_block};
    use std::fs;

    #[test]
    fn test_original_keeps_names() {
        let namer = Namer::new(NamingScheme::Original);
        let item = ImageItem::new("in/photo1.jpg")
            .with_raw("in/photo1.CR2")
            .with_sidecar("in/photo1.CR2.xmp");

        let planned = namer.plan(&item).unwrap();
        assert_eq!(planned.primary, "photo1.jpg");
        let names: Vec<_> = planned.companions.iter().map(|(_, n)| n.as_str()).collect();
        assert_eq!(names, ["photo1.CR2", "photo1.CR2.xmp"]);
    }

    #[test]
    fn test_custom_name_replaces_stem_and_counts() {
        let mut namer = Namer::new(NamingScheme::Original);
        let mut item = ImageItem::new("in/IMG_1.jpg").with_raw("in/IMG_1.NEF");
        item.custom_name = Some("beach".into());

        let first = namer.plan(&item).unwrap();
        assert_eq!(first.primary, "beach.jpg");
        assert_eq!(first.companions[0].1, "beach.NEF");

        // Planning alone does not consume the name
        assert_eq!(namer.plan(&item).unwrap().primary, "beach.jpg");

        namer.confirm(&first);
        assert_eq!(namer.plan(&item).unwrap().primary, "beach-2.jpg");
    }

    #[test]
    fn test_invalid_custom_name() {
        let namer = Namer::new(NamingScheme::Original);
        let mut item = ImageItem::new("in/a.jpg");
        item.custom_name = Some("../escape".into());
        assert!(matches!(namer.plan(&item), Err(Error::InvalidName { .. })));
        assert!(Namer::validate_custom_name("ok name").is_ok());
        assert!(Namer::validate_custom_name("").is_err());
    }

    #[test]
    fn test_dated_scheme_uses_exif_date_and_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("IMG_9.JPG");
        fs::write(&path, jpeg(false, Some(tiff_block(None)))).unwrap();
        let item = ImageItem::new(&path).with_sidecar(dir.path().join("IMG_9.XMP"));

        let mut namer = Namer::new(NamingScheme::Dated);
        let planned = namer.plan(&item).unwrap();
        assert_eq!(planned.primary, "240115-00000001-h.jpg");
        assert_eq!(planned.companions[0].1, "240115-00000001-h.xmp");

        namer.confirm(&planned);
        assert_eq!(namer.next_sequence(), 2);
        assert_eq!(namer.plan(&item).unwrap().primary, "240115-00000002-h.jpg");
    }

    #[test]
    fn test_dated_scheme_portrait_after_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        image::RgbImage::new(6, 3).save(&path).unwrap();

        let mut item = ImageItem::new(&path);
        let namer = Namer::new(NamingScheme::Dated);
        assert!(namer.plan(&item).unwrap().primary.ends_with("-00000001-h.png"));

        item.rotation = Rotation::Clockwise90;
        assert!(namer.plan(&item).unwrap().primary.ends_with("-00000001-v.png"));
    }

    #[test]
    fn test_sequence_continues_from_output() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("animals").join("birds");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("240101-00000041-h.jpg"), b"x").unwrap();
        fs::write(dir.path().join("240101-00000007-v.jpg"), b"x").unwrap();
        fs::write(dir.path().join("holiday-2024-.jpg"), b"x").unwrap();

        assert_eq!(max_sequence_in(dir.path()).unwrap(), 41);
        let namer = Namer::for_output(NamingScheme::Dated, dir.path()).unwrap();
        assert_eq!(namer.next_sequence(), 42);

        let original = Namer::for_output(NamingScheme::Original, dir.path()).unwrap();
        assert_eq!(original.next_sequence(), 1);
    }
}
