//! File queue
//!
//! Scans the input directory once and yields the images to review in file
//! name order. RAW files and sidecars that share a base name with an image
//! travel with it instead of being reviewed on their own.

use crate::config::Config;
use crate::error::Result;
use crate::metadata::Rotation;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// An image under review together with its companion files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageItem {
    /// The image shown and routed
    pub path: PathBuf,
    /// RAW file sharing the base name, moved alongside
    pub raw_sibling: Option<PathBuf>,
    /// Sidecar files (`.xmp`, `.thm`) moved alongside
    pub sidecars: Vec<PathBuf>,
    /// Rotation to apply when the item is committed
    pub rotation: Rotation,
    /// Name replacing the file stem on commit
    pub custom_name: Option<String>,
}

impl ImageItem {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            raw_sibling: None,
            sidecars: Vec::new(),
            rotation: Rotation::None,
            custom_name: None,
        }
    }

    pub fn with_raw(mut self, raw: impl Into<PathBuf>) -> Self {
        self.raw_sibling = Some(raw.into());
        self
    }

    pub fn with_sidecar(mut self, sidecar: impl Into<PathBuf>) -> Self {
        self.sidecars.push(sidecar.into());
        self
    }

    /// File name of the primary image
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Base name shared by the image and its companions
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// RAW sibling first, then sidecars
    pub fn companions(&self) -> impl Iterator<Item = &PathBuf> {
        self.raw_sibling.iter().chain(self.sidecars.iter())
    }

    /// Drop review state (rotation, custom name)
    pub fn reset(&mut self) {
        self.rotation = Rotation::None;
        self.custom_name = None;
    }
}

/// Files sharing one base name
#[derive(Debug, Default)]
struct StemGroup {
    images: Vec<PathBuf>,
    raws: Vec<PathBuf>,
    sidecars: Vec<PathBuf>,
}

/// Finite, restartable sequence of images to review
#[derive(Debug, Clone, Default)]
pub struct FileQueue {
    items: Vec<ImageItem>,
    position: usize,
}

impl FileQueue {
    /// Scan the configured input directory
    pub fn scan(config: &Config) -> Result<Self> {
        Self::scan_dir(&config.input_dir, config)
    }

    /// Scan a directory (not recursive) and pair companions.
    ///
    /// The listing is taken once; later file system changes are not seen.
    pub fn scan_dir(dir: &Path, config: &Config) -> Result<Self> {
        let mut groups: BTreeMap<String, StemGroup> = BTreeMap::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.into_path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                debug!(?path, "Skipping file with non UTF-8 name");
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();

            if config.is_image(ext) {
                groups.entry(stem).or_default().images.push(path);
            } else if config.is_raw(ext) {
                groups.entry(stem).or_default().raws.push(path);
            } else if config.is_sidecar(ext) {
                groups
                    .entry(sidecar_stem(&stem, config))
                    .or_default()
                    .sidecars
                    .push(path);
            } else {
                debug!(?path, "Skipping unsupported file");
            }
        }

        let mut items = Vec::new();
        for (_, group) in groups {
            let StemGroup {
                images,
                raws,
                sidecars,
            } = group;

            if images.is_empty() && raws.is_empty() {
                debug!(?sidecars, "Sidecars without an image are left in place");
                continue;
            }

            let mut raws_iter = raws.into_iter();
            let mut primaries: Vec<ImageItem> = if images.is_empty() {
                // RAW files without a processed partner are reviewed directly
                raws_iter.by_ref().map(ImageItem::new).collect()
            } else {
                let mut paired: Vec<ImageItem> = images.into_iter().map(ImageItem::new).collect();
                paired[0].raw_sibling = raws_iter.next();
                // Any further RAW files of the same stem are reviewed alone
                paired.extend(raws_iter.map(ImageItem::new));
                paired
            };
            primaries[0].sidecars = sidecars;
            items.extend(primaries);
        }

        items.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

        info!(
            input_dir = %dir.display(),
            items = items.len(),
            with_raw = items.iter().filter(|i| i.raw_sibling.is_some()).count(),
            "Scanned input directory"
        );

        Ok(Self::from_items(items))
    }

    /// Build a queue from already known items
    pub fn from_items(items: Vec<ImageItem>) -> Self {
        Self { items, position: 0 }
    }

    /// Rewind to the first item
    pub fn restart(&mut self) {
        self.position = 0;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The scanned snapshot
    pub fn items(&self) -> &[ImageItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<ImageItem> {
        self.items
    }
}

impl Iterator for FileQueue {
    type Item = ImageItem;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.items.get(self.position).cloned()?;
        self.position += 1;
        Some(item)
    }
}

/// `IMG_1.CR2.xmp` belongs to `IMG_1` just like `IMG_1.xmp`
fn sidecar_stem(stem: &str, config: &Config) -> String {
    let inner = Path::new(stem);
    match (inner.extension().and_then(|e| e.to_str()), inner.file_stem()) {
        (Some(ext), Some(base)) if config.is_image(ext) || config.is_raw(ext) => {
            base.to_string_lossy().into_owned()
        }
        _ => stem.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"x").unwrap();
        }
    }

    fn names(queue: &FileQueue) -> Vec<String> {
        queue.items().iter().map(|i| i.file_name()).collect()
    }

    #[test]
    fn test_scan_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["c.png", "a.jpg", "b.JPEG", "notes.txt", ".hidden.jpg", "noext"]);
        fs::create_dir(dir.path().join("sub.jpg")).unwrap();

        let queue = FileQueue::scan_dir(dir.path(), &Config::default()).unwrap();
        assert_eq!(names(&queue), ["a.jpg", "b.JPEG", "c.png"]);
    }

    #[test]
    fn test_raw_pairs_with_image() {
        let dir = tempfile::tempdir().unwrap();
        touch(
            dir.path(),
            &["IMG_1.jpg", "IMG_1.CR2", "IMG_1.xmp", "IMG_2.NEF", "IMG_2.NEF.xmp", "IMG_3.jpg"],
        );

        let queue = FileQueue::scan_dir(dir.path(), &Config::default()).unwrap();
        assert_eq!(names(&queue), ["IMG_1.jpg", "IMG_2.NEF", "IMG_3.jpg"]);

        let first = &queue.items()[0];
        assert_eq!(first.raw_sibling, Some(dir.path().join("IMG_1.CR2")));
        assert_eq!(first.sidecars, vec![dir.path().join("IMG_1.xmp")]);

        let raw_only = &queue.items()[1];
        assert_eq!(raw_only.raw_sibling, None);
        assert_eq!(raw_only.sidecars, vec![dir.path().join("IMG_2.NEF.xmp")]);

        assert!(queue.items()[2].companions().next().is_none());
    }

    #[test]
    fn test_orphan_sidecar_ignored() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["lonely.xmp", "a.jpg"]);

        let queue = FileQueue::scan_dir(dir.path(), &Config::default()).unwrap();
        assert_eq!(names(&queue), ["a.jpg"]);
        assert!(queue.items()[0].sidecars.is_empty());
    }

    #[test]
    fn test_queue_is_finite_and_restartable() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["a.jpg", "b.jpg"]);

        let mut queue = FileQueue::scan_dir(dir.path(), &Config::default()).unwrap();
        assert_eq!(queue.next().map(|i| i.file_name()).as_deref(), Some("a.jpg"));
        assert_eq!(queue.next().map(|i| i.file_name()).as_deref(), Some("b.jpg"));
        assert!(queue.next().is_none());

        queue.restart();
        assert_eq!(queue.next().map(|i| i.file_name()).as_deref(), Some("a.jpg"));
    }

    #[test]
    fn test_snapshot_ignores_later_changes() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["a.jpg"]);

        let mut queue = FileQueue::scan_dir(dir.path(), &Config::default()).unwrap();
        touch(dir.path(), &["b.jpg"]);
        assert_eq!(queue.by_ref().count(), 1);
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(FileQueue::scan_dir(&missing, &Config::default()).is_err());
    }
}
