//! Categorization router
//!
//! Resolves a keypress to a category and commits the item there: the
//! primary image, its RAW sibling and sidecars are moved into
//! `<output>/<category>/`, with any pending rotation written on the way.

use crate::category::{CategoryPath, CategoryRegistry};
use crate::config::{Config, ConflictPolicy};
use crate::error::{Error, Result};
use crate::journal::{CompanionMove, Journal, JournalEntry};
use crate::key::Key;
use crate::metadata::Rotation;
use crate::naming::{Namer, PlannedNames};
use crate::queue::ImageItem;
use crate::transfer::{self, MoveStep};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A completed (or, in dry run, planned) categorization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub companions: Vec<CompanionMove>,
    pub category: CategoryPath,
    pub rotation: Rotation,
    /// Nothing was moved
    pub dry_run: bool,
}

/// Routes items to category folders
#[derive(Debug)]
pub struct Router {
    registry: CategoryRegistry,
    output_dir: PathBuf,
    namer: Namer,
    conflict: ConflictPolicy,
    dry_run: bool,
    journal: Option<Journal>,
}

impl Router {
    /// Build a router for `config` around an already loaded registry
    pub fn new(registry: CategoryRegistry, config: &Config) -> Result<Self> {
        let namer = Namer::for_output(config.naming, &config.output_dir)?;

        let journal = if config.journal && !config.dry_run {
            Some(Journal::open(&config.get_journal_file())?)
        } else {
            None
        };

        Ok(Self {
            registry,
            output_dir: config.output_dir.clone(),
            namer,
            conflict: config.conflict,
            dry_run: config.dry_run,
            journal,
        })
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn journal(&self) -> Option<&Journal> {
        self.journal.as_ref()
    }

    /// Category folder for a category path
    pub fn category_dir(&self, category: &CategoryPath) -> PathBuf {
        self.output_dir.join(category.to_relative_path())
    }

    /// Compute where `item` would go for `key` without touching anything
    pub fn preview(&self, item: &ImageItem, key: Key) -> Result<Commit> {
        self.prepare(item, key).map(|(commit, _)| commit)
    }

    fn prepare(&self, item: &ImageItem, key: Key) -> Result<(Commit, PlannedNames)> {
        let category = self
            .registry
            .resolve(key)
            .ok_or(Error::UnresolvedKey(key))?
            .clone();

        let names = self.namer.plan(item)?;
        let dir = self.category_dir(&category);
        let stem = Path::new(&names.primary)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut all_names = Vec::with_capacity(names.companions.len() + 1);
        all_names.push(names.primary.clone());
        all_names.extend(names.companions.iter().map(|(_, name)| name.clone()));

        let mut destinations =
            transfer::resolve_destinations(&dir, &stem, &all_names, self.conflict)?.into_iter();
        let destination = destinations.next().unwrap_or_else(|| dir.join(&names.primary));

        let companions = names
            .companions
            .iter()
            .zip(destinations)
            .map(|((source, _), destination)| CompanionMove {
                source: source.clone(),
                destination,
            })
            .collect();

        let commit = Commit {
            source: item.path.clone(),
            destination,
            companions,
            category,
            rotation: item.rotation,
            dry_run: self.dry_run,
        };
        Ok((commit, names))
    }

    /// Route `item` by `key`.
    ///
    /// An unmapped key fails with [`Error::UnresolvedKey`] before anything
    /// is touched. Any other failure leaves every source file in place.
    pub fn route(&mut self, item: &ImageItem, key: Key) -> Result<Commit> {
        let (commit, names) = self.prepare(item, key)?;

        if self.dry_run {
            info!(
                source = %commit.source.display(),
                dest = %commit.destination.display(),
                companions = commit.companions.len(),
                rotation = %commit.rotation,
                "Dry run, nothing moved"
            );
            self.namer.confirm(&names);
            return Ok(commit);
        }

        let mut steps = Vec::with_capacity(commit.companions.len() + 1);
        steps.push(MoveStep::new(&commit.source, &commit.destination).rotated(commit.rotation));
        steps.extend(
            commit
                .companions
                .iter()
                .map(|c| MoveStep::new(&c.source, &c.destination)),
        );

        transfer::move_all(&steps)?;
        self.namer.confirm(&names);

        info!(
            source = %commit.source.display(),
            dest = %commit.destination.display(),
            category = %commit.category,
            companions = commit.companions.len(),
            rotation = %commit.rotation,
            "Committed"
        );

        if let Some(journal) = self.journal.as_mut() {
            let entry = JournalEntry {
                source: commit.source.clone(),
                destination: commit.destination.clone(),
                category: commit.category.to_string(),
                rotation: commit.rotation,
                companions: commit.companions.clone(),
                committed_at: chrono::Utc::now(),
            };
            // The files are already in place; a journal failure must not
            // turn the commit into a failure
            if let Err(e) = journal.record(entry) {
                warn!(error = %e, "Failed to update journal");
            }
        }

        Ok(commit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CategoryEntry, NamingScheme};
    use crate::metadata::{read_exif_summary, rewrite::fixtures::{jpeg, tiff_block}};
    use std::fs;
    use tempfile::TempDir;

    fn setup(configure: impl FnOnce(&mut Config)) -> (TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config {
            input_dir: dir.path().join("in"),
            output_dir: dir.path().join("out"),
            categories: vec![
                CategoryEntry::new(Key::Char('a'), "animals/birds"),
                CategoryEntry::new(Key::Char('l'), "landscape"),
            ],
            ..Config::default()
        };
        configure(&mut config);
        fs::create_dir_all(&config.input_dir).unwrap();

        let registry = CategoryRegistry::from_config(&config).unwrap();
        let router = Router::new(registry, &config).unwrap();
        (dir, router)
    }

    fn photo(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join("in").join(name);
        fs::write(&path, jpeg(true, Some(tiff_block(Some(1))))).unwrap();
        path
    }

    #[test]
    fn test_route_to_nested_category() {
        let (dir, mut router) = setup(|_| {});
        let source = photo(&dir, "photo1.jpg");

        let commit = router.route(&ImageItem::new(&source), Key::Char('a')).unwrap();

        let expected = dir.path().join("out").join("animals").join("birds").join("photo1.jpg");
        assert_eq!(commit.destination, expected);
        assert!(expected.exists());
        assert!(!source.exists());
        assert_eq!(router.journal().map(Journal::len), Some(1));
    }

    #[test]
    fn test_unresolved_key_has_no_side_effects() {
        let (dir, mut router) = setup(|_| {});
        let source = photo(&dir, "photo1.jpg");

        let err = router.route(&ImageItem::new(&source), Key::Char('z')).unwrap_err();

        assert!(err.is_unresolved_key());
        assert!(source.exists());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_raw_sibling_moves_with_image() {
        let (dir, mut router) = setup(|_| {});
        let source = photo(&dir, "IMG_1.jpg");
        let raw = dir.path().join("in").join("IMG_1.CR2");
        let xmp = dir.path().join("in").join("IMG_1.xmp");
        fs::write(&raw, b"raw bytes").unwrap();
        fs::write(&xmp, b"<xmp/>").unwrap();

        let item = ImageItem::new(&source).with_raw(&raw).with_sidecar(&xmp);
        let commit = router.route(&item, Key::Char('l')).unwrap();

        let out = dir.path().join("out").join("landscape");
        assert_eq!(commit.companions.len(), 2);
        assert_eq!(fs::read(out.join("IMG_1.CR2")).unwrap(), b"raw bytes");
        assert!(out.join("IMG_1.xmp").exists());
        assert!(!raw.exists());
        assert!(!xmp.exists());
    }

    #[test]
    fn test_existing_destination_fails_and_keeps_source() {
        let (dir, mut router) = setup(|_| {});
        let source = photo(&dir, "photo1.jpg");
        let out = dir.path().join("out").join("landscape");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("photo1.jpg"), b"existing").unwrap();

        let err = router.route(&ImageItem::new(&source), Key::Char('l')).unwrap_err();

        assert!(matches!(err, Error::DestinationExists { .. }));
        assert!(err.is_recoverable());
        assert!(source.exists());
        assert_eq!(fs::read(out.join("photo1.jpg")).unwrap(), b"existing");
    }

    #[test]
    fn test_suffix_policy_renames_group() {
        let (dir, mut router) = setup(|c| c.conflict = ConflictPolicy::Suffix);
        let source = photo(&dir, "photo1.jpg");
        let raw = dir.path().join("in").join("photo1.NEF");
        fs::write(&raw, b"raw").unwrap();
        let out = dir.path().join("out").join("landscape");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("photo1.jpg"), b"existing").unwrap();

        let commit = router
            .route(&ImageItem::new(&source).with_raw(&raw), Key::Char('l'))
            .unwrap();

        assert_eq!(commit.destination, out.join("photo1_1.jpg"));
        assert_eq!(commit.companions[0].destination, out.join("photo1_1.NEF"));
    }

    #[test]
    fn test_file_in_place_of_category_folder() {
        let (dir, mut router) = setup(|_| {});
        let source = photo(&dir, "photo1.jpg");
        fs::create_dir_all(dir.path().join("out")).unwrap();
        fs::write(dir.path().join("out").join("animals"), b"file").unwrap();

        let err = router.route(&ImageItem::new(&source), Key::Char('a')).unwrap_err();

        assert!(matches!(err, Error::NotADirectory { .. }));
        assert!(source.exists());
    }

    #[test]
    fn test_rotation_applied_on_commit() {
        let (dir, mut router) = setup(|_| {});
        let source = photo(&dir, "photo1.jpg");
        let before = read_exif_summary(&source).unwrap();

        let mut item = ImageItem::new(&source);
        item.rotation = Rotation::Clockwise90;
        let commit = router.route(&item, Key::Char('l')).unwrap();

        let after = read_exif_summary(&commit.destination).unwrap();
        assert_eq!(after.orientation.map(|o| o.to_exif()), Some(6));
        assert_eq!(after.camera, before.camera);
        assert_eq!(after.taken, before.taken);
    }

    #[test]
    fn test_trash_key() {
        let (dir, mut router) = setup(|_| {});
        let source = photo(&dir, "blurry.jpg");

        let commit = router.route(&ImageItem::new(&source), Key::Delete).unwrap();
        assert_eq!(commit.destination, dir.path().join("out").join("deleted").join("blurry.jpg"));
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let (dir, mut router) = setup(|c| {
            c.dry_run = true;
            c.naming = NamingScheme::Dated;
        });
        let source = photo(&dir, "photo1.jpg");

        let first = router.route(&ImageItem::new(&source), Key::Char('a')).unwrap();
        let second = router.route(&ImageItem::new(&source), Key::Char('a')).unwrap();

        assert!(first.dry_run);
        assert!(source.exists());
        assert!(!dir.path().join("out").exists());
        assert!(router.journal().is_none());
        assert_ne!(first.destination, second.destination);
    }
}
