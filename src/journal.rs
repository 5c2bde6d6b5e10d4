//! Commit journal
//!
//! A JSON record of every committed item, written after each commit so a
//! session can be reviewed or undone by hand later. The file is replaced
//! atomically (temp file + rename).

use crate::error::{Error, Result};
use crate::metadata::Rotation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A companion file moved together with the primary image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanionMove {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Record of one committed item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Original path of the primary image
    pub source: PathBuf,

    /// Final path of the primary image
    pub destination: PathBuf,

    /// Category label as configured (`animals/birds`)
    pub category: String,

    /// Rotation written on commit
    pub rotation: Rotation,

    /// RAW sibling and sidecars
    #[serde(default)]
    pub companions: Vec<CompanionMove>,

    pub committed_at: DateTime<Utc>,
}

/// Commit history for an output directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    /// Version for journal file format compatibility
    version: u32,

    entries: Vec<JournalEntry>,

    /// Last save timestamp
    last_saved: Option<DateTime<Utc>>,

    #[serde(skip)]
    path: PathBuf,
}

impl Journal {
    /// Current journal file format version
    const VERSION: u32 = 1;

    /// Create an empty journal that will be saved at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            version: Self::VERSION,
            entries: Vec::new(),
            last_saved: None,
            path: path.into(),
        }
    }

    /// Load the journal at `path`, or start an empty one
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(?path, "Journal does not exist, starting new journal");
            return Ok(Self::new(path));
        }

        let file = File::open(path)
            .map_err(|e| Error::Journal(format!("Failed to open journal: {}", e)))?;
        let reader = BufReader::new(file);

        let mut journal: Self = serde_json::from_reader(reader)
            .map_err(|e| Error::Journal(format!("Failed to parse journal: {}", e)))?;

        if journal.version != Self::VERSION {
            warn!(
                journal_version = journal.version,
                current_version = Self::VERSION,
                "Journal version mismatch, starting fresh"
            );
            return Ok(Self::new(path));
        }

        journal.path = path.to_path_buf();
        info!(entries = journal.entries.len(), path = %path.display(), "Loaded journal");
        Ok(journal)
    }

    /// Write the journal to disk
    pub fn save(&mut self) -> Result<()> {
        self.last_saved = Some(Utc::now());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to a temporary file first, then rename for atomicity
        let temp_path = self.path.with_extension("tmp");

        let file = File::create(&temp_path)
            .map_err(|e| Error::Journal(format!("Failed to create temp journal: {}", e)))?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| Error::Journal(format!("Failed to write journal: {}", e)))?;

        fs::rename(&temp_path, &self.path)
            .map_err(|e| Error::Journal(format!("Failed to rename temp journal: {}", e)))?;

        debug!(entries = self.entries.len(), "Saved journal");
        Ok(())
    }

    /// Append an entry and save
    pub fn record(&mut self, entry: JournalEntry) -> Result<()> {
        self.entries.push(entry);
        self.save()
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> JournalEntry {
        JournalEntry {
            source: PathBuf::from("in").join(name),
            destination: PathBuf::from("out/animals/birds").join(name),
            category: "animals/birds".to_string(),
            rotation: Rotation::Clockwise90,
            companions: vec![CompanionMove {
                source: PathBuf::from("in/photo1.CR2"),
                destination: PathBuf::from("out/animals/birds/photo1.CR2"),
            }],
            committed_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_journal() {
        let journal = Journal::new("j.json");
        assert!(journal.is_empty());
        assert_eq!(journal.version, Journal::VERSION);
        assert!(journal.last_saved().is_none());
    }

    #[test]
    fn test_record_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join(".journal.json");

        let mut journal = Journal::open(&path).unwrap();
        journal.record(entry("photo1.jpg")).unwrap();
        journal.record(entry("photo2.jpg")).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());

        let loaded = Journal::open(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.entries()[0], journal.entries()[0]);
        assert_eq!(loaded.entries()[1].rotation, Rotation::Clockwise90);
        assert!(loaded.last_saved().is_some());
    }

    #[test]
    fn test_version_mismatch_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.json");
        fs::write(&path, r#"{"version": 99, "entries": [], "last_saved": null}"#).unwrap();

        let journal = Journal::open(&path).unwrap();
        assert!(journal.is_empty());
        assert_eq!(journal.version, Journal::VERSION);
    }

    #[test]
    fn test_corrupt_journal_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(Journal::open(&path), Err(Error::Journal(_))));
    }
}
