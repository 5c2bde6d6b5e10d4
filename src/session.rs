//! Session controller
//!
//! Owns everything a review session needs (configuration, registry, queue
//! snapshot, router) and turns keypresses into actions:
//!
//! ```text
//! Reviewing --key resolves--> commit --> Reviewing(next pending) | Done
//! Reviewing --key unresolved--> Reviewing(same item)
//! Reviewing --commit fails--> Reviewing(same item, error reported)
//! ```
//!
//! Control keys from `[keybinds]` are checked before category keys.

use crate::category::CategoryRegistry;
use crate::config::{Config, Control};
use crate::error::{Error, Result};
use crate::key::Key;
use crate::metadata::Rotation;
use crate::naming::Namer;
use crate::queue::{FileQueue, ImageItem};
use crate::router::{Commit, Router};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Review status of a queued item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    Pending,
    /// Moved to the given destination
    Committed(PathBuf),
}

/// An item in the session together with its status
#[derive(Debug, Clone)]
pub struct Entry {
    pub item: ImageItem,
    pub status: EntryStatus,
}

impl Entry {
    pub fn is_pending(&self) -> bool {
        self.status == EntryStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Reviewing,
    /// Every item has been committed
    Done,
}

/// Result of handling one key
#[derive(Debug)]
pub enum Outcome {
    /// The current item was moved
    Committed(Commit),
    /// The key is neither a control nor a category; nothing changed
    Unresolved(Key),
    /// The commit failed; the item stays current
    Failed(Error),
    /// The cursor moved to another pending item
    Navigated,
    /// Pending rotation of the current item changed
    Rotated(Rotation),
    /// The user asked to enter a custom name
    CustomNameRequested,
    HelpToggled(bool),
    Quit,
    /// Nothing to do (no current item)
    Ignored,
}

/// Running session statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Committed items per category label
    pub committed: BTreeMap<String, usize>,
    pub failures: usize,
    pub skipped: usize,
    pub unresolved: usize,
}

impl SessionStats {
    pub fn total_committed(&self) -> usize {
        self.committed.values().sum()
    }
}

/// A review session over one input directory
#[derive(Debug)]
pub struct Session {
    config: Config,
    router: Router,
    entries: Vec<Entry>,
    cursor: usize,
    state: SessionState,
    stats: SessionStats,
    show_help: bool,
}

impl Session {
    /// Validate `config`, build the registry and scan the input directory
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let queue = FileQueue::scan(&config)?;
        Self::with_queue(config, queue)
    }

    /// Start a session over an already scanned queue
    pub fn with_queue(config: Config, queue: FileQueue) -> Result<Self> {
        config.validate()?;
        let registry = CategoryRegistry::from_config(&config)?;
        let router = Router::new(registry, &config)?;

        let entries: Vec<Entry> = queue
            .into_items()
            .into_iter()
            .map(|item| Entry {
                item,
                status: EntryStatus::Pending,
            })
            .collect();

        let state = if entries.is_empty() {
            SessionState::Done
        } else {
            SessionState::Reviewing
        };

        info!(
            items = entries.len(),
            categories = router.registry().categories().len(),
            dry_run = config.dry_run,
            "Session started"
        );

        Ok(Self {
            config,
            router,
            entries,
            cursor: 0,
            state,
            stats: SessionStats::default(),
            show_help: false,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn registry(&self) -> &CategoryRegistry {
        self.router.registry()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Index of the current item, if reviewing
    pub fn cursor(&self) -> Option<usize> {
        (self.state == SessionState::Reviewing).then_some(self.cursor)
    }

    /// The item under review
    pub fn current(&self) -> Option<&ImageItem> {
        self.cursor().map(|i| &self.entries[i].item)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_pending()).count()
    }

    /// Handle one keypress
    pub fn handle_key(&mut self, key: Key) -> Outcome {
        if let Some(control) = self.config.keybinds.lookup(key) {
            return self.control(control);
        }
        if self.state == SessionState::Done {
            return Outcome::Ignored;
        }
        self.commit(key)
    }

    fn control(&mut self, control: Control) -> Outcome {
        match control {
            Control::Quit => Outcome::Quit,
            Control::Help => {
                self.show_help = !self.show_help;
                Outcome::HelpToggled(self.show_help)
            }
            _ if self.state == SessionState::Done => Outcome::Ignored,
            Control::Next => self.step(true),
            Control::Previous => self.step(false),
            Control::RotateClockwise => self.rotate(Rotation::rotate_clockwise),
            Control::RotateCounterClockwise => self.rotate(Rotation::rotate_counterclockwise),
            Control::CustomName => Outcome::CustomNameRequested,
        }
    }

    /// Route the current item with a category key
    pub fn commit(&mut self, key: Key) -> Outcome {
        let Some(index) = self.cursor() else {
            return Outcome::Ignored;
        };

        match self.router.route(&self.entries[index].item, key) {
            Ok(commit) => {
                *self
                    .stats
                    .committed
                    .entry(commit.category.to_string())
                    .or_insert(0) += 1;
                self.entries[index].status = EntryStatus::Committed(commit.destination.clone());
                self.advance_after_commit();
                Outcome::Committed(commit)
            }
            Err(e) if e.is_unresolved_key() => {
                debug!(%key, "Key has no category");
                self.stats.unresolved += 1;
                Outcome::Unresolved(key)
            }
            Err(e) => {
                warn!(
                    path = %self.entries[index].item.path.display(),
                    %key,
                    error = %e,
                    "Commit failed, item kept in queue"
                );
                self.stats.failures += 1;
                Outcome::Failed(e)
            }
        }
    }

    /// Where the current item would go for `key`
    pub fn preview(&self, key: Key) -> Option<Result<Commit>> {
        self.current().map(|item| self.router.preview(item, key))
    }

    /// Set or clear the custom name of the current item
    pub fn set_custom_name(&mut self, name: Option<String>) -> Result<()> {
        let Some(index) = self.cursor() else {
            return Ok(());
        };
        let name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        if let Some(name) = &name {
            Namer::validate_custom_name(name)?;
        }
        debug!(?name, "Custom name set");
        self.entries[index].item.custom_name = name;
        Ok(())
    }

    fn rotate(&mut self, turn: fn(Rotation) -> Rotation) -> Outcome {
        let Some(index) = self.cursor() else {
            return Outcome::Ignored;
        };
        let item = &mut self.entries[index].item;
        item.rotation = turn(item.rotation);
        Outcome::Rotated(item.rotation)
    }

    /// Move to the next or previous pending item, wrapping around
    fn step(&mut self, forward: bool) -> Outcome {
        match self.find_pending(forward) {
            Some(target) if target != self.cursor => {
                self.entries[self.cursor].item.reset();
                if forward {
                    self.stats.skipped += 1;
                }
                self.cursor = target;
                Outcome::Navigated
            }
            _ => Outcome::Ignored,
        }
    }

    fn advance_after_commit(&mut self) {
        match self.find_pending(true) {
            Some(target) => self.cursor = target,
            None => {
                info!(committed = self.stats.total_committed(), "All items reviewed");
                self.state = SessionState::Done;
            }
        }
    }

    /// First pending entry after (or before) the cursor, wrapping; the
    /// current entry counts only when it is the last one pending
    fn find_pending(&self, forward: bool) -> Option<usize> {
        let len = self.entries.len();
        (1..=len)
            .map(|offset| {
                if forward {
                    (self.cursor + offset) % len
                } else {
                    (self.cursor + len - offset % len) % len
                }
            })
            .find(|&i| self.entries[i].is_pending())
    }
}
