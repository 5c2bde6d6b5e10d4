//! Photo Categorizer - keyboard driven photo sorting
//!
//! This library provides the pieces behind the `photo-categorizer` binary:
//! - Key to category mapping with nested category folders
//! - Input directory scanning with RAW and sidecar pairing
//! - Atomic-or-unchanged moves with lossless EXIF rotation
//! - Original or date based destination naming
//! - A keypress driven review session and its terminal UI
//! - A JSON journal of every committed move

pub mod category;
pub mod cli;
pub mod config;
pub mod error;
pub mod i18n;
pub mod journal;
pub mod key;
pub mod metadata;
pub mod naming;
pub mod queue;
pub mod router;
pub mod session;
pub mod transfer;
pub mod tui;
pub mod viewer;

pub use category::{CategoryMapping, CategoryPath, CategoryRegistry};
pub use cli::Cli;
pub use config::{CategoryEntry, Config, ConfigError, ConflictPolicy, Control, Keybinds, NamingScheme};
pub use error::{Error, Result};
pub use i18n::Strings;
pub use journal::{Journal, JournalEntry};
pub use key::Key;
pub use metadata::Rotation;
pub use queue::{FileQueue, ImageItem};
pub use router::{Commit, Router};
pub use session::{Outcome, Session, SessionState, SessionStats};
pub use tui::TuiApp;
