//! Error types for the photo categorizer

use crate::config::ConfigError;
use crate::key::Key;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for photo categorizer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the photo categorizer
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No category is bound to key {0}")]
    UnresolvedKey(Key),

    #[error("Failed to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("Destination already exists: {path}")]
    DestinationExists { path: PathBuf },

    #[error("Cannot create category folder, {path} exists and is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("Failed to rotate {path}: {message}")]
    Rotation { path: PathBuf, message: String },

    #[error("Failed to read EXIF data from {path}: {message}")]
    ExifRead { path: PathBuf, message: String },

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Journal file error: {0}")]
    Journal(String),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

impl Error {
    /// Whether the session can keep going after this error.
    ///
    /// Configuration problems are fatal at startup; everything raised while
    /// routing a single item leaves that item in place for a retry.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Config(_))
    }

    /// Whether this is the "key has no mapping" no-op.
    pub fn is_unresolved_key(&self) -> bool {
        matches!(self, Error::UnresolvedKey(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let unresolved = Error::UnresolvedKey(Key::Char('z'));
        assert!(unresolved.is_recoverable());
        assert!(unresolved.is_unresolved_key());
        assert_eq!(unresolved.to_string(), "No category is bound to key z");

        let exists = Error::DestinationExists {
            path: PathBuf::from("out/a.jpg"),
        };
        assert!(exists.is_recoverable());
        assert!(!exists.is_unresolved_key());

        let config = Error::Config(ConfigError::DuplicateKey {
            key: Key::Char('a'),
            first: "animals".into(),
            second: "art".into(),
        });
        assert!(!config.is_recoverable());
    }
}
