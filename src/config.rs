//! Configuration types for the photo categorizer

use crate::key::Key;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How destination file names are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NamingScheme {
    /// Keep the original file name (a custom name replaces the stem)
    #[default]
    Original,
    /// `{yymmdd}-{name}-{h|v}.{ext}` with a running 8-digit sequence number
    Dated,
}

/// What to do when a destination file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Refuse the move and keep the item in the queue
    #[default]
    Fail,
    /// Append `_1`, `_2`, ... to the file stem until the name is free
    Suffix,
}

/// Session controls that can be bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Next,
    Previous,
    Quit,
    RotateClockwise,
    RotateCounterClockwise,
    CustomName,
    Help,
}

impl Control {
    /// Name used in the `[keybinds]` table
    pub fn config_name(&self) -> &'static str {
        match self {
            Control::Next => "next",
            Control::Previous => "previous",
            Control::Quit => "quit",
            Control::RotateClockwise => "rotate_clockwise",
            Control::RotateCounterClockwise => "rotate_counterclockwise",
            Control::CustomName => "custom_name",
            Control::Help => "help",
        }
    }
}

/// Keys bound to session controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keybinds {
    pub next: Key,
    pub previous: Key,
    pub quit: Key,
    pub rotate_clockwise: Key,
    pub rotate_counterclockwise: Key,
    pub custom_name: Key,
    pub help: Key,
}

impl Default for Keybinds {
    fn default() -> Self {
        Self {
            next: Key::Char('n'),
            previous: Key::Char('p'),
            quit: Key::Char('q'),
            rotate_clockwise: Key::Char('r'),
            rotate_counterclockwise: Key::Char('e'),
            custom_name: Key::Enter,
            help: Key::Char('?'),
        }
    }
}

impl Keybinds {
    /// All bindings in display order
    pub fn bindings(&self) -> [(Control, Key); 7] {
        [
            (Control::Next, self.next),
            (Control::Previous, self.previous),
            (Control::RotateClockwise, self.rotate_clockwise),
            (Control::RotateCounterClockwise, self.rotate_counterclockwise),
            (Control::CustomName, self.custom_name),
            (Control::Help, self.help),
            (Control::Quit, self.quit),
        ]
    }

    /// Find the control bound to a key
    pub fn lookup(&self, key: Key) -> Option<Control> {
        self.bindings()
            .into_iter()
            .find(|(_, bound)| *bound == key)
            .map(|(control, _)| control)
    }

    /// Reject two controls sharing one key
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bindings = self.bindings();
        for (i, (first, key)) in bindings.iter().enumerate() {
            if let Some((second, _)) = bindings[i + 1..].iter().find(|(_, other)| other == key) {
                return Err(ConfigError::DuplicateControlKey {
                    key: *key,
                    first: first.config_name(),
                    second: second.config_name(),
                });
            }
        }
        Ok(())
    }
}

/// One `[[categories]]` entry: a key and the folder it routes to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub key: Key,
    /// Folder path relative to the output directory, `/` separated
    pub category: String,
}

impl CategoryEntry {
    pub fn new(key: Key, category: impl Into<String>) -> Self {
        Self {
            key,
            category: category.into(),
        }
    }
}

/// Configuration for the photo categorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned for images to review
    pub input_dir: PathBuf,

    /// Directory receiving the category folders
    pub output_dir: PathBuf,

    /// Category folder bound to Delete/Backspace (empty disables it)
    pub trash_category: String,

    /// Destination naming scheme
    pub naming: NamingScheme,

    /// Destination conflict policy
    pub conflict: ConflictPolicy,

    /// Record every commit in a JSON journal
    pub journal: bool,

    /// Journal location (defaults to a hidden file in the output directory)
    pub journal_file: Option<PathBuf>,

    /// External command launched with the path of each reviewed image
    pub viewer: Option<String>,

    /// Dry run mode - log the moves without performing them
    pub dry_run: bool,

    /// Verbose output
    pub verbose: bool,

    /// Standard image extensions
    pub image_extensions: Vec<String>,

    /// RAW image extensions
    pub raw_extensions: Vec<String>,

    /// Sidecar extensions moved along with their image
    pub sidecar_extensions: Vec<String>,

    /// Control keybindings
    pub keybinds: Keybinds,

    /// Key to category mappings, in display order
    pub categories: Vec<CategoryEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("in"),
            output_dir: PathBuf::from("out"),
            trash_category: "deleted".to_string(),
            naming: NamingScheme::default(),
            conflict: ConflictPolicy::default(),
            journal: true,
            journal_file: None,
            viewer: None,
            dry_run: false,
            verbose: false,
            image_extensions: vec![
                "jpg".into(), "jpeg".into(), "png".into(), "gif".into(),
                "bmp".into(), "tif".into(), "tiff".into(), "webp".into(),
                "heic".into(),
            ],
            raw_extensions: vec![
                "raw".into(), "cr2".into(), "cr3".into(), "nef".into(),
                "arw".into(), "dng".into(), "orf".into(), "rw2".into(),
                "pef".into(), "raf".into(), "srw".into(),
            ],
            sidecar_extensions: vec!["xmp".into(), "thm".into()],
            keybinds: Keybinds::default(),
            categories: vec![],
        }
    }
}

impl Config {
    /// Check if a file extension is a standard (non-RAW) image format
    pub fn is_image(&self, ext: &str) -> bool {
        self.image_extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Check if a file extension is a supported RAW format
    pub fn is_raw(&self, ext: &str) -> bool {
        self.raw_extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Check if a file extension is a sidecar format
    pub fn is_sidecar(&self, ext: &str) -> bool {
        self.sidecar_extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Get journal file path, using default if not specified
    pub fn get_journal_file(&self) -> PathBuf {
        self.journal_file
            .clone()
            .unwrap_or_else(|| self.output_dir.join(".photo_categorizer_journal.json"))
    }

    /// Trash category, if enabled
    pub fn trash(&self) -> Option<&str> {
        let trimmed = self.trash_category.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Check the parts of the configuration that do not need the registry
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.keybinds.validate()?;

        if self.input_dir == self.output_dir {
            return Err(ConfigError::SameInputOutput {
                path: self.input_dir.clone(),
            });
        }

        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            source: e,
        })?;

        fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# Photo Categorizer Configuration File
# This file uses TOML format (https://toml.io)

# Directory scanned for images to review
input_dir = "in"

# Directory receiving the category folders
output_dir = "out"

# Category bound to the Delete and Backspace keys ("" disables it)
trash_category = "deleted"

# Destination naming: "original" or "dated"
# - original: keep the file name (a custom name replaces it)
# - dated: 240115-00000042-h.jpg (date taken, sequence or custom name, h/v)
naming = "original"

# When the destination file exists: "fail" or "suffix"
# - fail: keep the image in the queue and report the conflict
# - suffix: photo.jpg becomes photo_1.jpg, photo_2.jpg, ...
conflict = "fail"

# Record every move in a JSON journal inside the output directory
journal = true

# Command launched with the path of each image under review (optional)
# viewer = "xdg-open"

# Dry run mode - log what would be moved without moving anything
dry_run = false

# Supported file extensions (customize as needed)
image_extensions = ["jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp", "heic"]
raw_extensions = ["raw", "cr2", "cr3", "nef", "arw", "dng", "orf", "rw2", "pef", "raf", "srw"]
sidecar_extensions = ["xmp", "thm"]

# Session controls. Keys are single characters (case-sensitive) or one of
# Enter, Delete, Backspace, Tab, Space, Esc.
[keybinds]
next = "n"
previous = "p"
quit = "q"
rotate_clockwise = "r"
rotate_counterclockwise = "e"
custom_name = "Enter"
help = "?"

# Categories. Use '/' for nested folders; every key must be unique and must
# not collide with a control key above.
[[categories]]
key = "a"
category = "animals/birds"

[[categories]]
key = "l"
category = "landscapes"

[[categories]]
key = "f"
category = "family"
"#
        .to_string()
    }
}

/// Errors that can occur when loading, saving or validating configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to write configuration file
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to serialize configuration
    SerializeError {
        source: toml::ser::Error,
    },
    /// Two categories share one key
    DuplicateKey {
        key: Key,
        first: String,
        second: String,
    },
    /// Two controls share one key
    DuplicateControlKey {
        key: Key,
        first: &'static str,
        second: &'static str,
    },
    /// A category key is already used by a control
    ControlKeyConflict {
        key: Key,
        control: &'static str,
        category: String,
    },
    /// A category path is empty or would escape the output directory
    InvalidCategory {
        category: String,
        reason: String,
    },
    /// Input and output directory are the same
    SameInputOutput {
        path: PathBuf,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
            ConfigError::WriteError { path, source } => {
                write!(f, "Failed to write config file '{}': {}", path.display(), source)
            }
            ConfigError::SerializeError { source } => {
                write!(f, "Failed to serialize config: {}", source)
            }
            ConfigError::DuplicateKey { key, first, second } => {
                write!(f, "Key '{}' is bound to both '{}' and '{}'", key, first, second)
            }
            ConfigError::DuplicateControlKey { key, first, second } => {
                write!(f, "Key '{}' is bound to both {} and {}", key, first, second)
            }
            ConfigError::ControlKeyConflict { key, control, category } => {
                write!(
                    f,
                    "Key '{}' of category '{}' is already bound to {}",
                    key, category, control
                )
            }
            ConfigError::InvalidCategory { category, reason } => {
                write!(f, "Invalid category '{}': {}", category, reason)
            }
            ConfigError::SameInputOutput { path } => {
                write!(
                    f,
                    "Input and output directory are both '{}'",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::WriteError { source, .. } => Some(source),
            ConfigError::SerializeError { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_parses() {
        let config: Config = toml::from_str(&Config::sample_config()).unwrap();
        assert_eq!(config.input_dir, PathBuf::from("in"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.naming, NamingScheme::Original);
        assert_eq!(config.conflict, ConflictPolicy::Fail);
        assert_eq!(config.categories.len(), 3);
        assert_eq!(config.categories[0], CategoryEntry::new(Key::Char('a'), "animals/birds"));
        assert_eq!(config.keybinds, Keybinds::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
output_dir = "sorted"

[keybinds]
quit = "Esc"

[[categories]]
key = "Space"
category = "keep"
"#,
        )
        .unwrap();

        assert_eq!(config.input_dir, PathBuf::from("in"));
        assert_eq!(config.output_dir, PathBuf::from("sorted"));
        assert_eq!(config.keybinds.quit, Key::Esc);
        assert_eq!(config.keybinds.next, Key::Char('n'));
        assert_eq!(config.categories[0].key, Key::Char(' '));
        assert!(config.journal);
    }

    #[test]
    fn test_invalid_key_is_parse_error() {
        let result: Result<Config, _> = toml::from_str(
            r#"
[[categories]]
key = "ab"
category = "x"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_keybind_lookup_and_duplicates() {
        let mut keybinds = Keybinds::default();
        assert_eq!(keybinds.lookup(Key::Char('n')), Some(Control::Next));
        assert_eq!(keybinds.lookup(Key::Enter), Some(Control::CustomName));
        assert_eq!(keybinds.lookup(Key::Char('N')), None);

        keybinds.previous = Key::Char('n');
        let err = keybinds.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DuplicateControlKey { first: "next", second: "previous", .. }
        ));
    }

    #[test]
    fn test_extension_checks_ignore_case() {
        let config = Config::default();
        assert!(config.is_image("JPG"));
        assert!(config.is_raw("Cr2"));
        assert!(config.is_sidecar("XMP"));
        assert!(!config.is_image("cr2"));
        assert!(!config.is_raw("txt"));
    }

    #[test]
    fn test_configured_extensions_ignore_case() {
        let config = Config {
            image_extensions: vec!["JPG".into()],
            raw_extensions: vec!["Nef".into()],
            sidecar_extensions: vec!["XMP".into()],
            ..Config::default()
        };
        assert!(config.is_image("jpg"));
        assert!(config.is_image("JPG"));
        assert!(config.is_raw("nef"));
        assert!(config.is_sidecar("xmp"));
        assert!(!config.is_image("png"));
    }

    #[test]
    fn test_same_input_output_rejected() {
        let config = Config {
            input_dir: PathBuf::from("photos"),
            output_dir: PathBuf::from("photos"),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SameInputOutput { .. })
        ));
    }

    #[test]
    fn test_trash_disabled_when_blank() {
        let mut config = Config::default();
        assert_eq!(config.trash(), Some("deleted"));
        config.trash_category = "  ".into();
        assert_eq!(config.trash(), None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.categories.push(CategoryEntry::new(Key::Char('b'), "birds"));
        config.naming = NamingScheme::Dated;
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.categories, config.categories);
        assert_eq!(loaded.naming, NamingScheme::Dated);
        assert_eq!(loaded.keybinds, config.keybinds);
    }

    #[test]
    fn test_journal_file_default() {
        let config = Config::default();
        assert_eq!(
            config.get_journal_file(),
            PathBuf::from("out").join(".photo_categorizer_journal.json")
        );
    }
}
