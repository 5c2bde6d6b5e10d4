//! Category registry
//!
//! Maps keys to category paths. The registry is built once from the
//! configuration, rejects duplicate keys and unsafe paths, and is read-only
//! afterwards.

use crate::config::{CategoryEntry, Config, ConfigError, Keybinds};
use crate::key::Key;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

/// Separator between nested category segments
pub const SEPARATOR: char = '/';

/// A validated, relative category folder path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryPath {
    segments: Vec<String>,
}

impl CategoryPath {
    /// Parse a `/` separated category string.
    ///
    /// Every segment must be non-empty and must name a plain folder: no `.`
    /// or `..`, no backslash, no drive prefix and no control characters.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidCategory {
            category: raw.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(invalid("category path is empty"));
        }
        if trimmed.starts_with(SEPARATOR) {
            return Err(invalid("category path must be relative"));
        }

        let mut segments = Vec::new();
        for segment in trimmed.split(SEPARATOR) {
            validate_segment(segment).map_err(|reason| invalid(&reason))?;
            segments.push(segment.to_string());
        }

        Ok(Self { segments })
    }

    /// Folder segments, outermost first
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Path relative to the output directory
    pub fn to_relative_path(&self) -> PathBuf {
        self.segments.iter().collect()
    }

    /// Human readable label, `animals > birds`
    pub fn label(&self) -> String {
        self.segments.join(" > ")
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// Check a single path segment (also used for custom file names)
pub fn validate_segment(segment: &str) -> Result<(), String> {
    if segment.is_empty() {
        return Err("empty path segment".to_string());
    }
    if segment.trim() != segment {
        return Err(format!("segment '{}' has surrounding whitespace", segment));
    }
    if segment == "." || segment == ".." {
        return Err(format!("segment '{}' is not allowed", segment));
    }
    if let Some(c) = segment
        .chars()
        .find(|c| matches!(c, '\\' | '/' | ':' | '\0') || c.is_control())
    {
        return Err(format!("segment '{}' contains {:?}", segment, c));
    }
    Ok(())
}

/// One resolved mapping, kept in configuration order for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMapping {
    pub key: Key,
    pub path: CategoryPath,
    /// Whether this is the built-in trash mapping
    pub trash: bool,
}

/// Read-only key to category lookup table
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    mappings: Vec<CategoryMapping>,
    by_key: HashMap<Key, usize>,
}

impl CategoryRegistry {
    /// Build the registry from a configuration.
    ///
    /// The trash category, when enabled, is bound to Delete and Backspace.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::from_entries(&config.categories, &config.keybinds, config.trash())
    }

    /// Build the registry from explicit entries
    pub fn from_entries(
        entries: &[CategoryEntry],
        keybinds: &Keybinds,
        trash: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut registry = Self {
            mappings: Vec::with_capacity(entries.len() + 2),
            by_key: HashMap::with_capacity(entries.len() + 2),
        };

        for entry in entries {
            let path = CategoryPath::parse(&entry.category)?;
            registry.insert(entry.key, path, false, keybinds)?;
        }

        if let Some(trash) = trash {
            let path = CategoryPath::parse(trash)?;
            for key in [Key::Delete, Key::Backspace] {
                registry.insert(key, path.clone(), true, keybinds)?;
            }
        }

        debug!(mappings = registry.mappings.len(), "Category registry loaded");
        Ok(registry)
    }

    fn insert(
        &mut self,
        key: Key,
        path: CategoryPath,
        trash: bool,
        keybinds: &Keybinds,
    ) -> Result<(), ConfigError> {
        if let Some(control) = keybinds.lookup(key) {
            return Err(ConfigError::ControlKeyConflict {
                key,
                control: control.config_name(),
                category: path.to_string(),
            });
        }

        if let Some(&existing) = self.by_key.get(&key) {
            return Err(ConfigError::DuplicateKey {
                key,
                first: self.mappings[existing].path.to_string(),
                second: path.to_string(),
            });
        }

        self.by_key.insert(key, self.mappings.len());
        self.mappings.push(CategoryMapping { key, path, trash });
        Ok(())
    }

    /// Resolve a key to its category path
    pub fn resolve(&self, key: Key) -> Option<&CategoryPath> {
        self.by_key.get(&key).map(|&index| &self.mappings[index].path)
    }

    /// All mappings in configuration order (trash last)
    pub fn entries(&self) -> &[CategoryMapping] {
        &self.mappings
    }

    /// Distinct category paths, in first-seen order
    pub fn categories(&self) -> Vec<&CategoryPath> {
        let mut seen: Vec<&CategoryPath> = Vec::new();
        for mapping in &self.mappings {
            if !seen.contains(&&mapping.path) {
                seen.push(&mapping.path);
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}
