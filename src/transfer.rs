//! File transfer for committed items
//!
//! All files belonging to one item move as a unit: every destination is
//! checked before the first move, and if a later move fails the earlier ones
//! are moved back. A source file is removed only after its destination is
//! complete.

use crate::config::ConflictPolicy;
use crate::error::{Error, Result};
use crate::metadata::{self, Rotation};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const COPY_BUFFER_SIZE: usize = 256 * 1024;

/// One file to move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveStep {
    pub source: PathBuf,
    pub dest: PathBuf,
    /// Rotation written into the destination; `None` moves bytes unchanged
    pub rotation: Rotation,
}

impl MoveStep {
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
            rotation: Rotation::None,
        }
    }

    pub fn rotated(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Create `dir` and any missing parents.
///
/// A component that already exists as something other than a directory is
/// reported as [`Error::NotADirectory`].
pub fn ensure_dir(dir: &Path) -> Result<()> {
    let mut ancestors: Vec<&Path> = dir.ancestors().collect();
    ancestors.reverse();
    for ancestor in ancestors {
        if ancestor.as_os_str().is_empty() {
            continue;
        }
        if let Ok(meta) = fs::metadata(ancestor)
            && !meta.is_dir()
        {
            return Err(Error::NotADirectory {
                path: ancestor.to_path_buf(),
            });
        }
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Destinations for a group of files named `{stem}{rest}`, after applying
/// the conflict policy.
///
/// With [`ConflictPolicy::Suffix`] the same `_N` is inserted after the stem
/// of every name so the group stays paired.
pub fn resolve_destinations(
    dir: &Path,
    stem: &str,
    names: &[String],
    policy: ConflictPolicy,
) -> Result<Vec<PathBuf>> {
    let candidate = |suffix: &str| -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| dir.join(insert_after_stem(name, stem, suffix)))
            .collect()
    };

    let plain = candidate("");
    let Some(taken) = plain.iter().find(|p| p.exists()) else {
        return Ok(plain);
    };
    if policy == ConflictPolicy::Fail {
        return Err(Error::DestinationExists {
            path: taken.clone(),
        });
    }

    for i in 1..10000 {
        let paths = candidate(&format!("_{}", i));
        if paths.iter().all(|p| !p.exists()) {
            debug!(stem, suffix = i, "Resolved destination conflict");
            return Ok(paths);
        }
    }

    Err(Error::DestinationExists {
        path: taken.clone(),
    })
}

/// `photo.CR2.xmp` with stem `photo` and suffix `_1` becomes `photo_1.CR2.xmp`
fn insert_after_stem(name: &str, stem: &str, suffix: &str) -> String {
    if let Some(rest) = name.strip_prefix(stem) {
        return format!("{}{}{}", stem, suffix, rest);
    }
    let path = Path::new(name);
    let file_stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match path.extension() {
        Some(ext) => format!("{}{}.{}", file_stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", file_stem, suffix),
    }
}

/// Move all steps or none of them
pub fn move_all(steps: &[MoveStep]) -> Result<()> {
    for step in steps {
        if step.dest.exists() {
            return Err(Error::DestinationExists {
                path: step.dest.clone(),
            });
        }
        if let Some(parent) = step.dest.parent() {
            ensure_dir(parent)?;
        }
    }

    // Rotated files go last so a rollback only ever has plain moves to undo
    let (rotated, plain): (Vec<&MoveStep>, Vec<&MoveStep>) =
        steps.iter().partition(|step| !step.rotation.is_none());

    let mut done: Vec<&MoveStep> = Vec::with_capacity(steps.len());
    for step in plain.into_iter().chain(rotated) {
        let result = if step.rotation.is_none() {
            move_file(&step.source, &step.dest)
        } else {
            move_rotated(&step.source, &step.dest, step.rotation)
        };

        if let Err(e) = result {
            warn!(
                source = %step.source.display(),
                error = %e,
                rollback = done.len(),
                "Move failed, rolling back"
            );
            rollback(&done);
            return Err(e);
        }
        done.push(step);
    }

    Ok(())
}

/// Undo completed moves, newest first
fn rollback(done: &[&MoveStep]) {
    for step in done.iter().rev() {
        match move_file(&step.dest, &step.source) {
            Ok(()) => debug!(path = %step.source.display(), "Rolled back"),
            Err(e) => warn!(
                dest = %step.dest.display(),
                source = %step.source.display(),
                error = %e,
                "Rollback failed, file left at destination"
            ),
        }
    }
}

/// Move one file, copying only when source and destination are on
/// different file systems
pub fn move_file(source: &Path, dest: &Path) -> Result<()> {
    if dest.exists() {
        return Err(Error::DestinationExists {
            path: dest.to_path_buf(),
        });
    }

    let move_error = |e: std::io::Error| Error::Move {
        from: source.to_path_buf(),
        to: dest.to_path_buf(),
        source: e,
    };

    match fs::rename(source, dest) {
        Ok(()) => {
            debug!(source = %source.display(), dest = %dest.display(), "Renamed");
            return Ok(());
        }
        Err(e) if e.kind() != ErrorKind::CrossesDevices => return Err(move_error(e)),
        Err(_) => {}
    }

    let temp = temp_path(dest);
    if let Err(e) = copy_file(source, &temp) {
        let _ = fs::remove_file(&temp);
        return Err(move_error(e));
    }
    preserve_mtime(source, &temp);
    fs::rename(&temp, dest).map_err(|e| {
        let _ = fs::remove_file(&temp);
        move_error(e)
    })?;
    remove_source(source, dest).map_err(move_error)?;

    info!(source = %source.display(), dest = %dest.display(), "Copied across file systems");
    Ok(())
}

/// Write a rotated copy next to `dest`, rename it into place, then remove
/// the source
pub fn move_rotated(source: &Path, dest: &Path, rotation: Rotation) -> Result<()> {
    let temp = temp_path(dest);
    if let Err(e) = metadata::write_rotated(source, &temp, rotation) {
        let _ = fs::remove_file(&temp);
        return Err(e);
    }
    preserve_mtime(source, &temp);

    let move_error = |e: std::io::Error| Error::Move {
        from: source.to_path_buf(),
        to: dest.to_path_buf(),
        source: e,
    };
    fs::rename(&temp, dest).map_err(|e| {
        let _ = fs::remove_file(&temp);
        move_error(e)
    })?;
    remove_source(source, dest).map_err(move_error)?;

    debug!(source = %source.display(), dest = %dest.display(), %rotation, "Moved with rotation");
    Ok(())
}

/// Remove `source` once `dest` holds its copy. If the source cannot be
/// removed the copy is deleted again, so the file exists only once.
fn remove_source(source: &Path, dest: &Path) -> std::io::Result<()> {
    let Err(e) = fs::remove_file(source) else {
        return Ok(());
    };
    if let Err(cleanup) = fs::remove_file(dest) {
        warn!(
            dest = %dest.display(),
            error = %cleanup,
            "Failed to remove copy after source removal failed"
        );
    }
    Err(e)
}

/// Hidden partial file in the destination directory
fn temp_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".{}.partial", name))
}

fn preserve_mtime(source: &Path, dest: &Path) {
    if let Ok(metadata) = fs::metadata(source)
        && let Ok(mtime) = metadata.modified()
    {
        let _ = filetime::set_file_mtime(dest, filetime::FileTime::from_system_time(mtime));
    }
}

/// Copy file with buffered I/O
fn copy_file(source: &Path, dest: &Path) -> std::io::Result<()> {
    let src_file = File::open(source)?;
    let dest_file = File::create(dest)?;

    let mut reader = BufReader::with_capacity(COPY_BUFFER_SIZE, src_file);
    let mut writer = BufWriter::with_capacity(COPY_BUFFER_SIZE, dest_file);

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        writer.write_all(&buffer[..bytes_read])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(all(test, unix))]
pub(crate) mod read_only {
    //! Read-only directories for failure tests

    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    /// Make `dir` read-only. Returns false, leaving it writable, when the
    /// permission bits are not enforced (running as root).
    pub fn lock(dir: &Path) -> bool {
        fs::set_permissions(dir, fs::Permissions::from_mode(0o555)).unwrap();
        let check = dir.join(".write-check");
        if fs::write(&check, b"").is_ok() {
            let _ = fs::remove_file(&check);
            unlock(dir);
            return false;
        }
        true
    }

    pub fn unlock(dir: &Path) {
        fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
    }
}
