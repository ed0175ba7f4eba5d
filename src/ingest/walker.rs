//! Directory traversal with recursion gate and name-based exclusion

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::{UncloakError, UncloakResult};

/// Enumerates regular files under a set of root paths.
///
/// A root that is itself a regular file is yielded directly. Directories
/// are entered one level deep unless recursion is enabled, and never when
/// their base name is in the exclusion set. Per-entry I/O errors (broken
/// symlinks, permission walls) are logged and skipped; only a root that
/// cannot be stat'ed at all is an error.
pub struct Walker {
    recursive: bool,
    exclude_dirs: Vec<String>,
}

impl Walker {
    pub fn new(recursive: bool, exclude_dirs: Vec<String>) -> Self {
        Self {
            recursive,
            exclude_dirs,
        }
    }

    /// Stat the root without walking it. Used to fail fast on explicitly
    /// named paths before any search starts.
    pub fn check_root(&self, root: &Path) -> UncloakResult<()> {
        std::fs::metadata(root)
            .map(|_| ())
            .map_err(|source| UncloakError::Path {
                path: root.to_path_buf(),
                source,
            })
    }

    /// Walk one root, calling `emit` for every regular file found.
    pub fn walk(&self, root: &Path, mut emit: impl FnMut(PathBuf)) -> UncloakResult<()> {
        let meta = std::fs::metadata(root).map_err(|source| UncloakError::Path {
            path: root.to_path_buf(),
            source,
        })?;
        if meta.is_file() {
            emit(root.to_path_buf());
            return Ok(());
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let entries = WalkDir::new(root)
            .max_depth(max_depth)
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e));

        for entry in entries {
            match entry {
                Ok(e) if e.file_type().is_file() => emit(e.into_path()),
                Ok(_) => {}
                Err(err) => tracing::debug!("error accessing entry under {}: {err}", root.display()),
            }
        }
        Ok(())
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        match entry.file_name().to_str() {
            Some(name) => self.exclude_dirs.iter().any(|ex| ex == name),
            None => false,
        }
    }
}
