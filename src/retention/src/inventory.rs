//! File inventory: paths in, frozen size/mtime records out.
//!
//! Every candidate must be a regular file. Directories, symbolic links and
//! unreadable entries abort the whole build; a surprise in a rotation glob is
//! a configuration problem, not something to skip over.

use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// One managed file, as observed when the inventory was built.
///
/// Size and modification time are captured once and never refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    path: PathBuf,
    modified_at: DateTime<Utc>,
    size_bytes: u64,
}

impl FileRecord {
    /// Create a record from already-known metadata.
    pub fn new(path: impl Into<PathBuf>, modified_at: DateTime<Utc>, size_bytes: u64) -> Self {
        Self {
            path: path.into(),
            modified_at,
            size_bytes,
        }
    }

    /// Stat `path` without following links and build a record for it.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::UnsafeLink`] if the path is a symbolic link
    /// - [`InventoryError::NotRegularFile`] if it is a directory or any other
    ///   non-regular entry
    /// - [`InventoryError::StatError`] if metadata cannot be read
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InventoryError> {
        let path = path.as_ref();
        let stat_error = |source: io::Error| InventoryError::StatError {
            path: path.to_path_buf(),
            source,
        };

        let metadata = fs::symlink_metadata(path).map_err(stat_error)?;
        let file_type = metadata.file_type();

        if file_type.is_symlink() {
            return Err(InventoryError::UnsafeLink {
                path: path.to_path_buf(),
            });
        }
        if !file_type.is_file() {
            return Err(InventoryError::NotRegularFile {
                path: path.to_path_buf(),
                is_dir: file_type.is_dir(),
            });
        }

        let modified_at = metadata.modified().map_err(stat_error)?;

        Ok(Self {
            path: path.to_path_buf(),
            modified_at: DateTime::<Utc>::from(modified_at),
            size_bytes: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

/// Build the inventory for a set of paths.
///
/// Returns one record per input path, in input order. Duplicate paths are
/// kept as separate records. The first failing path aborts the build.
pub fn build_inventory<I, P>(paths: I) -> Result<Vec<FileRecord>, InventoryError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths
        .into_iter()
        .map(|path| {
            let record = FileRecord::from_path(path)?;
            debug!(
                path = %record.path.display(),
                size_bytes = record.size_bytes,
                modified_at = %record.modified_at.format("%Y-%m-%d %H:%M:%S UTC"),
                "Inventoried file"
            );
            Ok(record)
        })
        .collect()
}

/// Errors raised while building the inventory.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// The path is a directory or another non-regular entry.
    #[error("{} is not a regular file{}", path.display(), if *is_dir { " (directory)" } else { "" })]
    NotRegularFile { path: PathBuf, is_dir: bool },

    /// The path is a symbolic link.
    #[error("{} is a symbolic link, refusing to manage it", path.display())]
    UnsafeLink { path: PathBuf },

    /// Metadata could not be read.
    #[error("unable to stat {}", path.display())]
    StatError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl InventoryError {
    /// Path that caused the failure.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotRegularFile { path, .. }
            | Self::UnsafeLink { path }
            | Self::StatError { path, .. } => path,
        }
    }

    /// True for entries that exist but must not be managed automatically
    /// (directories, links), false for metadata failures.
    pub fn is_unsafe_input(&self) -> bool {
        matches!(self, Self::NotRegularFile { .. } | Self::UnsafeLink { .. })
    }
}
