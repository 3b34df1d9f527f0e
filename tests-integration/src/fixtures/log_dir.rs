use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::TempDir;

/// Base timestamp for generated files (2023-11-14 22:13:20 UTC).
pub const BASE_TIMESTAMP: i64 = 1_700_000_000;

/// A temporary directory of log files.
///
/// Files are created with exact sizes and modification times; `age` is
/// measured in seconds before [`BASE_TIMESTAMP`], so larger ages are older.
pub struct LogDirFixture {
    dir: TempDir,
}

impl LogDirFixture {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temp dir")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create `name` holding `size` bytes, last modified `age` seconds
    /// before the base timestamp.
    pub fn create(&self, name: &str, size: u64, age: i64) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        let file = File::create(&path).with_context(|| format!("Failed to create {name}"))?;
        file.set_len(size)?;
        file.set_modified(SystemTime::from(Self::timestamp(age)))
            .with_context(|| format!("Failed to set mtime on {name}"))?;
        Ok(path)
    }

    /// Modification time used for a file of the given age.
    pub fn timestamp(age: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(BASE_TIMESTAMP - age, 0)
            .single()
            .unwrap_or_default()
    }

    /// Glob pattern rooted in the fixture directory.
    pub fn pattern(&self, glob: &str) -> String {
        self.dir.path().join(glob).to_string_lossy().into_owned()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Names of the entries still present, sorted.
    pub fn remaining(&self) -> Result<Vec<String>> {
        let mut names = fs::read_dir(self.dir.path())?
            .map(|entry| Ok(entry?.file_name().to_string_lossy().into_owned()))
            .collect::<Result<Vec<_>>>()?;
        names.sort();
        Ok(names)
    }
}
