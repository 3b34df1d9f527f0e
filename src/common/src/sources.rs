//! Where the candidate file list comes from: glob patterns given on the
//! command line, or newline-delimited paths on standard input.

use glob::{MatchOptions, PatternError};
use std::io::{self, BufRead};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Shell-like matching: wildcards never match a leading `.` or a `/`.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Expand each pattern in order, concatenating the matches.
///
/// Matches of a single pattern come back sorted by path. A pattern that
/// matches nothing contributes nothing.
pub fn expand_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>, SourceError> {
    let mut paths = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let entries = glob::glob_with(pattern, MATCH_OPTIONS).map_err(|source| {
            SourceError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        let before = paths.len();
        for entry in entries {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                SourceError::Unreadable {
                    path,
                    source: io::Error::from(e),
                }
            })?;
            paths.push(path);
        }

        debug!(pattern, matches = paths.len() - before, "Expanded file pattern");
    }

    Ok(paths)
}

/// Read one path per line. Surrounding whitespace is trimmed and blank lines
/// are skipped; entries are used as-is, without glob expansion.
pub fn read_file_list<R: BufRead>(reader: R) -> Result<Vec<PathBuf>, SourceError> {
    let mut paths = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(SourceError::FileList)?;
        let entry = line.trim();
        if !entry.is_empty() {
            paths.push(PathBuf::from(entry));
        }
    }
    debug!(entries = paths.len(), "Read file list");
    Ok(paths)
}

/// Resolve the candidate list: patterns when any are given, otherwise
/// `reader`. An empty result is an error.
pub fn collect<S, R>(patterns: &[S], reader: R) -> Result<Vec<PathBuf>, SourceError>
where
    S: AsRef<str>,
    R: BufRead,
{
    let paths = if patterns.is_empty() {
        read_file_list(reader)?
    } else {
        expand_patterns(patterns)?
    };

    if paths.is_empty() {
        return Err(SourceError::NoFiles);
    }
    Ok(paths)
}

/// Errors raised while gathering the candidate list.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The pattern is not valid glob syntax.
    #[error("invalid file pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: PatternError,
    },

    /// A directory could not be read while expanding a pattern.
    #[error("unable to read {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Standard input could not be read.
    #[error("unable to read file list")]
    FileList(#[source] io::Error),

    /// Patterns or standard input produced no paths.
    #[error("no files found")]
    NoFiles,
}
