//! Entry classification: is a path a file or a directory, right now?
//!
//! Results are never cached. The tree walker re-queries on every descent.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::Metadata;
use std::path::Path;

use crate::backend::{FileSystem, LocalFs};
use crate::error::{Error, Result, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn is_dir(self) -> bool {
        matches!(self, EntryKind::Directory)
    }
}

/// Snapshot of a path's metadata at the instant it was taken
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stat {
    pub kind: EntryKind,
    /// Size in bytes as reported by the platform
    pub len: u64,
    /// Last modification time, if the platform exposes one
    pub modified: Option<DateTime<Utc>>,
}

impl Stat {
    /// Anything that is not a directory counts as a file.
    pub fn from_metadata(meta: &Metadata) -> Self {
        let kind = if meta.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        Self {
            kind,
            len: meta.len(),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
        }
    }
}

/// Classify `path` on the host filesystem
pub fn classify(path: &Path) -> Result<EntryKind> {
    classify_in(&LocalFs, path)
}

/// Classify `path` through `fs`.
///
/// # Errors
/// - `NotFound` if the path does not exist at call time
/// - `Internal` (step `Stat`) for any other stat failure
pub fn classify_in<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<EntryKind> {
    stat_in(fs, path).map(|stat| stat.kind)
}

pub fn stat(path: &Path) -> Result<Stat> {
    stat_in(&LocalFs, path)
}

pub fn stat_in<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<Stat> {
    fs.metadata(path).map_err(|e| Error::from_io(Step::Stat, path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_classify_file_and_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.txt");
        std::fs::write(&file, "hello").unwrap();

        assert_eq!(classify(temp_dir.path()).unwrap(), EntryKind::Directory);
        assert_eq!(classify(&file).unwrap(), EntryKind::File);
    }

    #[test]
    fn test_classify_missing_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = classify(&temp_dir.path().join("nope")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_stat_reports_size_and_mtime() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.txt");
        std::fs::write(&file, "hello").unwrap();

        let stat = stat(&file).unwrap();
        assert_eq!(stat.len, 5);
        assert!(stat.modified.is_some());
        assert!(!stat.kind.is_dir());
    }
}
