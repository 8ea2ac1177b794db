//! Filesystem primitives consumed by the tree walker.
//!
//! The walker never touches `std::fs` directly; it goes through
//! [`FileSystem`] so every primitive it depends on is visible in one place.
//! [`LocalFs`] is the only production implementation.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::entry::Stat;

pub trait FileSystem {
    /// Whether `path` exists, following symlinks
    fn exists(&self, path: &Path) -> bool;

    /// Names directly under `path`, in the order the platform returns them
    fn list_entries(&self, path: &Path) -> io::Result<Vec<OsString>>;

    /// Stat `path`, following symlinks
    fn metadata(&self, path: &Path) -> io::Result<Stat>;

    /// Whether `path` itself is a symbolic link (not followed)
    fn is_symlink(&self, path: &Path) -> bool;

    /// Copy the bytes of `src` to `dst`, overwriting `dst` if present
    fn copy_file_bytes(&self, src: &Path, dst: &Path) -> io::Result<()>;

    /// Create `path` and any missing ancestors. Succeeds if already present.
    fn make_directories(&self, path: &Path) -> io::Result<()>;

    fn delete_file(&self, path: &Path) -> io::Result<()>;

    /// Remove an empty directory
    fn remove_empty_dir(&self, path: &Path) -> io::Result<()>;

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// The host filesystem, via `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_entries(&self, path: &Path) -> io::Result<Vec<OsString>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(path)? {
            names.push(entry?.file_name());
        }
        Ok(names)
    }

    fn metadata(&self, path: &Path) -> io::Result<Stat> {
        fs::metadata(path).map(|meta| Stat::from_metadata(&meta))
    }

    fn is_symlink(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_symlink())
    }

    fn copy_file_bytes(&self, src: &Path, dst: &Path) -> io::Result<()> {
        fs::copy(src, dst).map(|_| ())
    }

    fn make_directories(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn delete_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_empty_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }
}
