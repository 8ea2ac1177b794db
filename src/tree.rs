//! Recursive directory copy, move and delete.
//!
//! All three operations are plain blocking depth-first recursion. Entries of a
//! directory are visited in the order the platform lists them. The first
//! failing entry aborts the whole call; whatever was already copied or
//! removed stays that way (there is no rollback).

use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::backend::{FileSystem, LocalFs};
use crate::entry::{EntryKind, classify_in};
use crate::error::{Error, Result, Step};

/// Recursively copy `src` into `dst` on the host filesystem
///
/// See [`copy_directory_with`].
pub fn copy_directory(src: &Path, dst: &Path) -> Result<()> {
    copy_directory_with(&LocalFs, src, dst)
}

/// Move `src` to `dst` by copying then deleting the source
///
/// See [`move_directory_with`].
pub fn move_directory(src: &Path, dst: &Path) -> Result<()> {
    move_directory_with(&LocalFs, src, dst)
}

/// Remove `path` and everything beneath it
///
/// See [`delete_directory_with`].
pub fn delete_directory(path: &Path) -> Result<()> {
    delete_directory_with(&LocalFs, path)
}

/// Recursively copy the directory `src` to `dst`.
///
/// `dst` and its missing ancestors are created. Files already present at the
/// destination are overwritten; nothing at the destination is removed.
///
/// # Errors
/// - `NotFound` if `src` does not exist (nothing is created in that case)
/// - `Internal` if creating, listing, stat-ing or copying any entry fails,
///   and (step `CreateDir`, `InvalidInput`) if `dst` is `src` or lies inside
///   it; nothing is created in that case
pub fn copy_directory_with<F: FileSystem + ?Sized>(fs: &F, src: &Path, dst: &Path) -> Result<()> {
    if !fs.exists(src) {
        return Err(Error::not_found(src));
    }

    if !classify_in(fs, src)?.is_dir() {
        return Err(Error::internal(
            Step::ReadDir,
            src,
            std::io::Error::new(
                std::io::ErrorKind::NotADirectory,
                "source is not a directory",
            ),
        ));
    }

    let src_resolved = fs
        .canonicalize(src)
        .map_err(|e| Error::from_io(Step::Stat, src, e))?;
    if resolve_lenient(fs, dst).starts_with(&src_resolved) {
        return Err(Error::internal(
            Step::CreateDir,
            dst,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("destination is inside source directory {}", src.display()),
            ),
        ));
    }

    debug!(src = %src.display(), dst = %dst.display(), "copying directory tree");
    copy_tree(fs, src, dst).inspect_err(|e| warn!(error = %e, "directory copy failed"))
}

fn copy_tree<F: FileSystem + ?Sized>(fs: &F, src: &Path, dst: &Path) -> Result<()> {
    fs.make_directories(dst)
        .map_err(|e| Error::internal(Step::CreateDir, dst, e))?;

    let entries = fs
        .list_entries(src)
        .map_err(|e| Error::from_io(Step::ReadDir, src, e))?;

    for name in entries {
        let src_path = src.join(&name);
        let dst_path = dst.join(&name);

        match classify_in(fs, &src_path)? {
            EntryKind::Directory => copy_tree(fs, &src_path, &dst_path)?,
            EntryKind::File => {
                trace!(src = %src_path.display(), dst = %dst_path.display(), "copying file");
                fs.copy_file_bytes(&src_path, &dst_path)
                    .map_err(|source| Error::CopyFailed {
                        from: src_path.clone(),
                        to: dst_path.clone(),
                        source,
                    })?;
            }
        }
    }

    Ok(())
}

/// Move the directory `src` to `dst`.
///
/// Runs [`copy_directory_with`] and, only if it succeeds,
/// [`delete_directory_with`] on `src`. A failed copy leaves `src` untouched.
/// A failed delete returns its error with both trees populated; retrying
/// [`delete_directory_with`] on `src` is safe.
pub fn move_directory_with<F: FileSystem + ?Sized>(fs: &F, src: &Path, dst: &Path) -> Result<()> {
    copy_directory_with(fs, src, dst)?;
    delete_directory_with(fs, src).inspect_err(|e| {
        warn!(
            src = %src.display(),
            dst = %dst.display(),
            error = %e,
            "copy succeeded but source removal failed; both trees are present"
        )
    })
}

/// Recursively delete the directory at `path`.
///
/// Children are removed before their parent. Symbolic links are unlinked,
/// never followed, including when `path` itself is one.
///
/// # Errors
/// - `NotFound` if `path` is not reachable
/// - `Internal` if listing, stat-ing or removing any entry fails
pub fn delete_directory_with<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<()> {
    if fs.is_symlink(path) {
        debug!(path = %path.display(), "unlinking symlink");
        return fs
            .delete_file(path)
            .map_err(|e| Error::internal(Step::RemoveFile, path, e));
    }

    if !fs.exists(path) {
        return Err(Error::not_found(path));
    }

    debug!(path = %path.display(), "deleting directory tree");
    delete_tree(fs, path).inspect_err(|e| warn!(error = %e, "directory delete failed"))
}

fn delete_tree<F: FileSystem + ?Sized>(fs: &F, dir: &Path) -> Result<()> {
    let entries = fs
        .list_entries(dir)
        .map_err(|e| Error::from_io(Step::ReadDir, dir, e))?;

    for name in entries {
        let path = dir.join(&name);

        let kind = if fs.is_symlink(&path) {
            EntryKind::File
        } else {
            classify_in(fs, &path)?
        };

        match kind {
            EntryKind::Directory => delete_tree(fs, &path)?,
            EntryKind::File => {
                trace!(path = %path.display(), "removing file");
                fs.delete_file(&path)
                    .map_err(|e| Error::internal(Step::RemoveFile, &path, e))?;
            }
        }
    }

    fs.remove_empty_dir(dir)
        .map_err(|e| Error::internal(Step::RemoveDir, dir, e))
}

/// Canonicalize the deepest existing ancestor of `path` and re-append the
/// rest, so paths that do not exist yet can still be compared.
fn resolve_lenient<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> PathBuf {
    let mut missing = Vec::new();
    let mut cursor = path;
    loop {
        if let Ok(resolved) = fs.canonicalize(cursor) {
            return missing.iter().rev().fold(resolved, |acc, part| acc.join(part));
        }
        match (cursor.parent(), cursor.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                cursor = if parent.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    parent
                };
            }
            _ => return path.to_path_buf(),
        }
    }
}
