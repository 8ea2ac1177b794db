//! Filesystem utility functions
//!
//! Single-file operations (the leaves the tree walker bottoms out on) plus a
//! few listing and JSON helpers. Every function checks existence up front
//! where a missing path is an expected outcome, so callers get
//! [`Error::NotFound`] rather than an opaque I/O error.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::entry::{EntryKind, Stat, classify, stat};
use crate::error::{Error, Result, Step};

/// Read the content of a file as UTF-8
pub fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::not_found(path));
    }
    fs::read_to_string(path).map_err(|e| Error::from_io(Step::Read, path, e))
}

/// Write `content` to `path`, creating or truncating it
pub fn write_file(path: &Path, content: impl AsRef<[u8]>) -> Result<()> {
    fs::write(path, content).map_err(|e| Error::internal(Step::Write, path, e))
}

/// Append `content` to `path`, creating it if missing
pub fn append_to_file(path: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::internal(Step::Write, path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::internal(Step::Write, path, e))
}

pub fn delete_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::not_found(path));
    }
    fs::remove_file(path).map_err(|e| Error::from_io(Step::RemoveFile, path, e))
}

/// Create a directory and its ancestors. Succeeds if it already exists.
pub fn create_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::internal(Step::CreateDir, path, e))
}

pub fn exists(path: &Path) -> bool {
    path.exists()
}

/// Copy a single file, overwriting `dst` if present
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if !src.exists() {
        return Err(Error::not_found(src));
    }
    fs::copy(src, dst)
        .map(|_| ())
        .map_err(|source| Error::CopyFailed {
            from: src.to_path_buf(),
            to: dst.to_path_buf(),
            source,
        })
}

/// Rename a single file. Does not fall back to copying across devices.
pub fn move_file(src: &Path, dst: &Path) -> Result<()> {
    if !src.exists() {
        return Err(Error::not_found(src));
    }
    fs::rename(src, dst).map_err(|e| Error::internal(Step::Rename, src, e))
}

/// Names of every entry directly under `path`, in platform order
pub fn read_directory(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(Error::not_found(path));
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(path).map_err(|e| Error::from_io(Step::ReadDir, path, e))? {
        let entry = entry.map_err(|e| Error::internal(Step::ReadDir, path, e))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

/// Like [`read_directory`], keeping only entries that classify as files
pub fn list_files_in_directory(path: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for name in read_directory(path)? {
        if classify(&path.join(&name))? == EntryKind::File {
            files.push(name);
        }
    }
    Ok(files)
}

pub fn get_stats(path: &Path) -> Result<Stat> {
    stat(path)
}

/// Read and parse a JSON file
///
/// # Errors
/// - `NotFound` if the file does not exist
/// - `Validation` if the content is not valid JSON for `T`
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|source| Error::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `data` as pretty JSON (2-space indent) into `path`
pub fn write_json_file<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(data).map_err(|e| {
        Error::Validation(format!(
            "Failed to serialize data to JSON: {}: {e}",
            path.display()
        ))
    })?;
    write_file(path, content)
}

/// Recursively calculate the total size of a directory in bytes
///
/// Symbolic links are followed the same way the tree walker follows them.
pub fn dir_size(path: &Path) -> Result<u64> {
    let mut total = 0;
    for name in read_directory(path)? {
        let child = path.join(name);
        let stat = stat(&child)?;
        total += match stat.kind {
            EntryKind::File => stat.len,
            EntryKind::Directory => dir_size(&child)?,
        };
    }
    Ok(total)
}
