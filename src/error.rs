//! Error types shared by every filesystem operation in the crate.
//!
//! Callers match on [`Error::kind`] rather than on individual variants: a
//! [`ErrorKind::NotFound`] is usually recoverable (ask for another path),
//! while [`ErrorKind::Internal`] means an I/O primitive failed underneath us.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A path (or variable) required to exist did not exist at check time
    NotFound,
    /// An I/O primitive failed for a reason other than non-existence
    Internal,
    /// Input content was not well-formed
    Validation,
}

impl ErrorKind {
    /// HTTP-style status code, kept for callers that surface errors over an API
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::Internal => 500,
            ErrorKind::Validation => 400,
        }
    }
}

/// The I/O step that was running when an [`Error::Internal`] was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    CreateDir,
    ReadDir,
    Stat,
    CopyFile,
    RemoveFile,
    RemoveDir,
    Read,
    Write,
    Rename,
    Lock,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Step::CreateDir => "create directory",
            Step::ReadDir => "read directory",
            Step::Stat => "stat",
            Step::CopyFile => "copy file",
            Step::RemoveFile => "remove file",
            Step::RemoveDir => "remove directory",
            Step::Read => "read",
            Step::Write => "write",
            Step::Rename => "rename",
            Step::Lock => "lock",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Path not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to {step} {}: {source}", path.display())]
    Internal {
        step: Step,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to copy file: {} -> {}: {source}", from.display(), to.display())]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON in file: {}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Environment variable {0} is not set")]
    MissingEnv(String),

    #[error("{0}")]
    Validation(String),
}

impl Error {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Error::NotFound { path: path.into() }
    }

    pub fn internal(step: Step, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Internal {
            step,
            path: path.into(),
            source,
        }
    }

    /// Translate an `io::Error` from `step` on `path`.
    ///
    /// `NotFound` from the OS becomes [`Error::NotFound`]; everything else is
    /// an [`Error::Internal`] carrying the step.
    pub fn from_io(step: Step, path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Error::not_found(path)
        } else {
            Error::internal(step, path, source)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } | Error::MissingEnv(_) => ErrorKind::NotFound,
            Error::Internal { .. } | Error::CopyFailed { .. } => ErrorKind::Internal,
            Error::InvalidJson { .. } | Error::Validation(_) => ErrorKind::Validation,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Path the failing operation was working on, when there is one
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::NotFound { path }
            | Error::Internal { path, .. }
            | Error::InvalidJson { path, .. } => Some(path),
            Error::CopyFailed { from, .. } => Some(from),
            Error::MissingEnv(_) | Error::Validation(_) => None,
        }
    }

    pub fn step(&self) -> Option<Step> {
        match self {
            Error::Internal { step, .. } => Some(*step),
            Error::CopyFailed { .. } => Some(Step::CopyFile),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_and_status_codes() {
        let nf = Error::not_found("/missing");
        assert_eq!(nf.kind(), ErrorKind::NotFound);
        assert_eq!(nf.kind().status_code(), 404);
        assert!(nf.is_not_found());

        let internal = Error::internal(
            Step::ReadDir,
            "/dir",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(internal.kind(), ErrorKind::Internal);
        assert_eq!(internal.kind().status_code(), 500);
        assert_eq!(internal.step(), Some(Step::ReadDir));

        let invalid = Error::Validation("Content must be a string".to_string());
        assert_eq!(invalid.kind().status_code(), 400);
        assert_eq!(invalid.to_string(), "Content must be a string");

        assert_eq!(Error::MissingEnv("HOME".into()).kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_from_io_maps_not_found() {
        let err = Error::from_io(
            Step::Stat,
            Path::new("/a/b"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(matches!(err, Error::NotFound { .. }));
        assert_eq!(err.path(), Some(Path::new("/a/b")));

        let err = Error::from_io(
            Step::Stat,
            Path::new("/a/b"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.to_string().starts_with("Failed to stat /a/b"));
    }

    #[test]
    fn test_copy_failed_message_names_both_paths() {
        let err = Error::CopyFailed {
            from: PathBuf::from("src/a.txt"),
            to: PathBuf::from("dst/a.txt"),
            source: io::Error::other("disk full"),
        };
        let msg = err.to_string();
        assert!(msg.contains("src/a.txt -> dst/a.txt"));
        assert_eq!(err.step(), Some(Step::CopyFile));
        assert_eq!(err.path(), Some(Path::new("src/a.txt")));
    }
}
