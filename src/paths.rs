use anyhow::{Context, Result};
use directories::BaseDirs;
use std::path::{Path, PathBuf};

/// All computed paths used by jem
#[derive(Debug, Clone)]
pub struct Paths {
    /// ~/.jem
    pub base_dir: PathBuf,
    /// ~/.jem/config.json
    pub config_file: PathBuf,
    /// ~/.jem/logs
    pub log_dir: PathBuf,
}

impl Paths {
    pub fn new() -> Result<Self> {
        let base_dirs = BaseDirs::new().context("Failed to determine home directory")?;
        Ok(Self::with_base(base_dirs.home_dir().join(".jem")))
    }

    /// Lay out every path under `base_dir`
    pub fn with_base(base_dir: PathBuf) -> Self {
        let config_file = base_dir.join("config.json");
        let log_dir = base_dir.join("logs");
        Self {
            base_dir,
            config_file,
            log_dir,
        }
    }

    /// Use `config_file` instead of the default location
    pub fn with_config_file(mut self, config_file: PathBuf) -> Self {
        self.config_file = config_file;
        self
    }

    /// Ensure all required directories exist
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.log_dir)
            .with_context(|| format!("Failed to create log directory: {:?}", self.log_dir))?;
        Ok(())
    }
}

/// Join path segments in order
pub fn join_path<I, P>(segments: I) -> PathBuf
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    segments
        .into_iter()
        .fold(PathBuf::new(), |acc, seg| acc.join(seg))
}

/// Directory portion of `path`; `.` when there is none
pub fn dir_name(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        Some(_) => Path::new("."),
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_under_base() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_base(temp_dir.path().join(".jem"));
        assert!(paths.config_file.ends_with(".jem/config.json"));
        assert!(paths.log_dir.ends_with(".jem/logs"));

        paths.ensure_dirs().unwrap();
        assert!(paths.log_dir.is_dir());
    }

    #[test]
    fn test_join_path() {
        assert_eq!(
            join_path(["dir", "subdir", "file.txt"]),
            PathBuf::from("dir/subdir/file.txt")
        );
        assert_eq!(join_path(Vec::<&str>::new()), PathBuf::new());
    }

    #[test]
    fn test_dir_name() {
        assert_eq!(dir_name(Path::new("/path/to/file.txt")), Path::new("/path/to"));
        assert_eq!(dir_name(Path::new("file.txt")), Path::new("."));
        assert_eq!(dir_name(Path::new("/")), Path::new("/"));
    }
}
