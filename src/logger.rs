//! Application log files.
//!
//! A [`Logger`] is built once from a [`LoggerConfig`] and handed to the code
//! that needs it. Every call appends one line to the main log file (and to
//! any extra sinks whose level threshold it meets), creating the log
//! directory first if it is missing.
//!
//! This is the application-facing log, distinct from the `tracing`
//! diagnostics the library emits internally. Files are appended to without
//! rotation; `tracing-appender` would be the route if rotation is needed.

use chrono::{DateTime, Local};
use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::fs_utils::{append_to_file, create_directory, exists};
use crate::versions::AppInfo;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            _ => Err(Error::Validation(format!("Unknown log level: {s}"))),
        }
    }
}

/// An additional log file that only receives lines at or above `min_level`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSink {
    /// File name inside the log directory
    pub file_name: String,
    pub min_level: Level,
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub directory: PathBuf,
    pub file_name: String,
    /// Tag written into every line, usually the application name
    pub label: String,
    /// Mirror lines to stderr
    pub console: bool,
    pub extra_files: Vec<FileSink>,
}

impl LoggerConfig {
    /// `<cwd>/logs/<name>-<version>.log`, labelled with the app name
    pub fn for_app(app: &AppInfo) -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            directory: cwd.join("logs"),
            file_name: app.log_file_name(),
            label: app.name.clone(),
            console: true,
            extra_files: Vec::new(),
        }
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    pub fn with_extra_file(mut self, file_name: impl Into<String>, min_level: Level) -> Self {
        self.extra_files.push(FileSink {
            file_name: file_name.into(),
            min_level,
        });
        self
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::for_app(&AppInfo::builtin())
    }
}

#[derive(Debug, Clone)]
pub struct Logger {
    config: LoggerConfig,
}

impl Logger {
    pub fn new(config: LoggerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Path of the main log file
    pub fn log_path(&self) -> PathBuf {
        self.config.directory.join(&self.config.file_name)
    }

    /// Every file a line at `level` is written to
    fn targets(&self, level: Level) -> impl Iterator<Item = PathBuf> + '_ {
        std::iter::once(self.log_path()).chain(
            self.config
                .extra_files
                .iter()
                .filter(move |sink| level >= sink.min_level)
                .map(move |sink| self.config.directory.join(&sink.file_name)),
        )
    }

    /// `<timestamp> [<label>] [<LEVEL>] <message>`
    pub fn format_line(&self, level: Level, message: &str, at: DateTime<Local>) -> String {
        format!(
            "{} [{}] [{}] {}",
            at.format(TIMESTAMP_FORMAT),
            self.config.label,
            level,
            message
        )
    }

    pub fn log(&self, level: Level, message: &str) -> Result<()> {
        if !exists(&self.config.directory) {
            create_directory(&self.config.directory)?;
        }

        let line = self.format_line(level, message, Local::now());
        if self.config.console {
            anstream::eprintln!("{line}");
        }

        let line = format!("{line}\n");
        for path in self.targets(level) {
            append_to_file(&path, &line)?;
        }
        Ok(())
    }

    pub fn info(&self, message: &str) -> Result<()> {
        self.log(Level::Info, message)
    }

    pub fn warning(&self, message: &str) -> Result<()> {
        self.log(Level::Warning, message)
    }

    pub fn error(&self, message: &str) -> Result<()> {
        self.log(Level::Error, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn test_logger(temp_dir: &TempDir) -> Logger {
        let app = AppInfo {
            name: "jem-util".to_string(),
            version: "1.0.0".to_string(),
        };
        Logger::new(
            LoggerConfig::for_app(&app)
                .with_directory(temp_dir.path().join("logs"))
                .with_console(false),
        )
    }

    #[test]
    fn test_default_file_name_and_label() {
        let temp_dir = TempDir::new().unwrap();
        let logger = test_logger(&temp_dir);
        assert!(logger.log_path().ends_with("logs/jem-util-1.0.0.log"));
        assert_eq!(logger.config().label, "jem-util");
    }

    #[test]
    fn test_format_line() {
        let temp_dir = TempDir::new().unwrap();
        let logger = test_logger(&temp_dir);
        let at = Local.with_ymd_and_hms(2023, 10, 5, 14, 48, 0).unwrap();

        assert_eq!(
            logger.format_line(Level::Info, "Test message", at),
            "2023-10-05 14:48:00 [jem-util] [INFO] Test message"
        );
    }

    #[test]
    fn test_log_creates_directory_and_appends() {
        let temp_dir = TempDir::new().unwrap();
        let logger = test_logger(&temp_dir);

        logger.info("This is an info message").unwrap();
        logger.warning("This is a warning message").unwrap();
        logger.error("This is an error message").unwrap();

        let content = std::fs::read_to_string(logger.log_path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("[INFO] This is an info message"));
        assert!(lines[1].ends_with("[WARNING] This is a warning message"));
        assert!(lines[2].ends_with("[ERROR] This is an error message"));
    }

    #[test]
    fn test_extra_file_respects_min_level() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::new(
            test_logger(&temp_dir)
                .config()
                .clone()
                .with_file_name("combined.log")
                .with_extra_file("error.log", Level::Error),
        );

        logger.info("routine").unwrap();
        logger.error("boom").unwrap();

        let dir = temp_dir.path().join("logs");
        let combined = std::fs::read_to_string(dir.join("combined.log")).unwrap();
        let errors = std::fs::read_to_string(dir.join("error.log")).unwrap();
        assert_eq!(combined.lines().count(), 2);
        assert_eq!(errors.lines().count(), 1);
        assert!(errors.contains("[ERROR] boom"));
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("INFO".parse::<Level>().unwrap(), Level::Info);
        assert_eq!("warn".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!("error".parse::<Level>().unwrap(), Level::Error);
        assert!("debug".parse::<Level>().is_err());
        assert!(Level::Error > Level::Info);
    }
}
