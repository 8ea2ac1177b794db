//! High-level command orchestration for the CLI.
//!
//! Each function here corresponds to a subcommand in `main.rs`. They wrap
//! the library operations with `anyhow` context, print results through
//! `crate::ui`, and record what they did in the application log under
//! `Paths::log_dir`.

use anstyle::AnsiColor;
use anyhow::{Context, Result, bail};
use std::path::Path;

use crate::config::{Config, LockedConfig};
use crate::entry::{EntryKind, stat};
use crate::error::{Error, ErrorKind};
use crate::fs_utils::{dir_size, list_files_in_directory, read_directory};
use crate::logger::{Level, Logger, LoggerConfig};
use crate::paths::Paths;
use crate::tree::{copy_directory, delete_directory, move_directory};
use crate::ui::Ui;
use crate::versions::AppInfo;

/// Process exit code for a failed command
///
/// `NotFound` anywhere in the error chain exits with 2 so scripts can retry
/// with a different path; every other failure exits with 1.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    let kind = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<Error>())
        .map(Error::kind);
    match kind {
        Some(ErrorKind::NotFound) => 2,
        _ => 1,
    }
}

fn app_logger(paths: &Paths) -> Logger {
    Logger::new(
        LoggerConfig::for_app(&AppInfo::builtin())
            .with_directory(&paths.log_dir)
            .with_console(false),
    )
}

/// Append to the application log; a logging failure only warns
fn record(paths: &Paths, ui: &Ui, level: Level, message: &str) {
    if let Err(e) = app_logger(paths).log(level, message) {
        ui.warn(format!("Could not write application log: {}", e));
    }
}

/// Run a tree operation, logging the outcome either way
fn run_logged(
    paths: &Paths,
    ui: &Ui,
    what: String,
    op: impl FnOnce() -> crate::error::Result<()>,
) -> Result<()> {
    match op() {
        Ok(()) => {
            record(paths, ui, Level::Info, &what);
            Ok(())
        }
        Err(e) => {
            record(paths, ui, Level::Error, &format!("{what} failed: {e}"));
            Err(e).with_context(|| format!("{what} failed"))
        }
    }
}

/// Recursively copy a directory
pub fn cp(paths: &Paths, src: &Path, dst: &Path, ui: &Ui) -> Result<()> {
    let what = format!("Copy {} -> {}", src.display(), dst.display());
    run_logged(paths, ui, what, || copy_directory(src, dst))?;

    ui.ok(format!("Copied {} to {}", ui.path(src), ui.path(dst)));
    Ok(())
}

/// Move a directory (copy, then delete the source)
pub fn mv(paths: &Paths, src: &Path, dst: &Path, ui: &Ui) -> Result<()> {
    let what = format!("Move {} -> {}", src.display(), dst.display());
    let result = run_logged(paths, ui, what, || move_directory(src, dst));

    if result.is_err() && src.exists() && dst.exists() {
        ui.warn(format!(
            "Both {} and {} exist now. Re-run 'jem rm {}' to finish the move.",
            src.display(),
            dst.display(),
            src.display()
        ));
    }
    result?;

    ui.ok(format!("Moved {} to {}", ui.path(src), ui.path(dst)));
    Ok(())
}

/// Recursively delete a directory
pub fn rm(paths: &Paths, target: &Path, ui: &Ui, force: bool) -> Result<()> {
    if !target.exists() {
        bail!(Error::not_found(target));
    }

    // Confirm unless --force
    if !force {
        let confirm = inquire::Confirm::new(&format!(
            "Are you sure you want to delete '{}'?",
            target.display()
        ))
        .with_default(false)
        .with_help_message("This will permanently delete the directory and everything in it")
        .prompt()
        .context("Confirmation cancelled")?;

        if !confirm {
            ui.warn("Deletion cancelled.");
            return Ok(());
        }
    }

    let what = format!("Delete {}", target.display());
    run_logged(paths, ui, what, || delete_directory(target))?;

    ui.ok(format!("Deleted {}", ui.path(target)));
    Ok(())
}

/// List a directory's entries
pub fn ls(dir: &Path, files_only: bool, ui: &Ui) -> Result<()> {
    let mut names = if files_only {
        list_files_in_directory(dir)
    } else {
        read_directory(dir)
    }
    .with_context(|| format!("Failed to list {}", dir.display()))?;
    names.sort();

    if names.is_empty() {
        ui.warn(format!("{} is empty.", ui.path(dir)));
        return Ok(());
    }

    let mut table = ui.table();
    table.set_header(vec![
        ui.header_cell("Name"),
        ui.header_cell("Type"),
        ui.header_cell("Size"),
    ]);

    for name in &names {
        let path = dir.join(name);
        // entries can vanish between listing and stat
        let (kind_cell, size) = match stat(&path) {
            Ok(s) if s.kind == EntryKind::Directory => (
                ui.colored_cell("dir", AnsiColor::Blue),
                dir_size(&path).map(format_bytes).unwrap_or_else(|_| "?".into()),
            ),
            Ok(s) => (ui.cell("file"), format_bytes(s.len)),
            Err(_) => (ui.colored_cell("gone", AnsiColor::Yellow), "-".into()),
        };
        table.add_row(vec![ui.cell(name), kind_cell, ui.cell(size)]);
    }

    ui.section(dir.display().to_string());
    ui.println(table.to_string());
    Ok(())
}

/// Show details about a file or directory
pub fn stat_path(target: &Path, ui: &Ui) -> Result<()> {
    let info = stat(target).with_context(|| format!("Failed to stat {}", target.display()))?;

    let mut table = ui.simple_table();
    let kind = match info.kind {
        EntryKind::File => "file",
        EntryKind::Directory => "directory",
    };
    table.add_row(vec![ui.cell("Type:"), ui.header_cell(kind)]);

    let size = match info.kind {
        EntryKind::File => info.len,
        EntryKind::Directory => dir_size(target)
            .with_context(|| format!("Failed to calculate size for {}", target.display()))?,
    };
    table.add_row(vec![ui.cell("Size:"), ui.cell(format_bytes(size))]);

    let modified = info
        .modified
        .map(|m| m.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "(unknown)".to_string());
    table.add_row(vec![ui.cell("Modified:"), ui.cell(modified)]);

    ui.section(target.display().to_string());
    ui.println(table.to_string());
    Ok(())
}

/// Format bytes as human-readable string
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Print a config value as JSON
pub fn config_get(paths: &Paths, key: &str, ui: &Ui) -> Result<()> {
    let config = Config::load_or_default(&paths.config_file)
        .with_context(|| format!("Failed to load config: {}", paths.config_file.display()))?;

    match config.get(key) {
        Some(value) => {
            ui.println(serde_json::to_string_pretty(value)?);
            Ok(())
        }
        None => bail!(
            "Config key '{}' is not set.\nHint: Use 'jem config list' to see available keys.",
            key
        ),
    }
}

/// Set a config value. `raw` is parsed as JSON, falling back to a plain string.
pub fn config_set(paths: &Paths, key: &str, raw: &str, ui: &Ui) -> Result<()> {
    let value = serde_json::from_str::<serde_json::Value>(raw)
        .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));

    let mut locked = LockedConfig::lock(&paths.config_file)
        .with_context(|| format!("Failed to open config: {}", paths.config_file.display()))?;
    locked.update(|cfg| cfg.set(key, &value))?;

    record(paths, ui, Level::Info, &format!("Config '{key}' set"));
    ui.ok(format!("Set '{}' = {}", key, value));
    Ok(())
}

/// List all config keys and values
pub fn config_list(paths: &Paths, ui: &Ui) -> Result<()> {
    let config = Config::load_or_default(&paths.config_file)
        .with_context(|| format!("Failed to load config: {}", paths.config_file.display()))?;

    if config.is_empty() {
        ui.warn("No configuration values set.");
        ui.newline();
        ui.println("Set one with:");
        ui.println(format!("  {} config set <key> <value>", ui.bold("jem")));
        return Ok(());
    }

    let mut table = ui.table();
    table.set_header(vec![ui.header_cell("Key"), ui.header_cell("Value")]);
    for key in config.keys() {
        let value = config.get(key).map(|v| v.to_string()).unwrap_or_default();
        table.add_row(vec![ui.cell(key), ui.cell(value)]);
    }

    ui.section(format!("Config: {}", paths.config_file.display()));
    ui.println(table.to_string());
    Ok(())
}

/// Append a message to the application log
pub fn log(paths: &Paths, level: Level, message: &str, ui: &Ui) -> Result<()> {
    let logger = app_logger(paths);
    logger
        .log(level, message)
        .with_context(|| format!("Failed to write {}", logger.log_path().display()))?;

    ui.ok(format!("Logged to {}", ui.path(&logger.log_path())));
    Ok(())
}
