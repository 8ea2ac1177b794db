pub mod backend;
pub mod commands;
pub mod config;
pub mod datetime;
pub mod entry;
pub mod env;
pub mod error;
pub mod fs_utils;
pub mod logger;
pub mod paths;
pub mod tree;
pub mod ui;
pub mod versions;

#[cfg(test)]
pub mod test_utils;

pub use error::{Error, ErrorKind, Result};
pub use tree::{copy_directory, delete_directory, move_directory};
