//! Common functionality for the flexibility market simulator.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod finance;
pub mod id;
pub mod input;
pub mod log;
pub mod market;
pub mod output;
pub mod scenario;
pub mod settings;
pub mod simulation;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the directory in which the program's config files are kept.
///
/// Falls back to the current directory if the platform has no config directory.
pub fn get_flexmarket_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_default();
    path.push("flexmarket");

    path
}
