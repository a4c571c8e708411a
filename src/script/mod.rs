pub mod compose;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use thiserror::Error;

pub use compose::{compose, install_command};

pub const SCRIPT_FILE_NAME: &str = "sparkle-script.ps1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("no tweaks or apps selected")]
    EmptySelection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PackageManager {
    #[default]
    Winget,
    Chocolatey,
}

impl PackageManager {
    pub fn label(&self) -> &'static str {
        match self {
            PackageManager::Winget => "winget",
            PackageManager::Chocolatey => "chocolatey",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            PackageManager::Winget => PackageManager::Chocolatey,
            PackageManager::Chocolatey => PackageManager::Winget,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Apply,
    Unapply,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Apply => "apply",
            Direction::Unapply => "unapply",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Direction::Apply => Direction::Unapply,
            Direction::Unapply => Direction::Apply,
        }
    }
}

/// Write a generated script into `dir` under the conventional file name.
pub fn save_script(dir: impl AsRef<Path>, script: &str) -> Result<PathBuf> {
    let path = dir.as_ref().join(SCRIPT_FILE_NAME);
    fs::write(&path, script).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
