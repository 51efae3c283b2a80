use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("failed to download {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("failed to extract archive {path}: {reason}")]
    Extract { path: PathBuf, reason: String },

    #[error("failed to install binary at {path}: {source}")]
    Install {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("package manager failed: {0}")]
    PackageManager(String),

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write report: {0}")]
    Report(std::io::Error),

    #[error("directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),
}
