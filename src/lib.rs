pub mod cli;
pub mod config;
pub mod forge;
pub mod installer;
pub mod layout;
pub mod manifest;
pub mod publisher;
pub mod repository;
pub mod scaffold;
pub mod ui;
pub mod update;
pub mod vcs;

#[cfg(test)]
pub(crate) mod testing;

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Config errors
    #[error("could not determine configuration directory")]
    NoConfigDir,

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    // Manifest errors
    #[error("manifest.json not found in {0}")]
    ManifestNotFound(PathBuf),

    #[error("invalid JSON in {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("manifest validation failed ({0} error(s))")]
    ValidationFailed(usize),

    #[error("package.json not found in {0}")]
    PackageJsonNotFound(PathBuf),

    // Scaffolder errors
    #[error("extension '{name}' already exists at {path}")]
    ExtensionExists { name: String, path: PathBuf },

    // Installer errors
    #[error("directory not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("invalid extension: missing manifest.json in {0}")]
    InvalidExtension(PathBuf),

    #[error("failed to copy extension into {path}: {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to run '{command}': {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' failed with {}", exit_code_label(.code))]
    CommandFailed { command: String, code: Option<i32> },

    // Git errors
    #[error("failed to clone '{url}': {source}")]
    Clone {
        url: String,
        #[source]
        source: git2::Error,
    },

    #[error("failed to push to {remote}/{branch}: {source}")]
    Push {
        remote: String,
        branch: String,
        #[source]
        source: git2::Error,
    },

    #[error("no '{0}' remote configured (set up a git remote first)")]
    NoRemote(String),

    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    // Forge errors
    #[error("repository must be hosted on {host}: {url}")]
    UnsupportedRemote { host: String, url: String },

    #[error("release creation failed: {0}")]
    ReleaseFailed(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Interaction errors
    #[error("select at least one publish target")]
    NoTargets,

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("failed to watch files: {0}")]
    Watch(#[from] notify::Error),

    #[error("failed to install interrupt handler: {0}")]
    Signal(#[from] ctrlc::Error),

    // File errors
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON in {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
