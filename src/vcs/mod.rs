mod git;

pub use git::GitClient;

use std::path::Path;

use crate::Result;

/// A configured remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChange {
    New,
    Modified,
    Deleted,
    Renamed,
    Other,
}

impl FileChange {
    /// Single-character marker used in status listings.
    pub fn marker(self) -> char {
        match self {
            FileChange::New => '?',
            FileChange::Modified => '◆',
            FileChange::Deleted => '✗',
            FileChange::Renamed | FileChange::Other => '■',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatus {
    pub path: String,
    pub change: FileChange,
    /// Whether the change is in the index.
    pub staged: bool,
}

/// Working tree summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoStatus {
    pub branch: Option<String>,
    pub tracking: Option<String>,
    pub ahead: usize,
    pub behind: usize,
    pub files: Vec<FileStatus>,
}

impl RepoStatus {
    pub fn is_clean(&self) -> bool {
        self.files.is_empty()
    }
}

/// Version-control operations used by the installer, publisher and `git` command.
///
/// Every operation acts on the repository rooted exactly at `dir`.
pub trait Vcs {
    fn is_repo(&self, dir: &Path) -> bool;
    fn init(&self, dir: &Path) -> Result<()>;
    fn remotes(&self, dir: &Path) -> Result<Vec<Remote>>;
    fn add_remote(&self, dir: &Path, name: &str, url: &str) -> Result<()>;
    /// Stage every change in the working tree, including deletions.
    fn add_all(&self, dir: &Path) -> Result<()>;
    fn status(&self, dir: &Path) -> Result<RepoStatus>;
    fn commit(&self, dir: &Path, message: &str) -> Result<()>;
    fn push(&self, dir: &Path, remote: &str, branch: &str) -> Result<()>;
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()>;

    /// URL of the named remote, if configured.
    fn remote_url(&self, dir: &Path, name: &str) -> Result<Option<String>> {
        Ok(self
            .remotes(dir)?
            .into_iter()
            .find(|r| r.name == name)
            .and_then(|r| r.url))
    }

    fn has_remote(&self, dir: &Path, name: &str) -> Result<bool> {
        Ok(self.remotes(dir)?.iter().any(|r| r.name == name))
    }
}
