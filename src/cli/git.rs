use std::path::PathBuf;

use crate::repository::{GitAction, RepositoryManager};
use crate::ui::{ConsoleReporter, TerminalPrompter};
use crate::vcs::GitClient;
use crate::Result;

/// Run one repository action in `path` (defaults to the working directory).
pub fn run(path: Option<PathBuf>, action: Option<GitAction>) -> Result<()> {
    let prompter = TerminalPrompter;
    let reporter = ConsoleReporter;
    let dir = match path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    let action = match action {
        Some(action) => action,
        None => GitAction::choose(&prompter)?,
    };

    let vcs = GitClient::new();
    RepositoryManager::new(&vcs, &prompter, &reporter).run(&dir, action)
}
