//! Single repository operations behind the `git` command.

use clap::ValueEnum;
use std::fmt::Write as _;
use std::path::Path;
use tracing::instrument;

use crate::ui::{InputRule, Prompter, Question, Reporter};
use crate::vcs::{RepoStatus, Vcs};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GitAction {
    Init,
    AddRemote,
    Commit,
    Push,
    Status,
}

impl GitAction {
    pub const ALL: [GitAction; 5] = [
        GitAction::Init,
        GitAction::AddRemote,
        GitAction::Commit,
        GitAction::Push,
        GitAction::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GitAction::Init => "Initialize repository",
            GitAction::AddRemote => "Add remote",
            GitAction::Commit => "Commit changes",
            GitAction::Push => "Push to remote",
            GitAction::Status => "View status",
        }
    }

    /// Ask which action to run.
    pub fn choose(prompter: &dyn Prompter) -> Result<Self> {
        let labels = Self::ALL.map(GitAction::label);
        let index = prompter.select("Git action", &labels, 0)?;
        Ok(Self::ALL.get(index).copied().unwrap_or(GitAction::Status))
    }
}

/// Runs [`GitAction`]s against one directory.
pub struct RepositoryManager<'a> {
    vcs: &'a dyn Vcs,
    prompter: &'a dyn Prompter,
    reporter: &'a dyn Reporter,
}

impl<'a> RepositoryManager<'a> {
    pub fn new(vcs: &'a dyn Vcs, prompter: &'a dyn Prompter, reporter: &'a dyn Reporter) -> Self {
        Self {
            vcs,
            prompter,
            reporter,
        }
    }

    #[instrument(skip(self))]
    pub fn run(&self, dir: &Path, action: GitAction) -> Result<()> {
        match action {
            GitAction::Init => self.init(dir),
            GitAction::AddRemote => self.add_remote(dir),
            GitAction::Commit => self.commit(dir),
            GitAction::Push => self.push(dir),
            GitAction::Status => {
                let status = self.vcs.status(dir)?;
                print!("{}", format_status(&status));
                Ok(())
            }
        }
    }

    fn init(&self, dir: &Path) -> Result<()> {
        if self.vcs.is_repo(dir) {
            self.reporter.warn("Already a git repository");
            return Ok(());
        }
        self.vcs.init(dir)?;
        self.reporter.success("Git repository initialized");
        Ok(())
    }

    fn add_remote(&self, dir: &Path) -> Result<()> {
        let name = self
            .prompter
            .input(&Question::new("Remote name").default("origin").rule(InputRule::NonEmpty))?;
        let url = self
            .prompter
            .input(&Question::new("Repository URL").rule(InputRule::NonEmpty))?;

        self.reporter.step(&format!("Adding remote {}...", name));
        self.vcs.add_remote(dir, &name, &url)?;
        self.reporter.success(&format!("Remote added: {}", name));
        Ok(())
    }

    fn commit(&self, dir: &Path) -> Result<()> {
        self.reporter.step("Staging all changes...");
        self.vcs.add_all(dir)?;

        let status = self.vcs.status(dir)?;
        if status.is_clean() {
            self.reporter.warn("No changes to commit");
            return Ok(());
        }

        println!("Files staged:");
        for file in &status.files {
            println!("  - {}", file.path);
        }

        let message = self
            .prompter
            .input(&Question::new("Commit message").rule(InputRule::NonEmpty))?;
        self.reporter.step("Creating commit...");
        self.vcs.commit(dir, &message)?;
        self.reporter.success(&format!("Commit created: \"{}\"", message));
        Ok(())
    }

    fn push(&self, dir: &Path) -> Result<()> {
        let remote = self
            .prompter
            .input(&Question::new("Remote name").default("origin").rule(InputRule::NonEmpty))?;
        let branch = self
            .prompter
            .input(&Question::new("Branch name").default("main").rule(InputRule::NonEmpty))?;

        self.reporter.step(&format!("Pushing to {}/{}...", remote, branch));
        self.vcs.push(dir, &remote, &branch)?;
        self.reporter.success("Push successful");
        Ok(())
    }
}

/// Human-readable status listing.
pub fn format_status(status: &RepoStatus) -> String {
    let mut out = String::from("\nGit Status:\n\n");
    let _ = writeln!(out, "Branch: {}", status.branch.as_deref().unwrap_or("(no branch)"));
    let _ = writeln!(
        out,
        "Tracking: {}\n",
        status.tracking.as_deref().unwrap_or("not set")
    );

    if status.is_clean() {
        out.push_str("No changes\n");
    } else {
        out.push_str("Modified files:\n");
        for file in &status.files {
            let _ = writeln!(out, "  {} {}", file.change.marker(), file.path);
        }
    }

    let _ = writeln!(out, "\nAhead: {}, Behind: {}", status.ahead, status.behind);
    out
}
