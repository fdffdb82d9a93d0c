mod check_updates;
mod create;
mod dev;
mod git;
mod install;
mod list;
mod publish;
mod validate;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::config::Settings;
use crate::repository::GitAction;
use crate::update::{BackgroundCheck, default_checker, display_update_notification};
use crate::Result;

#[derive(Parser)]
#[command(name = "codeinspector")]
#[command(about = "Scaffold, validate, install and publish CodeInspector extensions")]
#[command(version, disable_version_flag = true)]
pub struct Cli {
    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new extension under ./extensions
    Create {
        /// Extension name
        name: Option<String>,
    },

    /// List extensions
    List {
        /// List extensions installed for the current user instead of ./extensions
        #[arg(long)]
        installed: bool,
    },

    /// Validate an extension manifest
    Validate {
        /// Extension directory (defaults to the current directory)
        path: Option<PathBuf>,
    },

    /// Install an extension from a git URL or local directory
    Install {
        /// Repository URL or local path
        source: Option<String>,
    },

    /// Publish an extension (git, GitHub release)
    Publish {
        /// Extension directory
        path: Option<PathBuf>,

        /// Push to the git repository
        #[arg(long)]
        git: bool,

        /// Push and create a GitHub release
        #[arg(long)]
        github: bool,
    },

    /// Manage the extension's git repository
    Git {
        /// Extension directory (defaults to the current directory)
        path: Option<PathBuf>,

        /// Action to run instead of choosing interactively
        #[arg(long, value_enum)]
        action: Option<GitAction>,
    },

    /// Watch an extension for changes
    Dev {
        /// Extension directory
        path: Option<PathBuf>,
    },

    /// Check for a newer release of this CLI
    CheckUpdates {
        /// Ignore the cached result
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let Some(command) = self.command else {
            Cli::command().print_help()?;
            return Ok(());
        };

        let settings = Settings::load()?;
        debug!(base_dir = %settings.base_dir.display(), "settings loaded");

        let background = match command {
            Commands::CheckUpdates { .. } => None,
            _ if settings.update_check => Some(BackgroundCheck::spawn(default_checker(&settings))),
            _ => None,
        };

        match command {
            Commands::Create { name } => create::run(name),
            Commands::List { installed } => list::run(&settings, installed),
            Commands::Validate { path } => validate::run(path),
            Commands::Install { source } => install::run(&settings, source),
            Commands::Publish { path, git, github } => publish::run(&settings, path, git, github),
            Commands::Git { path, action } => git::run(path, action),
            Commands::Dev { path } => dev::run(path),
            Commands::CheckUpdates { force } => check_updates::run(&settings, force),
        }?;

        if let Some(check) = background {
            display_update_notification(check.finish().as_ref());
        }
        Ok(())
    }
}

/// Directory argument, or ask for one defaulting to the working directory.
fn resolve_dir(path: Option<PathBuf>, prompter: &dyn crate::ui::Prompter) -> Result<PathBuf> {
    if let Some(path) = path {
        return Ok(path);
    }
    let cwd = std::env::current_dir()?;
    let answer = prompter.input(
        &crate::ui::Question::new("Extension directory path").default(cwd.display().to_string()),
    )?;
    Ok(PathBuf::from(answer))
}
