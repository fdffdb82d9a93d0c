use std::path::PathBuf;

use super::resolve_dir;
use crate::config::Settings;
use crate::forge::GitHubForge;
use crate::publisher::{PublishTargets, Publisher};
use crate::ui::{ConsoleReporter, Prompter, Reporter, TerminalPrompter};
use crate::vcs::GitClient;
use crate::{Error, Result};

/// Validate and publish an extension.
pub fn run(settings: &Settings, path: Option<PathBuf>, git: bool, github: bool) -> Result<()> {
    let prompter = TerminalPrompter;
    let reporter = ConsoleReporter;
    let dir = resolve_dir(path, &prompter)?;

    let vcs = GitClient::new();
    let forge = GitHubForge::new(settings.forge_api_url.clone());
    let publisher = Publisher::new(&vcs, &forge, settings.forge_host.clone(), &prompter, &reporter);

    let package = publisher.prepare(&dir)?;

    let targets = if git || github {
        PublishTargets { git, forge: github }
    } else {
        ask_targets(&prompter)?
    };

    let summary = publisher.publish(&dir, &package, targets)?;
    if let Some((_, release)) = &summary.release {
        if let Some(url) = &release.html_url {
            println!("  {}", url);
        }
    }
    reporter.success("Publishing complete!");
    Ok(())
}

fn ask_targets(prompter: &dyn Prompter) -> Result<PublishTargets> {
    let selected = prompter.multi_select(
        "Where would you like to publish?",
        &PublishTargets::CHOICES,
        &[true, false],
    )?;
    let targets = PublishTargets::from_selection(&selected);
    if targets.is_empty() {
        return Err(Error::NoTargets);
    }
    Ok(targets)
}
