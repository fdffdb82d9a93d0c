//! Publishing: validate, push to the repository, and optionally cut a forge release.

use std::path::Path;
use tracing::{debug, info, instrument, warn};

use crate::forge::{Forge, Release, ReleaseRequest, RepoSlug, parse_remote_url};
use crate::layout::ExtensionLayout;
use crate::manifest::{PackageDescriptor, validate};
use crate::ui::{InputRule, Prompter, Question, Reporter};
use crate::vcs::Vcs;
use crate::{Error, Result};

const ORIGIN: &str = "origin";

/// Branches tried in order when pushing.
const PUSH_BRANCHES: [&str; 2] = ["main", "master"];

/// Where to publish. A forge release always includes the repository push.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishTargets {
    pub git: bool,
    pub forge: bool,
}

impl PublishTargets {
    /// Labels offered in the interactive picker, in index order.
    pub const CHOICES: [&'static str; 2] = ["GitHub", "Git Repository"];

    pub fn from_selection(indices: &[usize]) -> Self {
        Self {
            forge: indices.contains(&0),
            git: indices.contains(&1),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.git && !self.forge
    }

    pub fn pushes(&self) -> bool {
        self.git || self.forge
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishSummary {
    pub version: String,
    pub committed: bool,
    /// Branch that accepted the push, if any.
    pub pushed: Option<String>,
    pub release: Option<(RepoSlug, Release)>,
}

pub struct Publisher<'a> {
    vcs: &'a dyn Vcs,
    forge: &'a dyn Forge,
    forge_host: String,
    prompter: &'a dyn Prompter,
    reporter: &'a dyn Reporter,
}

impl<'a> Publisher<'a> {
    pub fn new(
        vcs: &'a dyn Vcs,
        forge: &'a dyn Forge,
        forge_host: impl Into<String>,
        prompter: &'a dyn Prompter,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            vcs,
            forge,
            forge_host: forge_host.into(),
            prompter,
            reporter,
        }
    }

    /// Validate the extension and load its package descriptor.
    ///
    /// Nothing is touched when this fails.
    pub fn prepare(&self, dir: &Path) -> Result<PackageDescriptor> {
        self.reporter.step("Validating extension...");
        let report = validate(dir)?;
        if !report.is_valid() {
            for error in &report.errors {
                self.reporter.fail(error);
            }
            return Err(Error::ValidationFailed(report.errors.len()));
        }

        let layout = ExtensionLayout::new(dir);
        if !layout.has_package_json() {
            return Err(Error::PackageJsonNotFound(dir.to_path_buf()));
        }
        let package = PackageDescriptor::load(layout.package_json())?;
        self.reporter.success("Extension validated");
        Ok(package)
    }

    #[instrument(skip(self, package), fields(version = %package.version))]
    pub fn publish(
        &self,
        dir: &Path,
        package: &PackageDescriptor,
        targets: PublishTargets,
    ) -> Result<PublishSummary> {
        if targets.is_empty() {
            return Err(Error::NoTargets);
        }

        let mut summary = PublishSummary {
            version: package.version.clone(),
            ..Default::default()
        };

        if targets.pushes() {
            let (committed, pushed) = self.update_repository(dir, &package.version)?;
            summary.committed = committed;
            summary.pushed = pushed;
        }

        if targets.forge {
            summary.release = Some(self.create_release(dir, package)?);
        }

        info!(committed = summary.committed, pushed = ?summary.pushed, "publish complete");
        Ok(summary)
    }

    /// Commit outstanding changes and push. Returns whether a commit was made
    /// and which branch accepted the push.
    fn update_repository(&self, dir: &Path, version: &str) -> Result<(bool, Option<String>)> {
        if !self.vcs.is_repo(dir) {
            self.reporter.step("Initializing git repository...");
            self.vcs.init(dir)?;
        }

        if !self.vcs.has_remote(dir, ORIGIN)? {
            let url = self.prompter.input(
                &Question::new("Repository URL (e.g., git@github.com:username/repo.git)")
                    .rule(InputRule::NonEmpty),
            )?;
            self.reporter.step("Adding remote origin...");
            self.vcs.add_remote(dir, ORIGIN, &url)?;
        }

        self.reporter.step("Staging changes...");
        self.vcs.add_all(dir)?;

        let committed = !self.vcs.status(dir)?.is_clean();
        if committed {
            self.reporter.step("Creating commit...");
            self.vcs
                .commit(dir, &format!("v{}: Release {}", version, version))?;
        }

        self.reporter.step("Pushing to repository...");
        let pushed = self.push_first_accepting(dir);
        if pushed.is_none() {
            self.reporter
                .warn("Could not push to remote (you may need to set up branch)");
        }

        self.reporter.success("Git repository updated");
        Ok((committed, pushed))
    }

    fn push_first_accepting(&self, dir: &Path) -> Option<String> {
        PUSH_BRANCHES.iter().find_map(|branch| {
            match self.vcs.push(dir, ORIGIN, branch) {
                Ok(()) => Some(branch.to_string()),
                Err(e) => {
                    debug!(branch, error = %e, "push rejected");
                    None
                }
            }
        })
    }

    fn create_release(&self, dir: &Path, package: &PackageDescriptor) -> Result<(RepoSlug, Release)> {
        self.reporter.step("Configuring GitHub...");
        let url = self
            .vcs
            .remote_url(dir, ORIGIN)?
            .ok_or_else(|| Error::NoRemote(ORIGIN.to_string()))?;

        let slug = parse_remote_url(&self.forge_host, &url).ok_or_else(|| {
            warn!(url = %url, "remote is not on the forge host");
            Error::UnsupportedRemote {
                host: self.forge_host.clone(),
                url: url.clone(),
            }
        })?;

        let token = self.prompter.password(&format!(
            "GitHub token (create at https://{}/settings/tokens)",
            self.forge_host
        ))?;

        self.reporter.step("Creating GitHub release...");
        let request = ReleaseRequest::for_version(&package.version, package.description.as_deref());
        let release = self.forge.create_release(&slug, &token, &request)?;

        self.reporter.success(&format!(
            "Release published: {} v{}",
            slug, package.version
        ));
        Ok((slug, release))
    }
}
