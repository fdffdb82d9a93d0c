use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, instrument};

use super::copy::copy_extension_tree;
use super::deps::DependencyInstaller;
use crate::layout::ExtensionLayout;
use crate::manifest::ExtensionManifest;
use crate::ui::{Prompter, Reporter};
use crate::vcs::Vcs;
use crate::{Error, Result};

static REPO_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/([^/]+?)(\.git)?$").expect("valid repository name pattern"));

/// Where an extension is installed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallSource {
    Remote(String),
    Local(PathBuf),
}

impl InstallSource {
    /// `http...` and `git@...` sources are cloned; anything else is a local path.
    pub fn parse(source: &str) -> Self {
        if source.starts_with("http") || source.starts_with("git@") {
            InstallSource::Remote(source.to_string())
        } else {
            InstallSource::Local(PathBuf::from(source))
        }
    }
}

/// Folder name for a cloned repository: last path segment without `.git`.
///
/// Names that would leave the install root fall back to `extension`.
pub fn remote_folder_name(url: &str) -> String {
    REPO_NAME
        .captures(url)
        .map(|c| c[1].trim_end_matches(".git").to_string())
        .filter(|name| !matches!(name.as_str(), "" | "." | ".."))
        .filter(|name| !name.contains(['/', '\\']))
        .unwrap_or_else(|| "extension".to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed {
        path: PathBuf,
        manifest: ExtensionManifest,
    },
    /// The user declined to overwrite an existing install.
    Cancelled,
}

/// Installs extensions into the per-user extensions directory.
pub struct Installer<'a> {
    root: PathBuf,
    vcs: &'a dyn Vcs,
    deps: &'a dyn DependencyInstaller,
    prompter: &'a dyn Prompter,
    reporter: &'a dyn Reporter,
}

impl<'a> Installer<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        vcs: &'a dyn Vcs,
        deps: &'a dyn DependencyInstaller,
        prompter: &'a dyn Prompter,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            root: root.into(),
            vcs,
            deps,
            prompter,
            reporter,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Install from a remote URL or local directory.
    ///
    /// A folder that fails manifest verification after cloning or copying is
    /// left in place.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn install(&self, source: &str) -> Result<InstallOutcome> {
        std::fs::create_dir_all(&self.root).map_err(|e| Error::FileWrite {
            path: self.root.clone(),
            source: e,
        })?;

        let target = match InstallSource::parse(source) {
            InstallSource::Remote(url) => self.clone_remote(&url)?,
            InstallSource::Local(path) => match self.copy_local(&path)? {
                Some(target) => target,
                None => return Ok(InstallOutcome::Cancelled),
            },
        };

        self.reporter.step("Verifying extension...");
        let layout = ExtensionLayout::new(&target);
        if !layout.has_manifest() {
            self.reporter.fail("manifest.json not found");
            return Err(Error::InvalidExtension(target));
        }
        let manifest = ExtensionManifest::load(layout.manifest())?;

        if layout.has_package_json() {
            self.reporter.step("Installing dependencies...");
            self.deps.install(&target)?;
        }

        info!(id = %manifest.id, path = %target.display(), "extension installed");
        Ok(InstallOutcome::Installed {
            path: target,
            manifest,
        })
    }

    fn clone_remote(&self, url: &str) -> Result<PathBuf> {
        let target = self.root.join(remote_folder_name(url));
        if target.exists() {
            debug!(path = %target.display(), "removing previous install");
            remove_dir(&target)?;
        }

        self.reporter.step("Cloning repository...");
        self.vcs.clone_repo(url, &target)?;
        Ok(target)
    }

    /// Copy a local extension; `None` when the user keeps the existing install.
    fn copy_local(&self, source: &Path) -> Result<Option<PathBuf>> {
        if !source.is_dir() {
            self.reporter.fail("Source directory not found");
            return Err(Error::SourceNotFound(source.to_path_buf()));
        }

        let resolved = std::fs::canonicalize(source).map_err(|e| Error::FileRead {
            path: source.to_path_buf(),
            source: e,
        })?;
        let name = resolved
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "extension".to_string());
        let target = self.root.join(&name);

        if target.exists() {
            let overwrite = self.prompter.confirm(
                &format!("Extension \"{}\" already exists. Overwrite?", name),
                false,
            )?;
            if !overwrite {
                self.reporter.fail("Installation cancelled");
                return Ok(None);
            }
            remove_dir(&target)?;
        }

        self.reporter.step("Copying extension...");
        copy_extension_tree(&resolved, &target).map_err(|e| Error::Copy {
            path: target.clone(),
            source: e,
        })?;
        Ok(Some(target))
    }
}

fn remove_dir(path: &Path) -> Result<()> {
    std::fs::remove_dir_all(path).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
