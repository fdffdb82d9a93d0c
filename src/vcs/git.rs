use git2::{
    BranchType, FetchOptions, IndexAddOption, PushOptions, RemoteCallbacks, Repository, Status,
    StatusOptions,
};
use std::path::Path;
use tracing::{debug, instrument};

use super::{FileChange, FileStatus, Remote, RepoStatus, Vcs};
use crate::{Error, Result};

/// [`Vcs`] implementation on libgit2.
#[derive(Debug, Default, Clone)]
pub struct GitClient;

impl GitClient {
    pub fn new() -> Self {
        Self
    }

    fn open(&self, dir: &Path) -> Result<Repository> {
        Ok(Repository::open(dir)?)
    }
}

/// Credential callbacks: SSH agent for git@ URLs, then credential helpers, then defaults.
fn remote_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|url, username_from_url, allowed_types| {
        if allowed_types.contains(git2::CredentialType::SSH_KEY) {
            if let Some(username) = username_from_url {
                return git2::Cred::ssh_key_from_agent(username);
            }
        }
        if allowed_types.contains(git2::CredentialType::USER_PASS_PLAINTEXT) {
            if let Ok(config) = git2::Config::open_default() {
                if let Ok(cred) = git2::Cred::credential_helper(&config, url, username_from_url) {
                    return Ok(cred);
                }
            }
        }
        git2::Cred::default()
    });
    callbacks
}

fn change_kind(status: Status) -> FileChange {
    if status.intersects(Status::INDEX_NEW | Status::WT_NEW) {
        FileChange::New
    } else if status.intersects(Status::INDEX_DELETED | Status::WT_DELETED) {
        FileChange::Deleted
    } else if status.intersects(Status::INDEX_RENAMED | Status::WT_RENAMED) {
        FileChange::Renamed
    } else if status.intersects(Status::INDEX_MODIFIED | Status::WT_MODIFIED) {
        FileChange::Modified
    } else {
        FileChange::Other
    }
}

/// Current branch name, including an unborn branch right after `init`.
fn current_branch(repo: &Repository) -> Option<String> {
    if let Ok(head) = repo.head() {
        return head.shorthand().map(str::to_string);
    }
    let head = repo.find_reference("HEAD").ok()?;
    head.symbolic_target()
        .map(|target| target.trim_start_matches("refs/heads/").to_string())
}

impl Vcs for GitClient {
    fn is_repo(&self, dir: &Path) -> bool {
        Repository::open(dir).is_ok()
    }

    #[instrument(skip(self))]
    fn init(&self, dir: &Path) -> Result<()> {
        Repository::init(dir)?;
        debug!("repository initialized");
        Ok(())
    }

    fn remotes(&self, dir: &Path) -> Result<Vec<Remote>> {
        let repo = self.open(dir)?;
        let names = repo.remotes()?;
        let mut remotes = Vec::new();
        for name in names.iter().flatten() {
            let url = repo.find_remote(name)?.url().map(str::to_string);
            remotes.push(Remote {
                name: name.to_string(),
                url,
            });
        }
        Ok(remotes)
    }

    #[instrument(skip(self))]
    fn add_remote(&self, dir: &Path, name: &str, url: &str) -> Result<()> {
        let repo = self.open(dir)?;
        repo.remote(name, url)?;
        Ok(())
    }

    fn add_all(&self, dir: &Path) -> Result<()> {
        let repo = self.open(dir)?;
        let mut index = repo.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;
        Ok(())
    }

    fn status(&self, dir: &Path) -> Result<RepoStatus> {
        let repo = self.open(dir)?;

        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let files = repo
            .statuses(Some(&mut options))?
            .iter()
            .filter(|entry| !entry.status().contains(Status::IGNORED))
            .filter_map(|entry| {
                let status = entry.status();
                entry.path().map(|path| FileStatus {
                    path: path.to_string(),
                    change: change_kind(status),
                    staged: status.intersects(
                        Status::INDEX_NEW
                            | Status::INDEX_MODIFIED
                            | Status::INDEX_DELETED
                            | Status::INDEX_RENAMED
                            | Status::INDEX_TYPECHANGE,
                    ),
                })
            })
            .collect();

        let branch = current_branch(&repo);
        let mut tracking = None;
        let (mut ahead, mut behind) = (0, 0);

        if let Some(name) = &branch {
            if let Ok(local) = repo.find_branch(name, BranchType::Local) {
                if let Ok(upstream) = local.upstream() {
                    tracking = upstream.name().ok().flatten().map(str::to_string);
                    if let (Some(local_oid), Some(upstream_oid)) =
                        (local.get().target(), upstream.get().target())
                    {
                        (ahead, behind) = repo.graph_ahead_behind(local_oid, upstream_oid)?;
                    }
                }
            }
        }

        Ok(RepoStatus {
            branch,
            tracking,
            ahead,
            behind,
            files,
        })
    }

    #[instrument(skip(self))]
    fn commit(&self, dir: &Path, message: &str) -> Result<()> {
        let repo = self.open(dir)?;
        let signature = repo.signature()?;

        let mut index = repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;

        let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let oid = repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        debug!(%oid, "commit created");
        Ok(())
    }

    #[instrument(skip(self))]
    fn push(&self, dir: &Path, remote: &str, branch: &str) -> Result<()> {
        let repo = self.open(dir)?;
        let mut origin = repo
            .find_remote(remote)
            .map_err(|_| Error::NoRemote(remote.to_string()))?;

        let mut callbacks = remote_callbacks();
        callbacks.push_update_reference(|refname, rejection| match rejection {
            Some(reason) => Err(git2::Error::from_str(&format!(
                "{} rejected: {}",
                refname, reason
            ))),
            None => Ok(()),
        });

        let mut options = PushOptions::new();
        options.remote_callbacks(callbacks);

        let refspec = format!("refs/heads/{0}:refs/heads/{0}", branch);
        origin
            .push(&[refspec.as_str()], Some(&mut options))
            .map_err(|e| Error::Push {
                remote: remote.to_string(),
                branch: branch.to_string(),
                source: e,
            })?;

        debug!("push complete");
        Ok(())
    }

    #[instrument(skip(self))]
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::FileWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut fo = FetchOptions::new();
        fo.remote_callbacks(remote_callbacks());

        let mut builder = git2::build::RepoBuilder::new();
        builder.fetch_options(fo);

        builder.clone(url, dest).map_err(|e| Error::Clone {
            url: url.to_string(),
            source: e,
        })?;

        debug!(path = %dest.display(), "clone complete");
        Ok(())
    }
}
