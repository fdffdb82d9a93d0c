//! In-memory capability doubles shared by unit tests.

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::forge::{Forge, Release, ReleaseRequest, RepoSlug};
use crate::installer::DependencyInstaller;
use crate::ui::{Prompter, Question, Reporter};
use crate::update::{FetchFailure, Registry};
use crate::vcs::{Remote, RepoStatus, Vcs};
use crate::{Error, Result};

/// Shared view of how many times a fake was called.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct FakeRegistry {
    answer: std::result::Result<String, FetchFailure>,
    calls: CallCounter,
}

impl FakeRegistry {
    pub fn latest(version: &str) -> Self {
        Self {
            answer: Ok(version.to_string()),
            calls: CallCounter::default(),
        }
    }

    pub fn failing(failure: FetchFailure) -> Self {
        Self {
            answer: Err(failure),
            calls: CallCounter::default(),
        }
    }

    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }
}

impl Registry for FakeRegistry {
    fn latest_version(&self, _package: &str) -> std::result::Result<String, FetchFailure> {
        self.calls.bump();
        self.answer.clone()
    }
}

type CloneFixture = Box<dyn Fn(&Path)>;

/// Records every operation as a short command string.
#[derive(Default)]
pub struct FakeVcs {
    is_repo: RefCell<bool>,
    remotes: RefCell<Vec<Remote>>,
    status: RefCell<RepoStatus>,
    rejected_branches: HashSet<String>,
    clone_fixture: Option<CloneFixture>,
    calls: RefCell<Vec<String>>,
}

impl FakeVcs {
    /// Start as an initialized repository.
    pub fn repo() -> Self {
        let vcs = Self::default();
        *vcs.is_repo.borrow_mut() = true;
        vcs
    }

    pub fn with_remote(self, name: &str, url: &str) -> Self {
        self.remotes.borrow_mut().push(Remote {
            name: name.to_string(),
            url: Some(url.to_string()),
        });
        self
    }

    pub fn with_status(self, status: RepoStatus) -> Self {
        *self.status.borrow_mut() = status;
        self
    }

    /// Fail pushes to `branch`.
    pub fn rejecting_push(mut self, branch: &str) -> Self {
        self.rejected_branches.insert(branch.to_string());
        self
    }

    /// Populate the destination when a clone runs.
    pub fn with_clone_fixture(mut self, fixture: impl Fn(&Path) + 'static) -> Self {
        self.clone_fixture = Some(Box::new(fixture));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl Vcs for FakeVcs {
    fn is_repo(&self, _dir: &Path) -> bool {
        *self.is_repo.borrow()
    }

    fn init(&self, _dir: &Path) -> Result<()> {
        self.record("init".to_string());
        *self.is_repo.borrow_mut() = true;
        Ok(())
    }

    fn remotes(&self, _dir: &Path) -> Result<Vec<Remote>> {
        Ok(self.remotes.borrow().clone())
    }

    fn add_remote(&self, _dir: &Path, name: &str, url: &str) -> Result<()> {
        self.record(format!("add_remote {} {}", name, url));
        self.remotes.borrow_mut().push(Remote {
            name: name.to_string(),
            url: Some(url.to_string()),
        });
        Ok(())
    }

    fn add_all(&self, _dir: &Path) -> Result<()> {
        self.record("add_all".to_string());
        Ok(())
    }

    fn status(&self, _dir: &Path) -> Result<RepoStatus> {
        Ok(self.status.borrow().clone())
    }

    fn commit(&self, _dir: &Path, message: &str) -> Result<()> {
        self.record(format!("commit {}", message));
        self.status.borrow_mut().files.clear();
        Ok(())
    }

    fn push(&self, _dir: &Path, remote: &str, branch: &str) -> Result<()> {
        self.record(format!("push {} {}", remote, branch));
        if self.rejected_branches.contains(branch) {
            return Err(Error::Push {
                remote: remote.to_string(),
                branch: branch.to_string(),
                source: git2::Error::from_str("rejected"),
            });
        }
        Ok(())
    }

    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        self.record(format!("clone {} {}", url, dest.display()));
        std::fs::create_dir_all(dest)?;
        if let Some(fixture) = &self.clone_fixture {
            fixture(dest);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeDeps {
    exit_code: Option<i32>,
    installed: RefCell<Vec<PathBuf>>,
}

impl FakeDeps {
    pub fn failing(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            installed: RefCell::default(),
        }
    }

    pub fn installed_dirs(&self) -> Vec<PathBuf> {
        self.installed.borrow().clone()
    }
}

impl DependencyInstaller for FakeDeps {
    fn install(&self, dir: &Path) -> Result<()> {
        if let Some(code) = self.exit_code {
            return Err(Error::CommandFailed {
                command: "npm install".to_string(),
                code: Some(code),
            });
        }
        self.installed.borrow_mut().push(dir.to_path_buf());
        Ok(())
    }
}

/// Captured create-release call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseCall {
    pub slug: RepoSlug,
    pub token: String,
    pub request: ReleaseRequest,
}

#[derive(Default)]
pub struct FakeForge {
    failure: Option<String>,
    releases: RefCell<Vec<ReleaseCall>>,
}

impl FakeForge {
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            releases: RefCell::default(),
        }
    }

    pub fn releases(&self) -> Vec<ReleaseCall> {
        self.releases.borrow().clone()
    }
}

impl Forge for FakeForge {
    fn create_release(&self, slug: &RepoSlug, token: &str, request: &ReleaseRequest) -> Result<Release> {
        self.releases.borrow_mut().push(ReleaseCall {
            slug: slug.clone(),
            token: token.to_string(),
            request: request.clone(),
        });
        if let Some(message) = &self.failure {
            return Err(Error::ReleaseFailed(message.clone()));
        }
        Ok(Release {
            html_url: Some(format!(
                "https://github.com/{}/releases/tag/{}",
                slug, request.tag_name
            )),
            tag_name: request.tag_name.clone(),
        })
    }
}

/// One scripted answer, consumed in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Input(String),
    Confirm(bool),
    Select(usize),
    MultiSelect(Vec<usize>),
    Password(String),
    /// Accept whatever default the prompt offers.
    Default,
}

impl Answer {
    pub fn input(value: &str) -> Self {
        Answer::Input(value.to_string())
    }
}

/// Prompter that replays queued answers and remembers each prompt.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<Answer>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
            asked: RefCell::default(),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.answers.borrow().len()
    }

    fn next(&self, prompt: &str) -> Answer {
        self.asked.borrow_mut().push(prompt.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted answer for prompt {:?}", prompt))
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&self, question: &Question) -> Result<String> {
        let answer = match self.next(&question.prompt) {
            Answer::Input(value) => value,
            Answer::Default => question.default.clone().unwrap_or_default(),
            other => panic!("expected input answer, got {:?}", other),
        };
        if let Err(message) = question.rule.check(&answer) {
            panic!("scripted answer {:?} rejected: {}", answer, message);
        }
        Ok(answer)
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        match self.next(prompt) {
            Answer::Confirm(value) => Ok(value),
            Answer::Default => Ok(default),
            other => panic!("expected confirm answer, got {:?}", other),
        }
    }

    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize> {
        let index = match self.next(prompt) {
            Answer::Select(index) => index,
            Answer::Default => default,
            other => panic!("expected select answer, got {:?}", other),
        };
        assert!(index < items.len(), "selection {} out of range", index);
        Ok(index)
    }

    fn multi_select(&self, prompt: &str, _items: &[&str], checked: &[bool]) -> Result<Vec<usize>> {
        match self.next(prompt) {
            Answer::MultiSelect(indices) => Ok(indices),
            Answer::Default => Ok(checked
                .iter()
                .enumerate()
                .filter(|(_, c)| **c)
                .map(|(i, _)| i)
                .collect()),
            other => panic!("expected multi-select answer, got {:?}", other),
        }
    }

    fn password(&self, prompt: &str) -> Result<String> {
        match self.next(prompt) {
            Answer::Password(value) => Ok(value),
            other => panic!("expected password answer, got {:?}", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Step,
    Success,
    Warn,
    Fail,
}

#[derive(Default)]
pub struct RecordingReporter {
    lines: RefCell<Vec<(Level, String)>>,
}

impl RecordingReporter {
    fn at(&self, level: Level) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn steps(&self) -> Vec<String> {
        self.at(Level::Step)
    }

    pub fn successes(&self) -> Vec<String> {
        self.at(Level::Success)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.at(Level::Warn)
    }

    pub fn failures(&self) -> Vec<String> {
        self.at(Level::Fail)
    }
}

impl Reporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.lines.borrow_mut().push((Level::Step, message.to_string()));
    }

    fn success(&self, message: &str) {
        self.lines.borrow_mut().push((Level::Success, message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.lines.borrow_mut().push((Level::Warn, message.to_string()));
    }

    fn fail(&self, message: &str) {
        self.lines.borrow_mut().push((Level::Fail, message.to_string()));
    }
}
