//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use git2::{Oid, Repository, Signature};

use commitflow::commit::{Prompter, TextQuestion};
use commitflow::config::{CONFIG_TEMPLATE, Config};
use commitflow::error::PromptError;

/// Create a temporary directory for test output.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Write the bundled template into `dir` and load it, so state files land in `dir`.
pub fn template_config(dir: &Path) -> Config {
    let path = dir.join("config.yml");
    std::fs::write(&path, CONFIG_TEMPLATE).expect("Failed to write config");
    Config::load(&path).expect("Failed to load template config")
}

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        {
            let mut config = repo.config().expect("Failed to open repo config");
            config
                .set_str("user.name", "Test User")
                .expect("Failed to set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Failed to set user.email");
            config
                .set_bool("commit.gpgsign", false)
                .expect("Failed to disable signing");
        }
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Get the test signature for commits.
    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Write a file relative to the work tree root, creating parent directories.
    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Add a path to the index.
    pub fn stage(&self, relative: &str) {
        let mut index = self.repo.index().expect("Failed to get index");
        index
            .add_path(Path::new(relative))
            .expect("Failed to add file");
        index.write().expect("Failed to write index");
    }

    /// Commit `relative` with the given content. Returns the commit OID.
    pub fn commit_file(&self, relative: &str, content: &str, message: &str) -> Oid {
        self.write_file(relative, content);
        self.stage(relative);

        let sig = self.signature();
        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        // Get parent commit if exists
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Message of the commit HEAD points at.
    pub fn head_message(&self) -> String {
        self.repo
            .head()
            .expect("Failed to read HEAD")
            .peel_to_commit()
            .expect("HEAD is not a commit")
            .message()
            .unwrap_or_default()
            .to_string()
    }

    pub fn head_id(&self) -> Oid {
        self.repo
            .head()
            .expect("Failed to read HEAD")
            .target()
            .expect("HEAD has no target")
    }

    /// Paths currently in the index that differ from HEAD.
    pub fn staged_paths(&self) -> Vec<String> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true);
        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .expect("Failed to read statuses");
        statuses
            .iter()
            .filter(|entry| {
                entry.status().intersects(
                    git2::Status::INDEX_NEW | git2::Status::INDEX_MODIFIED | git2::Status::INDEX_DELETED,
                )
            })
            .filter_map(|entry| entry.path().map(str::to_string))
            .collect()
    }

    /// Attach a bare repository as `origin`. The returned dir must outlive the test.
    pub fn add_bare_origin(&self) -> tempfile::TempDir {
        let remote_dir = tempfile::tempdir().expect("Failed to create remote dir");
        Repository::init_bare(remote_dir.path()).expect("Failed to init bare repo");
        self.repo
            .remote(
                "origin",
                remote_dir.path().to_str().expect("Invalid remote path"),
            )
            .expect("Failed to add origin remote");
        remote_dir
    }
}

/// One scripted answer, consumed in order.
#[derive(Debug, Clone)]
pub enum Answer {
    Select(usize),
    Multi(Vec<usize>),
    Text(&'static str),
    Confirm(bool),
    Cancel,
}

/// Prompter that replays a fixed list of answers and records every label it was asked.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<Answer>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    /// Labels in the order they were asked.
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.answers.borrow().len()
    }

    fn next(&self, label: &str) -> Answer {
        self.asked.borrow_mut().push(label.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("No scripted answer left for '{}'", label))
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&self, label: &str, options: &[String]) -> Result<usize, PromptError> {
        match self.next(label) {
            Answer::Select(index) => {
                assert!(index < options.len(), "index {} out of range for '{}'", index, label);
                Ok(index)
            }
            Answer::Cancel => Err(PromptError::Cancelled),
            other => panic!("Expected a select answer for '{}', got {:?}", label, other),
        }
    }

    fn multi_select(
        &self,
        label: &str,
        _options: &[String],
        _defaults: &[bool],
    ) -> Result<Vec<usize>, PromptError> {
        match self.next(label) {
            Answer::Multi(indices) => Ok(indices),
            Answer::Cancel => Err(PromptError::Cancelled),
            other => panic!("Expected a multi-select answer for '{}', got {:?}", label, other),
        }
    }

    fn ask_text(&self, question: &TextQuestion) -> Result<String, PromptError> {
        match self.next(&question.label) {
            Answer::Text(text) => Ok(text.to_string()),
            Answer::Cancel => Err(PromptError::Cancelled),
            other => panic!("Expected a text answer for '{}', got {:?}", question.label, other),
        }
    }

    fn confirm(&self, label: &str) -> Result<bool, PromptError> {
        match self.next(label) {
            Answer::Confirm(yes) => Ok(yes),
            Answer::Cancel => Err(PromptError::Cancelled),
            other => panic!("Expected a confirm answer for '{}', got {:?}", label, other),
        }
    }

    fn select_files(
        &self,
        label: &str,
        files: &[String],
        defaults: &[bool],
    ) -> Result<Vec<usize>, PromptError> {
        self.multi_select(label, files, defaults)
    }
}
