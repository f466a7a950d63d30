//! One commitflow run: status, staging, composing, committing, and pushing.
//!
//! Steps:
//! 1. `git add .` when every file should be staged
//! 2. `git status -s` / `git diff --name-only --cached` - snapshot the tree
//! 3. file selection, `git restore --staged` and `git add` to match it
//! 4. commit questions and `git commit -m <message>`
//! 5. record the commit in the history cache
//! 6. `git push`, retried once with `--set-upstream origin <branch>`

use tracing::{debug, info, warn};

use crate::commit::{Composer, Prompter};
use crate::config::{Config, DEFAULT_GROUP, ExitMessages, QuestionSet, fill};
use crate::error::{FlowError, GitError};
use crate::git::{CommandRunner, GitCommand, RepoStatus};
use crate::store::{CoAuthorDirectory, CommitHistoryEntry, HistoryCache};
use crate::ui::{Heading, Printer};

/// Settings for one run, built once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Stage everything with `git add .` and skip file selection.
    pub add_all: bool,
    pub verbose: bool,
    /// Print mutating git commands instead of running them.
    pub debug: bool,
    /// Name of the commit group to use.
    pub group: String,
    /// Replaces the configured reference text.
    pub refs_text: Option<String>,
    /// Pre-filled reference number.
    pub refs_number: Option<String>,
    /// Copy references and co-authors from the last recorded commit.
    pub reuse_previous: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            add_all: false,
            verbose: false,
            debug: false,
            group: DEFAULT_GROUP.to_string(),
            refs_text: None,
            refs_number: None,
            reuse_previous: false,
        }
    }
}

/// Why a run ended without committing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    NothingToCommit,
    NothingSelected,
}

/// How a run ended when no error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    Committed { message: String },
    Stopped(StopReason),
}

/// Everything a run needs, borrowed for its duration.
pub struct Session<'a> {
    config: &'a Config,
    group: QuestionSet,
    options: &'a RunOptions,
    runner: &'a dyn CommandRunner,
    prompter: &'a dyn Prompter,
    printer: Printer,
}

impl<'a> Session<'a> {
    pub fn new(
        config: &'a Config,
        group: QuestionSet,
        options: &'a RunOptions,
        runner: &'a dyn CommandRunner,
        prompter: &'a dyn Prompter,
    ) -> Self {
        Self {
            config,
            group,
            options,
            runner,
            prompter,
            printer: Printer::new(options.verbose),
        }
    }

    pub fn run(&self) -> Result<FlowOutcome, FlowError> {
        if self.options.add_all {
            self.execute(&GitCommand::add_all())
                .map_err(FlowError::Staging)?;
        }

        let status = self.status()?;
        let exit = &self.config.exit;

        if status.is_clean() {
            self.printer.exit(&exit.no_files_to_commit);
            return Ok(FlowOutcome::Stopped(StopReason::NothingToCommit));
        }

        if !self.stage(&status)? {
            self.printer.exit(&exit.no_files_selected);
            return Ok(FlowOutcome::Stopped(StopReason::NothingSelected));
        }

        let mut co_authors = CoAuthorDirectory::load(self.config.co_authors_path());
        let mut history =
            HistoryCache::load(self.config.history_path(), self.config.commit.history_size);

        let mut composer = Composer::new(self.config, self.group, self.prompter, &mut co_authors)
            .with_refs_text(self.options.refs_text.clone())
            .with_refs_number(self.options.refs_number.clone());
        if self.options.reuse_previous {
            composer = composer.reuse_previous(history.latest());
        }
        let spec = composer.compose()?;

        let message = spec.render();
        let commit = GitCommand::commit(&message);
        self.execute(&commit)
            .map_err(|source| FlowError::CommitFailed {
                command: commit.to_string(),
                source,
            })?;

        if self.options.debug {
            debug!("Debug mode, commit not recorded in history");
        } else {
            let entry =
                CommitHistoryEntry::new(spec, status.repo_url.clone(), status.branch_name.clone());
            if let Err(e) = history.record(entry) {
                warn!("Failed to record commit history: {}", e);
            }
        }

        self.push(&status)?;

        Ok(FlowOutcome::Committed { message })
    }

    /// Snapshot the working tree. Only `git status` failing is fatal.
    fn status(&self) -> Result<RepoStatus, FlowError> {
        let raw_status = self
            .query(&GitCommand::status())
            .map_err(|e| FlowError::NotARepository(e.to_string()))?;

        let raw_staged = self
            .query(&GitCommand::staged_files())
            .inspect_err(|e| warn!("Could not list staged files: {}", e))
            .ok();
        let raw_branch = self
            .query(&GitCommand::current_branch())
            .inspect_err(|e| warn!("Could not determine the current branch: {}", e))
            .unwrap_or_default();
        // No origin remote is not an error
        let raw_remote = self.query(&GitCommand::remote_url()).ok();

        let status = RepoStatus::parse(
            &raw_status,
            raw_staged.as_deref(),
            &raw_branch,
            raw_remote.as_deref().map(str::trim).filter(|url| !url.is_empty()),
        );
        debug!(
            "Status on '{}': {} staged, {} unstaged",
            status.branch_name,
            status.staged_files.len(),
            status.unstaged_files.len()
        );
        Ok(status)
    }

    /// Bring the index in line with the user's selection.
    ///
    /// Returns `false` when nothing was selected. The index is left untouched then.
    fn stage(&self, status: &RepoStatus) -> Result<bool, FlowError> {
        let messages = &self.config.messages;

        if self.options.add_all {
            self.printer.print(Heading::Add, &messages.staged_files);
            self.printer.files(&status.all_files());
            return Ok(true);
        }

        let files = status.all_files();
        let defaults: Vec<bool> = files
            .iter()
            .map(|file| status.staged_files.contains(file))
            .collect();
        let chosen = self
            .prompter
            .select_files(&messages.select_files, &files, &defaults)?;

        let selected: Vec<String> = chosen
            .into_iter()
            .filter_map(|index| files.get(index).cloned())
            .collect();
        if selected.is_empty() {
            return Ok(false);
        }

        let to_restore: Vec<String> = status
            .staged_files
            .iter()
            .filter(|file| !selected.contains(file))
            .cloned()
            .collect();
        if !to_restore.is_empty() {
            self.execute(&GitCommand::restore_staged(&to_restore))
                .map_err(FlowError::Staging)?;
        }

        let to_add: Vec<String> = selected
            .iter()
            .filter(|file| !status.staged_files.contains(file))
            .cloned()
            .collect();
        if !to_add.is_empty() {
            self.execute(&GitCommand::add(&to_add))
                .map_err(FlowError::Staging)?;
        }

        self.printer.files(&selected);
        Ok(true)
    }

    fn push(&self, status: &RepoStatus) -> Result<(), FlowError> {
        if let Err(e) = self.execute(&GitCommand::push()) {
            // Detached HEAD, there is no branch to track
            if status.branch_name.is_empty() {
                return Err(FlowError::PushFailed(e));
            }
            info!("Plain push failed, setting upstream: {}", e);
            self.execute(&GitCommand::push_set_upstream(&status.branch_name))
                .map_err(FlowError::PushFailed)?;
        }

        if self.options.debug {
            return Ok(());
        }

        let exit = &self.config.exit;
        self.printer.push(&exit.push_successful);
        if let Some(link) = status.pull_request_link() {
            self.printer.push(&fill(&exit.raise_pr, link));
        }
        Ok(())
    }

    /// Run a command that changes the repository. In debug mode it is only printed.
    fn execute(&self, command: &GitCommand) -> Result<String, GitError> {
        if self.options.debug {
            self.printer.debug(&command.to_string());
            return Ok(String::new());
        }
        self.runner.run(command)
    }

    /// Run a read-only command, even in debug mode.
    fn query(&self, command: &GitCommand) -> Result<String, GitError> {
        self.runner.run(command)
    }
}

/// The line shown to the user for a failed run.
pub fn describe_error(error: &FlowError, exit: &ExitMessages) -> String {
    match error {
        FlowError::NotARepository(_) => exit.not_a_repo.clone(),
        FlowError::CommitFailed { command, .. } => fill(&exit.commit_error, command),
        FlowError::PushFailed(_) => exit.push_error.clone(),
        other => other.to_string(),
    }
}
