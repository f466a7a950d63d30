//! commitflow - An interactive CLI that stages files and composes conventional commits.
//!
//! # Overview
//!
//! commitflow reads the repository status, lets the user pick the files to
//! commit, asks the questions enabled by the selected commit group, and renders
//! the answers into a commit message. Recent answers are kept in a small
//! history so references and co-authors can be reused on the next commit.

pub mod commit;
pub mod config;
pub mod error;
pub mod flow;
pub mod git;
pub mod store;
pub mod ui;

// Re-export commonly used types
pub use commit::{CommitSpec, Composer, Prompter, References, TerminalPrompter};
pub use config::{Config, Question, QuestionSet};
pub use error::{ConfigError, FlowError, GitError, PromptError, StoreError};
pub use flow::{FlowOutcome, RunOptions, Session, StopReason};
pub use git::{CommandRunner, GitCommand, RepoStatus, ShellRunner};
pub use store::{CoAuthorDirectory, CommitHistoryEntry, HistoryCache};
