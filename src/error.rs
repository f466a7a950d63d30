//! Error types for commitflow modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading and validating the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No suitable config file found at {}. Run with --init to create one.", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Commit group '{0}' is not defined in the config")]
    UnknownGroup(String),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Failed to write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine a config directory; pass --config or set COMMITFLOW_CONFIG")]
    NoConfigDir,
}

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git executable not found in PATH")]
    NotInstalled,

    #[error("Current directory is not in a git repository: {0}")]
    NotARepository(#[source] git2::Error),

    #[error("Bare repositories are not supported")]
    BareRepository,

    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with code {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },
}

/// Errors from the interactive prompt layer.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Prompt cancelled by user")]
    Cancelled,

    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Errors from the persisted co-author and history stores.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Co-author name '{0}' must start with an upper-case letter")]
    InvalidName(String),

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("Failed to serialize {what}: {reason}")]
    Serialize { what: &'static str, reason: String },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that end a commit run.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Current directory is not in a repository: {0}")]
    NotARepository(String),

    #[error("Failed to update the staging area: {0}")]
    Staging(#[source] GitError),

    #[error("Commit failed, the command was: {command}")]
    CommitFailed {
        command: String,
        #[source]
        source: GitError,
    },

    #[error("Push failed: {0}")]
    PushFailed(#[source] GitError),

    #[error("Cancelled")]
    Cancelled,

    #[error(transparent)]
    Prompt(PromptError),
}

impl From<PromptError> for FlowError {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::Cancelled => FlowError::Cancelled,
            other => FlowError::Prompt(other),
        }
    }
}
