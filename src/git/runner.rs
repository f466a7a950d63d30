//! Git subprocess execution.
//!
//! All operations shell out to the system `git` binary, inheriting the user's
//! existing git config, hooks, SSH agent, and credential store.

use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::error::GitError;

/// A git invocation, kept as an argument vector so nothing is shell-quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommand {
    args: Vec<String>,
}

impl GitCommand {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `git status -s`
    pub fn status() -> Self {
        Self::new(["status", "-s"])
    }

    /// `git diff --name-only --cached`
    pub fn staged_files() -> Self {
        Self::new(["diff", "--name-only", "--cached"])
    }

    /// `git branch --show-current`
    pub fn current_branch() -> Self {
        Self::new(["branch", "--show-current"])
    }

    /// `git config --get remote.origin.url`
    pub fn remote_url() -> Self {
        Self::new(["config", "--get", "remote.origin.url"])
    }

    /// `git add .`
    pub fn add_all() -> Self {
        Self::new(["add", "."])
    }

    /// `git add -- <paths>`
    pub fn add(paths: &[String]) -> Self {
        Self::with_paths(["add", "--"], paths)
    }

    /// `git restore --staged -- <paths>`
    pub fn restore_staged(paths: &[String]) -> Self {
        Self::with_paths(["restore", "--staged", "--"], paths)
    }

    /// `git commit -m <message>`
    pub fn commit(message: &str) -> Self {
        Self::new(["commit", "-m", message])
    }

    /// `git push`
    pub fn push() -> Self {
        Self::new(["push"])
    }

    /// `git push --set-upstream origin <branch>`
    pub fn push_set_upstream(branch: &str) -> Self {
        Self::new(["push", "--set-upstream", "origin", branch])
    }

    fn with_paths<const N: usize>(prefix: [&str; N], paths: &[String]) -> Self {
        let mut args: Vec<String> = prefix.iter().map(|s| s.to_string()).collect();
        args.extend(paths.iter().cloned());
        Self { args }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for GitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("git")?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) || arg.contains('"') {
                write!(f, " \"{}\"", arg.replace('"', "\\\""))?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Trait for executing git commands.
///
/// This abstraction allows mocking the git subprocess in tests.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Run the command and return its stdout, or an error on non-zero exit.
    fn run(&self, command: &GitCommand) -> Result<String, GitError>;
}

/// Default runner that calls the real git binary.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    workdir: Option<PathBuf>,
}

impl ShellRunner {
    /// Run every command from `workdir` instead of the process working directory.
    pub fn in_dir(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: Some(workdir.into()),
        }
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &GitCommand) -> Result<String, GitError> {
        debug!("running {}", command);

        let mut cmd = Command::new("git");
        cmd.args(command.args());
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|source| GitError::Spawn {
            command: command.to_string(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            debug!("{} failed: {}", command, stderr);
            return Err(GitError::CommandFailed {
                command: command.to_string(),
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Check that the git executable is installed and reachable.
pub fn check_git_installed() -> Result<(), GitError> {
    which::which("git").map(|_| ()).map_err(|_| GitError::NotInstalled)
}
