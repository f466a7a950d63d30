//! Repository discovery using git2-rs.

use std::path::{Path, PathBuf};

use git2::Repository;

use crate::error::GitError;

/// Find the work tree root of the repository containing `start`.
///
/// `git status -s` prints paths relative to the current directory while
/// `git diff --name-only` prints them relative to the root, so every command
/// is run from the root to keep the two in agreement.
pub fn discover_workdir(start: &Path) -> Result<PathBuf, GitError> {
    let repo = Repository::discover(start).map_err(GitError::NotARepository)?;
    repo.workdir()
        .map(Path::to_path_buf)
        .ok_or(GitError::BareRepository)
}
