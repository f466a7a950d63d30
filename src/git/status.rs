//! Porcelain status parsing into staged and unstaged file sets.

use std::collections::HashSet;

/// Branch names that never get a pull-request hint after pushing.
const PROTECTED_BRANCHES: [&str; 2] = ["main", "master"];

/// Snapshot of the working tree taken once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoStatus {
    pub branch_name: String,
    pub repo_url: Option<String>,
    pub staged_files: Vec<String>,
    /// Modified or untracked paths that are not already staged.
    pub unstaged_files: Vec<String>,
}

impl RepoStatus {
    /// Build a status from raw `git status -s` and `git diff --name-only --cached` output.
    ///
    /// Rename lines (`R  old -> new`, exactly four whitespace tokens) are skipped,
    /// every other line contributes its second token. Paths already in the index
    /// are removed from the unstaged set so the two sets never overlap.
    pub fn parse(
        raw_status: &str,
        raw_staged: Option<&str>,
        raw_branch: &str,
        raw_remote: Option<&str>,
    ) -> Self {
        let staged_files = parse_staged(raw_staged);
        let unstaged_files = parse_unstaged(raw_status, &staged_files);

        Self {
            branch_name: raw_branch.trim().to_string(),
            repo_url: raw_remote.map(str::to_string),
            staged_files,
            unstaged_files,
        }
    }

    /// Whether there is anything at all to commit.
    pub fn is_clean(&self) -> bool {
        self.staged_files.is_empty() && self.unstaged_files.is_empty()
    }

    /// Every known path, unstaged first, in the order the selector shows them.
    pub fn all_files(&self) -> Vec<String> {
        self.unstaged_files
            .iter()
            .chain(self.staged_files.iter())
            .cloned()
            .collect()
    }

    /// Link to open a pull request for the current branch, if one makes sense.
    ///
    /// Returns `None` for `main`/`master`, for an empty branch name (detached HEAD),
    /// and when there is no remote URL.
    pub fn pull_request_link(&self) -> Option<String> {
        if self.branch_name.is_empty() || PROTECTED_BRANCHES.contains(&self.branch_name.as_str()) {
            return None;
        }

        let base = web_url(self.repo_url.as_deref()?)?;
        Some(format!("{}/pull/new/{}", base, self.branch_name))
    }
}

fn parse_staged(raw_staged: Option<&str>) -> Vec<String> {
    let Some(raw) = raw_staged else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    raw.lines()
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(*line))
        .map(str::to_string)
        .collect()
}

fn parse_unstaged(raw_status: &str, staged: &[String]) -> Vec<String> {
    let staged: HashSet<&str> = staged.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();

    raw_status
        .lines()
        .filter_map(|line| {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() == 4 {
                return None;
            }
            tokens.get(1).copied()
        })
        .filter(|path| !staged.contains(path))
        .filter(|path| seen.insert(*path))
        .map(str::to_string)
        .collect()
}

/// Turn a remote URL into a browsable https base without the `.git` suffix.
///
/// Handles `https://host/owner/repo(.git)` and `git@host:owner/repo(.git)`.
fn web_url(remote: &str) -> Option<String> {
    let remote = remote.trim();
    let remote = remote.strip_suffix(".git").unwrap_or(remote);

    if remote.starts_with("https://") || remote.starts_with("http://") {
        return Some(remote.to_string());
    }

    // SCP-like SSH form: git@github.com:owner/repo
    let (user_host, path) = remote.split_once(':')?;
    let host = user_host.rsplit('@').next()?;
    if host.is_empty() || path.is_empty() || path.starts_with("//") {
        return None;
    }
    Some(format!("https://{}/{}", host, path))
}
