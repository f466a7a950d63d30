//! Git integration: status parsing, subprocess execution, repository discovery.

pub mod repo;
pub mod runner;
pub mod status;

pub use repo::discover_workdir;
pub use runner::{CommandRunner, GitCommand, ShellRunner, check_git_installed};
pub use status::RepoStatus;
