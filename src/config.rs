//! YAML configuration: change types, length limits, commit groups, and texts.

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::store::DEFAULT_HISTORY_SIZE;

/// Environment variable that points at the config file.
pub const CONFIG_ENV_VAR: &str = "COMMITFLOW_CONFIG";

/// Bundled starting config written by `--init`.
pub const CONFIG_TEMPLATE: &str = include_str!("../config/config_template.yml");

const CONFIG_FILE_NAME: &str = "config.yml";
const APP_DIR: &str = "commitflow";

/// Group used when no group flag is given.
pub const DEFAULT_GROUP: &str = "default";

/// One optional question the pipeline can ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Question {
    Scope,
    Description,
    Refs,
    CoAuthor,
    #[serde(alias = "multi_co_authors")]
    MultiCoAuthor,
}

impl Question {
    pub const ALL: [Question; 5] = [
        Question::Scope,
        Question::Description,
        Question::Refs,
        Question::CoAuthor,
        Question::MultiCoAuthor,
    ];

    fn bit(self) -> u8 {
        match self {
            Question::Scope => 1,
            Question::Description => 1 << 1,
            Question::Refs => 1 << 2,
            Question::CoAuthor => 1 << 3,
            Question::MultiCoAuthor => 1 << 4,
        }
    }
}

/// The set of optional questions enabled by a commit group.
#[derive(Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Question>", into = "Vec<Question>")]
pub struct QuestionSet(u8);

impl QuestionSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn contains(self, question: Question) -> bool {
        self.0 & question.bit() != 0
    }

    #[must_use]
    pub fn with(mut self, question: Question) -> Self {
        self.0 |= question.bit();
        self
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Question> {
        Question::ALL.into_iter().filter(move |q| self.contains(*q))
    }

    /// Built-in definition for the well-known group names.
    pub fn builtin(name: &str) -> Option<Self> {
        let set = match name {
            "default" => [Question::Scope, Question::Refs, Question::CoAuthor]
                .into_iter()
                .collect(),
            "simple" => QuestionSet::empty(),
            "full" => [
                Question::Scope,
                Question::Description,
                Question::Refs,
                Question::MultiCoAuthor,
            ]
            .into_iter()
            .collect(),
            _ => return None,
        };
        Some(set)
    }
}

impl FromIterator<Question> for QuestionSet {
    fn from_iter<I: IntoIterator<Item = Question>>(iter: I) -> Self {
        iter.into_iter().fold(QuestionSet::empty(), QuestionSet::with)
    }
}

impl From<Vec<Question>> for QuestionSet {
    fn from(questions: Vec<Question>) -> Self {
        questions.into_iter().collect()
    }
}

impl From<QuestionSet> for Vec<Question> {
    fn from(set: QuestionSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Debug for QuestionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// A selectable change type such as `feat` or `fix`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitTypeDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl CommitTypeDef {
    /// `feat     : A new feature`
    pub fn label(&self) -> String {
        format!("{:<8.8} : {}", self.name, self.description)
    }
}

/// The `commit:` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitConfig {
    pub types: Vec<CommitTypeDef>,
    #[serde(default = "default_min_message_length")]
    pub min_message_length: usize,
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
    #[serde(default = "default_max_scope_length")]
    pub max_scope_length: usize,
    /// Maximum number of description bullets.
    #[serde(default = "default_max_description_length")]
    pub max_description_length: usize,
    #[serde(default = "default_refs_types")]
    pub refs_types: Vec<String>,
    #[serde(default = "default_refs_text")]
    pub refs_text: String,
    #[serde(default = "default_co_authoring_file")]
    pub co_authoring_file: PathBuf,
    #[serde(default = "default_history_file")]
    pub history_file: PathBuf,
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

fn default_min_message_length() -> usize {
    3
}

fn default_max_message_length() -> usize {
    72
}

fn default_max_scope_length() -> usize {
    12
}

fn default_max_description_length() -> usize {
    3
}

fn default_refs_types() -> Vec<String> {
    vec!["Closes".to_string(), "Refs".to_string()]
}

fn default_refs_text() -> String {
    "#".to_string()
}

fn default_co_authoring_file() -> PathBuf {
    PathBuf::from("co-authors.yml")
}

fn default_history_file() -> PathBuf {
    PathBuf::from("history.json")
}

fn default_history_size() -> usize {
    DEFAULT_HISTORY_SIZE
}

/// Question labels. `{}` is replaced with a value where noted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub select_files: String,
    pub staged_files: String,
    pub change_type: String,
    pub scope: String,
    /// `{}`: remaining character budget.
    pub commit_message: String,
    /// `{}`: remaining bullet count.
    pub description_message: String,
    /// `{}`: reference preview such as `#<refs>`.
    pub refs_num: String,
    pub refs_type: String,
    pub co_author_yes_no: String,
    pub co_author: String,
    pub multi_co_author: String,
    pub co_author_name: String,
    pub co_author_email: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            select_files: "Select files to commit:".to_string(),
            staged_files: "Staged files:".to_string(),
            change_type: "Select the type of change:".to_string(),
            scope: "Scope of the change (leave empty to skip):".to_string(),
            commit_message: "Commit message (max {} characters):".to_string(),
            description_message: "Description bullet ({} left, leave empty to finish):".to_string(),
            refs_num: "Reference number {} (leave empty to skip):".to_string(),
            refs_type: "Select the reference type:".to_string(),
            co_author_yes_no: "Add a co-author?".to_string(),
            co_author: "Select a co-author:".to_string(),
            multi_co_author: "Select co-authors:".to_string(),
            co_author_name: "Co-author name:".to_string(),
            co_author_email: "Co-author email:".to_string(),
        }
    }
}

/// Informational and error texts shown when a run ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitMessages {
    pub no_files_to_commit: String,
    pub no_files_selected: String,
    pub not_a_repo: String,
    /// `{}`: the failed commit command.
    pub commit_error: String,
    pub push_error: String,
    pub push_successful: String,
    /// `{}`: pull request link.
    pub raise_pr: String,
}

impl Default for ExitMessages {
    fn default() -> Self {
        Self {
            no_files_to_commit: "No files to be committed - exiting".to_string(),
            no_files_selected: "No files have been added to the staging area - exiting".to_string(),
            not_a_repo: "Current directory is not in a repository - exiting".to_string(),
            commit_error: "Commit failed, the command was: {}".to_string(),
            push_error: "Push failed - exiting".to_string(),
            push_successful: "Changes pushed".to_string(),
            raise_pr: "Raise a pull request: {}".to_string(),
        }
    }
}

/// Replace the first `{}` in a message template.
pub fn fill(template: &str, value: impl fmt::Display) -> String {
    template.replacen("{}", &value.to_string(), 1)
}

/// Top-level configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub commit: CommitConfig,
    #[serde(default)]
    pub commit_groups: BTreeMap<String, QuestionSet>,
    #[serde(default)]
    pub messages: Messages,
    #[serde(default)]
    pub exit: ExitMessages,
    /// Directory relative file paths are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Config {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let mut config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.validate()?;

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse a config document without touching the filesystem.
    pub fn parse(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Check constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let commit = &self.commit;

        if commit.types.is_empty() {
            return Err(ConfigError::Invalid("commit.types must list at least one type".into()));
        }
        if let Some(unnamed) = commit.types.iter().position(|t| t.name.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "commit.types[{}] has an empty name",
                unnamed
            )));
        }
        if commit.min_message_length > commit.max_message_length {
            return Err(ConfigError::Invalid(format!(
                "min_message_length ({}) is greater than max_message_length ({})",
                commit.min_message_length, commit.max_message_length
            )));
        }
        if commit.history_size == 0 {
            return Err(ConfigError::Invalid("history_size must be at least 1".into()));
        }

        for name in self.group_names() {
            let group = self.commit_group(&name)?;
            if group.contains(Question::Refs) && commit.refs_types.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "commit group '{}' asks for refs but refs_types is empty",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Resolve a group by name, falling back to the built-in definitions.
    pub fn commit_group(&self, name: &str) -> Result<QuestionSet, ConfigError> {
        self.commit_groups
            .get(name)
            .copied()
            .or_else(|| QuestionSet::builtin(name))
            .ok_or_else(|| ConfigError::UnknownGroup(name.to_string()))
    }

    /// Configured group names plus the built-in ones.
    pub fn group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commit_groups.keys().cloned().collect();
        for builtin in ["default", "simple", "full"] {
            if !self.commit_groups.contains_key(builtin) {
                names.push(builtin.to_string());
            }
        }
        names
    }

    pub fn co_authors_path(&self) -> PathBuf {
        self.base_dir.join(&self.commit.co_authoring_file)
    }

    pub fn history_path(&self) -> PathBuf {
        self.base_dir.join(&self.commit.history_file)
    }
}

/// Pick the config path: explicit flag, then `COMMITFLOW_CONFIG`, then the user config dir.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

/// Write the bundled template to `path` unless a file is already there.
///
/// Returns `true` when the file was created.
pub fn write_template(path: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }

    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, CONFIG_TEMPLATE).map_err(write_err)?;
    Ok(true)
}
