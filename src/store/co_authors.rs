//! Known co-authors, persisted as a YAML list of `{name, email}`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StoreError;

/// Label of the entry that starts the add-new flow.
pub const OTHER_CO_AUTHOR: &str = "Other co-author";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// A person who can be credited with `Co-authored-by`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoAuthor {
    pub name: String,
    pub email: String,
}

impl CoAuthor {
    /// `Name (email)`, as shown in selection lists.
    pub fn display(&self) -> String {
        format!("{} ({})", self.name, self.email)
    }

    /// `Name <email>`, as written in the commit trailer.
    pub fn canonical(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }
}

/// One entry of a co-author selection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoAuthorChoice {
    Known { display: String, canonical: String },
    Other,
}

impl CoAuthorChoice {
    pub fn label(&self) -> &str {
        match self {
            CoAuthorChoice::Known { display, .. } => display,
            CoAuthorChoice::Other => OTHER_CO_AUTHOR,
        }
    }
}

/// Whether `name` starts with an upper-case letter.
pub fn is_valid_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Basic `local@domain.tld` check.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// The co-author list backed by a file.
#[derive(Debug)]
pub struct CoAuthorDirectory {
    path: PathBuf,
    authors: Vec<CoAuthor>,
}

impl CoAuthorDirectory {
    /// Load the directory. A missing or unreadable file yields an empty directory.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let authors = read_authors(&path);
        debug!("Loaded {} co-authors from {}", authors.len(), path.display());
        Self { path, authors }
    }

    pub fn authors(&self) -> &[CoAuthor] {
        &self.authors
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    /// Selection list in file order with the `Other` sentinel last.
    pub fn choices(&self) -> Vec<CoAuthorChoice> {
        self.authors
            .iter()
            .map(|author| CoAuthorChoice::Known {
                display: author.display(),
                canonical: author.canonical(),
            })
            .chain(std::iter::once(CoAuthorChoice::Other))
            .collect()
    }

    /// `(display, canonical)` pairs in file order, ending with the sentinel mapped to itself.
    pub fn list(&self) -> Vec<(String, String)> {
        self.choices()
            .into_iter()
            .map(|choice| match choice {
                CoAuthorChoice::Known { display, canonical } => (display, canonical),
                CoAuthorChoice::Other => (OTHER_CO_AUTHOR.to_string(), OTHER_CO_AUTHOR.to_string()),
            })
            .collect()
    }

    /// Validate, append, and persist a new co-author. Returns `Name <email>`.
    ///
    /// Invalid input leaves both the in-memory list and the file untouched.
    /// If persisting fails the author stays in memory for this run.
    pub fn add(&mut self, name: &str, email: &str) -> Result<String, StoreError> {
        let name = name.trim();
        let email = email.trim();

        if !is_valid_name(name) {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        if !is_valid_email(email) {
            return Err(StoreError::InvalidEmail(email.to_string()));
        }

        let author = CoAuthor {
            name: name.to_string(),
            email: email.to_string(),
        };
        let canonical = author.canonical();
        self.authors.push(author);
        self.save()?;

        Ok(canonical)
    }

    fn save(&self) -> Result<(), StoreError> {
        let yaml = serde_yaml::to_string(&self.authors).map_err(|e| StoreError::Serialize {
            what: "co-authors",
            reason: e.to_string(),
        })?;
        super::write_atomic(&self.path, yaml.as_bytes())
    }
}

fn read_authors(path: &Path) -> Vec<CoAuthor> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Could not read co-authors file {}: {}", path.display(), e);
            }
            return Vec::new();
        }
    };

    // An empty YAML document parses as null
    if content.trim().is_empty() {
        return Vec::new();
    }

    match serde_yaml::from_str::<Option<Vec<CoAuthor>>>(&content) {
        Ok(authors) => authors.unwrap_or_default(),
        Err(e) => {
            warn!("Ignoring unparsable co-authors file {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory_with(yaml: &str) -> (tempfile::TempDir, CoAuthorDirectory) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("co-authors.yml");
        std::fs::write(&path, yaml).unwrap();
        let directory = CoAuthorDirectory::load(&path);
        (dir, directory)
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let directory = CoAuthorDirectory::load(dir.path().join("none.yml"));
        assert!(directory.is_empty());
        assert_eq!(directory.choices(), vec![CoAuthorChoice::Other]);
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let (_dir, directory) = directory_with("name: [oops");
        assert!(directory.is_empty());
    }

    #[test]
    fn test_list_keeps_file_order_and_appends_sentinel() {
        let (_dir, directory) = directory_with(
            "- name: Zed Last\n  email: zed@x.com\n- name: Amy First\n  email: amy@x.com\n",
        );

        assert_eq!(
            directory.list(),
            vec![
                ("Zed Last (zed@x.com)".to_string(), "Zed Last <zed@x.com>".to_string()),
                ("Amy First (amy@x.com)".to_string(), "Amy First <amy@x.com>".to_string()),
                (OTHER_CO_AUTHOR.to_string(), OTHER_CO_AUTHOR.to_string()),
            ]
        );
    }

    #[test]
    fn test_add_persists_and_returns_canonical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("co-authors.yml");
        let mut directory = CoAuthorDirectory::load(&path);

        let canonical = directory.add("  Jane Doe ", " jane@x.com").unwrap();
        assert_eq!(canonical, "Jane Doe <jane@x.com>");

        let reloaded = CoAuthorDirectory::load(&path);
        assert_eq!(
            reloaded.authors(),
            &[CoAuthor {
                name: "Jane Doe".into(),
                email: "jane@x.com".into()
            }]
        );
    }

    #[test]
    fn test_add_rejects_lowercase_name_without_writing() {
        let (dir, mut directory) = directory_with("- name: Jane Doe\n  email: jane@x.com\n");
        let path = dir.path().join("co-authors.yml");
        let before = std::fs::read_to_string(&path).unwrap();

        let result = directory.add("jane", "jane@x.com");
        assert!(matches!(result, Err(StoreError::InvalidName(_))));
        assert_eq!(directory.authors().len(), 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_add_rejects_malformed_email_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("co-authors.yml");
        let mut directory = CoAuthorDirectory::load(&path);

        for bad in ["jane", "jane@", "@x.com", "jane@x", "ja ne@x.com"] {
            let result = directory.add("Jane", bad);
            assert!(matches!(result, Err(StoreError::InvalidEmail(_))), "accepted {bad}");
        }
        assert!(directory.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_name_and_email_validation() {
        assert!(is_valid_name("Émile"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("9lives"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
    }
}
