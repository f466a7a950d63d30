//! Commit answers and their rendering into a commit message.

use serde::{Deserialize, Serialize};

/// Characters stripped from the end of a summary or scope.
const SENTENCE_PUNCTUATION: [char; 3] = ['.', '!', '?'];

/// Issue reference trailer, e.g. `Closes: #42`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct References {
    /// Keyword such as `Closes` or `Refs`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Base text placed before the number, e.g. `#` or `PROJ-`.
    pub text: String,
    pub number: String,
}

impl References {
    pub fn new(kind: impl Into<String>, text: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
            number: number.into(),
        }
    }

    /// `Closes: #42`, or `None` when there is no number.
    pub fn trailer(&self) -> Option<String> {
        if self.number.is_empty() {
            return None;
        }
        Some(format!("{}: {}{}", self.kind, self.text, self.number))
    }
}

/// All answers collected for one commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSpec {
    #[serde(rename = "type")]
    pub commit_type: String,
    /// `None` when the scope question was not asked, `Some("")` when it was answered empty.
    #[serde(default)]
    pub scope: Option<String>,
    pub message: String,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub refs: Option<References>,
    /// Canonical `Name <email>` strings.
    #[serde(default)]
    pub co_authors: Vec<String>,
}

impl CommitSpec {
    /// Format the commit message for `git commit -m`.
    ///
    /// Produces:
    /// ```text
    /// type(scope): summary
    ///
    /// - bullet one
    /// - bullet two
    ///
    /// Closes: #42
    /// Co-authored-by: Jane Doe <jane@x.com>
    /// ```
    /// The scope, bullets, and each trailer only appear when present. The trailer
    /// block is separated from the body by one blank line and the message never
    /// ends with a newline.
    pub fn render(&self) -> String {
        let mut rendered = format!(
            "{}{}: {}",
            self.commit_type,
            self.scope_text(),
            strip_trailing_punctuation(&self.message)
        );

        if !self.description.is_empty() {
            rendered.push_str("\n\n- ");
            rendered.push_str(&self.description.join("\n- "));
        }

        let trailers = self.trailers();
        if !trailers.is_empty() {
            rendered.push_str("\n\n");
            rendered.push_str(&trailers.join("\n"));
        }

        rendered
    }

    /// Whether the spec has the two fields every commit needs.
    pub fn is_complete(&self) -> bool {
        !self.commit_type.is_empty() && !self.message.is_empty()
    }

    fn scope_text(&self) -> String {
        match self.scope.as_deref() {
            Some(scope) if !scope.is_empty() => {
                format!("({})", strip_trailing_punctuation(scope))
            }
            _ => String::new(),
        }
    }

    fn trailers(&self) -> Vec<String> {
        let mut trailers = Vec::new();
        if let Some(refs) = self.refs.as_ref().and_then(References::trailer) {
            trailers.push(refs);
        }
        if !self.co_authors.is_empty() {
            trailers.push(format!("Co-authored-by: {}", self.co_authors.join(", ")));
        }
        trailers
    }
}

/// Drop one trailing `.`, `!` or `?` from strings longer than two characters.
pub fn strip_trailing_punctuation(text: &str) -> &str {
    if text.chars().count() <= 2 {
        return text;
    }
    text.strip_suffix(|c: char| SENTENCE_PUNCTUATION.contains(&c))
        .unwrap_or(text)
}
