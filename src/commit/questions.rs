//! Prompt abstraction used by the composer.
//!
//! Questions are plain data so the composer can be driven by a mock or a
//! scripted prompter as easily as by the terminal.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::error::PromptError;
use crate::store::co_authors::{is_valid_email, is_valid_name};

static DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]*$").expect("valid digits regex"));

/// Acceptance rule for a free-text answer. Every rule looks at the trimmed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRule {
    Any,
    /// Character count within `min..=max`.
    Length { min: usize, max: usize },
    /// Only ASCII digits. Empty is allowed.
    Digits,
    StartsUppercase,
    Email,
}

impl TextRule {
    /// `Err` carries the hint shown before asking again.
    pub fn check(&self, input: &str) -> Result<(), String> {
        let input = input.trim();
        match *self {
            TextRule::Any => Ok(()),
            TextRule::Length { min, max } => {
                let len = input.chars().count();
                if len < min {
                    Err(format!("Too short: {} characters, at least {} required", len, min))
                } else if len > max {
                    Err(format!("Too long: {} characters, at most {} allowed", len, max))
                } else {
                    Ok(())
                }
            }
            TextRule::Digits => {
                if DIGITS_RE.is_match(input) {
                    Ok(())
                } else {
                    Err("Only digits are allowed".to_string())
                }
            }
            TextRule::StartsUppercase => {
                if is_valid_name(input) {
                    Ok(())
                } else {
                    Err("Must start with an upper-case letter".to_string())
                }
            }
            TextRule::Email => {
                if is_valid_email(input) {
                    Ok(())
                } else {
                    Err("Not a valid email address".to_string())
                }
            }
        }
    }
}

/// Normalization applied to an accepted answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Conversion {
    #[default]
    Trim,
    /// Trim, then lower-case the first character.
    TrimLowerFirst,
}

impl Conversion {
    pub fn apply(self, input: &str) -> String {
        let trimmed = input.trim();
        match self {
            Conversion::Trim => trimmed.to_string(),
            Conversion::TrimLowerFirst => {
                let mut chars = trimmed.chars();
                match chars.next() {
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

/// A free-text question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuestion {
    pub label: String,
    pub rule: TextRule,
    pub conversion: Conversion,
}

impl TextQuestion {
    pub fn new(label: impl Into<String>, rule: TextRule) -> Self {
        Self {
            label: label.into(),
            rule,
            conversion: Conversion::Trim,
        }
    }

    #[must_use]
    pub fn converted(mut self, conversion: Conversion) -> Self {
        self.conversion = conversion;
        self
    }
}

/// Source of answers for the composer.
///
/// Every method returns `PromptError::Cancelled` when the user aborts.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    /// Pick one option, returning its index.
    fn select(&self, label: &str, options: &[String]) -> Result<usize, PromptError>;

    /// Pick any number of options, returning their indices in option order.
    fn multi_select(
        &self,
        label: &str,
        options: &[String],
        defaults: &[bool],
    ) -> Result<Vec<usize>, PromptError>;

    /// Raw answer to a text question. Callers validate with the question's rule.
    fn ask_text(&self, question: &TextQuestion) -> Result<String, PromptError>;

    fn confirm(&self, label: &str) -> Result<bool, PromptError>;

    /// Choose which files end up in the index. `defaults` marks the preselected ones.
    fn select_files(
        &self,
        label: &str,
        files: &[String],
        defaults: &[bool],
    ) -> Result<Vec<usize>, PromptError>;
}
