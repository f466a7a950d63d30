//! The question sequence that turns user answers into a `CommitSpec`.

use tracing::{debug, warn};

use crate::config::{Config, Question, QuestionSet, fill};
use crate::error::{PromptError, StoreError};
use crate::store::{CoAuthor, CoAuthorChoice, CoAuthorDirectory, CommitHistoryEntry};

use super::message::{CommitSpec, References};
use super::questions::{Conversion, Prompter, TextQuestion, TextRule};

/// Keyword used for a pre-filled reference when no refs types are configured.
const FALLBACK_REFS_TYPE: &str = "Refs";

/// Asks the questions enabled by a commit group and collects the answers.
///
/// Steps run in a fixed order: type, scope, message, description, references,
/// co-authors. Type and message are always asked; every other step is gated by
/// the group, by a pre-filled value, or by reuse of the previous commit.
pub struct Composer<'a> {
    config: &'a Config,
    group: QuestionSet,
    prompter: &'a dyn Prompter,
    co_authors: &'a mut CoAuthorDirectory,
    refs_text: String,
    refs_number: Option<String>,
    reuse_previous: bool,
    previous: Option<&'a CommitHistoryEntry>,
}

impl<'a> Composer<'a> {
    pub fn new(
        config: &'a Config,
        group: QuestionSet,
        prompter: &'a dyn Prompter,
        co_authors: &'a mut CoAuthorDirectory,
    ) -> Self {
        Self {
            config,
            group,
            prompter,
            co_authors,
            refs_text: config.commit.refs_text.clone(),
            refs_number: None,
            reuse_previous: false,
            previous: None,
        }
    }

    /// Replace the configured text placed before a reference number.
    #[must_use]
    pub fn with_refs_text(mut self, refs_text: Option<String>) -> Self {
        if let Some(text) = refs_text {
            self.refs_text = text;
        }
        self
    }

    /// Use this reference number instead of asking for one.
    #[must_use]
    pub fn with_refs_number(mut self, number: Option<String>) -> Self {
        self.refs_number = number.filter(|n| !n.is_empty());
        self
    }

    /// Copy references and co-authors from `previous` instead of asking.
    #[must_use]
    pub fn reuse_previous(mut self, previous: Option<&'a CommitHistoryEntry>) -> Self {
        self.reuse_previous = true;
        self.previous = previous;
        self
    }

    pub fn compose(&mut self) -> Result<CommitSpec, PromptError> {
        let reused = match (self.reuse_previous, self.previous) {
            (true, Some(entry)) => Some(entry),
            (true, None) => {
                warn!("No previous commit recorded, asking for references and co-authors");
                None
            }
            (false, _) => None,
        };

        let commit_type = self.commit_type()?;
        let scope = if self.group.contains(Question::Scope) {
            Some(self.scope()?)
        } else {
            None
        };
        let message = self.message(&commit_type, scope.as_deref())?;
        let description = if self.group.contains(Question::Description) {
            self.description()?
        } else {
            Vec::new()
        };
        let refs = self.references(reused)?;
        let co_authors = self.co_author_list(reused)?;

        let spec = CommitSpec {
            commit_type,
            scope,
            message,
            description,
            refs,
            co_authors,
        };
        debug!("Composed commit spec: {:?}", spec);
        Ok(spec)
    }

    fn commit_type(&self) -> Result<String, PromptError> {
        let types = &self.config.commit.types;
        let options: Vec<String> = types.iter().map(|t| t.label()).collect();
        let index = self
            .prompter
            .select(&self.config.messages.change_type, &options)?;
        pick(types, index).map(|t| t.name.clone())
    }

    fn scope(&self) -> Result<String, PromptError> {
        let question = TextQuestion::new(
            self.config.messages.scope.clone(),
            TextRule::Length {
                min: 0,
                max: self.config.commit.max_scope_length,
            },
        );
        self.ask(&question)
    }

    fn message(&self, commit_type: &str, scope: Option<&str>) -> Result<String, PromptError> {
        let (min, max) = message_bounds(self.config, commit_type, scope);
        let question = TextQuestion::new(
            fill(&self.config.messages.commit_message, max),
            TextRule::Length { min, max },
        )
        .converted(Conversion::TrimLowerFirst);
        self.ask(&question)
    }

    fn description(&self) -> Result<Vec<String>, PromptError> {
        let max_lines = self.config.commit.max_description_length;
        let mut lines = Vec::new();

        while lines.len() < max_lines {
            let remaining = max_lines - lines.len();
            let question = TextQuestion::new(
                fill(&self.config.messages.description_message, remaining),
                TextRule::Any,
            );
            let line = self.ask(&question)?;
            if line.is_empty() {
                break;
            }
            lines.push(line);
        }

        Ok(lines)
    }

    fn references(
        &self,
        reused: Option<&CommitHistoryEntry>,
    ) -> Result<Option<References>, PromptError> {
        let refs_types = &self.config.commit.refs_types;

        if let Some(number) = &self.refs_number {
            let kind = refs_types
                .first()
                .map(String::as_str)
                .unwrap_or(FALLBACK_REFS_TYPE);
            return Ok(Some(References::new(kind, self.refs_text.as_str(), number.as_str())));
        }

        if let Some(previous) = reused {
            return Ok(previous.spec.refs.clone());
        }

        if !self.group.contains(Question::Refs) {
            return Ok(None);
        }

        let question = TextQuestion::new(
            fill(
                &self.config.messages.refs_num,
                format!("{}<refs>", self.refs_text),
            ),
            TextRule::Digits,
        );
        let number = self.ask(&question)?;
        if number.is_empty() {
            return Ok(None);
        }

        let kind = match refs_types.as_slice() {
            [] => FALLBACK_REFS_TYPE.to_string(),
            [only] => only.clone(),
            many => {
                let index = self.prompter.select(&self.config.messages.refs_type, many)?;
                pick(many, index)?.clone()
            }
        };

        Ok(Some(References::new(kind, self.refs_text.as_str(), number)))
    }

    fn co_author_list(
        &mut self,
        reused: Option<&CommitHistoryEntry>,
    ) -> Result<Vec<String>, PromptError> {
        if let Some(previous) = reused {
            return Ok(previous.spec.co_authors.clone());
        }

        if self.group.contains(Question::MultiCoAuthor) {
            self.multiple_co_authors()
        } else if self.group.contains(Question::CoAuthor) {
            self.single_co_author()
        } else {
            Ok(Vec::new())
        }
    }

    fn single_co_author(&mut self) -> Result<Vec<String>, PromptError> {
        let config = self.config;
        if !self.prompter.confirm(&config.messages.co_author_yes_no)? {
            return Ok(Vec::new());
        }

        if self.co_authors.is_empty() {
            return Ok(vec![self.add_co_author()?]);
        }

        let choices = self.co_authors.choices();
        let labels = choice_labels(&choices);
        let index = self.prompter.select(&config.messages.co_author, &labels)?;

        let co_author = match pick(&choices, index)? {
            CoAuthorChoice::Known { canonical, .. } => canonical.clone(),
            CoAuthorChoice::Other => self.add_co_author()?,
        };
        Ok(vec![co_author])
    }

    fn multiple_co_authors(&mut self) -> Result<Vec<String>, PromptError> {
        let config = self.config;
        let choices = self.co_authors.choices();
        let labels = choice_labels(&choices);
        let defaults = vec![false; labels.len()];

        let selected = self
            .prompter
            .multi_select(&config.messages.multi_co_author, &labels, &defaults)?;

        let mut co_authors = Vec::with_capacity(selected.len());
        let mut wants_new = false;
        for index in selected {
            match pick(&choices, index)? {
                CoAuthorChoice::Known { canonical, .. } => co_authors.push(canonical.clone()),
                CoAuthorChoice::Other => wants_new = true,
            }
        }

        if wants_new {
            co_authors.push(self.add_co_author()?);
        }
        Ok(co_authors)
    }

    /// Ask for a new co-author, store it, and return its canonical form.
    fn add_co_author(&mut self) -> Result<String, PromptError> {
        let config = self.config;
        let name_question =
            TextQuestion::new(config.messages.co_author_name.clone(), TextRule::StartsUppercase);
        let email_question =
            TextQuestion::new(config.messages.co_author_email.clone(), TextRule::Email);

        loop {
            let name = self.ask(&name_question)?;
            let email = self.ask(&email_question)?;

            match self.co_authors.add(&name, &email) {
                Ok(canonical) => return Ok(canonical),
                Err(err @ (StoreError::InvalidName(_) | StoreError::InvalidEmail(_))) => {
                    warn!("{}", err);
                }
                Err(err) => {
                    warn!("Co-author was not saved: {}", err);
                    return Ok(CoAuthor { name, email }.canonical());
                }
            }
        }
    }

    /// Ask until the answer satisfies the question's rule, then normalize it.
    fn ask(&self, question: &TextQuestion) -> Result<String, PromptError> {
        loop {
            let answer = self.prompter.ask_text(question)?;
            match question.rule.check(&answer) {
                Ok(()) => return Ok(question.conversion.apply(&answer)),
                Err(hint) => warn!("{}", hint),
            }
        }
    }
}

/// Accepted summary length, in characters.
///
/// The upper bound is what is left of `max_message_length` after the type and
/// scope, but never less than the lower bound.
pub fn message_bounds(config: &Config, commit_type: &str, scope: Option<&str>) -> (usize, usize) {
    let min = config.commit.min_message_length.max(1);
    let used = commit_type.chars().count() + scope.map_or(0, |s| s.chars().count());
    let max = config
        .commit
        .max_message_length
        .saturating_sub(used)
        .max(min);
    (min, max)
}

fn choice_labels(choices: &[CoAuthorChoice]) -> Vec<String> {
    choices.iter().map(|c| c.label().to_string()).collect()
}

fn pick<T>(options: &[T], index: usize) -> Result<&T, PromptError> {
    options.get(index).ok_or_else(|| {
        PromptError::Terminal(format!(
            "selection {} is out of range for {} options",
            index,
            options.len()
        ))
    })
}
