//! `Prompter` backed by the terminal through dialoguer.

use std::io::ErrorKind;

use console::Term;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Select};
use tracing::debug;

use crate::error::PromptError;
use crate::ui::Printer;

use super::questions::{Prompter, TextQuestion};

/// Interactive prompter. Esc on a list or confirm cancels the run.
pub struct TerminalPrompter {
    printer: Printer,
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new(printer: Printer) -> Self {
        Self {
            printer,
            theme: ColorfulTheme::default(),
        }
    }

    fn multi_select_raw(
        &self,
        prompt: String,
        options: &[String],
        defaults: &[bool],
    ) -> Result<Vec<usize>, PromptError> {
        MultiSelect::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(options)
            .defaults(defaults)
            .interact_opt()
            .map_err(map_dialoguer_error)?
            .ok_or(PromptError::Cancelled)
    }
}

impl Prompter for TerminalPrompter {
    fn select(&self, label: &str, options: &[String]) -> Result<usize, PromptError> {
        Select::with_theme(&self.theme)
            .with_prompt(self.printer.question(label))
            .items(options)
            .default(0)
            .interact_opt()
            .map_err(map_dialoguer_error)?
            .ok_or(PromptError::Cancelled)
    }

    fn multi_select(
        &self,
        label: &str,
        options: &[String],
        defaults: &[bool],
    ) -> Result<Vec<usize>, PromptError> {
        self.multi_select_raw(self.printer.question(label), options, defaults)
    }

    fn ask_text(&self, question: &TextQuestion) -> Result<String, PromptError> {
        let rule = question.rule;
        Input::<String>::with_theme(&self.theme)
            .with_prompt(self.printer.question(&question.label))
            .allow_empty(true)
            .validate_with(move |input: &String| rule.check(input))
            .interact_text()
            .map_err(map_dialoguer_error)
    }

    fn confirm(&self, label: &str) -> Result<bool, PromptError> {
        Confirm::with_theme(&self.theme)
            .with_prompt(self.printer.question(label))
            .default(false)
            .interact_opt()
            .map_err(map_dialoguer_error)?
            .ok_or(PromptError::Cancelled)
    }

    fn select_files(
        &self,
        label: &str,
        files: &[String],
        defaults: &[bool],
    ) -> Result<Vec<usize>, PromptError> {
        self.multi_select_raw(self.printer.add_text(label), files, defaults)
    }
}

/// An interrupt cancels the run. dialoguer leaves the cursor hidden then.
fn map_dialoguer_error(err: dialoguer::Error) -> PromptError {
    match err {
        dialoguer::Error::IO(io) if io.kind() == ErrorKind::Interrupted => {
            if let Err(e) = Term::stderr().show_cursor() {
                debug!("Could not restore the cursor: {}", e);
            }
            PromptError::Cancelled
        }
        other => PromptError::Terminal(other.to_string()),
    }
}
