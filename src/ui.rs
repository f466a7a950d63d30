//! User-facing output with short colored headings.
//!
//! In verbose mode every line starts with a bracketed, fixed-width heading such
//! as `[-commit-]`. Otherwise a single colored symbol is used instead.

use colored::{ColoredString, Colorize};

const HEADING_LEN: usize = 8;

/// Section a printed line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Commit,
    Debug,
    Push,
    Error,
    Add,
    Exit,
}

impl Heading {
    fn name(self) -> &'static str {
        match self {
            Heading::Commit => "commit",
            Heading::Debug => "debugg",
            Heading::Push => "push",
            Heading::Error => "error",
            Heading::Add => "gitadd",
            Heading::Exit => "exit",
        }
    }

    fn symbol(self) -> ColoredString {
        match self {
            Heading::Error => "!".red().bold(),
            Heading::Debug => "$".magenta().bold(),
            Heading::Exit => "!".bright_blue().bold(),
            Heading::Push => "!".green().bold(),
            _ => "?".green().bold(),
        }
    }

    fn colored_name(self, name: &str) -> ColoredString {
        match self {
            Heading::Error => name.red(),
            Heading::Exit => name.bright_blue(),
            _ => name.cyan(),
        }
    }
}

/// Pad `name` with dashes to `HEADING_LEN`, shortening names that would not fit.
fn frame(name: &str) -> (String, String, String) {
    let name = if name.chars().count() >= HEADING_LEN - 1 {
        let short: String = name.chars().take(HEADING_LEN - 3).collect();
        format!("{}.", short)
    } else {
        name.to_string()
    };

    let len = name.chars().count();
    let right = (HEADING_LEN - len) / 2;
    let left = HEADING_LEN - (len + right);
    ("-".repeat(left), name, "-".repeat(right))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Printer {
    verbose: bool,
}

impl Printer {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// A heading followed by the bold text, on one line.
    pub fn text(&self, heading: Heading, prompt: &str) -> String {
        let heading_text = if self.verbose {
            let (left, name, right) = frame(heading.name());
            format!("[{}{}{}]", left, heading.colored_name(&name), right)
        } else {
            heading.symbol().to_string()
        };
        format!("{} {}", heading_text, prompt.bold())
    }

    /// Label for a commit question.
    pub fn question(&self, prompt: &str) -> String {
        self.text(Heading::Commit, prompt)
    }

    /// Label for the file selector.
    pub fn add_text(&self, prompt: &str) -> String {
        self.text(Heading::Add, prompt)
    }

    pub fn print(&self, heading: Heading, prompt: &str) {
        println!("\n{}", self.text(heading, prompt));
    }

    pub fn error(&self, prompt: &str) {
        eprintln!("\n{}", self.text(Heading::Error, prompt));
    }

    pub fn exit(&self, prompt: &str) {
        self.print(Heading::Exit, prompt);
    }

    pub fn push(&self, prompt: &str) {
        self.print(Heading::Push, prompt);
    }

    pub fn debug(&self, prompt: &str) {
        self.print(Heading::Debug, prompt);
    }

    /// Indented green file list.
    pub fn files(&self, files: &[String]) {
        for file in files {
            println!("  {}", file.green());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain<T>(f: impl FnOnce() -> T) -> T {
        colored::control::set_override(false);
        let result = f();
        colored::control::unset_override();
        result
    }

    #[test]
    fn test_frame_centers_short_names() {
        assert_eq!(frame("push"), ("--".into(), "push".into(), "--".into()));
        assert_eq!(frame("commit"), ("-".into(), "commit".into(), "-".into()));
        assert_eq!(frame("error"), ("--".into(), "error".into(), "-".into()));
    }

    #[test]
    fn test_frame_shortens_long_names() {
        assert_eq!(frame("verylongname"), ("-".into(), "veryl.".into(), "-".into()));
    }

    #[test]
    #[serial_test::serial]
    fn test_verbose_text_uses_bracketed_heading() {
        let text = plain(|| Printer::new(true).text(Heading::Commit, "Pick one"));
        assert_eq!(text, "[-commit-] Pick one");
    }

    #[test]
    #[serial_test::serial]
    fn test_compact_text_uses_symbols() {
        let printer = Printer::new(false);
        let (question, debug, error) = plain(|| {
            (
                printer.question("Scope?"),
                printer.text(Heading::Debug, "git push"),
                printer.text(Heading::Error, "boom"),
            )
        });
        assert_eq!(question, "? Scope?");
        assert_eq!(debug, "$ git push");
        assert_eq!(error, "! boom");
    }
}
