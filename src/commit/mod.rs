//! Commit composition: questions, answers, and the rendered message.

pub mod message;
pub mod pipeline;
pub mod questions;
pub mod terminal;

pub use message::{CommitSpec, References, strip_trailing_punctuation};
pub use pipeline::{Composer, message_bounds};
pub use questions::{Conversion, Prompter, TextQuestion, TextRule};
pub use terminal::TerminalPrompter;
