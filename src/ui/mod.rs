mod progress;
mod prompt;

pub use progress::{ConsoleReporter, Reporter};
pub use prompt::{InputRule, Prompter, Question, TerminalPrompter};
