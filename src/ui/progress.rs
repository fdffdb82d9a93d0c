use colored::Colorize;
use tracing::debug;

/// Phased progress of a long-running command.
pub trait Reporter {
    /// A new phase has started.
    fn step(&self, message: &str);
    fn success(&self, message: &str);
    /// Something went wrong but the command carries on.
    fn warn(&self, message: &str);
    fn fail(&self, message: &str);
}

/// Reporter printing colored status lines.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn step(&self, message: &str) {
        debug!(step = message);
        println!("{} {}", "…".dimmed(), message.dimmed());
    }

    fn success(&self, message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    fn warn(&self, message: &str) {
        println!("{} {}", "⚠".yellow(), message.yellow());
    }

    fn fail(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message.red());
    }
}
