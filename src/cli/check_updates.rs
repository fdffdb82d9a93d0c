use colored::Colorize;

use crate::config::Settings;
use crate::update::{UpdateRecord, default_checker, upgrade_command};
use crate::Result;

/// Report whether a newer release of the CLI is published.
pub fn run(settings: &Settings, force: bool) -> Result<()> {
    println!("{}", "Checking for updates...".dimmed());
    let checker = default_checker(settings);
    let record = if force { checker.refresh() } else { checker.check() };
    print!("{}", render(&record));
    Ok(())
}

fn render(record: &UpdateRecord) -> String {
    if let Some(error) = &record.error {
        return format!(
            "{}\n\n  Status: {} {}\n  Message: {}\n\n",
            "✗ Error checking updates".red(),
            record.status.to_string().yellow(),
            record.status_text,
            error
        );
    }

    let (Some(current), Some(latest)) = (&record.current, &record.latest) else {
        return format!("{}\n\n", "⚠  Could not check for updates".yellow());
    };

    let mut out = format!(
        "\nVersion Information:\n\n  Current: {}\n  Latest:  {}\n  Status:  {} {}\n",
        current.cyan(),
        latest.cyan(),
        record.status.to_string().green(),
        record.status_text
    );
    match record.is_outdated {
        Some(true) => out.push_str(&format!(
            "\n{}  {}\n\n  {} {}\n\n",
            "⚠".yellow(),
            "Update available!".bold(),
            "Run:".dimmed(),
            upgrade_command().cyan()
        )),
        Some(false) => out.push_str(&format!(
            "\n{}  {}\n\n",
            "✓".green(),
            "Already on the latest version!".bold()
        )),
        None => {}
    }
    out
}
