use crate::config::Settings;
use crate::installer::{InstallOutcome, Installer, NpmInstaller};
use crate::ui::{ConsoleReporter, InputRule, Prompter, Question, Reporter, TerminalPrompter};
use crate::vcs::GitClient;
use crate::Result;

/// Install an extension into the per-user extensions directory.
pub fn run(settings: &Settings, source: Option<String>) -> Result<()> {
    let prompter = TerminalPrompter;
    let reporter = ConsoleReporter;

    let source = match source {
        Some(source) => source,
        None => ask_source(&prompter)?,
    };

    let vcs = GitClient::new();
    let deps = NpmInstaller::default();
    let installer = Installer::new(settings.extensions_dir(), &vcs, &deps, &prompter, &reporter);

    match installer.install(&source)? {
        InstallOutcome::Installed { path, manifest } => {
            reporter.success(&format!("Extension installed: {}", manifest.name));
            println!("\nExtension location: {}", path.display());
            println!("Extension ID: {}", manifest.id);
            println!("\nRestart CodeInspector to load the extension.");
        }
        InstallOutcome::Cancelled => {}
    }
    Ok(())
}

fn ask_source(prompter: &dyn Prompter) -> Result<String> {
    let kind = prompter.select(
        "Install from",
        &["Git URL (GitHub, etc.)", "Local directory"],
        0,
    )?;
    let prompt = if kind == 0 {
        "Git repository URL"
    } else {
        "Local extension path"
    };
    prompter.input(&Question::new(prompt).rule(InputRule::NonEmpty))
}
