use std::path::Path;

use crate::scaffold::{self, Language, ScaffoldOptions};
use crate::ui::{ConsoleReporter, InputRule, Prompter, Question, Reporter, TerminalPrompter};
use crate::Result;

/// Directory under the working directory that new extensions go into.
pub const EXTENSIONS_DIR: &str = "extensions";

/// Scaffold a new extension in ./extensions.
pub fn run(name: Option<String>) -> Result<()> {
    let prompter = TerminalPrompter;
    let reporter = ConsoleReporter;

    let name = match name {
        Some(name) => name,
        None => prompter.input(&Question::new("Extension name").rule(InputRule::NonEmpty))?,
    };

    let parent = std::env::current_dir()?.join(EXTENSIONS_DIR);
    // Checked up front so no questions are asked for a taken name
    scaffold::ensure_available(&parent, &name)?;

    let options = ScaffoldOptions::ask(&prompter, name)?;
    let path = scaffold::scaffold(&parent, &options, &reporter)?;

    reporter.success(&format!("Extension created at {}", path.display()));
    print_next_steps(&Path::new(EXTENSIONS_DIR).join(&options.name), options.language);
    Ok(())
}

fn print_next_steps(relative: &Path, language: Language) {
    println!("\nNext steps:");
    println!("  1. cd {}", relative.display());
    println!("  2. npm install");
    println!("  3. Edit {} to customize your extension", language.source_file());
    let mut step = 4;
    if language == Language::TypeScript {
        println!("  {}. Run 'npm run build' to compile TypeScript", step);
        step += 1;
    }
    println!(
        "  {}. Commit and push: git add . && git commit -m \"Initial commit\" && git push",
        step
    );
}
