use colored::Colorize;
use std::path::PathBuf;

use crate::manifest::validate;
use crate::ui::{ConsoleReporter, Reporter};
use crate::{Error, Result};

/// Validate the manifest in `path` (defaults to the working directory).
pub fn run(path: Option<PathBuf>) -> Result<()> {
    let reporter = ConsoleReporter;
    let dir = match path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    reporter.step("Validating extension...");
    let report = validate(&dir)?;

    if !report.is_valid() {
        reporter.fail("Validation failed");
        eprintln!("\nErrors:");
        for error in &report.errors {
            eprintln!("  {} {}", "✗".red(), error);
        }
        return Err(Error::ValidationFailed(report.errors.len()));
    }

    reporter.success("Manifest is valid");
    if !report.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &report.warnings {
            println!("  {} {}", "⚠".yellow(), warning);
        }
    }

    let manifest = &report.manifest;
    println!("\nExtension Details:");
    println!("  ID: {}", manifest.id);
    println!("  Name: {}", manifest.name);
    println!("  Version: {}", manifest.version);
    println!("  Main: {}", manifest.main);
    Ok(())
}
