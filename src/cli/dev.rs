use colored::Colorize;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc;
use tracing::{debug, error};

use super::resolve_dir;
use crate::installer::{DependencyInstaller, NpmInstaller};
use crate::layout::ExtensionLayout;
use crate::manifest::ExtensionManifest;
use crate::ui::{ConsoleReporter, Reporter, TerminalPrompter};
use crate::{Error, Result};

/// Source file extensions that trigger a reload hint.
const WATCHED_EXTENSIONS: [&str; 2] = ["js", "ts"];

enum DevEvent {
    Fs(notify::Result<Event>),
    Interrupt,
}

/// Watch an extension and report source changes until Ctrl+C.
pub fn run(path: Option<PathBuf>) -> Result<()> {
    let prompter = TerminalPrompter;
    let reporter = ConsoleReporter;
    let dir = resolve_dir(path, &prompter)?;

    let layout = ExtensionLayout::new(&dir);
    if !layout.has_manifest() {
        return Err(Error::ManifestNotFound(dir));
    }
    let manifest = ExtensionManifest::load(layout.manifest())?;

    reporter.step(&format!("Starting dev mode for {}...", manifest.name));
    if layout.has_package_json() && !layout.node_modules().exists() {
        reporter.step("Installing dependencies...");
        NpmInstaller::default().install(&dir)?;
    }
    reporter.success(&format!("Dev mode ready for {}", manifest.name));

    let (tx, rx) = mpsc::channel();
    let interrupt_tx = tx.clone();
    ctrlc::set_handler(move || {
        let _ = interrupt_tx.send(DevEvent::Interrupt);
    })?;

    let mut watcher = RecommendedWatcher::new(
        move |result: notify::Result<Event>| {
            if let Err(e) = tx.send(DevEvent::Fs(result)) {
                debug!("watch channel closed: {}", e);
            }
        },
        Config::default(),
    )?;
    // Events carry absolute paths
    let root = std::fs::canonicalize(&dir)?;
    watcher.watch(&root, RecursiveMode::Recursive)?;

    println!("\nWatching for changes in: {}", dir.display());
    println!("Press Ctrl+C to stop\n");

    for event in rx {
        match event {
            DevEvent::Fs(Ok(event)) => {
                for changed in changed_sources(&root, &event) {
                    println!("\n{} File changed: {}", "✓".green(), changed.display());
                    println!("  Extension: {}", manifest.name);
                    println!("  Reload the extension in CodeInspector to test changes");
                }
            }
            DevEvent::Fs(Err(e)) => error!("watch error: {}", e),
            DevEvent::Interrupt => break,
        }
    }

    watcher.unwatch(&root)?;
    drop(watcher);
    println!();
    reporter.success("Dev mode stopped");
    Ok(())
}

/// Modified `.js`/`.ts` files in `event`, relative to `root`.
///
/// Paths under `node_modules` or any dot-prefixed component are ignored.
fn changed_sources(root: &Path, event: &Event) -> Vec<PathBuf> {
    if !matches!(event.kind, EventKind::Modify(_)) {
        return Vec::new();
    }

    event
        .paths
        .iter()
        .map(|path| path.strip_prefix(root).unwrap_or(path).to_path_buf())
        .filter(|relative| !is_ignored(relative))
        .filter(|relative| {
            relative
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| WATCHED_EXTENSIONS.contains(&ext))
        })
        .collect()
}

fn is_ignored(relative: &Path) -> bool {
    relative.components().any(|component| match component {
        Component::Normal(name) => {
            let name = name.to_string_lossy();
            name == "node_modules" || name.starts_with('.')
        }
        _ => false,
    })
}
