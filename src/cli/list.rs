use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::create::EXTENSIONS_DIR;
use crate::config::Settings;
use crate::layout::ExtensionLayout;
use crate::manifest::ExtensionManifest;
use crate::ui::{Prompter, TerminalPrompter};
use crate::Result;

/// An extension directory with a readable manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Listed {
    folder: String,
    path: PathBuf,
    manifest: ExtensionManifest,
}

impl Listed {
    fn summary(&self) -> String {
        format!(
            "{} ({}) v{}",
            self.manifest.name, self.manifest.id, self.manifest.version
        )
    }
}

/// List extensions and show details for the chosen ones.
pub fn run(settings: &Settings, installed: bool) -> Result<()> {
    let dir = if installed {
        settings.extensions_dir()
    } else {
        std::env::current_dir()?.join(EXTENSIONS_DIR)
    };

    if !dir.is_dir() {
        println!("No extensions directory found");
        return Ok(());
    }

    let extensions = discover(&dir)?;
    if extensions.is_empty() {
        println!("No valid extensions found");
        return Ok(());
    }

    for extension in &extensions {
        println!("  {}", extension.summary());
    }

    let labels: Vec<String> = extensions.iter().map(Listed::summary).collect();
    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
    let selected = TerminalPrompter.multi_select(
        "Select extensions to view details",
        &labels,
        &vec![false; labels.len()],
    )?;

    if selected.is_empty() {
        println!("\nNo extensions selected");
        return Ok(());
    }

    println!("\nSelected Extensions:\n");
    for extension in selected.iter().filter_map(|&i| extensions.get(i)) {
        print!("{}", details(extension));
    }
    Ok(())
}

/// Subdirectories of `dir` holding a parsable manifest, sorted by folder name.
fn discover(dir: &Path) -> Result<Vec<Listed>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        let layout = ExtensionLayout::new(entry.path());
        if !layout.has_manifest() {
            continue;
        }
        match ExtensionManifest::load(layout.manifest()) {
            Ok(manifest) => found.push(Listed {
                folder: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path(),
                manifest,
            }),
            Err(e) => debug!(path = %entry.path().display(), error = %e, "skipping unreadable manifest"),
        }
    }
    found.sort_by(|a, b| a.folder.cmp(&b.folder));
    Ok(found)
}

fn details(extension: &Listed) -> String {
    let manifest = &extension.manifest;
    format!(
        "📦 {} ({})\n   Version: {}\n   Description: {}\n   Author: {}\n   Path: {}\n\n",
        manifest.name.bold(),
        manifest.id,
        manifest.version,
        manifest.description.as_deref().unwrap_or("No description"),
        manifest.author.as_deref().unwrap_or("Unknown"),
        extension.path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_discover_skips_folders_without_manifest() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        for (folder, id) in [("beta", "b"), ("alpha", "a")] {
            fs::create_dir_all(root.join(folder)).unwrap();
            fs::write(
                root.join(folder).join("manifest.json"),
                format!(r#"{{"id":"{id}","name":"{folder}","version":"1.0.0","main":"index.js"}}"#),
            )
            .unwrap();
        }
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::create_dir_all(root.join("broken")).unwrap();
        fs::write(root.join("broken/manifest.json"), "{ nope").unwrap();
        fs::write(root.join("stray.txt"), "").unwrap();

        let found = discover(root).unwrap();
        let folders: Vec<&str> = found.iter().map(|l| l.folder.as_str()).collect();
        assert_eq!(folders, vec!["alpha", "beta"]);
        assert_eq!(found[0].summary(), "alpha (a) v1.0.0");
    }

    #[test]
    fn test_details_fallbacks() {
        colored::control::set_override(false);
        let listed = Listed {
            folder: "demo".to_string(),
            path: PathBuf::from("extensions/demo"),
            manifest: ExtensionManifest {
                id: "demo".to_string(),
                name: "Demo".to_string(),
                version: "1.0.0".to_string(),
                ..Default::default()
            },
        };
        let text = details(&listed);
        assert!(text.contains("Description: No description"));
        assert!(text.contains("Author: Unknown"));
        assert!(text.contains("Path: extensions/demo"));
    }
}
