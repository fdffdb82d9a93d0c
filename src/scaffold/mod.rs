//! Extension scaffolding.

mod templates;

use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{info, instrument};

use crate::layout::ExtensionLayout;
use crate::manifest::{ExtensionManifest, PackageDescriptor, write_json};
use crate::ui::{InputRule, Prompter, Question, Reporter};
use crate::{Error, Result};

/// Runtime dependency of every generated extension.
pub const HANDLER_PACKAGE: &str = "@codeinspector/extension-handler";

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    JavaScript,
    TypeScript,
}

impl Language {
    pub const CHOICES: [&'static str; 2] = ["JavaScript", "TypeScript"];

    /// Path of the editable source file, relative to the extension root.
    pub fn source_file(self) -> &'static str {
        match self {
            Language::JavaScript => "index.js",
            Language::TypeScript => "src/index.ts",
        }
    }

    /// Entry point loaded at runtime.
    pub fn main_file(self) -> &'static str {
        match self {
            Language::JavaScript => "index.js",
            Language::TypeScript => "dist/index.js",
        }
    }
}

/// Answers collected before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldOptions {
    pub name: String,
    pub description: String,
    pub author: String,
    pub version: String,
    pub language: Language,
    /// npm scope without the leading `@`.
    pub scope: Option<String>,
}

impl ScaffoldOptions {
    /// Ask for every remaining answer.
    pub fn ask(prompter: &dyn Prompter, name: String) -> Result<Self> {
        let description = prompter.input(
            &Question::new("Extension description")
                .default(format!("{} extension for CodeInspector", name)),
        )?;
        let author = prompter.input(&Question::new("Author name").default("Your Name"))?;
        let version = prompter.input(
            &Question::new("Initial version")
                .default("1.0.0")
                .rule(InputRule::Version),
        )?;
        let language = match prompter.select("Select language", &Language::CHOICES, 0)? {
            1 => Language::TypeScript,
            _ => Language::JavaScript,
        };
        let scope = prompter.input(&Question::new(
            "npm scope (e.g., \"yourname\") [optional]",
        ))?;

        Ok(Self {
            name,
            description,
            author,
            version,
            language,
            scope: normalize_scope(&scope),
        })
    }

    pub fn id(&self) -> String {
        derive_id(&self.name)
    }

    pub fn package_name(&self) -> String {
        match &self.scope {
            Some(scope) => format!("@{}/{}", scope, self.id()),
            None => self.id(),
        }
    }
}

fn normalize_scope(scope: &str) -> Option<String> {
    let scope = scope.trim().trim_start_matches('@');
    (!scope.is_empty()).then(|| scope.to_string())
}

/// Manifest id: lowercase with whitespace runs replaced by `-`.
pub fn derive_id(name: &str) -> String {
    WHITESPACE.replace_all(&name.to_lowercase(), "-").into_owned()
}

/// `my-cool thing` -> `MyCoolThing`.
pub fn pascal_case(name: &str) -> String {
    name.split(|c: char| c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Target directory for `name` under `parent`.
pub fn scaffold_path(parent: &Path, name: &str) -> PathBuf {
    parent.join(name)
}

/// Fail if an extension called `name` already exists under `parent`.
pub fn ensure_available(parent: &Path, name: &str) -> Result<PathBuf> {
    let path = scaffold_path(parent, name);
    if path.exists() {
        return Err(Error::ExtensionExists {
            name: name.to_string(),
            path,
        });
    }
    Ok(path)
}

/// Write a new extension to `<parent>/<name>` and return its path.
#[instrument(skip(options, reporter), fields(name = %options.name))]
pub fn scaffold(parent: &Path, options: &ScaffoldOptions, reporter: &dyn Reporter) -> Result<PathBuf> {
    let root = ensure_available(parent, &options.name)?;
    let layout = ExtensionLayout::new(&root);
    let language = options.language;
    let id = options.id();

    reporter.step("Creating directories...");
    let source_path = layout.resolve(language.source_file());
    if let Some(dir) = source_path.parent() {
        create_dir(dir)?;
    }

    reporter.step("Creating manifest.json...");
    let manifest = ExtensionManifest {
        id: id.clone(),
        name: options.name.clone(),
        version: options.version.clone(),
        description: Some(options.description.clone()),
        author: Some(options.author.clone()),
        main: language.main_file().to_string(),
    };
    manifest.save(layout.manifest())?;

    reporter.step("Creating extension class...");
    let source = templates::entry_source(language, &pascal_case(&options.name), &id, &options.name);
    write_file(&source_path, &source)?;

    reporter.step("Creating package.json...");
    package_descriptor(options, &manifest).save(layout.package_json())?;

    reporter.step("Creating README.md...");
    write_file(
        &layout.resolve("README.md"),
        &templates::readme(&options.name, &options.description, language.source_file()),
    )?;
    write_file(&layout.resolve(".gitignore"), templates::GITIGNORE)?;

    if language == Language::TypeScript {
        reporter.step("Creating tsconfig.json...");
        write_json(&layout.resolve("tsconfig.json"), &templates::tsconfig())?;
    }

    info!(path = %root.display(), "extension scaffolded");
    Ok(root)
}

fn package_descriptor(options: &ScaffoldOptions, manifest: &ExtensionManifest) -> PackageDescriptor {
    let typescript = options.language == Language::TypeScript;
    PackageDescriptor {
        name: options.package_name(),
        version: manifest.version.clone(),
        description: manifest.description.clone(),
        main: Some(manifest.main.clone()),
        module_type: Some("module".to_string()),
        author: manifest.author.clone(),
        dependencies: BTreeMap::from([(HANDLER_PACKAGE.to_string(), "^1.0.0".to_string())]),
        dev_dependencies: typescript
            .then(|| BTreeMap::from([("typescript".to_string(), "^5.0.0".to_string())])),
        scripts: typescript.then(|| {
            BTreeMap::from([
                ("build".to_string(), "tsc".to_string()),
                ("watch".to_string(), "tsc --watch".to_string()),
            ])
        }),
    }
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
