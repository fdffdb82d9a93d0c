use regex::Regex;
use serde_json::Value;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, instrument};

use super::model::{ExtensionManifest, read_manifest_value};
use crate::layout::ExtensionLayout;
use crate::Result;

/// Three dot-separated numeric groups; anything after them is tolerated.
static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+").expect("valid version pattern"));

const REQUIRED_FIELDS: [&str; 4] = ["id", "name", "version", "main"];
const RECOMMENDED_FIELDS: [&str; 2] = ["description", "author"];

/// Outcome of validating a manifest that exists and parses.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub manifest: ExtensionManifest,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Returns true if `version` starts with `major.minor.patch`.
pub fn is_valid_version(version: &str) -> bool {
    VERSION_PATTERN.is_match(version)
}

/// Validate the manifest of the extension rooted at `extension_dir`.
///
/// Fails only when manifest.json is missing or not valid JSON. Field problems
/// are accumulated into the report; callers decide what errors mean for them.
#[instrument]
pub fn validate(extension_dir: &Path) -> Result<ValidationReport> {
    let layout = ExtensionLayout::new(extension_dir);
    let value = read_manifest_value(layout.manifest())?;
    let report = check_fields(&layout, &value);
    debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "manifest checked"
    );
    Ok(report)
}

fn check_fields(layout: &ExtensionLayout, value: &Value) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for field in REQUIRED_FIELDS {
        if !is_present(value.get(field)) {
            errors.push(format!("Missing required field: {}", field));
        }
    }

    if let Some(version) = value.get("version").filter(|v| is_present(Some(v))) {
        let valid = version.as_str().is_some_and(is_valid_version);
        if !valid {
            errors.push("Invalid version format (should be semantic: x.y.z)".to_string());
        }
    }

    if let Some(main) = value.get("main").filter(|v| is_present(Some(v))) {
        let exists = main
            .as_str()
            .is_some_and(|main| layout.resolve(main).exists());
        if !exists {
            let shown = main.as_str().map_or_else(|| main.to_string(), str::to_string);
            warnings.push(format!("Main file not found: {}", shown));
        }
    }

    for field in RECOMMENDED_FIELDS {
        if !is_present(value.get(field)) {
            warnings.push(format!("Missing recommended field: {}", field));
        }
    }

    ValidationReport {
        errors,
        warnings,
        manifest: ExtensionManifest::from_value(value),
    }
}

/// Absent, null, empty-string, zero and `false` values count as missing.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(_) => true,
    }
}
