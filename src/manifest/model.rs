use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::{Error, Result};

/// The parsed manifest.json of an extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtensionManifest {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub main: String,
}

impl ExtensionManifest {
    /// Read and parse a manifest file.
    ///
    /// A missing file and malformed JSON are the only failures; fields of the
    /// wrong type are read leniently so callers can still display them.
    pub fn load(path: &Path) -> Result<Self> {
        read_manifest_value(path).map(|value| Self::from_value(&value))
    }

    /// Build a manifest from an arbitrary JSON value, tolerating missing fields.
    pub fn from_value(value: &Value) -> Self {
        Self {
            id: string_field(value, "id").unwrap_or_default(),
            name: string_field(value, "name").unwrap_or_default(),
            version: string_field(value, "version").unwrap_or_default(),
            description: string_field(value, "description"),
            author: string_field(value, "author"),
            main: string_field(value, "main").unwrap_or_default(),
        }
    }

    /// Write the manifest as 2-space indented JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }
}

/// Read manifest.json as a raw JSON value.
pub(crate) fn read_manifest_value(path: &Path) -> Result<Value> {
    if !path.is_file() {
        let dir = path.parent().unwrap_or(Path::new("."));
        return Err(Error::ManifestNotFound(dir.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| Error::ManifestParse {
        path: path.to_path_buf(),
        source: e,
    })
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// The npm package.json written next to an extension manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub module_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripts: Option<BTreeMap<String, String>>,
}

impl PackageDescriptor {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| Error::JsonParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }
}

/// Serialize `value` as pretty JSON (2-space indent) to `path`.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value).map_err(|e| Error::JsonParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    std::fs::write(path, content).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
