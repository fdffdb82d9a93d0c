use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Name of the optional settings file inside the base directory.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Name of the update-check cache file inside the base directory.
pub const UPDATE_CACHE_FILENAME: &str = "update-check.json";

pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";
pub const DEFAULT_FORGE_API_URL: &str = "https://api.github.com";
pub const DEFAULT_FORGE_HOST: &str = "github.com";

/// Package name this tool is published under.
pub const PACKAGE_NAME: &str = "@codeinspector/cli";

/// Version of the running binary.
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

const HOME_ENV: &str = "CODEINSPECTOR_HOME";
const REGISTRY_ENV: &str = "CODEINSPECTOR_REGISTRY";
const NO_UPDATE_CHECK_ENV: &str = "CODEINSPECTOR_NO_UPDATE_CHECK";

/// Resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_dir: PathBuf,
    pub registry_url: String,
    pub forge_api_url: String,
    pub forge_host: String,
    pub update_check: bool,
}

// Internal struct for TOML deserialization
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    registry_url: Option<String>,
    forge_api_url: Option<String>,
    forge_host: Option<String>,
    update_check: Option<bool>,
}

impl Settings {
    /// Default base directory (~/.config/codeinspector).
    pub fn default_base_dir() -> Option<PathBuf> {
        if let Some(home) = std::env::var_os(HOME_ENV) {
            return Some(PathBuf::from(home));
        }
        let dirs = xdg::BaseDirectories::with_prefix("codeinspector");
        dirs.get_config_home()
    }

    /// Resolve settings from the base directory, config file and environment.
    pub fn load() -> Result<Self> {
        let base_dir = Self::default_base_dir().ok_or(Error::NoConfigDir)?;
        let mut settings = Self::load_from(&base_dir)?;
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Settings rooted at `base_dir`, overlaid with its config.toml if present.
    pub fn load_from(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILENAME);
        let raw = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| Error::FileRead {
                path: path.clone(),
                source: e,
            })?;
            Self::parse(&content).map_err(|e| Error::ConfigParse { path, source: e })?
        } else {
            RawSettings::default()
        };

        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            registry_url: raw
                .registry_url
                .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string()),
            forge_api_url: raw
                .forge_api_url
                .unwrap_or_else(|| DEFAULT_FORGE_API_URL.to_string()),
            forge_host: raw
                .forge_host
                .unwrap_or_else(|| DEFAULT_FORGE_HOST.to_string()),
            update_check: raw.update_check.unwrap_or(true),
        })
    }

    fn parse(content: &str) -> std::result::Result<RawSettings, toml::de::Error> {
        toml::from_str(content)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(REGISTRY_ENV).filter(|v| !v.is_empty()) {
            self.registry_url = url;
        }
        if lookup(NO_UPDATE_CHECK_ENV).is_some_and(|v| !v.is_empty() && v != "0") {
            self.update_check = false;
        }
    }

    /// Per-user directory extensions are installed into.
    pub fn extensions_dir(&self) -> PathBuf {
        self.base_dir.join("extensions")
    }

    pub fn update_cache_path(&self) -> PathBuf {
        self.base_dir.join(UPDATE_CACHE_FILENAME)
    }
}
