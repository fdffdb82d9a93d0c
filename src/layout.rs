use std::cell::OnceCell;
use std::path::{Path, PathBuf};

/// File name of the extension manifest.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// File name of the npm package descriptor.
pub const PACKAGE_FILENAME: &str = "package.json";

/// Encapsulates the on-disk conventions of an extension directory.
///
/// Provides lazy-cached path accessors for the files this tool reads and writes:
/// - `manifest.json` - extension manifest
/// - `package.json` - npm package descriptor
/// - `node_modules/` - installed dependencies
#[derive(Debug)]
pub struct ExtensionLayout {
    base_path: PathBuf,
    manifest: OnceCell<PathBuf>,
    package_json: OnceCell<PathBuf>,
    node_modules: OnceCell<PathBuf>,
}

impl Clone for ExtensionLayout {
    fn clone(&self) -> Self {
        // Fresh cells, paths are recomputed lazily
        Self::new(self.base_path.clone())
    }
}

impl ExtensionLayout {
    /// Create a new ExtensionLayout for the given base path.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            manifest: OnceCell::new(),
            package_json: OnceCell::new(),
            node_modules: OnceCell::new(),
        }
    }

    /// Returns reference to the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns reference to the manifest.json path.
    pub fn manifest(&self) -> &Path {
        self.manifest
            .get_or_init(|| self.base_path.join(MANIFEST_FILENAME))
    }

    /// Returns reference to the package.json path.
    pub fn package_json(&self) -> &Path {
        self.package_json
            .get_or_init(|| self.base_path.join(PACKAGE_FILENAME))
    }

    /// Returns reference to the node_modules directory path.
    pub fn node_modules(&self) -> &Path {
        self.node_modules
            .get_or_init(|| self.base_path.join("node_modules"))
    }

    /// Resolve a path declared in the manifest relative to the extension root.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.base_path.join(relative)
    }

    pub fn has_manifest(&self) -> bool {
        self.manifest().is_file()
    }

    pub fn has_package_json(&self) -> bool {
        self.package_json().is_file()
    }
}
