mod settings;

pub use settings::{
    CONFIG_FILENAME, CURRENT_VERSION, DEFAULT_FORGE_API_URL, DEFAULT_FORGE_HOST,
    DEFAULT_REGISTRY_URL, PACKAGE_NAME, Settings, UPDATE_CACHE_FILENAME,
};
