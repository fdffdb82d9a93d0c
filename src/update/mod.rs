mod cache;
mod checker;
mod notice;
mod registry;
mod version;

pub use cache::{CACHE_TTL_MS, UpdateCache, UpdateRecord};
pub use checker::{UpdateChecker, failure_record};
pub use notice::{display_update_notification, format_notice, upgrade_command};
pub use registry::{FetchFailure, HttpRegistry, REGISTRY_TIMEOUT, Registry, latest_from_metadata};
pub use version::compare_versions;

use std::thread::JoinHandle;
use tracing::debug;

use crate::config::{CURRENT_VERSION, PACKAGE_NAME, Settings};

/// Checker wired to the configured registry and cache file.
pub fn default_checker(settings: &Settings) -> UpdateChecker<HttpRegistry> {
    UpdateChecker::new(
        HttpRegistry::new(settings.registry_url.clone()),
        UpdateCache::new(settings.update_cache_path()),
        PACKAGE_NAME,
        CURRENT_VERSION,
    )
}

/// Update check running beside the main command.
pub struct BackgroundCheck {
    handle: JoinHandle<UpdateRecord>,
}

impl BackgroundCheck {
    pub fn spawn<R: Registry + 'static>(checker: UpdateChecker<R>) -> Self {
        let handle = std::thread::spawn(move || checker.check());
        Self { handle }
    }

    /// Wait for the check. A panicked check yields `None`.
    pub fn finish(self) -> Option<UpdateRecord> {
        match self.handle.join() {
            Ok(record) => Some(record),
            Err(_) => {
                debug!("background update check panicked");
                None
            }
        }
    }
}
