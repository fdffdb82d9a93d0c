use std::cmp::Ordering;
use tracing::{debug, instrument};

use super::cache::{UpdateCache, UpdateRecord};
use super::registry::{FetchFailure, Registry};
use super::version::compare_versions;

/// Decides whether the running tool is older than the published release.
pub struct UpdateChecker<R> {
    registry: R,
    cache: UpdateCache,
    package: String,
    current_version: String,
    clock: fn() -> i64,
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl<R: Registry> UpdateChecker<R> {
    pub fn new(
        registry: R,
        cache: UpdateCache,
        package: impl Into<String>,
        current_version: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            cache,
            package: package.into(),
            current_version: current_version.into(),
            clock: now_millis,
        }
    }

    /// Replace the wall clock (epoch milliseconds).
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// Cached record if fresh, otherwise a new lookup that is then cached.
    ///
    /// Always yields a record; failures are described inside it.
    #[instrument(skip(self), fields(package = %self.package))]
    pub fn check(&self) -> UpdateRecord {
        let now = (self.clock)();
        if let Some(cached) = self.cache.read_at(now) {
            debug!("using cached update record");
            return cached;
        }
        self.refresh_at(now)
    }

    /// Skip the cache, look up the registry and cache the result.
    pub fn refresh(&self) -> UpdateRecord {
        self.refresh_at((self.clock)())
    }

    fn refresh_at(&self, now: i64) -> UpdateRecord {
        let record = match self.registry.latest_version(&self.package) {
            Ok(latest) => {
                let is_outdated = compare_versions(&self.current_version, &latest) == Ordering::Less;
                debug!(current = %self.current_version, %latest, is_outdated, "registry lookup succeeded");
                UpdateRecord {
                    current: Some(self.current_version.clone()),
                    latest: Some(latest),
                    is_outdated: Some(is_outdated),
                    timestamp: now,
                    status: 200,
                    status_text: "OK".to_string(),
                    error: None,
                }
            }
            Err(failure) => {
                debug!(?failure, "registry lookup failed");
                failure_record(failure, now)
            }
        };

        self.cache.write(&record);
        record
    }
}

/// Turn a lookup failure into a record with a human-readable cause.
pub fn failure_record(failure: FetchFailure, now: i64) -> UpdateRecord {
    let (status, status_text, error) = match failure {
        FetchFailure::Status {
            status,
            status_text,
        } => {
            let error = match status {
                404 => "Package not found in registry".to_string(),
                500.. => format!("Registry error ({} {})", status, status_text),
                400..=499 => format!("Registry request failed ({} {})", status, status_text),
                _ => format!("Unexpected registry response ({} {})", status, status_text),
            };
            if (400..).contains(&status) {
                (status, status_text, error)
            } else {
                (0, "Unknown Error".to_string(), error)
            }
        }
        FetchFailure::Timeout => (
            0,
            "Timeout".to_string(),
            "Registry request timeout".to_string(),
        ),
        FetchFailure::Connection => (
            0,
            "Connection Error".to_string(),
            "Cannot connect to registry".to_string(),
        ),
        FetchFailure::Other(message) => (0, "Unknown Error".to_string(), message),
    };

    UpdateRecord {
        current: None,
        latest: None,
        is_outdated: None,
        timestamp: now,
        status,
        status_text,
        error: Some(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRegistry;
    use pretty_assertions::assert_eq;

    const T0: i64 = 1_700_000_000_000;

    fn fixed_clock() -> i64 {
        T0
    }

    fn checker(
        registry: FakeRegistry,
        dir: &std::path::Path,
        current: &str,
    ) -> UpdateChecker<FakeRegistry> {
        UpdateChecker::new(
            registry,
            UpdateCache::new(dir.join("update-check.json")),
            "@codeinspector/cli",
            current,
        )
        .with_clock(fixed_clock)
    }

    #[test]
    fn test_newer_release_is_outdated() {
        let temp_dir = tempfile::tempdir().unwrap();
        let checker = checker(FakeRegistry::latest("2.0.0"), temp_dir.path(), "1.0.0");

        let record = checker.check();
        assert_eq!(record.current.as_deref(), Some("1.0.0"));
        assert_eq!(record.latest.as_deref(), Some("2.0.0"));
        assert_eq!(record.is_outdated, Some(true));
        assert_eq!(record.status, 200);
        assert_eq!(record.timestamp, T0);
    }

    #[test]
    fn test_same_release_is_current() {
        let temp_dir = tempfile::tempdir().unwrap();
        let checker = checker(FakeRegistry::latest("1.0.0"), temp_dir.path(), "1.0.0");
        assert_eq!(checker.check().is_outdated, Some(false));
    }

    #[test]
    fn test_fresh_cache_skips_registry() {
        let temp_dir = tempfile::tempdir().unwrap();
        let registry = FakeRegistry::latest("2.0.0");
        let calls = registry.calls();
        let checker = checker(registry, temp_dir.path(), "1.0.0");

        let first = checker.check();
        let second = checker.check();
        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_stale_cache_queries_registry() {
        let temp_dir = tempfile::tempdir().unwrap();
        UpdateCache::new(temp_dir.path().join("update-check.json")).write(&UpdateRecord {
            current: Some("1.0.0".to_string()),
            latest: Some("1.5.0".to_string()),
            is_outdated: Some(true),
            timestamp: T0 - crate::update::CACHE_TTL_MS - 1,
            status: 200,
            status_text: "OK".to_string(),
            error: None,
        });
        let registry = FakeRegistry::latest("2.0.0");
        let calls = registry.calls();
        let checker = checker(registry, temp_dir.path(), "1.0.0");

        let record = checker.check();
        assert_eq!(calls.get(), 1);
        assert_eq!(record.latest.as_deref(), Some("2.0.0"));
        assert_eq!(record.timestamp, T0);
    }

    #[test]
    fn test_refresh_bypasses_cache() {
        let temp_dir = tempfile::tempdir().unwrap();
        let registry = FakeRegistry::latest("2.0.0");
        let calls = registry.calls();
        let checker = checker(registry, temp_dir.path(), "1.0.0");

        checker.check();
        checker.refresh();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_failure_is_cached_too() {
        let temp_dir = tempfile::tempdir().unwrap();
        let registry = FakeRegistry::failing(FetchFailure::Timeout);
        let calls = registry.calls();
        let checker = checker(registry, temp_dir.path(), "1.0.0");

        checker.check();
        let record = checker.check();
        assert_eq!(calls.get(), 1);
        assert_eq!(record.status_text, "Timeout");
    }

    #[test]
    fn test_not_found_classification() {
        let record = failure_record(
            FetchFailure::Status {
                status: 404,
                status_text: "Not Found".to_string(),
            },
            T0,
        );
        assert_eq!(record.status, 404);
        assert_eq!(record.error.as_deref(), Some("Package not found in registry"));
        assert_eq!(record.is_outdated, None);
    }

    #[test]
    fn test_server_error_classification() {
        let record = failure_record(
            FetchFailure::Status {
                status: 503,
                status_text: "Service Unavailable".to_string(),
            },
            T0,
        );
        assert_eq!(record.status, 503);
        assert_eq!(
            record.error.as_deref(),
            Some("Registry error (503 Service Unavailable)")
        );
    }

    #[test]
    fn test_client_error_classification() {
        let record = failure_record(
            FetchFailure::Status {
                status: 403,
                status_text: "Forbidden".to_string(),
            },
            T0,
        );
        assert_eq!(record.status, 403);
        assert_eq!(
            record.error.as_deref(),
            Some("Registry request failed (403 Forbidden)")
        );
    }

    #[test]
    fn test_transport_failures() {
        let timeout = failure_record(FetchFailure::Timeout, T0);
        assert_eq!((timeout.status, timeout.status_text.as_str()), (0, "Timeout"));

        let connection = failure_record(FetchFailure::Connection, T0);
        assert_eq!(
            (connection.status, connection.status_text.as_str()),
            (0, "Connection Error")
        );
        assert_eq!(connection.error.as_deref(), Some("Cannot connect to registry"));

        let other = failure_record(FetchFailure::Other("boom".to_string()), T0);
        assert_eq!(other.status_text, "Unknown Error");
        assert_eq!(other.error.as_deref(), Some("boom"));
    }
}
