use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Maximum age of a cached record: 24 hours in milliseconds.
pub const CACHE_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Result of one update check, as persisted in update-check.json.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecord {
    pub current: Option<String>,
    pub latest: Option<String>,
    pub is_outdated: Option<bool>,
    /// Epoch milliseconds at which the check was performed.
    pub timestamp: i64,
    pub status: u16,
    pub status_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Single-file cache of the last update check.
pub struct UpdateCache {
    path: PathBuf,
}

impl UpdateCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the cached record if it is younger than the TTL at `now_ms`.
    ///
    /// A missing, unreadable, unparsable or stale file is a miss.
    pub fn read_at(&self, now_ms: i64) -> Option<UpdateRecord> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                trace!(path = %self.path.display(), error = %e, "no update cache");
                return None;
            }
        };

        let record: UpdateRecord = match serde_json::from_str(&content) {
            Ok(record) => record,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "ignoring corrupt update cache");
                return None;
            }
        };

        match now_ms.checked_sub(record.timestamp) {
            Some(age) if age <= CACHE_TTL_MS => Some(record),
            Some(age) => {
                debug!(age_ms = age, "update cache expired");
                None
            }
            None => {
                debug!(timestamp = record.timestamp, "ignoring update cache with bad timestamp");
                None
            }
        }
    }

    /// Persist `record`, replacing any previous one. Failures are logged only.
    pub fn write(&self, record: &UpdateRecord) {
        if let Err(e) = self.try_write(record) {
            debug!(path = %self.path.display(), error = %e, "failed to write update cache");
        }
    }

    fn try_write(&self, record: &UpdateRecord) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(record)?;
        std::fs::write(&self.path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MS: i64 = 60 * 60 * 1000;

    fn record_at(timestamp: i64) -> UpdateRecord {
        UpdateRecord {
            current: Some("1.0.0".to_string()),
            latest: Some("1.1.0".to_string()),
            is_outdated: Some(true),
            timestamp,
            status: 200,
            status_text: "OK".to_string(),
            error: None,
        }
    }

    #[test]
    fn test_fresh_record_is_returned() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cache = UpdateCache::new(temp_dir.path().join("update-check.json"));
        let t = 1_700_000_000_000;

        cache.write(&record_at(t));
        assert_eq!(cache.read_at(t + HOUR_MS), Some(record_at(t)));
    }

    #[test]
    fn test_stale_record_is_a_miss() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cache = UpdateCache::new(temp_dir.path().join("update-check.json"));
        let t = 1_700_000_000_000;

        cache.write(&record_at(t));
        assert_eq!(cache.read_at(t + 25 * HOUR_MS), None);
    }

    #[test]
    fn test_exactly_ttl_is_still_fresh() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cache = UpdateCache::new(temp_dir.path().join("update-check.json"));
        let t = 1_700_000_000_000;

        cache.write(&record_at(t));
        assert!(cache.read_at(t + CACHE_TTL_MS).is_some());
        assert!(cache.read_at(t + CACHE_TTL_MS + 1).is_none());
    }

    #[test]
    fn test_missing_and_corrupt_files_are_misses() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cache = UpdateCache::new(temp_dir.path().join("update-check.json"));
        assert_eq!(cache.read_at(0), None);

        std::fs::write(cache.path(), "{ nope").unwrap();
        assert_eq!(cache.read_at(0), None);
    }

    #[test]
    fn test_extreme_timestamp_is_a_miss() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cache = UpdateCache::new(temp_dir.path().join("update-check.json"));
        std::fs::write(
            cache.path(),
            r#"{"current":"1.0.0","latest":"2.0.0","isOutdated":true,"timestamp":-9223372036854775808,"status":200,"statusText":"OK"}"#,
        )
        .unwrap();

        assert_eq!(cache.read_at(1_700_000_000_000), None);
    }

    #[test]
    fn test_write_creates_parent_and_uses_camel_case() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cache = UpdateCache::new(temp_dir.path().join("nested/dir/update-check.json"));

        cache.write(&record_at(42));

        let content = std::fs::read_to_string(cache.path()).unwrap();
        assert!(content.contains("\"isOutdated\":true"));
        assert!(content.contains("\"statusText\":\"OK\""));
        assert!(!content.contains("\"error\""));
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let temp_dir = tempfile::tempdir().unwrap();
        // Parent path is a file, so directory creation fails
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let cache = UpdateCache::new(blocker.join("update-check.json"));

        cache.write(&record_at(0));
        assert_eq!(cache.read_at(0), None);
    }
}
