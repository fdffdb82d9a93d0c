//! Package registry client used by the update checker.

use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// Timeout for the registry metadata request.
pub const REGISTRY_TIMEOUT: Duration = Duration::from_millis(5000);

const USER_AGENT: &str = concat!("codeinspector/", env!("CARGO_PKG_VERSION"));

/// Why a registry lookup produced no version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The registry answered with a non-success status.
    Status { status: u16, status_text: String },
    Timeout,
    /// DNS resolution failed or the connection was refused.
    Connection,
    Other(String),
}

/// Source of the latest published version of a package.
pub trait Registry: Send {
    fn latest_version(&self, package: &str) -> Result<String, FetchFailure>;
}

/// npm-compatible registry reached over HTTP.
pub struct HttpRegistry {
    base_url: String,
    timeout: Duration,
}

impl HttpRegistry {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: REGISTRY_TIMEOUT,
        }
    }

    fn package_url(&self, package: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), package)
    }
}

impl Registry for HttpRegistry {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    fn latest_version(&self, package: &str) -> Result<String, FetchFailure> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()
            .map_err(|e| FetchFailure::Other(e.to_string()))?;

        let response = client
            .get(self.package_url(package))
            .send()
            .map_err(classify_transport_error)?;

        let status = response.status();
        debug!(status = status.as_u16(), "registry responded");
        if !status.is_success() {
            return Err(FetchFailure::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body: Value = response.json().map_err(classify_transport_error)?;
        latest_from_metadata(&body)
    }
}

/// Extract `dist-tags.latest` from package metadata.
pub fn latest_from_metadata(body: &Value) -> Result<String, FetchFailure> {
    body.get("dist-tags")
        .and_then(|tags| tags.get("latest"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| FetchFailure::Other("Invalid response format from registry".to_string()))
}

fn classify_transport_error(e: reqwest::Error) -> FetchFailure {
    if e.is_timeout() {
        FetchFailure::Timeout
    } else if e.is_connect() {
        FetchFailure::Connection
    } else {
        FetchFailure::Other(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_latest_from_metadata() {
        let body = json!({ "name": "@codeinspector/cli", "dist-tags": { "latest": "2.0.0" } });
        assert_eq!(latest_from_metadata(&body), Ok("2.0.0".to_string()));
    }

    #[test]
    fn test_metadata_without_latest_tag() {
        let body = json!({ "dist-tags": {} });
        assert_eq!(
            latest_from_metadata(&body),
            Err(FetchFailure::Other(
                "Invalid response format from registry".to_string()
            ))
        );
    }

    #[test]
    fn test_package_url_keeps_scope() {
        let registry = HttpRegistry::new("https://registry.npmjs.org/");
        assert_eq!(
            registry.package_url("@codeinspector/cli"),
            "https://registry.npmjs.org/@codeinspector/cli"
        );
    }

    #[test]
    fn test_connection_refused_is_classified() {
        // Port 9 (discard) on localhost is expected to refuse connections
        let registry = HttpRegistry::new("http://127.0.0.1:9");
        let result = registry.latest_version("anything");
        assert!(matches!(
            result,
            Err(FetchFailure::Connection) | Err(FetchFailure::Timeout)
        ));
    }
}
