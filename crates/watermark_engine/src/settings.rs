use std::time::Duration;

use url::Url;

/// Origin used when nothing else is configured.
pub const DEFAULT_BASE_ORIGIN: &str = "http://localhost:8000";

/// Environment variable the CLI reads the origin from.
pub const BASE_ORIGIN_ENV: &str = "WATERMARK_API_BASE_URL";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_origin: String,
    pub connect_timeout: Duration,
    /// Covers upload plus server-side processing of the whole batch.
    pub request_timeout: Duration,
    pub max_artifact_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_origin: DEFAULT_BASE_ORIGIN.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(600),
            max_artifact_bytes: 2 * 1024 * 1024 * 1024,
        }
    }
}

impl ClientSettings {
    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            base_origin: origin.into(),
            ..Self::default()
        }
    }

    /// `<origin><path>`, validated. Service references are joined the same way.
    pub fn resolve(&self, path: &str) -> Result<Url, url::ParseError> {
        let origin = self.base_origin.trim_end_matches('/');
        let joined = if path.starts_with('/') {
            format!("{origin}{path}")
        } else {
            format!("{origin}/{path}")
        };
        Url::parse(&joined)
    }

    pub(crate) fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .build()
    }
}
