use std::time::Duration;

use futures_util::StreamExt;
use pricer_logging::pricer_debug;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::decode::decode_html;
use crate::{FailureKind, SourceError};

/// Transport limits for vendor page downloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 8 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
            user_agent: concat!("card-pricer/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Downloads vendor result pages and decodes them to UTF-8.
///
/// One client is built up front and shared by every request of the adapter,
/// so connections are pooled across cards.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    settings: FetchSettings,
    client: Result<reqwest::Client, SourceError>,
}

impl PageFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        let client = build_client(&settings);
        Self { settings, client }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// GETs `url` and returns the decoded document.
    pub async fn fetch_html(&self, url: &Url) -> Result<String, SourceError> {
        let client = self.client.as_ref().map_err(Clone::clone)?;
        pricer_debug!("GET {url}");

        let response = client
            .get(url.clone())
            .header(USER_AGENT, &self.settings.user_agent)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("{status} from {url}"),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(Some(content_len)));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(SourceError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    format!("unexpected content from {url}"),
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }
        pricer_debug!("{} bytes from {url}", bytes.len());

        let decoded = decode_html(&bytes, content_type.as_deref())
            .map_err(|err| SourceError::new(FailureKind::Decode, err.to_string()))?;
        Ok(decoded.html)
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }

    fn too_large(&self, actual: Option<u64>) -> SourceError {
        SourceError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual,
            },
            "response too large",
        )
    }
}

fn build_client(settings: &FetchSettings) -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
        .build()
        .map_err(|err| SourceError::new(FailureKind::Network, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> SourceError {
    if err.is_timeout() {
        return SourceError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return SourceError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    SourceError::new(FailureKind::Network, err.to_string())
}
