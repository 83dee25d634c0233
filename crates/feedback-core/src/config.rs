//! API configuration.
//!
//! The base URL is resolved once at process start and injected into the API
//! client as a plain value. Environment lookup goes through a caller-supplied
//! function so tests never depend on process state.

use std::time::Duration;

/// Backend used when `FEEDBACK_API_URL` is unset.
pub const DEFAULT_API_BASE_URL: &str = "https://analytics-backend-six.vercel.app";

/// Host embedded in the public submission URL when `FEEDBACK_SUBMISSION_URL`
/// is unset.
pub const DEFAULT_SUBMISSION_BASE_URL: &str = "https://analytics-backend-six.vercel.app";

pub const API_URL_ENV: &str = "FEEDBACK_API_URL";
pub const SUBMISSION_URL_ENV: &str = "FEEDBACK_SUBMISSION_URL";
pub const API_TIMEOUT_ENV: &str = "FEEDBACK_API_TIMEOUT_SECS";
pub const LOG_FILTER_ENV: &str = "FEEDBACK_LOG";

pub const DEFAULT_LOG_FILTER: &str = "warn";

const SUBMIT_PATH: &str = "/api/feedback/submit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub submission_base_url: String,
    /// `None` keeps the HTTP client's default.
    pub request_timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            submission_base_url: DEFAULT_SUBMISSION_BASE_URL.to_string(),
            request_timeout: None,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.as_ref()),
            ..Self::default()
        }
    }

    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut cfg = Self::default();
        if let Some(url) = read(API_URL_ENV) {
            cfg.base_url = normalize_base_url(&url);
        }
        if let Some(url) = read(SUBMISSION_URL_ENV) {
            cfg.submission_base_url = normalize_base_url(&url);
        }
        if let Some(raw) = read(API_TIMEOUT_ENV) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|err| format!("{API_TIMEOUT_ENV}: invalid value {raw:?}: {err}"))?;
            cfg.request_timeout = Some(Duration::from_secs(secs));
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = normalize_base_url(base_url.as_ref());
        self
    }

    pub fn with_submission_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.submission_base_url = normalize_base_url(base_url.as_ref());
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("api base url is required".into());
        }
        if self.submission_base_url.trim().is_empty() {
            return Err("submission base url is required".into());
        }
        if self.request_timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(format!("{API_TIMEOUT_ENV} must be greater than 0"));
        }
        Ok(())
    }

    /// Absolute URL for an API path such as `/api/feedback/instances`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Public URL end users submit feedback to for the given instance key.
    pub fn submission_url(&self, key: &str) -> String {
        format!("{}{SUBMIT_PATH}/{key}", self.submission_base_url)
    }
}

/// Trim whitespace and trailing slashes; assume https when no scheme is given.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}
