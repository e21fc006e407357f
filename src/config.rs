use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Careview";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Consultation service used when `CAREVIEW_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Path of the latest-consultation resource, relative to the base URL.
pub const LATEST_CONSULTATION_PATH: &str = "/consultations/latest";

/// Fixed polling cadence for the consultation pipeline.
pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Upper bound for a single `/consultations/latest` request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const API_URL_ENV: &str = "CAREVIEW_API_URL";
const CONSULTATIONS_DIR_ENV: &str = "CAREVIEW_CONSULTATIONS_DIR";

/// Default `EnvFilter` directive when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "careview=info,careview_lib=info,warn"
}

/// Get the application data directory
/// ~/Careview/ on all platforms. `None` when no home directory is known.
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_NAME))
}

/// Get the directory of saved consultation files used as local fallback
pub fn consultations_dir() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join("consultations"))
}

/// Runtime settings for the consultation pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Base URL of the consultation service, without trailing slash.
    pub base_url: String,
    /// Interval between timer-triggered fetches.
    pub poll_interval: Duration,
    /// Per-request timeout for the HTTP source.
    pub request_timeout: Duration,
    /// Directory of saved consultations read when the service is unreachable.
    pub fallback_dir: Option<PathBuf>,
}

impl PipelineConfig {
    /// Resolve configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let fallback_dir = std::env::var_os(CONSULTATIONS_DIR_ENV)
            .map(PathBuf::from)
            .or_else(consultations_dir);

        Self {
            base_url: normalize_base_url(&base_url),
            fallback_dir,
            ..Self::default()
        }
    }

    /// Full URL of the latest-consultation resource.
    pub fn latest_url(&self) -> String {
        format!("{}{}", self.base_url, LATEST_CONSULTATION_PATH)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            poll_interval: POLL_INTERVAL,
            request_timeout: REQUEST_TIMEOUT,
            fallback_dir: None,
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
