use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Rewardify Console";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Production backend origin. Override with `REWARDIFY_API_BASE_URL`.
const DEFAULT_API_BASE_URL: &str = "https://stgproductauth.karmaalab.com";

/// Per-request timeout for transport calls, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Backend origin the transport talks to.
///
/// Reads `REWARDIFY_API_BASE_URL`, falling back to the production default.
/// Trailing slashes are stripped so endpoint paths can be appended directly.
pub fn api_base_url() -> String {
    let raw = std::env::var("REWARDIFY_API_BASE_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    normalize_base_url(&raw)
}

/// Strip trailing slashes and surrounding whitespace from a base URL.
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

/// Get the application data directory
/// ~/.rewardify-console/ on all platforms
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(".rewardify-console")
}

/// File holding the persisted operator session (bearer token).
pub fn session_file() -> PathBuf {
    app_data_dir().join("session.json")
}

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "rewardify_console=info"
}
