//! Wire types for the Rewardify backend endpoints.
//!
//! These mirror the server schema verbatim; normalization into the view
//! model happens in `models::batch`, never here.

use serde::{Deserialize, Serialize};

/// Body for `POST /api/auth/admin-login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Success body from the login endpoint. The token is optional on the wire:
/// a 2xx without it is treated as malformed by the login controller.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Paginated body from `GET /api/qr/batch-list`.
#[derive(Debug, Deserialize)]
pub struct BatchListResponse {
    pub count: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<BatchListItem>,
}

/// One server-side batch row.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchListItem {
    pub id: i64,
    #[serde(default)]
    pub batch_excel_path: Option<String>,
    pub qr_count: u32,
    #[serde(default)]
    pub batch_excel: Option<String>,
    pub upload_completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Body for `POST /api/qr/admin-search`.
#[derive(Debug, Serialize)]
pub struct QrSearchRequest<'a> {
    pub qr_code: &'a str,
}

/// Success body from the admin-search endpoint.
#[derive(Debug, Deserialize)]
pub struct QrSearchResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Failure body shape shared by all endpoints. Different endpoints populate
/// different fields; extraction prefers `detail`, then `message`, then
/// `error`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Parse a raw failure body. Non-JSON bodies yield an empty `ErrorBody`
    /// so the caller's fallback message applies.
    pub fn parse(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }

    /// The best human-readable message, or `fallback` when the server gave
    /// nothing usable.
    pub fn into_message(self, fallback: &str) -> String {
        [self.detail, self.message, self.error]
            .into_iter()
            .flatten()
            .find(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}
