//! HTTP transport against the Rewardify backend.
//!
//! [`ConsoleApi`] is the seam the controllers depend on; [`HttpApi`] is the
//! reqwest implementation and [`MockApi`] the test double. Every operation is
//! independently fallible — no retries, no cancellation.

use std::sync::Mutex;
use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};

use crate::config;
use crate::error::TransportError;
use crate::models::batch::ConfirmedBatch;
use crate::session::Session;

use super::wire::{
    BatchListResponse, ErrorBody, LoginRequest, LoginResponse, QrSearchRequest, QrSearchResponse,
};

/// Fallback messages when the server gives no usable error detail.
const LOGIN_FALLBACK: &str = "Login failed";
const FETCH_FALLBACK: &str = "Failed to fetch batches";
const UPLOAD_FALLBACK: &str = "Failed to upload file";
const QR_SEARCH_FALLBACK: &str = "QR code lookup failed";

/// Multipart field name the ingestion endpoint expects.
const UPLOAD_FIELD: &str = "qr_code";

// ═══════════════════════════════════════════════════════════
// ConsoleApi — the transport seam
// ═══════════════════════════════════════════════════════════

/// The four network operations of the console.
///
/// The session is passed explicitly on every authenticated call; the
/// transport never reads ambient credential state.
pub trait ConsoleApi {
    /// Exchange credentials for a bearer token.
    fn login(&self, email: &str, password: &str) -> Result<LoginResponse, TransportError>;

    /// List batches, optionally filtered server-side by `query`.
    /// Returns normalized records in server-supplied order.
    fn list_batches(
        &self,
        session: &Session,
        query: Option<&str>,
    ) -> Result<Vec<ConfirmedBatch>, TransportError>;

    /// Submit a spreadsheet to the asynchronous ingestion endpoint.
    ///
    /// The backend accepts the file, returns quickly, and keeps processing
    /// out of band — a success here carries no final batch attributes.
    fn upload_batch(
        &self,
        session: &Session,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), TransportError>;

    /// Look up a single QR code's status. Returns the server's message.
    fn search_qr(&self, session: &Session, qr_code: &str) -> Result<String, TransportError>;
}

// ═══════════════════════════════════════════════════════════
// HttpApi — reqwest implementation
// ═══════════════════════════════════════════════════════════

/// Blocking HTTP client for the Rewardify backend.
pub struct HttpApi {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpApi {
    /// Create a client pointing at `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    /// Client for the configured backend origin (env override or default).
    pub fn from_env() -> Self {
        Self::new(&config::api_base_url(), config::REQUEST_TIMEOUT_SECS)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn send_error(&self, e: reqwest::Error) -> TransportError {
        if e.is_connect() {
            TransportError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            TransportError::Timeout(self.timeout_secs)
        } else {
            TransportError::Http(e.to_string())
        }
    }

    fn status_error(response: reqwest::blocking::Response, fallback: &str) -> TransportError {
        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();
        let message = ErrorBody::parse(&body).into_message(fallback);
        tracing::warn!(status, %message, "Backend rejected request");
        TransportError::Status { status, message }
    }
}

impl ConsoleApi for HttpApi {
    fn login(&self, email: &str, password: &str) -> Result<LoginResponse, TransportError> {
        let url = format!("{}/api/auth/admin-login", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .map_err(|e| self.send_error(e))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response, LOGIN_FALLBACK));
        }

        response
            .json::<LoginResponse>()
            .map_err(|e| TransportError::MalformedResponse(e.to_string()))
    }

    fn list_batches(
        &self,
        session: &Session,
        query: Option<&str>,
    ) -> Result<Vec<ConfirmedBatch>, TransportError> {
        let url = format!("{}/api/qr/batch-list", self.base_url);
        let mut request = self.client.get(&url).bearer_auth(session.bearer());
        if let Some(q) = query {
            request = request.query(&[("search", q)]);
        }

        let response = request.send().map_err(|e| self.send_error(e))?;
        if !response.status().is_success() {
            return Err(Self::status_error(response, FETCH_FALLBACK));
        }

        let parsed: BatchListResponse = response
            .json()
            .map_err(|e| TransportError::MalformedResponse(e.to_string()))?;

        tracing::info!(
            count = parsed.count,
            page = parsed.results.len(),
            filtered = query.is_some(),
            "Fetched batch list"
        );

        Ok(parsed.results.iter().map(ConfirmedBatch::from_wire).collect())
    }

    fn upload_batch(
        &self,
        session: &Session,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), TransportError> {
        let url = format!("{}/api/qr/excel-upload-async", self.base_url);
        let form = Form::new().part(
            UPLOAD_FIELD,
            Part::bytes(bytes).file_name(file_name.to_string()),
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(session.bearer())
            .multipart(form)
            .send()
            .map_err(|e| self.send_error(e))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response, UPLOAD_FALLBACK));
        }

        // Success payload is not strictly typed; ingestion continues out of
        // band and final batch attributes only appear in a later list fetch.
        tracing::info!(file = file_name, "Spreadsheet accepted for ingestion");
        Ok(())
    }

    fn search_qr(&self, session: &Session, qr_code: &str) -> Result<String, TransportError> {
        let url = format!("{}/api/qr/admin-search", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(session.bearer())
            .json(&QrSearchRequest { qr_code })
            .send()
            .map_err(|e| self.send_error(e))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response, QR_SEARCH_FALLBACK));
        }

        let parsed: QrSearchResponse = response
            .json()
            .map_err(|e| TransportError::MalformedResponse(e.to_string()))?;

        Ok(parsed
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "QR code found".to_string()))
    }
}

// ═══════════════════════════════════════════════════════════
// MockApi — test double
// ═══════════════════════════════════════════════════════════

/// Mock transport for controller tests — canned results, failure injection,
/// and a call recorder to prove when no request was made.
pub struct MockApi {
    token: Option<String>,
    batches: Vec<ConfirmedBatch>,
    failure: Option<(u16, String)>,
    qr_message: String,
    calls: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            token: Some("mock-token".to_string()),
            batches: Vec::new(),
            failure: None,
            qr_message: "QR code found".to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Login succeeds and yields this token.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Login succeeds (2xx) but the body carries no token.
    pub fn without_token(mut self) -> Self {
        self.token = None;
        self
    }

    pub fn with_batches(mut self, batches: Vec<ConfirmedBatch>) -> Self {
        self.batches = batches;
        self
    }

    /// Every operation fails with this status and message.
    pub fn failing(mut self, status: u16, message: &str) -> Self {
        self.failure = Some((status, message.to_string()));
        self
    }

    pub fn with_qr_message(mut self, message: &str) -> Self {
        self.qr_message = message.to_string();
        self
    }

    /// Names of the operations invoked so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.to_string());
        }
    }

    fn injected_failure(&self) -> Option<TransportError> {
        self.failure.as_ref().map(|(status, message)| TransportError::Status {
            status: *status,
            message: message.clone(),
        })
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleApi for MockApi {
    fn login(&self, _email: &str, _password: &str) -> Result<LoginResponse, TransportError> {
        self.record("login");
        if let Some(err) = self.injected_failure() {
            return Err(err);
        }
        Ok(LoginResponse {
            access_token: self.token.clone(),
        })
    }

    fn list_batches(
        &self,
        _session: &Session,
        query: Option<&str>,
    ) -> Result<Vec<ConfirmedBatch>, TransportError> {
        self.record(if query.is_some() { "search" } else { "list" });
        if let Some(err) = self.injected_failure() {
            return Err(err);
        }
        Ok(self.batches.clone())
    }

    fn upload_batch(
        &self,
        _session: &Session,
        _file_name: &str,
        _bytes: Vec<u8>,
    ) -> Result<(), TransportError> {
        self.record("upload");
        if let Some(err) = self.injected_failure() {
            return Err(err);
        }
        Ok(())
    }

    fn search_qr(&self, _session: &Session, _qr_code: &str) -> Result<String, TransportError> {
        self.record("search_qr");
        if let Some(err) = self.injected_failure() {
            return Err(err);
        }
        Ok(self.qr_message.clone())
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_api_trims_trailing_slash() {
        let api = HttpApi::new("https://api.example.com/", 30);
        assert_eq!(api.base_url(), "https://api.example.com");
    }

    #[test]
    fn http_api_keeps_clean_base_url() {
        let api = HttpApi::new("https://api.example.com", 30);
        assert_eq!(api.base_url(), "https://api.example.com");
    }

    #[test]
    fn mock_login_returns_configured_token() {
        let api = MockApi::new().with_token("X");
        let response = api.login("admin@example.com", "pw").unwrap();
        assert_eq!(response.access_token.as_deref(), Some("X"));
        assert_eq!(api.calls(), vec!["login"]);
    }

    #[test]
    fn mock_failure_applies_to_every_operation() {
        let api = MockApi::new().failing(503, "down for maintenance");
        let session = Session::new("tok");

        let err = api.list_batches(&session, None).unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "down for maintenance");

        assert!(api.upload_batch(&session, "f.xlsx", vec![]).is_err());
        assert!(api.search_qr(&session, "QR-1").is_err());
    }

    #[test]
    fn mock_records_calls_in_order() {
        let api = MockApi::new();
        let session = Session::new("tok");

        let _ = api.list_batches(&session, None);
        let _ = api.list_batches(&session, Some("march"));
        let _ = api.search_qr(&session, "QR-1");

        assert_eq!(api.calls(), vec!["list", "search", "search_qr"]);
    }
}
