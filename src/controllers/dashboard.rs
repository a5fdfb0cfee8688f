//! Dashboard state machine: initial load, batch search, QR lookup, upload.
//!
//! The controller owns `{loading, error, batches}` and the reconciliation of
//! optimistic local uploads against server-confirmed rows. All mutation
//! happens from the UI callback path; overlapping triggers are prevented by
//! the shell honoring the `loading` flag, not by a mutex.

use std::path::Path;

use crate::error::TransportError;
use crate::models::batch::{reconcile, BatchRecord, PendingUpload};
use crate::session::Session;
use crate::transport::ConsoleApi;

/// File extensions accepted by the upload affordance.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls", "csv"];

/// Message shown after the backend accepts a spreadsheet.
pub const UPLOAD_SUCCESS_MESSAGE: &str =
    "File uploaded successfully. Processing will continue in the background.";

/// Outcome of a submitted upload: the user-facing message plus the
/// optimistic record now at the head of the list.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub message: String,
    pub batch: PendingUpload,
}

/// State machine behind the batch dashboard.
pub struct DashboardController {
    loading: bool,
    error: Option<String>,
    batches: Vec<BatchRecord>,
}

impl DashboardController {
    /// Initial state: loading with an empty list, before the first `load`.
    pub fn new() -> Self {
        Self {
            loading: true,
            error: None,
            batches: Vec::new(),
        }
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current display list, in display order.
    pub fn batches(&self) -> &[BatchRecord] {
        &self.batches
    }

    /// Fetch the full batch list and reconcile it with local state.
    ///
    /// On success the list is replaced through [`reconcile`]: server rows in
    /// server order, still-unconfirmed pending uploads kept at the front. On
    /// failure the previous list is left untouched and `error` is set.
    pub fn load(&mut self, api: &dyn ConsoleApi, session: &Session) {
        self.loading = true;
        match api.list_batches(session, None) {
            Ok(fetched) => {
                self.batches = reconcile(&self.batches, fetched);
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Batch list fetch failed");
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    /// Server-side batch search.
    ///
    /// A whitespace-only query is rejected client-side: no request is sent
    /// and the list is unchanged. A successful search replaces the list
    /// wholesale with the filtered server result.
    pub fn search_batches(
        &mut self,
        api: &dyn ConsoleApi,
        session: &Session,
        query: &str,
    ) -> Result<(), TransportError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(TransportError::EmptyQuery);
        }

        self.loading = true;
        let outcome = api.list_batches(session, Some(query));
        self.loading = false;

        match outcome {
            Ok(fetched) => {
                self.batches = fetched.into_iter().map(BatchRecord::Confirmed).collect();
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Manual QR lookup against the admin-search endpoint.
    ///
    /// Distinct code path from batch search: the result is a notification
    /// message (success or error text) and the batch list is never touched.
    pub fn search_qr(&mut self, api: &dyn ConsoleApi, session: &Session, qr_code: &str) -> String {
        self.loading = true;
        let message = match api.search_qr(session, qr_code.trim()) {
            Ok(message) => message,
            Err(e) => e.to_string(),
        };
        self.loading = false;
        message
    }

    /// Submit a spreadsheet for background ingestion.
    ///
    /// Non-spreadsheet extensions are rejected before any request. On
    /// acceptance an optimistic [`PendingUpload`] is prepended; its server
    /// fields stay placeholders until the next `load` confirms it. No
    /// re-fetch happens here.
    pub fn upload(
        &mut self,
        api: &dyn ConsoleApi,
        session: &Session,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt, TransportError> {
        if !is_spreadsheet(file_name) {
            return Err(TransportError::UnsupportedFile(file_name.to_string()));
        }

        self.loading = true;
        let outcome = api.upload_batch(session, file_name, bytes);
        self.loading = false;

        match outcome {
            Ok(()) => {
                let batch = PendingUpload::new(file_name);
                self.batches.insert(0, BatchRecord::Pending(batch.clone()));
                self.error = None;
                tracing::info!(file = file_name, "Batch submitted for background ingestion");
                Ok(UploadReceipt {
                    message: UPLOAD_SUCCESS_MESSAGE.to_string(),
                    batch,
                })
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

impl Default for DashboardController {
    fn default() -> Self {
        Self::new()
    }
}

fn is_spreadsheet(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SPREADSHEET_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::batch::{BatchStatus, ConfirmedBatch, NOT_COMPLETED};
    use crate::transport::wire::BatchListItem;
    use crate::transport::MockApi;

    fn session() -> Session {
        Session::new("tok")
    }

    fn confirmed(id: i64, path: &str, completed: bool) -> ConfirmedBatch {
        ConfirmedBatch::from_wire(&BatchListItem {
            id,
            batch_excel_path: Some(path.to_string()),
            qr_count: 250,
            batch_excel: Some("https://cdn.example.com/batch.xlsx".to_string()),
            upload_completed: completed,
            created_at: "2026-03-05T14:30:00Z".to_string(),
            updated_at: "2026-03-06T09:05:00Z".to_string(),
        })
    }

    #[test]
    fn starts_loading_with_empty_list() {
        let controller = DashboardController::new();
        assert!(controller.loading());
        assert!(controller.batches().is_empty());
        assert!(controller.error().is_none());
    }

    #[test]
    fn load_replaces_list_and_clears_error() {
        let api = MockApi::new().with_batches(vec![
            confirmed(1, "a/first.xlsx", true),
            confirmed(2, "a/second.xlsx", false),
        ]);
        let mut controller = DashboardController::new();

        controller.load(&api, &session());

        assert!(!controller.loading());
        assert!(controller.error().is_none());
        let batches = controller.batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].status(), BatchStatus::Uploaded);
        assert_eq!(batches[0].completed_date(), "Mar 6, 09:05 AM");
        assert_eq!(batches[1].status(), BatchStatus::Pending);
        assert_eq!(batches[1].completed_date(), NOT_COMPLETED);
    }

    #[test]
    fn failed_load_keeps_previous_list() {
        let working = MockApi::new().with_batches(vec![confirmed(1, "a/first.xlsx", true)]);
        let mut controller = DashboardController::new();
        controller.load(&working, &session());

        let broken = MockApi::new().failing(500, "server exploded");
        controller.load(&broken, &session());

        assert_eq!(controller.error(), Some("server exploded"));
        assert_eq!(controller.batches().len(), 1, "previous list untouched");
        assert!(!controller.loading());
    }

    #[test]
    fn whitespace_query_sends_no_request() {
        let api = MockApi::new().with_batches(vec![confirmed(1, "a/first.xlsx", true)]);
        let mut controller = DashboardController::new();
        controller.load(&api, &session());

        for query in ["", "   "] {
            let err = controller.search_batches(&api, &session(), query).unwrap_err();
            assert!(matches!(err, TransportError::EmptyQuery));
        }

        assert_eq!(api.calls(), vec!["list"], "only the initial load hit the API");
        assert_eq!(controller.batches().len(), 1);
    }

    #[test]
    fn search_replaces_list_with_server_result() {
        let api = MockApi::new().with_batches(vec![confirmed(3, "a/march.xlsx", true)]);
        let mut controller = DashboardController::new();

        controller.search_batches(&api, &session(), "march").unwrap();

        assert_eq!(controller.batches().len(), 1);
        assert_eq!(controller.batches()[0].id(), "3");
        assert_eq!(api.calls(), vec!["search"]);
    }

    #[test]
    fn qr_lookup_never_touches_batches() {
        let api = MockApi::new()
            .with_batches(vec![confirmed(1, "a/first.xlsx", true)])
            .with_qr_message("QR-1 already redeemed");
        let mut controller = DashboardController::new();
        controller.load(&api, &session());
        let before = controller.batches().to_vec();

        let message = controller.search_qr(&api, &session(), " QR-1 ");

        assert_eq!(message, "QR-1 already redeemed");
        assert_eq!(controller.batches(), &before[..]);
        assert!(!controller.loading());
    }

    #[test]
    fn failed_qr_lookup_returns_error_text() {
        let api = MockApi::new().failing(404, "QR code not found");
        let mut controller = DashboardController::new();

        let message = controller.search_qr(&api, &session(), "QR-MISSING");

        assert_eq!(message, "QR code not found");
    }

    #[test]
    fn upload_prepends_optimistic_pending_record() {
        let api = MockApi::new().with_batches(vec![confirmed(1, "a/old.xlsx", true)]);
        let mut controller = DashboardController::new();
        controller.load(&api, &session());

        let receipt = controller
            .upload(&api, &session(), "codes.xlsx", vec![1, 2, 3])
            .unwrap();

        assert_eq!(receipt.message, UPLOAD_SUCCESS_MESSAGE);
        let head = &controller.batches()[0];
        assert_eq!(head.name(), "codes.xlsx");
        assert_eq!(head.status(), BatchStatus::Pending);
        assert_eq!(head.qr_count(), 0);
        assert_eq!(head.excel_url(), "");
        assert_eq!(controller.batches().len(), 2);
        assert!(controller.error().is_none());
    }

    #[test]
    fn failed_upload_sets_error_and_keeps_list() {
        let api = MockApi::new().failing(400, "File is not a valid spreadsheet");
        let mut controller = DashboardController::new();

        let err = controller
            .upload(&api, &session(), "codes.xlsx", vec![])
            .unwrap_err();

        assert!(!err.to_string().is_empty());
        assert_eq!(controller.error(), Some("File is not a valid spreadsheet"));
        assert!(controller.batches().is_empty());
    }

    #[test]
    fn non_spreadsheet_rejected_without_request() {
        let api = MockApi::new();
        let mut controller = DashboardController::new();

        for name in ["notes.txt", "archive.zip", "codes"] {
            let err = controller
                .upload(&api, &session(), name, vec![])
                .unwrap_err();
            assert!(matches!(err, TransportError::UnsupportedFile(_)));
        }

        assert!(api.calls().is_empty());
        assert!(controller.batches().is_empty());
    }

    #[test]
    fn spreadsheet_extensions_accepted_case_insensitively() {
        assert!(is_spreadsheet("codes.xlsx"));
        assert!(is_spreadsheet("codes.XLSX"));
        assert!(is_spreadsheet("codes.xls"));
        assert!(is_spreadsheet("codes.csv"));
        assert!(!is_spreadsheet("codes.pdf"));
        assert!(!is_spreadsheet("codes"));
    }

    #[test]
    fn reload_confirms_pending_upload_by_name() {
        let api = MockApi::new();
        let mut controller = DashboardController::new();
        controller.upload(&api, &session(), "codes.xlsx", vec![]).unwrap();

        let refreshed = MockApi::new().with_batches(vec![confirmed(9, "up/codes.xlsx", false)]);
        controller.load(&refreshed, &session());

        assert_eq!(controller.batches().len(), 1);
        assert_eq!(controller.batches()[0].id(), "9");
        assert!(matches!(controller.batches()[0], BatchRecord::Confirmed(_)));
    }

    #[test]
    fn reload_keeps_pending_upload_not_yet_visible() {
        let api = MockApi::new();
        let mut controller = DashboardController::new();
        controller.upload(&api, &session(), "fresh.xlsx", vec![]).unwrap();

        let refreshed = MockApi::new().with_batches(vec![confirmed(5, "up/other.xlsx", true)]);
        controller.load(&refreshed, &session());

        assert_eq!(controller.batches().len(), 2);
        assert_eq!(controller.batches()[0].name(), "fresh.xlsx");
        assert_eq!(controller.batches()[0].status(), BatchStatus::Pending);
        assert_eq!(controller.batches()[1].id(), "5");
    }
}
