//! Batch view model — the stable, UI-facing shape of an uploaded batch.
//!
//! Decoupled from the backend wire schema: server rows are normalized into
//! [`ConfirmedBatch`], optimistic local uploads live as [`PendingUpload`],
//! and the tagged [`BatchRecord`] keeps the two apart until an explicit
//! [`reconcile`] pass resolves them against a fresh server fetch.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::Serialize;
use uuid::Uuid;

use crate::transport::wire::BatchListItem;

// ═══════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════

/// Marker shown in place of a completion date that has not happened yet.
pub const NOT_COMPLETED: &str = "-";

/// Display name used when the server path yields no file name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Prefix of the local id namespace. Server ids are stringified integers,
/// so the two namespaces never collide.
pub const LOCAL_ID_PREFIX: &str = "local-";

/// en-US style display timestamp: "Mar 5, 02:30 PM".
const DISPLAY_FORMAT: &str = "%b %-d, %I:%M %p";

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Ingestion state of a batch, derived from the server's completion flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BatchStatus {
    /// Background ingestion finished; QR count and asset URL are final.
    Uploaded,
    /// Accepted by the backend, still being processed.
    Pending,
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uploaded => write!(f, "Uploaded"),
            Self::Pending => write!(f, "Pending"),
        }
    }
}

/// A batch as confirmed by a server list/search response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmedBatch {
    pub id: String,
    pub name: String,
    pub status: BatchStatus,
    pub date_uploaded: String,
    pub completed_date: String,
    pub qr_count: u32,
    pub excel_url: String,
}

impl ConfirmedBatch {
    /// Normalize a wire item into the view model.
    ///
    /// `name` is the last segment of the stored spreadsheet path, falling
    /// back to [`UNKNOWN_NAME`]. `completed_date` is the formatted update
    /// timestamp only once ingestion completed; [`NOT_COMPLETED`] otherwise,
    /// keeping it consistent with `status` by construction.
    pub fn from_wire(item: &BatchListItem) -> Self {
        let status = if item.upload_completed {
            BatchStatus::Uploaded
        } else {
            BatchStatus::Pending
        };
        let completed_date = if item.upload_completed {
            format_timestamp(&item.updated_at)
        } else {
            NOT_COMPLETED.to_string()
        };
        Self {
            id: item.id.to_string(),
            name: file_name_from_path(item.batch_excel_path.as_deref().unwrap_or_default()),
            status,
            date_uploaded: format_timestamp(&item.created_at),
            completed_date,
            qr_count: item.qr_count,
            excel_url: item.batch_excel.clone().unwrap_or_default(),
        }
    }
}

/// An upload the backend accepted but has not yet confirmed.
///
/// Built from locally known data only: file name and "now". Server-only
/// fields stay at their placeholders until a later fetch confirms the row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingUpload {
    pub id: String,
    pub name: String,
    pub submitted_at: String,
}

impl PendingUpload {
    /// Synthesize an optimistic record for a just-accepted upload.
    pub fn new(file_name: &str) -> Self {
        Self::at(file_name, Local::now())
    }

    /// Like [`PendingUpload::new`] with an explicit clock, for tests.
    pub fn at(file_name: &str, now: DateTime<Local>) -> Self {
        Self {
            id: format!("{LOCAL_ID_PREFIX}{}", Uuid::new_v4()),
            name: file_name.to_string(),
            submitted_at: now.format(DISPLAY_FORMAT).to_string(),
        }
    }
}

/// One row of the batch list, tagged by provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BatchRecord {
    Confirmed(ConfirmedBatch),
    Pending(PendingUpload),
}

impl BatchRecord {
    pub fn id(&self) -> &str {
        match self {
            Self::Confirmed(b) => &b.id,
            Self::Pending(p) => &p.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Confirmed(b) => &b.name,
            Self::Pending(p) => &p.name,
        }
    }

    pub fn status(&self) -> BatchStatus {
        match self {
            Self::Confirmed(b) => b.status,
            Self::Pending(_) => BatchStatus::Pending,
        }
    }

    pub fn date_uploaded(&self) -> &str {
        match self {
            Self::Confirmed(b) => &b.date_uploaded,
            Self::Pending(p) => &p.submitted_at,
        }
    }

    pub fn completed_date(&self) -> &str {
        match self {
            Self::Confirmed(b) => &b.completed_date,
            Self::Pending(_) => NOT_COMPLETED,
        }
    }

    /// QR entries in the batch; 0 until the server has counted them.
    pub fn qr_count(&self) -> u32 {
        match self {
            Self::Confirmed(b) => b.qr_count,
            Self::Pending(_) => 0,
        }
    }

    /// Backing spreadsheet asset; empty until the server confirms it.
    pub fn excel_url(&self) -> &str {
        match self {
            Self::Confirmed(b) => &b.excel_url,
            Self::Pending(_) => "",
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Normalization helpers
// ═══════════════════════════════════════════════════════════

/// Last path segment of a stored spreadsheet path.
///
/// A path without separators is returned whole; an empty path (or one ending
/// in a separator) yields [`UNKNOWN_NAME`].
pub fn file_name_from_path(path: &str) -> String {
    path.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(UNKNOWN_NAME)
        .to_string()
}

/// Format a server timestamp for display.
///
/// Accepts RFC 3339 (with or without fractional seconds) and the naive
/// `YYYY-MM-DDTHH:MM:SS` form some backends emit. An unparseable value is
/// shown raw rather than failing the whole row.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(DISPLAY_FORMAT).to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format(DISPLAY_FORMAT).to_string();
    }
    tracing::debug!(raw, "Unparseable server timestamp, showing verbatim");
    raw.to_string()
}

// ═══════════════════════════════════════════════════════════
// Reconciliation
// ═══════════════════════════════════════════════════════════

/// Merge a fresh server fetch into the current in-memory list.
///
/// Confirmed rows are replaced wholesale in server order. A pending upload
/// whose file name now appears server-side has been confirmed by the fetch
/// and is dropped in favor of the server row; the rest stay prepended in
/// their existing order.
pub fn reconcile(current: &[BatchRecord], fetched: Vec<ConfirmedBatch>) -> Vec<BatchRecord> {
    let mut merged: Vec<BatchRecord> = current
        .iter()
        .filter_map(|record| match record {
            BatchRecord::Pending(p) if !fetched.iter().any(|c| c.name == p.name) => {
                Some(BatchRecord::Pending(p.clone()))
            }
            BatchRecord::Pending(p) => {
                tracing::info!(file = %p.name, "Pending upload confirmed by server");
                None
            }
            BatchRecord::Confirmed(_) => None,
        })
        .collect();
    merged.extend(fetched.into_iter().map(BatchRecord::Confirmed));
    merged
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
