//! View models presented to the UI shell.

pub mod batch;

pub use batch::{BatchRecord, BatchStatus, ConfirmedBatch, PendingUpload};
