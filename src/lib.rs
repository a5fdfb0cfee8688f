//! Headless core of the Rewardify admin console.
//!
//! An operator signs in, uploads spreadsheet batches of QR/product data,
//! lists and searches previous batches, and looks up single QR codes. This
//! crate holds everything below the presentation layer: the session store,
//! the batch transport and view model, route resolution, and the login and
//! dashboard controller state machines. A UI shell renders the state and
//! forwards operator events.

pub mod config;
pub mod controllers;
pub mod error;
pub mod models;
pub mod router;
pub mod session;
pub mod transport;

use tracing_subscriber::EnvFilter;

/// Initialize diagnostic logging for a hosting shell.
///
/// Honors `RUST_LOG`, falling back to the crate's default filter. Call once
/// at startup; the diagnostic log is for operators, never shown in the UI.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} v{} starting", config::APP_NAME, config::APP_VERSION);
}
