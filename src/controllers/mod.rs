//! Controller state machines driven by the UI shell.

pub mod dashboard;
pub mod login;

pub use dashboard::{DashboardController, UploadReceipt};
pub use login::LoginController;
