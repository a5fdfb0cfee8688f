//! Login flow: one credential exchange, then session establishment.
//!
//! A 2xx response without an `access_token` is treated as malformed — it is
//! logged and surfaced as an error, and the operator stays on the login view.

use crate::router::Route;
use crate::session::{Session, SessionStore};
use crate::transport::wire::LoginResponse;
use crate::transport::ConsoleApi;

/// State machine behind the login form.
///
/// `loading` models the disabled submit control: a single submission is in
/// flight at a time, enforced by the UI shell honoring the flag.
pub struct LoginController {
    loading: bool,
    error: Option<String>,
}

impl LoginController {
    pub fn new() -> Self {
        Self {
            loading: false,
            error: None,
        }
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submit credentials.
    ///
    /// Returns the route to navigate to on success; `None` means the
    /// operator stays on the login view with `error` set.
    pub fn submit(
        &mut self,
        api: &dyn ConsoleApi,
        store: &SessionStore,
        email: &str,
        password: &str,
    ) -> Option<Route> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            self.error = Some("Email and password are required".to_string());
            return None;
        }
        if !is_valid_email(email) {
            self.error = Some("Enter a valid email address".to_string());
            return None;
        }

        self.loading = true;
        self.error = None;
        let outcome = api.login(email, password);
        self.loading = false;

        match outcome {
            Ok(LoginResponse {
                access_token: Some(token),
            }) if !token.is_empty() => {
                if let Err(e) = store.save(Session::new(token)) {
                    tracing::error!(error = %e, "Could not persist session");
                    self.error = Some(format!("Could not save session: {e}"));
                    return None;
                }
                tracing::info!("Operator signed in");
                Some(Route::Dashboard)
            }
            Ok(_) => {
                // Latent-bug territory in the original console: it navigated
                // anyway. Here a tokenless 2xx blocks navigation.
                tracing::warn!("Login response carried no access token");
                self.error = Some("Server returned no access token".to_string());
                None
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }
}

impl Default for LoginController {
    fn default() -> Self {
        Self::new()
    }
}

/// Syntactic email check matching what a required `type="email"` form field
/// enforces: one `@` with non-empty, whitespace-free sides.
fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}
