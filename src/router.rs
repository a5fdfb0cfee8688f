//! Route resolution for the console's two views.
//!
//! Any unrecognized path falls back to the login view. Unlike the original
//! unguarded console, entering the dashboard is a capability check: without a
//! stored session the resolution is `Login`.

use serde::Serialize;

use crate::session::SessionStore;

/// Navigable views of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Login,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
        }
    }
}

/// Resolve a requested path against the session state.
pub fn resolve(path: &str, store: &SessionStore) -> Route {
    match path.trim_end_matches('/') {
        "/dashboard" if store.is_authenticated() => Route::Dashboard,
        "/dashboard" => {
            tracing::warn!("Dashboard requested without a session, redirecting to login");
            Route::Login
        }
        "/login" | "" => Route::Login,
        other => {
            tracing::debug!(path = other, "Unknown path, redirecting to login");
            Route::Login
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    fn anonymous_store() -> SessionStore {
        let dir = tempfile::tempdir().unwrap();
        SessionStore::open(dir.path().join("session.json"))
    }

    fn signed_in_store(dir: &tempfile::TempDir) -> SessionStore {
        let store = SessionStore::open(dir.path().join("session.json"));
        store.save(Session::new("tok")).unwrap();
        store
    }

    #[test]
    fn login_path_resolves_to_login() {
        assert_eq!(resolve("/login", &anonymous_store()), Route::Login);
    }

    #[test]
    fn unknown_paths_redirect_to_login() {
        let store = anonymous_store();
        assert_eq!(resolve("/", &store), Route::Login);
        assert_eq!(resolve("/nope", &store), Route::Login);
        assert_eq!(resolve("", &store), Route::Login);
    }

    #[test]
    fn dashboard_without_session_is_guarded() {
        assert_eq!(resolve("/dashboard", &anonymous_store()), Route::Login);
    }

    #[test]
    fn dashboard_with_session_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let store = signed_in_store(&dir);
        assert_eq!(resolve("/dashboard", &store), Route::Dashboard);
        assert_eq!(resolve("/dashboard/", &store), Route::Dashboard);
    }

    #[test]
    fn route_paths_round_trip() {
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(Route::Dashboard.path(), "/dashboard");
    }
}
