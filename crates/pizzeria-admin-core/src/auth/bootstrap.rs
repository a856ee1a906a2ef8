//! Startup "who am I" check and route gating.
//!
//! Until `BootstrapGuard::run` settles, every route reports `Pending`:
//! nothing protected is shown and nobody is sent to the login page early.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};

use super::permissions::{can, Capability};
use super::{Session, SessionStore};

/// Attempts at `GET /auth/self` before a non-401 failure is surfaced:
/// the first call plus three retries.
const MAX_SELF_ATTEMPTS: u32 = 4;

/// Initial backoff delay between attempts, doubled each time (1s, 2s, 4s).
const INITIAL_BACKOFF_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
    Users,
    Tenants,
    Categories,
    Products,
}

impl Route {
    pub fn is_public(self) -> bool {
        matches!(self, Route::Login)
    }

    fn required(self) -> Option<Capability> {
        match self {
            Route::Login => None,
            Route::Home => Some(Capability::AccessDashboard),
            Route::Users => Some(Capability::ManageUsers),
            Route::Tenants => Some(Capability::ManageTenants),
            Route::Categories | Route::Products => Some(Capability::ManageCatalog),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    Allow,
    /// Bootstrap still running
    Pending,
    RedirectToLogin,
    /// Signed-in user on a public-only route
    RedirectToHome,
    Forbidden,
    LoadError(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapState {
    Pending,
    Resolved,
    Failed(String),
}

pub struct BootstrapGuard {
    store: SessionStore,
    state: BootstrapState,
    max_attempts: u32,
    initial_backoff: Duration,
}

impl BootstrapGuard {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            state: BootstrapState::Pending,
            max_attempts: MAX_SELF_ATTEMPTS,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
        }
    }

    pub fn with_retry_policy(mut self, max_attempts: u32, initial_backoff: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.initial_backoff = initial_backoff;
        self
    }

    pub fn state(&self) -> &BootstrapState {
        &self.state
    }

    /// Resolve the current session.
    ///
    /// `Ok(Some)` stores the session, `Ok(None)` means the server answered
    /// 401 (after the client's own refresh attempt) and the store is
    /// cleared. Any other failure is returned and leaves the store alone.
    pub async fn run(&mut self, api: &ApiClient) -> Result<Option<Session>, ApiError> {
        self.state = BootstrapState::Pending;
        let mut backoff = self.initial_backoff;
        let mut attempt = 1;

        loop {
            match api.get_self().await {
                Ok(session) => {
                    info!(user_id = session.id, role = %session.role, "Session restored");
                    self.store.set_session(session.clone());
                    self.state = BootstrapState::Resolved;
                    return Ok(Some(session));
                }
                Err(ApiError::Unauthorized) => {
                    debug!("No active session");
                    self.store.clear_session();
                    self.state = BootstrapState::Resolved;
                    return Ok(None);
                }
                Err(e) if attempt < self.max_attempts => {
                    warn!(error = %e, status = ?e.status(), attempt, backoff_ms = backoff.as_millis() as u64, "Session check failed, retrying");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(error = %e, "Session check failed");
                    self.state = BootstrapState::Failed(e.user_message());
                    return Err(e);
                }
            }
        }
    }

    pub fn access(&self, route: Route) -> RouteAccess {
        match &self.state {
            BootstrapState::Pending => RouteAccess::Pending,
            BootstrapState::Failed(message) => RouteAccess::LoadError(message.clone()),
            BootstrapState::Resolved => {
                let session = self.store.get_session();
                match (session.as_ref(), route.required()) {
                    (Some(_), None) => RouteAccess::RedirectToHome,
                    (None, None) => RouteAccess::Allow,
                    (None, Some(_)) => RouteAccess::RedirectToLogin,
                    (Some(s), Some(cap)) if can(Some(s), cap) => RouteAccess::Allow,
                    (Some(_), Some(_)) => RouteAccess::Forbidden,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn resolved(store: &SessionStore) -> BootstrapGuard {
        let mut guard = BootstrapGuard::new(store.clone());
        guard.state = BootstrapState::Resolved;
        guard
    }

    #[test]
    fn test_default_retry_policy() {
        let guard = BootstrapGuard::new(SessionStore::new());
        assert_eq!(guard.max_attempts, 4);
        assert_eq!(guard.initial_backoff, Duration::from_secs(1));

        let guard = guard.with_retry_policy(0, Duration::from_millis(5));
        assert_eq!(guard.max_attempts, 1);
    }

    #[test]
    fn test_pending_blocks_every_route() {
        let store = SessionStore::new();
        store.set_session(Session::new(1, Role::Admin));
        let guard = BootstrapGuard::new(store);
        for route in [Route::Login, Route::Home, Route::Users] {
            assert_eq!(guard.access(route), RouteAccess::Pending);
        }
    }

    #[test]
    fn test_anonymous_access() {
        let store = SessionStore::new();
        let guard = resolved(&store);
        assert_eq!(guard.access(Route::Login), RouteAccess::Allow);
        assert_eq!(guard.access(Route::Home), RouteAccess::RedirectToLogin);
        assert_eq!(guard.access(Route::Products), RouteAccess::RedirectToLogin);
    }

    #[test]
    fn test_role_based_access() {
        let store = SessionStore::new();
        let guard = resolved(&store);

        store.set_session(Session::new(2, Role::Manager));
        assert_eq!(guard.access(Route::Login), RouteAccess::RedirectToHome);
        assert_eq!(guard.access(Route::Products), RouteAccess::Allow);
        assert_eq!(guard.access(Route::Users), RouteAccess::Forbidden);

        store.set_session(Session::new(3, Role::Customer));
        assert_eq!(guard.access(Route::Home), RouteAccess::Forbidden);

        // Logout after bootstrap sends protected routes back to login
        store.clear_session();
        assert_eq!(guard.access(Route::Tenants), RouteAccess::RedirectToLogin);
    }

    #[test]
    fn test_failed_state_reports_load_error() {
        let mut guard = BootstrapGuard::new(SessionStore::new());
        guard.state = BootstrapState::Failed("boom".to_string());
        assert_eq!(
            guard.access(Route::Home),
            RouteAccess::LoadError("boom".to_string())
        );
    }
}
