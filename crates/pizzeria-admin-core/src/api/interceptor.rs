//! Silent session refresh.
//!
//! `attempt -> refresh_if_needed -> retry_once`, as plain sequential
//! calls. A request that fails with 401 and has not been retried yet
//! triggers one `POST /auth/refresh`; if that succeeds the request is
//! resent unchanged (the new cookies ride along in the jar), otherwise
//! the session store is cleared and the refresh error is returned.

use reqwest::Response;
use tracing::{debug, info, warn};

use super::endpoints::REFRESH_PATH;
use super::request::{Method, PendingRequest};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Send a request through the refresh-on-401 pipeline
    pub async fn send(&self, request: PendingRequest) -> Result<Response, ApiError> {
        match self.attempt(&request).await {
            Err(ApiError::Unauthorized) if !request.is_retry => {
                let retry = request.into_retry();
                debug!(path = %retry.path, "Unauthorized, refreshing session");
                self.refresh_or_teardown().await?;
                self.attempt(&retry).await
            }
            outcome => outcome,
        }
    }

    /// Call the refresh endpoint. Never intercepted itself.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let request = PendingRequest::new(Method::Post, REFRESH_PATH).into_retry();
        self.attempt(&request).await.map(|_| ())
    }

    async fn refresh_or_teardown(&self) -> Result<(), ApiError> {
        match self.refresh().await {
            Ok(()) => {
                info!("Session refreshed");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Session refresh failed, signing out");
                self.session().clear_session();
                Err(e)
            }
        }
    }
}
