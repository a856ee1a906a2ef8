//! Login, logout and "who am I".

use tracing::{info, warn};

use crate::auth::Session;
use crate::models::LoginCredentials;

use super::endpoints::{LOGIN_PATH, LOGOUT_PATH, SELF_PATH};
use super::{ApiClient, ApiError, RequestBody};

impl ApiClient {
    /// Sign in, then load and store the session reported by `/auth/self`.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Session, ApiError> {
        self.post(LOGIN_PATH, RequestBody::json(credentials)?).await?;
        let session = self.get_self().await?;
        info!(user_id = session.id, role = %session.role, "Login successful");
        self.session().set_session(session.clone());
        Ok(session)
    }

    /// `GET /auth/self`. Does not touch the session store.
    pub async fn get_self(&self) -> Result<Session, ApiError> {
        let response = self.get(SELF_PATH).await?;
        Self::json(response).await
    }

    /// Sign out. The local session is cleared whatever the server says.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.post(LOGOUT_PATH, RequestBody::Empty).await;
        self.session().clear_session();
        match result {
            Ok(_) => {
                info!("Logged out");
                Ok(())
            }
            // Already signed out on the server
            Err(ApiError::Unauthorized) => Ok(()),
            Err(e) => {
                warn!(error = %e, "Logout request failed");
                Err(e)
            }
        }
    }
}
