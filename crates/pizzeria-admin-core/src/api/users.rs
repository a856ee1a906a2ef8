use crate::models::{CreateUser, ListQuery, ListResponse, Page, UpdateUser, User};

use super::endpoints;
use super::request::{Method, PendingRequest};
use super::{ApiClient, ApiError, RequestBody};

impl ApiClient {
    pub async fn list_users(&self, query: &ListQuery) -> Result<Page<User>, ApiError> {
        let request =
            PendingRequest::new(Method::Get, endpoints::users()).query(query.pairs().to_vec());
        let response = self.send(request).await?;
        Ok(Self::json::<ListResponse<User>>(response).await?.into_page())
    }

    pub async fn get_user(&self, id: i64) -> Result<User, ApiError> {
        let response = self.get(&endpoints::user(id)).await?;
        Self::json(response).await
    }

    pub async fn create_user(&self, user: &CreateUser) -> Result<(), ApiError> {
        self.post(&endpoints::users(), RequestBody::json(user)?)
            .await
            .map(|_| ())
    }

    pub async fn update_user(&self, id: i64, update: &UpdateUser) -> Result<(), ApiError> {
        self.patch(&endpoints::user(id), RequestBody::json(update)?)
            .await
            .map(|_| ())
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&endpoints::user(id)).await.map(|_| ())
    }
}
