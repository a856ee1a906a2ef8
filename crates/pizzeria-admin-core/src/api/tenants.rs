use crate::models::{ListQuery, ListResponse, Page, Tenant, TenantData};

use super::endpoints;
use super::request::{Method, PendingRequest};
use super::{ApiClient, ApiError, RequestBody};

impl ApiClient {
    /// List tenants; an empty query fetches the unfiltered list
    pub async fn list_tenants(&self, query: &ListQuery) -> Result<Page<Tenant>, ApiError> {
        let request =
            PendingRequest::new(Method::Get, endpoints::tenants()).query(query.pairs().to_vec());
        let response = self.send(request).await?;
        Ok(Self::json::<ListResponse<Tenant>>(response).await?.into_page())
    }

    pub async fn get_tenant(&self, id: i64) -> Result<Tenant, ApiError> {
        let response = self.get(&endpoints::tenant(id)).await?;
        Self::json(response).await
    }

    pub async fn create_tenant(&self, data: &TenantData) -> Result<(), ApiError> {
        self.post(&endpoints::tenants(), RequestBody::json(data)?)
            .await
            .map(|_| ())
    }

    pub async fn update_tenant(&self, id: i64, data: &TenantData) -> Result<(), ApiError> {
        self.patch(&endpoints::tenant(id), RequestBody::json(data)?)
            .await
            .map(|_| ())
    }

    pub async fn delete_tenant(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&endpoints::tenant(id)).await.map(|_| ())
    }
}
