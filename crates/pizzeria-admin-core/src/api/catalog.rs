//! Catalog service: categories and products.
//!
//! Product writes are multipart so the image travels with the record.

use reqwest::header;

use crate::models::{
    Category, CreateCategory, ListQuery, ListResponse, Page, Product, ProductForm,
};

use super::endpoints;
use super::request::{Method, PendingRequest, RequestConfig};
use super::{ApiClient, ApiError, RequestBody};

impl ApiClient {
    pub async fn list_categories(&self, query: &ListQuery) -> Result<Page<Category>, ApiError> {
        let request = PendingRequest::new(Method::Get, endpoints::categories())
            .query(query.pairs().to_vec());
        let response = self.send(request).await?;
        Ok(Self::json::<ListResponse<Category>>(response).await?.into_page())
    }

    pub async fn get_category(&self, id: &str) -> Result<Category, ApiError> {
        let response = self.get(&endpoints::category(id)).await?;
        Self::json(response).await
    }

    pub async fn create_category(&self, category: &CreateCategory) -> Result<(), ApiError> {
        self.post(&endpoints::categories(), RequestBody::json(category)?)
            .await
            .map(|_| ())
    }

    pub async fn list_products(&self, query: &ListQuery) -> Result<Page<Product>, ApiError> {
        let request = PendingRequest::new(Method::Get, endpoints::products())
            .query(query.pairs().to_vec());
        let response = self.send(request).await?;
        Ok(Self::json::<ListResponse<Product>>(response).await?.into_page())
    }

    pub async fn create_product(&self, form: &ProductForm) -> Result<(), ApiError> {
        self.request(
            Method::Post,
            &endpoints::products(),
            form.to_multipart()?.into(),
            Self::multipart_config(),
        )
        .await
        .map(|_| ())
    }

    pub async fn update_product(&self, id: &str, form: &ProductForm) -> Result<(), ApiError> {
        self.request(
            Method::Put,
            &endpoints::product(id),
            form.to_multipart()?.into(),
            Self::multipart_config(),
        )
        .await
        .map(|_| ())
    }

    fn multipart_config() -> RequestConfig {
        RequestConfig::default().header(header::ACCEPT, "image/*")
    }
}
