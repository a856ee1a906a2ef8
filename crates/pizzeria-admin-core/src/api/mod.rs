//! REST API client module for the restaurant platform services.
//!
//! This module provides the `ApiClient` for talking to the auth service
//! (login, users, tenants) and the catalog service (categories, products).
//!
//! Authentication is cookie based: the server sets access and refresh
//! cookies, the client's cookie jar sends them back, and a 401 triggers a
//! single silent refresh before the request is retried.

pub mod auth;
pub mod catalog;
pub mod client;
pub mod endpoints;
pub mod error;
mod interceptor;
pub mod request;
pub mod tenants;
pub mod users;

pub use client::ApiClient;
pub use error::{ApiError, FieldError};
pub use request::{Method, MultipartBody, PendingRequest, RequestBody, RequestConfig};
