//! Core library for pizzeria-admin.
//!
//! Provides the authenticated API client for the restaurant platform
//! (auth and catalog services), the session store it keeps in sync,
//! the bootstrap guard that decides route access on startup, and the
//! query cache used by list screens.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{Session, SessionStore};
pub use config::Config;
