//! Data models for the restaurant platform.
//!
//! - `User`, `Role`, `CreateUser`, `UpdateUser`: auth service accounts
//! - `Tenant`, `TenantData`: restaurants
//! - `Category`, `Product`, `ProductForm`: catalog entries
//! - `Page`, `ListQuery`: list envelopes and filters

pub mod catalog;
pub mod page;
pub mod tenant;
pub mod user;

pub use catalog::{
    AttributeValue, Category, CategoryAttribute, CreateCategory, ImageFile, PriceDimension,
    PriceType, Product, ProductAttribute, ProductForm, ProductPrice, WidgetType,
};
pub use page::{ListQuery, Page, PAGE_SIZE};
pub(crate) use page::ListResponse;
pub use tenant::{Tenant, TenantData};
pub use user::{CreateUser, LoginCredentials, Role, UpdateUser, User};

use serde::{Deserialize, Deserializer};

/// Ids that arrive as either JSON strings or numbers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}
