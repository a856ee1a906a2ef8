//! Catalog service models: categories and products.
//!
//! A category declares which price dimensions (size, crust, ...) and
//! attributes its products carry; a product fills in the prices and
//! attribute values for that template.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::{ApiError, MultipartBody};

use super::string_or_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum PriceType {
    #[serde(rename = "base")]
    Base,
    // Spelled this way by the catalog service
    #[serde(rename = "aditional", alias = "additional")]
    Additional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct PriceDimension {
    pub price_type: PriceType,
    #[serde(rename = "sizeOptions", alias = "availableOptions")]
    pub available_options: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum WidgetType {
    Switch,
    Radio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CategoryAttribute {
    pub name: String,
    pub widget_type: WidgetType,
    pub default_value: String,
    #[serde(default, alias = "options")]
    pub available_options: Vec<String>,
}

impl CategoryAttribute {
    /// Value a new product starts with for this attribute.
    pub fn initial_value(&self) -> AttributeValue {
        match self.widget_type {
            WidgetType::Switch => AttributeValue::Flag(self.default_value == "Yes"),
            WidgetType::Radio => AttributeValue::Choice(self.default_value.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price_configuration: BTreeMap<String, PriceDimension>,
    #[serde(default)]
    pub attributes: Vec<CategoryAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    pub name: String,
    pub price_configuration: BTreeMap<String, PriceDimension>,
    pub attributes: Vec<CategoryAttribute>,
}

/// Prices for one dimension of a product, keyed by option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ProductPrice {
    pub price_type: PriceType,
    #[serde(rename = "sizeOptions", alias = "availableOptions")]
    pub available_options: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(untagged)]
pub enum AttributeValue {
    Flag(bool),
    Choice(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ProductAttribute {
    pub name: String,
    pub value: AttributeValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub price_configuration: BTreeMap<String, ProductPrice>,
    #[serde(default)]
    pub attributes: Vec<ProductAttribute>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Product {
    pub fn status_display(&self) -> &'static str {
        if self.is_published {
            "Published"
        } else {
            "Draft"
        }
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }
}

/// Image uploaded with a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self {
            mime: mime_guess::from_path(path)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
            file_name,
            bytes,
        })
    }
}

/// Product create/update payload, sent as multipart/form-data.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub category_id: String,
    pub tenant_id: i64,
    pub is_published: bool,
    pub price_configuration: BTreeMap<String, ProductPrice>,
    pub attributes: Vec<ProductAttribute>,
    pub image: Option<ImageFile>,
}

impl ProductForm {
    /// Scalars go as text fields, nested structures as JSON text, and the
    /// image as a file part.
    pub fn to_multipart(&self) -> Result<MultipartBody, ApiError> {
        let mut body = MultipartBody::new()
            .text("name", self.name.clone())
            .text("description", self.description.clone())
            .text("categoryId", self.category_id.clone())
            .text("tenantId", self.tenant_id.to_string())
            .text("isPublished", self.is_published.to_string())
            .text("priceConfiguration", json_text(&self.price_configuration)?)
            .text("attributes", json_text(&self.attributes)?);

        if let Some(ref image) = self.image {
            body = body.file(
                "image",
                image.file_name.clone(),
                image.mime.clone(),
                image.bytes.clone(),
            );
        }
        Ok(body)
    }
}

fn json_text<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value)
        .map_err(|e| ApiError::InvalidRequest(format!("Failed to encode product: {}", e)))
}
