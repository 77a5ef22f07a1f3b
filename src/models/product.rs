use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::ImagePayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "product_category", rename_all = "lowercase")]
pub enum Category {
    Men,
    Women,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Men => "men",
            Category::Women => "women",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "men" => Ok(Category::Men),
            "women" => Ok(Category::Women),
            other => Err(format!("Unknown category '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Category,
    pub stock: i32,
    pub image_data: Vec<u8>,
    pub image_content_type: String,
    pub image_alt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Category,
    pub stock: i32,
    pub image: ImagePayload,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            image: ImagePayload::from_bytes(&row.image_data, row.image_content_type, row.image_alt),
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            category: row.category,
            stock: row.stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Product fields exactly as the admin form submits them.
///
/// Numbers may arrive as JSON numbers or as the raw text of an input box,
/// so every scalar is kept as text until [`crate::validation`] parses it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default, deserialize_with = "text_or_number")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub stock: Option<String>,
    #[serde(default)]
    pub image: Option<ImagePayload>,
}

/// Validated fields for a new product; the image travels separately.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Category,
    pub stock: i32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<Category>,
    pub stock: Option<i32>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.stock.is_none()
    }
}

/// Image bytes ready to be written next to a product.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub data: Vec<u8>,
    pub content_type: String,
    pub alt: String,
}

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<TextOrNumber>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
    }))
}
