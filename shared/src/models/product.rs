//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    /// Category reference, null = uncategorized
    pub category_id: Option<i64>,
    #[serde(default)]
    pub image_url: String,
    pub is_available: bool,
    #[serde(default)]
    pub is_featured: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Product joined with category name and stock quantity (for list views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductWithStock {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub image_url: String,
    pub is_available: bool,
    pub is_featured: bool,
    pub stock_quantity: f64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    /// Category referenced by name (resolved server-side, null if unknown)
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
    /// Initial stock quantity for the companion stock row
    pub stock: Option<f64>,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
    pub is_featured: Option<bool>,
    /// When present, upserts the companion stock row's quantity
    pub stock: Option<f64>,
}
