//! Stock Model

use serde::{Deserialize, Serialize};

/// Stock row entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StockItem {
    pub id: i64,
    /// Product reference; null for orphaned rows
    pub product_id: Option<i64>,
    pub quantity: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub min_quantity: f64,
    pub purchase_price: Option<f64>,
    pub updated_at: i64,
}

fn default_unit() -> String {
    "un".to_string()
}

/// Stock row joined with product name/image (for list views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StockItemDetail {
    pub id: i64,
    pub product_id: Option<i64>,
    /// Joined product name; null when the row has no product
    pub product_name: Option<String>,
    pub image_url: Option<String>,
    pub quantity: f64,
    pub unit: String,
    pub min_quantity: f64,
    pub purchase_price: Option<f64>,
    pub updated_at: i64,
}

/// Stock level classification relative to the minimum threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockLevel {
    Depleted,
    Critical,
    Low,
    Ok,
}

/// Classify a quantity against its minimum threshold.
///
/// Depleted at zero, Critical below the minimum, Low below 1.5x the
/// minimum, Ok above.
pub fn stock_level(quantity: f64, min_quantity: f64) -> StockLevel {
    if quantity <= 0.0 {
        StockLevel::Depleted
    } else if quantity < min_quantity {
        StockLevel::Critical
    } else if quantity < min_quantity * 1.5 {
        StockLevel::Low
    } else {
        StockLevel::Ok
    }
}

impl StockItemDetail {
    pub fn level(&self) -> StockLevel {
        stock_level(self.quantity, self.min_quantity)
    }
}

/// Create stock item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockCreate {
    /// Item name; used to resolve (or create) the backing product when
    /// no product_id is supplied
    pub name: Option<String>,
    pub product_id: Option<i64>,
    pub quantity: f64,
    pub unit: Option<String>,
    pub min_quantity: Option<f64>,
    pub purchase_price: Option<f64>,
}

/// Update stock item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockUpdate {
    /// When present, renames the backing product
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub min_quantity: Option<f64>,
    pub purchase_price: Option<f64>,
}

/// Quantity adjustment payload (restock or consumption)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAdjust {
    pub quantity: f64,
    /// true = add, false = subtract (clamped at zero)
    pub increment: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_stock_levels() {
        assert_eq!(stock_level(0.0, 10.0), StockLevel::Depleted);
        assert_eq!(stock_level(-1.0, 10.0), StockLevel::Depleted);
        assert_eq!(stock_level(5.0, 10.0), StockLevel::Critical);
        assert_eq!(stock_level(12.0, 10.0), StockLevel::Low);
        assert_eq!(stock_level(15.0, 10.0), StockLevel::Ok);
        assert_eq!(stock_level(30.0, 10.0), StockLevel::Ok);
    }
}
