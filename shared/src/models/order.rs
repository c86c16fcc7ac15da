//! Order Model

use serde::{Deserialize, Serialize};

/// Order kind — where the order came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Table,
    Takeout,
    Delivery,
}

/// Order lifecycle status
///
/// `Completed` is accepted as a *requested* status only (a transient
/// "ready for payment" signal from the kitchen display); it is never
/// persisted — status updates normalize it to `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Ready,
    Completed,
    Paid,
}

/// Tender type used to settle an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Credit,
    Debit,
    Pix,
}

/// Delivery details attached to a DELIVERY order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryInfo {
    pub client_name: String,
    pub phone: String,
    pub address: String,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub reference: Option<String>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub order_type: OrderType,
    /// Table number or customer display name
    pub identifier: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub has_service_fee: bool,
    pub total_amount: f64,
    #[serde(default)]
    pub paid: bool,
    pub payment_method: Option<PaymentMethod>,
    /// Shift that collected the payment (set on payment)
    pub shift_id: Option<i64>,
    /// Delivery details, stored as a JSON blob
    pub delivery_info: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Parse the stored delivery blob, if any.
    pub fn delivery_info(&self) -> Option<DeliveryInfo> {
        self.delivery_info
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }
}

/// One line within an order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    /// Catalog reference; null when the item never resolved to a product
    pub product_id: Option<i64>,
    /// Denormalized display name
    pub name: String,
    pub quantity: i32,
    #[serde(default)]
    pub notes: String,
    /// Price resolved at insert time
    pub unit_price: f64,
}

/// Item payload for order creation and add-items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub name: String,
    pub quantity: i32,
    #[serde(default)]
    pub notes: String,
    pub product_id: Option<i64>,
    /// Explicit unit price override; wins over catalog resolution
    pub price: Option<f64>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub order_type: OrderType,
    pub identifier: String,
    pub items: Vec<OrderItemInput>,
    pub delivery_info: Option<DeliveryInfo>,
    #[serde(default)]
    pub has_service_fee: bool,
}

/// Status update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Add items payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAddItems {
    pub items: Vec<OrderItemInput>,
}

/// Payment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPay {
    pub payment_method: PaymentMethod,
}
