//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::order;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::models::{Order, OrderAddItems, OrderCreate, OrderPay, OrderStatusUpdate, Shift};

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    100
}

/// Payment response: the settled order and the shift that collected it
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub order: Order,
    pub shift: Shift,
}

/// GET /api/orders - newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find_all(&state.pool, query.limit, query.offset).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let found = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    Ok(Json(found))
}

/// POST /api/orders - create an order with its items
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    validate_required_text(&payload.identifier, "identifier", MAX_NAME_LEN)?;
    let created = order::create(&state.pool, payload).await?;
    tracing::info!(
        order_id = created.id,
        total = created.total_amount,
        "Order created"
    );
    Ok(Json(created))
}

/// PUT /api/orders/:id/status - move the order through its lifecycle
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    let updated = order::update_status(&state.pool, id, payload.status).await?;
    Ok(Json(updated))
}

/// POST /api/orders/:id/items - append items to an open order
pub async fn add_items(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderAddItems>,
) -> AppResult<Json<Order>> {
    let updated = order::add_items(&state.pool, id, payload.items).await?;
    Ok(Json(updated))
}

/// POST /api/orders/:id/pay - settle against the active shift
pub async fn pay(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderPay>,
) -> AppResult<Json<PaymentResponse>> {
    let (paid, shift) = order::pay(&state.pool, id, payload.payment_method).await?;
    tracing::info!(
        order_id = paid.id,
        shift_id = shift.id,
        method = ?payload.payment_method,
        "Payment processed"
    );
    Ok(Json(PaymentResponse { order: paid, shift }))
}
