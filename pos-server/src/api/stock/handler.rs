//! Stock API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::core::ServerState;
use crate::db::repository::stock;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_NAME_LEN, validate_optional_text};
use shared::models::{StockAdjust, StockCreate, StockItemDetail, StockUpdate};

/// GET /api/stock - inventory with product names
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<StockItemDetail>>> {
    let items = stock::find_all(&state.pool).await?;
    Ok(Json(items))
}

/// GET /api/stock/low - items at or below the warning threshold
pub async fn low(State(state): State<ServerState>) -> AppResult<Json<Vec<StockItemDetail>>> {
    let items = stock::find_low(&state.pool).await?;
    Ok(Json(items))
}

/// GET /api/stock/value - inventory valuation at purchase price
pub async fn total_value(State(state): State<ServerState>) -> AppResult<Json<Value>> {
    let value = stock::total_value(&state.pool).await?;
    Ok(Json(json!({ "total_value": value })))
}

/// POST /api/stock - create an item, resolving or creating its product
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<StockCreate>,
) -> AppResult<Json<StockItemDetail>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    let created = stock::create(&state.pool, payload).await?;
    Ok(Json(created))
}

/// PUT /api/stock/:id - partial update; `name` renames the product
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StockUpdate>,
) -> AppResult<Json<StockItemDetail>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    let updated = stock::update(&state.pool, id, payload).await?;
    Ok(Json(updated))
}

/// POST /api/stock/:id/adjust - restock or consume
pub async fn adjust(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StockAdjust>,
) -> AppResult<Json<StockItemDetail>> {
    let adjusted = stock::adjust(&state.pool, id, payload).await?;
    Ok(Json(adjusted))
}

/// DELETE /api/stock/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = stock::delete(&state.pool, id).await?;
    Ok(Json(deleted))
}
