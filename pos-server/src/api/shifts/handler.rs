//! Shift API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::shift;
use crate::utils::validation::{MAX_NAME_LEN, validate_cash, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::models::{Shift, ShiftClose, ShiftOpen};

/// Query params for listing shifts
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/shifts - shift history, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Shift>>> {
    let shifts = shift::find_all(&state.pool, query.limit, query.offset).await?;
    Ok(Json(shifts))
}

/// GET /api/shifts/current - the active shift, if any
pub async fn get_current(State(state): State<ServerState>) -> AppResult<Json<Option<Shift>>> {
    let current = shift::find_active(&state.pool).await?;
    Ok(Json(current))
}

/// GET /api/shifts/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Shift>> {
    let found = shift::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Shift {id} not found")))?;
    Ok(Json(found))
}

/// POST /api/shifts - open a shift (fails if one is already active)
pub async fn open(
    State(state): State<ServerState>,
    Json(payload): Json<ShiftOpen>,
) -> AppResult<Json<Shift>> {
    validate_required_text(&payload.operator_name, "operator_name", MAX_NAME_LEN)?;
    validate_cash(payload.initial_amount, "initial_amount")?;

    let opened = shift::open(&state.pool, payload).await?;
    tracing::info!(
        shift_id = opened.id,
        operator = %opened.operator_name,
        "Shift opened"
    );
    Ok(Json(opened))
}

/// POST /api/shifts/close - close the active shift with the counted
/// breakdown
pub async fn close(
    State(state): State<ServerState>,
    Json(payload): Json<ShiftClose>,
) -> AppResult<Json<Shift>> {
    for (value, field) in [
        (payload.total, "total"),
        (payload.cash, "cash"),
        (payload.debit, "debit"),
        (payload.credit, "credit"),
        (payload.pix, "pix"),
    ] {
        validate_cash(value, field)?;
    }

    let closed = shift::close(&state.pool, payload).await?;
    tracing::info!(
        shift_id = closed.id,
        total = closed.closing_amount,
        transactions = closed.total_transactions,
        "Shift closed"
    );
    Ok(Json(closed))
}
