//! Stock Repository
//!
//! Stock rows are keyed to a backing product; creating a stock item by
//! name resolves or creates that product so the menu and the inventory
//! stay in sync.

use super::{RepoError, RepoResult};
use shared::models::{StockAdjust, StockCreate, StockItemDetail, StockLevel, StockUpdate};
use sqlx::{Sqlite, SqlitePool, Transaction};

const DETAIL_SELECT: &str = "SELECT s.id, s.product_id, p.name AS product_name, \
     p.image_url AS image_url, s.quantity, s.unit, s.min_quantity, s.purchase_price, \
     s.updated_at FROM stock s LEFT JOIN product p ON s.product_id = p.id";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<StockItemDetail>> {
    let item = sqlx::query_as::<_, StockItemDetail>(&format!("{DETAIL_SELECT} WHERE s.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<StockItemDetail>> {
    let items = sqlx::query_as::<_, StockItemDetail>(&format!(
        "{DETAIL_SELECT} ORDER BY p.name COLLATE NOCASE"
    ))
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Items at or below their critical threshold
pub async fn find_low(pool: &SqlitePool) -> RepoResult<Vec<StockItemDetail>> {
    let items = sqlx::query_as::<_, StockItemDetail>(&format!(
        "{DETAIL_SELECT} WHERE s.quantity < s.min_quantity * 1.5 ORDER BY s.quantity ASC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Inventory valuation at purchase price; rows without one count zero
pub async fn total_value(pool: &SqlitePool) -> RepoResult<f64> {
    let value = sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(SUM(quantity * COALESCE(purchase_price, 0)), 0) FROM stock",
    )
    .fetch_one(pool)
    .await?;
    Ok(value)
}

async fn resolve_or_create_product(
    tx: &mut Transaction<'_, Sqlite>,
    name: &str,
    now: i64,
) -> RepoResult<i64> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM product WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut **tx)
        .await?;
    if let Some(id) = existing {
        return Ok(id);
    }

    // Inventory-only item: hidden from the menu until priced
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO product (id, name, description, price, category_id, image_url, \
         is_available, is_featured, created_at, updated_at) \
         VALUES (?1, ?2, '', 0, NULL, '', 0, 0, ?3, ?3)",
    )
    .bind(id)
    .bind(name)
    .bind(now)
    .execute(&mut **tx)
    .await?;
    Ok(id)
}

pub async fn create(pool: &SqlitePool, data: StockCreate) -> RepoResult<StockItemDetail> {
    if !data.quantity.is_finite() || data.quantity < 0.0 {
        return Err(RepoError::Validation(format!(
            "quantity must be a non-negative number: {}",
            data.quantity
        )));
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let product_id = match (data.product_id, data.name.as_deref()) {
        (Some(pid), _) => Some(pid),
        (None, Some(name)) if !name.trim().is_empty() => {
            Some(resolve_or_create_product(&mut tx, name.trim(), now).await?)
        }
        _ => {
            return Err(RepoError::Validation(
                "Either product_id or name is required".into(),
            ));
        }
    };

    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO stock (id, product_id, quantity, unit, min_quantity, purchase_price, \
         updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(product_id)
    .bind(data.quantity)
    .bind(data.unit.unwrap_or_else(|| "un".to_string()))
    .bind(data.min_quantity.unwrap_or(0.0))
    .bind(data.purchase_price)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create stock item".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: StockUpdate) -> RepoResult<StockItemDetail> {
    if let Some(quantity) = data.quantity {
        if !quantity.is_finite() || quantity < 0.0 {
            return Err(RepoError::Validation(format!(
                "quantity must be a non-negative number: {quantity}"
            )));
        }
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE stock SET quantity = COALESCE(?1, quantity), unit = COALESCE(?2, unit), \
         min_quantity = COALESCE(?3, min_quantity), \
         purchase_price = COALESCE(?4, purchase_price), updated_at = ?5 WHERE id = ?6",
    )
    .bind(data.quantity)
    .bind(&data.unit)
    .bind(data.min_quantity)
    .bind(data.purchase_price)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Stock item {id} not found")));
    }

    // Renaming the item renames its backing product
    if let Some(name) = data.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        sqlx::query(
            "UPDATE product SET name = ?1, updated_at = ?2 \
             WHERE id = (SELECT product_id FROM stock WHERE id = ?3)",
        )
        .bind(name)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Stock item {id} not found")))
}

/// Restock or consume. Consumption clamps at zero rather than going
/// negative; dropping to a low level logs a warning.
pub async fn adjust(pool: &SqlitePool, id: i64, data: StockAdjust) -> RepoResult<StockItemDetail> {
    if !data.quantity.is_finite() || data.quantity < 0.0 {
        return Err(RepoError::Validation(format!(
            "quantity must be a non-negative number: {}",
            data.quantity
        )));
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let current: Option<(f64, f64)> =
        sqlx::query_as("SELECT quantity, min_quantity FROM stock WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some((quantity, min_quantity)) = current else {
        return Err(RepoError::NotFound(format!("Stock item {id} not found")));
    };

    let new_quantity = if data.increment {
        quantity + data.quantity
    } else {
        (quantity - data.quantity).max(0.0)
    };

    sqlx::query("UPDATE stock SET quantity = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(new_quantity)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let level = shared::models::stock_level(new_quantity, min_quantity);
    if level != StockLevel::Ok {
        tracing::warn!(
            stock_id = id,
            quantity = new_quantity,
            min_quantity,
            level = ?level,
            "Stock running low"
        );
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Stock item {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM stock WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Stock item {id} not found")));
    }
    Ok(true)
}
