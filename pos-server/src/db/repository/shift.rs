//! Shift Repository
//!
//! Global single shift: at most one ACTIVE row at any time, enforced
//! both here and by a partial unique index on the table.

use super::{RepoError, RepoResult};
use shared::models::{Shift, ShiftClose, ShiftOpen};
use sqlx::SqlitePool;

const SHIFT_COLS: &str = "id, operator_name, status, start_time, end_time, initial_amount, \
     closing_amount, closing_cash_amount, closing_debit_amount, closing_credit_amount, \
     closing_pix_amount, cash_transactions, card_transactions, pix_transactions, \
     total_transactions, created_at, updated_at";

fn validate_cash_amount(amount: f64, field_name: &str) -> RepoResult<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(RepoError::Validation(format!(
            "{field_name} must be a non-negative number: {amount}"
        )));
    }
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Shift>> {
    let shift =
        sqlx::query_as::<_, Shift>(&format!("SELECT {SHIFT_COLS} FROM shift WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(shift)
}

/// The ACTIVE shift, if any. Always read from storage, never cached.
pub async fn find_active(pool: &SqlitePool) -> RepoResult<Option<Shift>> {
    let shift = sqlx::query_as::<_, Shift>(&format!(
        "SELECT {SHIFT_COLS} FROM shift WHERE status = 'ACTIVE' LIMIT 1"
    ))
    .fetch_optional(pool)
    .await?;
    Ok(shift)
}

pub async fn find_all(pool: &SqlitePool, limit: i32, offset: i32) -> RepoResult<Vec<Shift>> {
    let shifts = sqlx::query_as::<_, Shift>(&format!(
        "SELECT {SHIFT_COLS} FROM shift ORDER BY start_time DESC LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(shifts)
}

/// Open a shift. Ids are sequential (AUTOINCREMENT), so the new id is
/// always one past the historical maximum.
pub async fn open(pool: &SqlitePool, data: ShiftOpen) -> RepoResult<Shift> {
    validate_cash_amount(data.initial_amount, "initial_amount")?;
    if data.operator_name.trim().is_empty() {
        return Err(RepoError::Validation("operator_name is required".into()));
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let active: Option<i64> =
        sqlx::query_scalar("SELECT id FROM shift WHERE status = 'ACTIVE' LIMIT 1")
            .fetch_optional(&mut *tx)
            .await?;
    if active.is_some() {
        return Err(RepoError::Duplicate("A shift is already active".into()));
    }

    let result = sqlx::query(
        "INSERT INTO shift (operator_name, status, start_time, initial_amount, created_at, updated_at) \
         VALUES (?1, 'ACTIVE', ?2, ?3, ?2, ?2)",
    )
    .bind(data.operator_name.trim())
    .bind(now)
    .bind(data.initial_amount)
    .execute(&mut *tx)
    .await?;
    let id = result.last_insert_rowid();

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to open shift".into()))
}

/// Close the ACTIVE shift, stamping the end time and the counted
/// closing breakdown. Fails when no shift is active.
pub async fn close(pool: &SqlitePool, data: ShiftClose) -> RepoResult<Shift> {
    for (value, field) in [
        (data.total, "total"),
        (data.cash, "cash"),
        (data.debit, "debit"),
        (data.credit, "credit"),
        (data.pix, "pix"),
    ] {
        validate_cash_amount(value, field)?;
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let active: Option<i64> =
        sqlx::query_scalar("SELECT id FROM shift WHERE status = 'ACTIVE' LIMIT 1")
            .fetch_optional(&mut *tx)
            .await?;
    let Some(id) = active else {
        return Err(RepoError::Precondition("No active shift to close".into()));
    };

    let rows = sqlx::query(
        "UPDATE shift SET status = 'CLOSED', end_time = ?1, closing_amount = ?2, \
         closing_cash_amount = ?3, closing_debit_amount = ?4, closing_credit_amount = ?5, \
         closing_pix_amount = ?6, updated_at = ?1 WHERE id = ?7 AND status = 'ACTIVE'",
    )
    .bind(now)
    .bind(data.total)
    .bind(data.cash)
    .bind(data.debit)
    .bind(data.credit)
    .bind(data.pix)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Precondition("No active shift to close".into()));
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Shift {id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::memory_pool;
    use shared::models::ShiftStatus;

    fn open_payload(name: &str, cash: f64) -> ShiftOpen {
        ShiftOpen {
            operator_name: name.to_string(),
            initial_amount: cash,
        }
    }

    #[tokio::test]
    async fn opens_and_finds_active_shift() {
        let pool = memory_pool().await;
        let shift = open(&pool, open_payload("Ana", 100.0)).await.unwrap();
        assert_eq!(shift.id, 1);
        assert_eq!(shift.status, ShiftStatus::Active);
        assert_eq!(shift.initial_amount, 100.0);
        assert_eq!(shift.total_transactions, 0);
        assert!(shift.end_time.is_none());

        let active = find_active(&pool).await.unwrap().unwrap();
        assert_eq!(active.id, shift.id);
    }

    #[tokio::test]
    async fn rejects_second_active_shift() {
        let pool = memory_pool().await;
        open(&pool, open_payload("Ana", 50.0)).await.unwrap();
        let err = open(&pool, open_payload("Bruno", 0.0)).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn shift_ids_are_sequential_across_sessions() {
        let pool = memory_pool().await;
        let first = open(&pool, open_payload("Ana", 0.0)).await.unwrap();
        close(
            &pool,
            ShiftClose {
                total: 0.0,
                cash: 0.0,
                debit: 0.0,
                credit: 0.0,
                pix: 0.0,
            },
        )
        .await
        .unwrap();
        let second = open(&pool, open_payload("Bruno", 0.0)).await.unwrap();
        assert_eq!(second.id, first.id + 1);
    }

    #[tokio::test]
    async fn close_stamps_breakdown_and_end_time() {
        let pool = memory_pool().await;
        open(&pool, open_payload("Ana", 100.0)).await.unwrap();
        let closed = close(
            &pool,
            ShiftClose {
                total: 140.0,
                cash: 140.0,
                debit: 0.0,
                credit: 0.0,
                pix: 0.0,
            },
        )
        .await
        .unwrap();

        assert_eq!(closed.status, ShiftStatus::Closed);
        assert!(closed.end_time.is_some());
        assert_eq!(closed.closing_amount, Some(140.0));
        assert_eq!(closed.closing_cash_amount, Some(140.0));
        assert_eq!(closed.closing_pix_amount, Some(0.0));
        assert!(find_active(&pool).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn close_without_active_shift_fails() {
        let pool = memory_pool().await;
        let err = close(
            &pool,
            ShiftClose {
                total: 0.0,
                cash: 0.0,
                debit: 0.0,
                credit: 0.0,
                pix: 0.0,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Precondition(_)));
    }

    #[tokio::test]
    async fn rejects_negative_opening_float() {
        let pool = memory_pool().await;
        let err = open(&pool, open_payload("Ana", -5.0)).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }
}
