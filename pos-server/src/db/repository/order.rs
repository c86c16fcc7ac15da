//! Order Repository
//!
//! Order creation, item additions and payment each run in a single
//! transaction: the header, its lines and the recomputed total commit
//! together or not at all.

use super::{RepoError, RepoResult};
use crate::orders::engine;
use crate::utils::validation::MAX_NOTE_LEN;
use shared::models::{Order, OrderCreate, OrderItem, OrderItemInput, OrderStatus, PaymentMethod, Shift};
use sqlx::{Sqlite, SqlitePool, Transaction};

const ORDER_COLS: &str = "id, order_type, identifier, status, has_service_fee, total_amount, \
     paid, payment_method, shift_id, delivery_info, created_at, updated_at";

const ITEM_COLS: &str = "id, order_id, product_id, name, quantity, notes, unit_price";

async fn load_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(&format!(
        "SELECT {ITEM_COLS} FROM order_item WHERE order_id = ? ORDER BY id"
    ))
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLS} FROM orders WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match order {
        Some(mut order) => {
            order.items = load_items(pool, order.id).await?;
            Ok(Some(order))
        }
        None => Ok(None),
    }
}

pub async fn find_all(pool: &SqlitePool, limit: i32, offset: i32) -> RepoResult<Vec<Order>> {
    let mut orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLS} FROM orders ORDER BY created_at DESC LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    for order in &mut orders {
        order.items = load_items(pool, order.id).await?;
    }
    Ok(orders)
}

/// Resolve an incoming line to a catalog product and a unit price.
///
/// Resolution order: explicit product_id, then first case-insensitive
/// name match (lowest id wins). Lines that resolve to nothing are kept
/// with a null product reference and, absent an explicit price, price
/// zero.
async fn resolve_line(
    tx: &mut Transaction<'_, Sqlite>,
    item: &OrderItemInput,
) -> RepoResult<(Option<i64>, f64)> {
    let mut product_id = None;
    let mut catalog_price = None;

    if let Some(pid) = item.product_id {
        if let Some(price) =
            sqlx::query_scalar::<_, f64>("SELECT price FROM product WHERE id = ?")
                .bind(pid)
                .fetch_optional(&mut **tx)
                .await?
        {
            product_id = Some(pid);
            catalog_price = Some(price);
        }
    } else {
        let found: Option<(i64, f64)> = sqlx::query_as(
            "SELECT id, price FROM product WHERE LOWER(name) = LOWER(?) ORDER BY id LIMIT 1",
        )
        .bind(&item.name)
        .fetch_optional(&mut **tx)
        .await?;
        if let Some((pid, price)) = found {
            product_id = Some(pid);
            catalog_price = Some(price);
        }
    }

    Ok((product_id, engine::resolve_unit_price(item.price, catalog_price)))
}

fn validate_line(item: &OrderItemInput) -> RepoResult<()> {
    if item.name.trim().is_empty() {
        return Err(RepoError::Validation("Item name is required".into()));
    }
    if item.quantity <= 0 {
        return Err(RepoError::Validation(format!(
            "Item quantity must be positive: {}",
            item.name
        )));
    }
    if item.notes.chars().count() > MAX_NOTE_LEN {
        return Err(RepoError::Validation(format!(
            "Item notes exceed {MAX_NOTE_LEN} characters: {}",
            item.name
        )));
    }
    if let Some(price) = item.price {
        if !price.is_finite() || price < 0.0 {
            return Err(RepoError::Validation(format!(
                "Item price must be a non-negative number: {}",
                item.name
            )));
        }
    }
    Ok(())
}

/// Create an order with its lines and persisted total in one
/// transaction. The service fee multiplier applies to the creation
/// subtotal once; the stored total is final for these lines.
pub async fn create(pool: &SqlitePool, data: OrderCreate) -> RepoResult<Order> {
    if data.identifier.trim().is_empty() {
        return Err(RepoError::Validation("identifier is required".into()));
    }
    // An empty item list is fine: the order opens as a bare PENDING
    // header (total 0) and gets its lines through add-items
    for item in &data.items {
        validate_line(item)?;
    }

    let delivery_blob = data
        .delivery_info
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| RepoError::Validation(format!("Invalid delivery_info: {e}")))?;

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO orders (id, order_type, identifier, status, has_service_fee, total_amount, \
         paid, delivery_info, created_at, updated_at) \
         VALUES (?1, ?2, ?3, 'PENDING', ?4, 0, 0, ?5, ?6, ?6)",
    )
    .bind(id)
    .bind(data.order_type)
    .bind(data.identifier.trim())
    .bind(data.has_service_fee)
    .bind(&delivery_blob)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let mut subtotal = 0.0;
    for item in &data.items {
        let (product_id, unit_price) = resolve_line(&mut tx, item).await?;
        subtotal += unit_price * item.quantity as f64;
        sqlx::query(
            "INSERT INTO order_item (id, order_id, product_id, name, quantity, notes, unit_price) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(shared::util::snowflake_id())
        .bind(id)
        .bind(product_id)
        .bind(&item.name)
        .bind(item.quantity)
        .bind(&item.notes)
        .bind(unit_price)
        .execute(&mut *tx)
        .await?;
    }

    let total = engine::creation_total(subtotal, data.has_service_fee);
    sqlx::query("UPDATE orders SET total_amount = ?1 WHERE id = ?2")
        .bind(total)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

/// Persist a status change. COMPLETED normalizes to READY; there is no
/// transition guard beyond that.
pub async fn update_status(pool: &SqlitePool, id: i64, requested: OrderStatus) -> RepoResult<Order> {
    let status = engine::normalize_status(requested);
    let now = shared::util::now_millis();

    let rows = sqlx::query("UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Append items to an existing order.
///
/// Lines resolving to the same product with identical notes merge into
/// the existing row by bumping its quantity. The stored total grows by
/// the raw value of the additions; the service fee is never re-applied
/// here.
pub async fn add_items(
    pool: &SqlitePool,
    id: i64,
    items: Vec<OrderItemInput>,
) -> RepoResult<Order> {
    if items.is_empty() {
        return Err(RepoError::Validation("No items to add".into()));
    }
    for item in &items {
        validate_line(item)?;
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let stored_total: Option<f64> =
        sqlx::query_scalar("SELECT total_amount FROM orders WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(total) = stored_total else {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    };

    let mut additional = 0.0;
    for item in &items {
        let (product_id, unit_price) = resolve_line(&mut tx, item).await?;
        additional += unit_price * item.quantity as f64;

        // re-read inside the loop so items within one batch can merge
        // with lines the batch itself just inserted
        let lines = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ITEM_COLS} FROM order_item WHERE order_id = ? ORDER BY id"
        ))
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let existing = lines
            .iter()
            .find(|line| engine::lines_match(line, product_id, &item.notes));

        match existing {
            Some(line) => {
                sqlx::query("UPDATE order_item SET quantity = quantity + ?1 WHERE id = ?2")
                    .bind(item.quantity)
                    .bind(line.id)
                    .execute(&mut *tx)
                    .await?;
            }
            None => {
                sqlx::query(
                    "INSERT INTO order_item (id, order_id, product_id, name, quantity, notes, \
                     unit_price) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                )
                .bind(shared::util::snowflake_id())
                .bind(id)
                .bind(product_id)
                .bind(&item.name)
                .bind(item.quantity)
                .bind(&item.notes)
                .bind(unit_price)
                .execute(&mut *tx)
                .await?;
            }
        }
    }

    sqlx::query("UPDATE orders SET total_amount = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(total + additional)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Settle an order against the ACTIVE shift.
///
/// Requires an active shift; the order flips to PAID, records the
/// tender and the collecting shift, and the shift's per-tender counters
/// bump atomically in the same transaction.
pub async fn pay(
    pool: &SqlitePool,
    id: i64,
    method: PaymentMethod,
) -> RepoResult<(Order, Shift)> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let shift_id: Option<i64> =
        sqlx::query_scalar("SELECT id FROM shift WHERE status = 'ACTIVE' LIMIT 1")
            .fetch_optional(&mut *tx)
            .await?;
    let Some(shift_id) = shift_id else {
        return Err(RepoError::Precondition(
            "No active shift; open a shift before processing payments".into(),
        ));
    };

    let rows = sqlx::query(
        "UPDATE orders SET status = 'PAID', paid = 1, payment_method = ?1, shift_id = ?2, \
         updated_at = ?3 WHERE id = ?4",
    )
    .bind(method)
    .bind(shift_id)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }

    let (cash_inc, card_inc, pix_inc) = match engine::tender_bucket(method) {
        engine::TenderBucket::Cash => (1, 0, 0),
        engine::TenderBucket::Card => (0, 1, 0),
        engine::TenderBucket::Pix => (0, 0, 1),
    };
    sqlx::query(
        "UPDATE shift SET cash_transactions = cash_transactions + ?1, \
         card_transactions = card_transactions + ?2, \
         pix_transactions = pix_transactions + ?3, \
         total_transactions = total_transactions + 1, \
         updated_at = ?4 WHERE id = ?5 AND status = 'ACTIVE'",
    )
    .bind(cash_inc)
    .bind(card_inc)
    .bind(pix_inc)
    .bind(now)
    .bind(shift_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let order = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))?;
    let shift = super::shift::find_by_id(pool, shift_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Shift {shift_id} not found")))?;
    Ok((order, shift))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::memory_pool;
    use crate::db::repository::{product, shift};
    use shared::models::{OrderType, ProductCreate, ShiftOpen};

    async fn seed_product(pool: &SqlitePool, name: &str, price: f64) -> i64 {
        product::create(
            pool,
            ProductCreate {
                name: name.to_string(),
                description: None,
                price,
                category: None,
                image_url: None,
                is_available: None,
                stock: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    fn item(name: &str, quantity: i32) -> OrderItemInput {
        OrderItemInput {
            name: name.to_string(),
            quantity,
            notes: String::new(),
            product_id: None,
            price: None,
        }
    }

    fn takeout(identifier: &str, items: Vec<OrderItemInput>) -> OrderCreate {
        OrderCreate {
            order_type: OrderType::Takeout,
            identifier: identifier.to_string(),
            items,
            delivery_info: None,
            has_service_fee: false,
        }
    }

    #[tokio::test]
    async fn creates_order_with_catalog_price() {
        let pool = memory_pool().await;
        let pid = seed_product(&pool, "X-Burger", 20.0).await;

        let order = create(&pool, takeout("Carlos", vec![item("X-Burger", 2)]))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_amount, 40.0);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].product_id, Some(pid));
        assert_eq!(order.items[0].unit_price, 20.0);
        assert!(!order.paid);
    }

    #[tokio::test]
    async fn name_resolution_is_case_insensitive_first_match() {
        let pool = memory_pool().await;
        let first = seed_product(&pool, "Suco de Laranja", 8.0).await;
        seed_product(&pool, "suco de laranja", 9.0).await;

        let order = create(&pool, takeout("Ana", vec![item("SUCO DE LARANJA", 1)]))
            .await
            .unwrap();
        assert_eq!(order.items[0].product_id, Some(first));
        assert_eq!(order.total_amount, 8.0);
    }

    #[tokio::test]
    async fn unresolved_item_gets_zero_price_and_null_product() {
        let pool = memory_pool().await;
        let order = create(&pool, takeout("Ana", vec![item("Off Menu Special", 3)]))
            .await
            .unwrap();
        assert_eq!(order.items[0].product_id, None);
        assert_eq!(order.items[0].unit_price, 0.0);
        assert_eq!(order.total_amount, 0.0);
    }

    #[tokio::test]
    async fn explicit_price_overrides_catalog() {
        let pool = memory_pool().await;
        seed_product(&pool, "X-Burger", 20.0).await;

        let mut line = item("X-Burger", 1);
        line.price = Some(15.0);
        let order = create(&pool, takeout("Ana", vec![line])).await.unwrap();
        assert_eq!(order.items[0].unit_price, 15.0);
        assert_eq!(order.total_amount, 15.0);
    }

    #[tokio::test]
    async fn service_fee_applies_once_at_creation() {
        let pool = memory_pool().await;
        seed_product(&pool, "Pizza", 50.0).await;

        let mut payload = takeout("Mesa 3", vec![item("Pizza", 2)]);
        payload.order_type = OrderType::Table;
        payload.has_service_fee = true;
        let order = create(&pool, payload).await.unwrap();
        assert!((order.total_amount - 110.0).abs() < 1e-9);

        // additions extend the total at raw value, no second fee
        let updated = add_items(&pool, order.id, vec![item("Pizza", 1)])
            .await
            .unwrap();
        assert!((updated.total_amount - 160.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn add_items_merges_same_product_and_notes() {
        let pool = memory_pool().await;
        seed_product(&pool, "X-Burger", 20.0).await;

        let order = create(&pool, takeout("Ana", vec![item("X-Burger", 1)]))
            .await
            .unwrap();
        let updated = add_items(&pool, order.id, vec![item("X-Burger", 2)])
            .await
            .unwrap();

        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.items[0].quantity, 3);
        assert_eq!(updated.total_amount, 60.0);
    }

    #[tokio::test]
    async fn add_items_with_different_notes_inserts_new_line() {
        let pool = memory_pool().await;
        seed_product(&pool, "X-Burger", 20.0).await;

        let order = create(&pool, takeout("Ana", vec![item("X-Burger", 1)]))
            .await
            .unwrap();
        let mut noted = item("X-Burger", 1);
        noted.notes = "sem cebola".to_string();
        let updated = add_items(&pool, order.id, vec![noted]).await.unwrap();

        assert_eq!(updated.items.len(), 2);
        assert_eq!(updated.total_amount, 40.0);
    }

    #[tokio::test]
    async fn add_items_merges_within_a_single_batch() {
        let pool = memory_pool().await;
        seed_product(&pool, "X-Burger", 20.0).await;

        let order = create(&pool, takeout("Ana", vec![item("X-Burger", 1)]))
            .await
            .unwrap();
        let updated = add_items(
            &pool,
            order.id,
            vec![item("X-Burger", 1), item("X-Burger", 2)],
        )
        .await
        .unwrap();

        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.items[0].quantity, 4);
        assert_eq!(updated.total_amount, 80.0);
    }

    #[tokio::test]
    async fn rejects_oversized_item_notes() {
        let pool = memory_pool().await;
        let mut noted = item("Pizza", 1);
        noted.notes = "x".repeat(MAX_NOTE_LEN + 1);
        let err = create(&pool, takeout("Ana", vec![noted]))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn empty_order_opens_as_bare_pending_header() {
        let pool = memory_pool().await;
        seed_product(&pool, "X-Burger", 20.0).await;

        let order = create(&pool, takeout("Mesa 1", vec![])).await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.items.is_empty());
        assert_eq!(order.total_amount, 0.0);

        // lines arrive later through add-items
        let updated = add_items(&pool, order.id, vec![item("X-Burger", 2)])
            .await
            .unwrap();
        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.total_amount, 40.0);
    }

    #[tokio::test]
    async fn completed_status_persists_as_ready() {
        let pool = memory_pool().await;
        seed_product(&pool, "Pizza", 50.0).await;
        let order = create(&pool, takeout("Ana", vec![item("Pizza", 1)]))
            .await
            .unwrap();

        let updated = update_status(&pool, order.id, OrderStatus::Completed)
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Ready);
    }

    #[tokio::test]
    async fn status_updates_have_no_transition_guard() {
        let pool = memory_pool().await;
        seed_product(&pool, "Pizza", 50.0).await;
        let order = create(&pool, takeout("Ana", vec![item("Pizza", 1)]))
            .await
            .unwrap();

        // backwards and skipping moves are all accepted
        update_status(&pool, order.id, OrderStatus::Ready)
            .await
            .unwrap();
        let back = update_status(&pool, order.id, OrderStatus::Pending)
            .await
            .unwrap();
        assert_eq!(back.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn payment_requires_active_shift() {
        let pool = memory_pool().await;
        seed_product(&pool, "Pizza", 50.0).await;
        let order = create(&pool, takeout("Ana", vec![item("Pizza", 1)]))
            .await
            .unwrap();

        let err = pay(&pool, order.id, PaymentMethod::Cash).await.unwrap_err();
        assert!(matches!(err, RepoError::Precondition(_)));

        // nothing changed
        let reloaded = find_by_id(&pool, order.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, OrderStatus::Pending);
        assert!(!reloaded.paid);
        assert!(reloaded.shift_id.is_none());
    }

    #[tokio::test]
    async fn payment_bumps_matching_tender_counters() {
        let pool = memory_pool().await;
        seed_product(&pool, "Pizza", 50.0).await;
        shift::open(
            &pool,
            ShiftOpen {
                operator_name: "Ana".to_string(),
                initial_amount: 100.0,
            },
        )
        .await
        .unwrap();

        let o1 = create(&pool, takeout("A", vec![item("Pizza", 1)]))
            .await
            .unwrap();
        let o2 = create(&pool, takeout("B", vec![item("Pizza", 1)]))
            .await
            .unwrap();
        let o3 = create(&pool, takeout("C", vec![item("Pizza", 1)]))
            .await
            .unwrap();

        let (paid, _) = pay(&pool, o1.id, PaymentMethod::Cash).await.unwrap();
        assert_eq!(paid.status, OrderStatus::Paid);
        assert!(paid.paid);
        assert_eq!(paid.payment_method, Some(PaymentMethod::Cash));
        assert!(paid.shift_id.is_some());

        pay(&pool, o2.id, PaymentMethod::Credit).await.unwrap();
        let (_, s) = pay(&pool, o3.id, PaymentMethod::Debit).await.unwrap();

        assert_eq!(s.cash_transactions, 1);
        assert_eq!(s.card_transactions, 2);
        assert_eq!(s.pix_transactions, 0);
        assert_eq!(s.total_transactions, 3);

        let o4 = create(&pool, takeout("D", vec![item("Pizza", 1)]))
            .await
            .unwrap();
        let (_, s) = pay(&pool, o4.id, PaymentMethod::Pix).await.unwrap();
        assert_eq!(s.pix_transactions, 1);
        assert_eq!(s.cash_transactions, 1);
        assert_eq!(s.card_transactions, 2);
        assert_eq!(s.total_transactions, 4);
    }

    #[tokio::test]
    async fn rejects_zero_quantity_line() {
        let pool = memory_pool().await;
        let err = create(&pool, takeout("Ana", vec![item("Pizza", 0)]))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn delivery_info_round_trips_through_blob() {
        let pool = memory_pool().await;
        seed_product(&pool, "Pizza", 50.0).await;
        let mut payload = takeout("Carlos", vec![item("Pizza", 1)]);
        payload.order_type = OrderType::Delivery;
        payload.delivery_info = Some(shared::models::DeliveryInfo {
            client_name: "Carlos".to_string(),
            phone: "11 99999-0000".to_string(),
            address: "Rua das Flores".to_string(),
            number: "120".to_string(),
            complement: None,
            neighborhood: "Centro".to_string(),
            reference: None,
        });

        let order = create(&pool, payload).await.unwrap();
        let info = order.delivery_info().unwrap();
        assert_eq!(info.client_name, "Carlos");
        assert_eq!(info.neighborhood, "Centro");
    }
}
