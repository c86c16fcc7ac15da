//! Full service-day flow: open a shift, take and settle orders, close
//! the shift with a counted breakdown.

use pos_server::db::repository::{order, product, shift};
use pos_server::orders::engine;
use shared::models::{
    OrderCreate, OrderItemInput, OrderStatus, OrderType, PaymentMethod, ProductCreate, ShiftClose,
    ShiftOpen, ShiftStatus,
};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

async fn test_pool() -> SqlitePool {
    // Single connection: each in-memory SQLite connection is its own db
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    pool
}

async fn seed_product(pool: &SqlitePool, name: &str, price: f64) {
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
    .expect("seed product");
}

fn line(name: &str, quantity: i32, notes: &str) -> OrderItemInput {
    OrderItemInput {
        name: name.to_string(),
        quantity,
        notes: notes.to_string(),
        product_id: None,
        price: None,
    }
}

#[tokio::test]
async fn shift_brackets_a_full_service_day() {
    let pool = test_pool().await;
    seed_product(&pool, "X-Burger", 20.0).await;

    let opened = shift::open(
        &pool,
        ShiftOpen {
            operator_name: "Ana".to_string(),
            initial_amount: 100.0,
        },
    )
    .await
    .unwrap();
    assert_eq!(opened.status, ShiftStatus::Active);

    let created = order::create(
        &pool,
        OrderCreate {
            order_type: OrderType::Takeout,
            identifier: "Carlos".to_string(),
            items: vec![line("X-Burger", 2, "")],
            delivery_info: None,
            has_service_fee: false,
        },
    )
    .await
    .unwrap();
    assert_eq!(created.total_amount, 40.0);
    assert_eq!(created.status, OrderStatus::Pending);

    // kitchen display marks it "completed"; it lands as READY
    let ready = order::update_status(&pool, created.id, OrderStatus::Completed)
        .await
        .unwrap();
    assert_eq!(ready.status, OrderStatus::Ready);

    let (paid, after_payment) = order::pay(&pool, created.id, PaymentMethod::Cash)
        .await
        .unwrap();
    assert_eq!(paid.status, OrderStatus::Paid);
    assert!(paid.paid);
    assert_eq!(paid.payment_method, Some(PaymentMethod::Cash));
    assert_eq!(paid.shift_id, Some(opened.id));
    assert_eq!(after_payment.cash_transactions, 1);
    assert_eq!(after_payment.total_transactions, 1);

    let closed = shift::close(
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
    assert_eq!(closed.closing_amount, Some(140.0));
    assert_eq!(closed.closing_cash_amount, Some(140.0));
    assert!(closed.end_time.is_some());

    // the register is free for the next operator
    assert!(shift::find_active(&pool).await.unwrap().is_none());
    let next = shift::open(
        &pool,
        ShiftOpen {
            operator_name: "Bruno".to_string(),
            initial_amount: 50.0,
        },
    )
    .await
    .unwrap();
    assert_eq!(next.id, opened.id + 1);
}

#[tokio::test]
async fn reorder_merges_lines_and_extends_total() {
    let pool = test_pool().await;
    seed_product(&pool, "X-Burger", 20.0).await;

    let created = order::create(
        &pool,
        OrderCreate {
            order_type: OrderType::Table,
            identifier: "Mesa 2".to_string(),
            items: vec![line("X-Burger", 1, "")],
            delivery_info: None,
            has_service_fee: false,
        },
    )
    .await
    .unwrap();
    assert_eq!(created.total_amount, 20.0);

    // same product, no notes: merges into the existing line
    let merged = order::add_items(&pool, created.id, vec![line("X-Burger", 1, "")])
        .await
        .unwrap();
    assert_eq!(merged.items.len(), 1);
    assert_eq!(merged.items[0].quantity, 2);
    assert_eq!(merged.total_amount, 40.0);

    // same product with notes: its own line
    let split = order::add_items(&pool, created.id, vec![line("X-Burger", 1, "sem picles")])
        .await
        .unwrap();
    assert_eq!(split.items.len(), 2);
    assert_eq!(split.total_amount, 60.0);
}

#[tokio::test]
async fn stored_totals_survive_recalculation() {
    let pool = test_pool().await;
    seed_product(&pool, "Pizza", 50.0).await;

    let created = order::create(
        &pool,
        OrderCreate {
            order_type: OrderType::Table,
            identifier: "Mesa 7".to_string(),
            items: vec![line("Pizza", 2, "")],
            delivery_info: None,
            has_service_fee: true,
        },
    )
    .await
    .unwrap();
    assert!((created.total_amount - 110.0).abs() < 1e-9);

    // recomputing from the stored total is a no-op, no double fee
    let recomputed = engine::calculate_order_total(
        Some(created.total_amount),
        &created.items,
        created.has_service_fee,
    );
    assert!((recomputed - 110.0).abs() < 1e-9);

    let reloaded = order::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert!((reloaded.total_amount - 110.0).abs() < 1e-9);
}
