//! Product Repository
//!
//! Every product carries a companion stock row; creation and deletion
//! keep the pair consistent inside a transaction.

use super::{RepoError, RepoResult};
use shared::models::{Product, ProductCreate, ProductUpdate, ProductWithStock};
use sqlx::{Sqlite, SqlitePool, Transaction};

const PRODUCT_COLS: &str =
    "id, name, description, price, category_id, image_url, is_available, is_featured, \
     created_at, updated_at";

const WITH_STOCK_SELECT: &str = "SELECT p.id, p.name, p.description, p.price, p.category_id, \
     c.name AS category_name, p.image_url, p.is_available, p.is_featured, \
     COALESCE(SUM(s.quantity), 0) AS stock_quantity \
     FROM product p \
     LEFT JOIN category c ON p.category_id = c.id \
     LEFT JOIN stock s ON s.product_id = p.id";

async fn resolve_category_id(
    tx: &mut Transaction<'_, Sqlite>,
    name: Option<&str>,
) -> RepoResult<Option<i64>> {
    // Unknown category names leave the product uncategorized
    match name {
        Some(name) => Ok(sqlx::query_scalar("SELECT id FROM category WHERE name = ?")
            .bind(name)
            .fetch_optional(&mut **tx)
            .await?),
        None => Ok(None),
    }
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let product =
        sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLS} FROM product WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(product)
}

pub async fn find_with_stock(pool: &SqlitePool, id: i64) -> RepoResult<Option<ProductWithStock>> {
    let product = sqlx::query_as::<_, ProductWithStock>(&format!(
        "{WITH_STOCK_SELECT} WHERE p.id = ? GROUP BY p.id"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(product)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<ProductWithStock>> {
    let products = sqlx::query_as::<_, ProductWithStock>(&format!(
        "{WITH_STOCK_SELECT} GROUP BY p.id ORDER BY p.name COLLATE NOCASE"
    ))
    .fetch_all(pool)
    .await?;
    Ok(products)
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<ProductWithStock> {
    if data.name.trim().is_empty() {
        return Err(RepoError::Validation("Product name is required".into()));
    }
    if !data.price.is_finite() || data.price < 0.0 {
        return Err(RepoError::Validation(format!(
            "Product price must be a non-negative number: {}",
            data.price
        )));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let category_id = resolve_category_id(&mut tx, data.category.as_deref()).await?;

    sqlx::query(
        "INSERT INTO product (id, name, description, price, category_id, image_url, \
         is_available, is_featured, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?8)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(data.description.unwrap_or_default())
    .bind(data.price)
    .bind(category_id)
    .bind(data.image_url.unwrap_or_default())
    .bind(data.is_available.unwrap_or(true))
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO stock (id, product_id, quantity, unit, min_quantity, updated_at) \
         VALUES (?1, ?2, ?3, 'un', 0, ?4)",
    )
    .bind(shared::util::snowflake_id())
    .bind(id)
    .bind(data.stock.unwrap_or(0.0))
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    find_with_stock(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<ProductWithStock> {
    if let Some(price) = data.price {
        if !price.is_finite() || price < 0.0 {
            return Err(RepoError::Validation(format!(
                "Product price must be a non-negative number: {price}"
            )));
        }
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let category_id = resolve_category_id(&mut tx, data.category.as_deref()).await?;

    let rows = sqlx::query(
        "UPDATE product SET name = COALESCE(?1, name), description = COALESCE(?2, description), \
         price = COALESCE(?3, price), \
         category_id = CASE WHEN ?4 IS NOT NULL THEN ?5 ELSE category_id END, \
         image_url = COALESCE(?6, image_url), is_available = COALESCE(?7, is_available), \
         is_featured = COALESCE(?8, is_featured), updated_at = ?9 WHERE id = ?10",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(&data.category)
    .bind(category_id)
    .bind(&data.image_url)
    .bind(data.is_available)
    .bind(data.is_featured)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }

    if let Some(quantity) = data.stock {
        let updated = sqlx::query(
            "UPDATE stock SET quantity = ?1, updated_at = ?2 WHERE product_id = ?3",
        )
        .bind(quantity)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            sqlx::query(
                "INSERT INTO stock (id, product_id, quantity, unit, min_quantity, updated_at) \
                 VALUES (?1, ?2, ?3, 'un', 0, ?4)",
            )
            .bind(shared::util::snowflake_id())
            .bind(id)
            .bind(quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;

    find_with_stock(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM stock WHERE product_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let rows = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }

    tx.commit().await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::category;
    use crate::db::repository::test_support::memory_pool;
    use shared::models::CategoryCreate;

    fn payload(name: &str, price: f64) -> ProductCreate {
        ProductCreate {
            name: name.to_string(),
            description: None,
            price,
            category: None,
            image_url: None,
            is_available: None,
            stock: None,
        }
    }

    #[tokio::test]
    async fn creates_product_with_companion_stock_row() {
        let pool = memory_pool().await;
        let mut data = payload("X-Burger", 20.0);
        data.stock = Some(12.0);
        let product = create(&pool, data).await.unwrap();

        assert_eq!(product.price, 20.0);
        assert_eq!(product.stock_quantity, 12.0);
        assert!(product.is_available);
    }

    #[tokio::test]
    async fn resolves_category_by_name_and_tolerates_unknown() {
        let pool = memory_pool().await;
        let cat = category::create(
            &pool,
            CategoryCreate {
                name: "Lanches".to_string(),
            },
        )
        .await
        .unwrap();

        let mut known = payload("X-Burger", 20.0);
        known.category = Some("Lanches".to_string());
        let product = create(&pool, known).await.unwrap();
        assert_eq!(product.category_id, Some(cat.id));
        assert_eq!(product.category_name.as_deref(), Some("Lanches"));

        let mut unknown = payload("Sobremesa", 10.0);
        unknown.category = Some("Inexistente".to_string());
        let orphan = create(&pool, unknown).await.unwrap();
        assert_eq!(orphan.category_id, None);
    }

    #[tokio::test]
    async fn update_upserts_stock_quantity() {
        let pool = memory_pool().await;
        let product = create(&pool, payload("Pizza", 50.0)).await.unwrap();

        let updated = update(
            &pool,
            product.id,
            ProductUpdate {
                name: None,
                description: None,
                price: Some(55.0),
                category: None,
                image_url: None,
                is_available: None,
                is_featured: None,
                stock: Some(30.0),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.price, 55.0);
        assert_eq!(updated.stock_quantity, 30.0);
    }

    #[tokio::test]
    async fn delete_removes_product_and_stock() {
        let pool = memory_pool().await;
        let product = create(&pool, payload("Pizza", 50.0)).await.unwrap();
        assert!(delete(&pool, product.id).await.unwrap());
        assert!(find_by_id(&pool, product.id).await.unwrap().is_none());

        let err = delete(&pool, product.id).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
