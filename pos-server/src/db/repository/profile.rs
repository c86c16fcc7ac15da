//! Profile Repository

use super::{RepoError, RepoResult};
use shared::models::Profile;
use sqlx::SqlitePool;

const PROFILE_COLS: &str =
    "id, email, password_hash, name, role, avatar_url, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Profile>> {
    let profile =
        sqlx::query_as::<_, Profile>(&format!("SELECT {PROFILE_COLS} FROM profile WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(profile)
}

/// Lookup by email, case-insensitive (emails are stored lowercased)
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(&format!(
        "SELECT {PROFILE_COLS} FROM profile WHERE email = LOWER(?)"
    ))
    .bind(email.trim())
    .fetch_optional(pool)
    .await?;
    Ok(profile)
}

pub async fn create(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
    name: &str,
    role: Option<&str>,
) -> RepoResult<Profile> {
    let email = email.trim().to_lowercase();
    if find_by_email(pool, &email).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Account '{email}' already exists"
        )));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO profile (id, email, password_hash, name, role, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    )
    .bind(id)
    .bind(&email)
    .bind(password_hash)
    .bind(name.trim())
    .bind(role)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create profile".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::memory_pool;

    #[tokio::test]
    async fn email_lookup_is_case_insensitive() {
        let pool = memory_pool().await;
        create(&pool, "Ana@Example.com", "hash", "Ana", Some("manager"))
            .await
            .unwrap();

        let found = find_by_email(&pool, "ana@example.COM").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().email, "ana@example.com");
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        let pool = memory_pool().await;
        create(&pool, "ana@example.com", "hash", "Ana", None)
            .await
            .unwrap();
        let err = create(&pool, "ANA@example.com", "hash2", "Ana B", None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }
}
