//! Server state shared across handlers

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;

/// Shared application state. Cheap to clone; handed to every handler
/// via axum's `State` extractor.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Initialize state: working directory, database pool, migrations.
    ///
    /// Startup failures are fatal.
    pub async fn initialize(config: &Config) -> Self {
        std::fs::create_dir_all(&config.work_dir)
            .unwrap_or_else(|e| panic!("Failed to create work dir {}: {e}", config.work_dir));

        let db = DbService::new(&config.database_path())
            .await
            .unwrap_or_else(|e| panic!("Failed to initialize database: {e}"));

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self {
            config: config.clone(),
            pool: db.pool,
            jwt_service,
        }
    }
}
