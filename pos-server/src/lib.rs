//! FoodPOS Server - restaurant point-of-sale backend
//!
//! # Overview
//!
//! - **Orders** (`orders`, `db::repository::order`): order lifecycle,
//!   pricing with the flat service fee, payment settlement
//! - **Shifts** (`db::repository::shift`): bounded cash-register
//!   sessions bracketing every payment
//! - **Catalog** (`db::repository::{product, category}`): menu data
//! - **Inventory** (`db::repository::stock`): stock levels and alerts
//! - **Auth** (`auth`): JWT + Argon2 accounts
//! - **HTTP API** (`api`): RESTful interface over axum
//!
//! # Module layout
//!
//! ```text
//! pos-server/src/
//! ├── core/     # config, state, server
//! ├── auth/     # JWT, passwords, middleware
//! ├── api/      # routes and handlers
//! ├── db/       # pool, migrations, repositories
//! ├── orders/   # pure pricing/lifecycle rules
//! └── utils/    # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

pub fn print_banner() {
    println!(
        r#"
    ______               ______  ____  _____
   / ____/___  ____  ____/ / __ \/ __ \/ ___/
  / /_  / __ \/ __ \/ __  / /_/ / / / /\__ \
 / __/ / /_/ / /_/ / /_/ / ____/ /_/ /___/ /
/_/    \____/\____/\__,_/_/    \____//____/
    "#
    );
}
