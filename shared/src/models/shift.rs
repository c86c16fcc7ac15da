//! Shift Model
//!
//! A shift is a bounded cash-register operating session. At most one
//! shift is ACTIVE at any time; every payment is bracketed by the shift
//! that collected it via per-tender transaction counters.

use serde::{Deserialize, Serialize};

/// Shift status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftStatus {
    Active,
    Closed,
}

impl Default for ShiftStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// Shift entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Shift {
    /// Sequential id (1 + previous maximum)
    pub id: i64,
    pub operator_name: String,
    #[serde(default)]
    pub status: ShiftStatus,
    /// Shift start (Unix millis)
    pub start_time: i64,
    /// Shift end (Unix millis), null while active
    pub end_time: Option<i64>,
    /// Opening cash float
    pub initial_amount: f64,
    /// Closing totals, recorded at close and broken out by tender
    pub closing_amount: Option<f64>,
    pub closing_cash_amount: Option<f64>,
    pub closing_debit_amount: Option<f64>,
    pub closing_credit_amount: Option<f64>,
    pub closing_pix_amount: Option<f64>,
    /// Per-tender payment counters; monotonic while the shift is active
    pub cash_transactions: i32,
    pub card_transactions: i32,
    pub pix_transactions: i32,
    pub total_transactions: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Open shift payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftOpen {
    pub operator_name: String,
    /// Opening cash float (default 0)
    #[serde(default)]
    pub initial_amount: f64,
}

/// Close shift payload — the counted closing breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftClose {
    pub total: f64,
    pub cash: f64,
    pub debit: f64,
    pub credit: f64,
    pub pix: f64,
}
