//! Orders Module
//!
//! Pure pricing and lifecycle rules; persistence lives in
//! `db::repository::order`.

pub mod engine;

pub use engine::{
    SERVICE_FEE_RATE, TenderBucket, calculate_order_total, creation_total, items_subtotal,
    lines_match, normalize_status, resolve_unit_price, tender_bucket,
};
