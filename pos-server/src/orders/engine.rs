//! Order pricing and lifecycle decisions
//!
//! Pure functions, no I/O. The repository layer applies these rules
//! inside its transactions; keeping them here makes the money math and
//! status normalization testable in isolation.

use shared::models::{OrderItem, OrderStatus, PaymentMethod};

/// Flat service fee multiplier applied once, at order creation
pub const SERVICE_FEE_RATE: f64 = 1.10;

/// Normalize a requested status before persisting.
///
/// COMPLETED is a transient kitchen-display signal meaning "ready for
/// payment"; it is stored as READY. Every other status is stored as
/// requested — there is no transition guard, any status may follow any
/// other.
pub fn normalize_status(requested: OrderStatus) -> OrderStatus {
    match requested {
        OrderStatus::Completed => OrderStatus::Ready,
        other => other,
    }
}

/// Resolve the unit price for an incoming line.
///
/// An explicit price always wins; otherwise the catalog price; lines
/// that resolved to nothing are accepted at price zero.
pub fn resolve_unit_price(explicit: Option<f64>, catalog: Option<f64>) -> f64 {
    explicit.or(catalog).unwrap_or(0.0)
}

/// Sum of unit_price * quantity over all lines
pub fn items_subtotal(items: &[OrderItem]) -> f64 {
    items
        .iter()
        .map(|item| item.unit_price * item.quantity as f64)
        .sum()
}

/// Total persisted at order creation. The service fee applies here and
/// only here; later add-items extend the total at raw item value.
pub fn creation_total(subtotal: f64, has_service_fee: bool) -> f64 {
    if has_service_fee {
        subtotal * SERVICE_FEE_RATE
    } else {
        subtotal
    }
}

/// Total for an order, preferring the stored amount.
///
/// A stored total is returned unchanged, making the calculation
/// idempotent: the fee factored in at creation is never re-applied.
/// The fallback recomputes from lines and exists for order values that
/// were never persisted.
pub fn calculate_order_total(
    stored_total: Option<f64>,
    items: &[OrderItem],
    has_service_fee: bool,
) -> f64 {
    match stored_total {
        Some(total) => total,
        None => creation_total(items_subtotal(items), has_service_fee),
    }
}

/// True when an incoming line should merge into `line` instead of
/// inserting a new row: same resolved product and identical notes.
/// Unresolved lines (no product) never merge with resolved ones.
pub fn lines_match(line: &OrderItem, product_id: Option<i64>, notes: &str) -> bool {
    line.product_id == product_id && line.notes == notes
}

/// Shift counter a tender feeds into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenderBucket {
    Cash,
    Card,
    Pix,
}

/// CREDIT and DEBIT share the card counter.
pub fn tender_bucket(method: PaymentMethod) -> TenderBucket {
    match method {
        PaymentMethod::Cash => TenderBucket::Cash,
        PaymentMethod::Credit | PaymentMethod::Debit => TenderBucket::Card,
        PaymentMethod::Pix => TenderBucket::Pix,
    }
}
