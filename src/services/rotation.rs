use sqlx::PgPool;

use crate::error::{AppError, Result};
use crate::models::payment_address::PaymentAddress;

/// Picks the next payment address for assignment: the active entry least
/// recently handed out, with never-used entries first.
///
/// The select-then-mark pair is not atomic; two concurrent requests may be
/// assigned the same address. That only degrades rotation fairness, not the
/// correctness of either transaction, so it stays a plain pair of statements.
pub async fn select_for_assignment(pool: &PgPool) -> Result<PaymentAddress> {
    PaymentAddress::find_least_recently_used(pool)
        .await?
        .ok_or(AppError::NoActiveAddress)
}

/// Stamps the address as just-used so the next selection rotates past it
pub async fn record_usage(pool: &PgPool, upi_id: &str) -> Result<()> {
    PaymentAddress::mark_used(pool, upi_id).await?;
    Ok(())
}
