use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A UPI handle in the rotation pool. Transactions keep the `upi_id` string
/// as a label only, so pool entries can be deactivated or deleted without
/// touching the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentAddress {
    pub id: Uuid,
    pub upi_id: String,
    pub active: bool,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PaymentAddress {
    /// Creates a new pool entry. The UNIQUE constraint on `upi_id` surfaces
    /// duplicates as a database error for the caller to classify.
    pub async fn create(pool: &PgPool, upi_id: &str) -> Result<Self, sqlx::Error> {
        let address = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO payment_addresses (upi_id)
            VALUES ($1)
            RETURNING *
            "#,
        )
        .bind(upi_id)
        .fetch_one(pool)
        .await?;

        Ok(address)
    }

    /// Lists the whole pool, newest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let addresses = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM payment_addresses
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(addresses)
    }

    /// Returns the active address with the oldest `last_used_at`.
    /// Never-used entries (NULL) sort first, so a fresh address is handed
    /// out before any previously assigned one.
    pub async fn find_least_recently_used(pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        let address = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM payment_addresses
            WHERE active = TRUE
            ORDER BY last_used_at ASC NULLS FIRST, created_at ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(pool)
        .await?;

        Ok(address)
    }

    /// Stamps `last_used_at` so the next selection rotates away
    pub async fn mark_used(pool: &PgPool, upi_id: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE payment_addresses
            SET last_used_at = NOW()
            WHERE upi_id = $1
            "#,
        )
        .bind(upi_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Updates the active flag; returns false if no such entry exists
    pub async fn set_active(pool: &PgPool, id: Uuid, active: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE payment_addresses
            SET active = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(active)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Hard delete. Historical transactions are unaffected; they reference
    /// the address by its string label.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM payment_addresses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
