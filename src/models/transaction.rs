use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
}

impl TransactionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

/// One payment attempt. Rows start as `pending` and are finalized exactly
/// once via [`Transaction::finalize`]; they are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub txn_id: String,
    pub amount: Decimal,
    pub description: Option<String>,
    pub status: TransactionStatus,
    pub upi_id: String,
    pub qr_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateTransactionData {
    pub txn_id: String,
    pub amount: Decimal,
    pub description: Option<String>,
    pub upi_id: String,
    pub qr_code: String,
}

#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub status: Option<TransactionStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub limit: i64,
}

impl Transaction {
    /// Inserts a new pending transaction
    pub async fn create(pool: &PgPool, data: CreateTransactionData) -> Result<Self, sqlx::Error> {
        let transaction = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO transactions (txn_id, amount, description, upi_id, qr_code)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&data.txn_id)
        .bind(data.amount)
        .bind(&data.description)
        .bind(&data.upi_id)
        .bind(&data.qr_code)
        .fetch_one(pool)
        .await?;

        Ok(transaction)
    }

    /// Finds a transaction by its public identifier
    pub async fn find_by_txn_id(pool: &PgPool, txn_id: &str) -> Result<Option<Self>, sqlx::Error> {
        let transaction = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM transactions
            WHERE txn_id = $1
            "#,
        )
        .bind(txn_id)
        .fetch_optional(pool)
        .await?;

        Ok(transaction)
    }

    /// Moves a pending transaction to a terminal state as a single
    /// conditional UPDATE. Two racing callers cannot both win: the loser's
    /// statement matches zero rows and `None` comes back. Callers decide
    /// between "unknown txn" and "already finalized" with a follow-up read.
    pub async fn finalize(
        pool: &PgPool,
        txn_id: &str,
        status: TransactionStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let transaction = sqlx::query_as::<_, Self>(
            r#"
            UPDATE transactions
            SET status = $2, updated_at = NOW()
            WHERE txn_id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(txn_id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        Ok(transaction)
    }

    /// Lists the full ledger, newest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let transactions = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM transactions
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(transactions)
    }

    /// Lists transactions still awaiting reconciliation, newest first
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let transactions = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM transactions
            WHERE status = 'pending'
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(transactions)
    }

    /// Filtered ledger view for the admin history screen
    pub async fn history(pool: &PgPool, filter: HistoryFilter) -> Result<Vec<Self>, sqlx::Error> {
        let transactions = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM transactions
            WHERE ($1::transaction_status IS NULL OR status = $1)
              AND ($2::timestamptz IS NULL OR created_at >= $2)
              AND ($3::timestamptz IS NULL OR created_at <= $3)
            ORDER BY created_at DESC
            LIMIT $4
            "#,
        )
        .bind(filter.status)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(filter.limit)
        .fetch_all(pool)
        .await?;

        Ok(transactions)
    }
}
