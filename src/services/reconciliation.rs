use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, Result};
use crate::models::transaction::{Transaction, TransactionStatus};

/// Outcome reported by an external notifier. Only terminal states are
/// accepted; anything else is rejected before the ledger is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportedStatus {
    Success,
    Failed,
}

impl ReportedStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl From<ReportedStatus> for TransactionStatus {
    fn from(reported: ReportedStatus) -> Self {
        match reported {
            ReportedStatus::Success => TransactionStatus::Success,
            ReportedStatus::Failed => TransactionStatus::Failed,
        }
    }
}

/// The single transition rule every entry point converges on. The model's
/// conditional UPDATE only matches pending rows, so a transaction that two
/// triggers race over is finalized exactly once; the loser lands here with
/// zero rows and gets told why.
async fn apply_transition(
    pool: &PgPool,
    txn_id: &str,
    status: TransactionStatus,
) -> Result<Transaction> {
    match Transaction::finalize(pool, txn_id, status).await? {
        Some(transaction) => Ok(transaction),
        None => match Transaction::find_by_txn_id(pool, txn_id).await? {
            Some(_) => Err(AppError::AlreadyFinalized),
            None => Err(AppError::NotFound(format!(
                "Transaction {txn_id} not found"
            ))),
        },
    }
}

/// Admin-confirmed payment: pending -> success
pub async fn confirm(pool: &PgPool, txn_id: &str, acted_by: &str) -> Result<Transaction> {
    let transaction = apply_transition(pool, txn_id, TransactionStatus::Success).await?;

    tracing::info!(txn_id = %transaction.txn_id, acted_by = %acted_by, "Payment confirmed");

    Ok(transaction)
}

/// Admin-rejected payment: pending -> failed
pub async fn reject(pool: &PgPool, txn_id: &str, acted_by: &str) -> Result<Transaction> {
    let transaction = apply_transition(pool, txn_id, TransactionStatus::Failed).await?;

    tracing::info!(txn_id = %transaction.txn_id, acted_by = %acted_by, "Payment rejected");

    Ok(transaction)
}

/// Unauthenticated reconciliation path simulating a bank/SMS notification.
/// Returns the finalized transaction and an acknowledgement reference
/// (caller-supplied or generated).
pub async fn reconcile_from_notification(
    pool: &PgPool,
    txn_id: &str,
    reported_status: &str,
    reference: Option<String>,
) -> Result<(Transaction, String)> {
    let reported = ReportedStatus::parse(reported_status).ok_or_else(|| {
        AppError::Validation(format!("Invalid reported status: {reported_status}"))
    })?;

    let transaction = apply_transition(pool, txn_id, reported.into()).await?;
    let reference = reference.unwrap_or_else(|| format!("REF{}", Utc::now().timestamp_millis()));

    tracing::info!(
        txn_id = %transaction.txn_id,
        status = ?transaction.status,
        reference = %reference,
        "Transaction reconciled from external notification"
    );

    Ok((transaction, reference))
}

/// Status snapshot for client polling. Read-only, safe to call repeatedly.
#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub txn_id: String,
    pub status: TransactionStatus,
    pub amount: Decimal,
    pub updated_at: DateTime<Utc>,
}

pub async fn get_status(pool: &PgPool, txn_id: &str) -> Result<StatusView> {
    let transaction = Transaction::find_by_txn_id(pool, txn_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Transaction {txn_id} not found")))?;

    Ok(StatusView {
        txn_id: transaction.txn_id,
        status: transaction.status,
        amount: transaction.amount,
        updated_at: transaction.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reported_status_parses_terminal_states() {
        assert_eq!(
            ReportedStatus::parse("success"),
            Some(ReportedStatus::Success)
        );
        assert_eq!(ReportedStatus::parse("failed"), Some(ReportedStatus::Failed));
    }

    #[test]
    fn test_reported_status_rejects_everything_else() {
        assert_eq!(ReportedStatus::parse("pending"), None);
        assert_eq!(ReportedStatus::parse("SUCCESS"), None);
        assert_eq!(ReportedStatus::parse(""), None);
        assert_eq!(ReportedStatus::parse("refunded"), None);
    }

    #[test]
    fn test_reported_status_maps_to_transaction_status() {
        assert_eq!(
            TransactionStatus::from(ReportedStatus::Success),
            TransactionStatus::Success
        );
        assert_eq!(
            TransactionStatus::from(ReportedStatus::Failed),
            TransactionStatus::Failed
        );
        assert!(TransactionStatus::from(ReportedStatus::Failed).is_terminal());
    }
}
