use axum::{extract::State, routing::post, Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::middleware::auth::AppState;
use crate::error::Result;
use crate::models::transaction::TransactionStatus;
use crate::services::reconciliation;

/// Payload of the simulated bank-SMS notifier. `amount` is part of the
/// simulator's message format but plays no role in reconciliation.
#[derive(Debug, Deserialize)]
struct SmsNotification {
    txn_id: String,
    status: String,
    amount: Option<Decimal>,
    bank_reference: Option<String>,
}

async fn sms(
    State(state): State<AppState>,
    Json(notification): Json<SmsNotification>,
) -> Result<Json<Value>> {
    tracing::info!(
        txn_id = %notification.txn_id,
        reported = %notification.status,
        amount = ?notification.amount,
        "SMS notification received"
    );

    let (transaction, reference) = reconciliation::reconcile_from_notification(
        &state.pool,
        &notification.txn_id,
        &notification.status,
        notification.bank_reference,
    )
    .await?;

    let message = match transaction.status {
        TransactionStatus::Success => "Payment confirmed via SMS webhook",
        _ => "Payment failed via SMS webhook",
    };

    Ok(Json(json!({
        "message": message,
        "txn_id": transaction.txn_id,
        "bank_reference": reference,
    })))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/webhook/sms", post(sms))
}
