use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::middleware::auth::{AdminAuth, AppState};
use crate::error::Result;
use crate::models::transaction::TransactionStatus;
use crate::services::{payment_request, reconciliation};

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    amount: Decimal,
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    txn_id: String,
    amount: Decimal,
    upi_id: String,
    qr_code: String,
    status: TransactionStatus,
}

/// Creates a payment request and hands back the QR image to display
async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>> {
    let transaction =
        payment_request::create_request(&state.pool, &state.config, req.amount, req.description)
            .await?;

    Ok(Json(GenerateResponse {
        txn_id: transaction.txn_id,
        amount: transaction.amount,
        upi_id: transaction.upi_id,
        qr_code: transaction.qr_code,
        status: transaction.status,
    }))
}

/// Polling endpoint for the payer's browser
async fn status(
    State(state): State<AppState>,
    Path(txn_id): Path<String>,
) -> Result<Json<reconciliation::StatusView>> {
    let view = reconciliation::get_status(&state.pool, &txn_id).await?;

    Ok(Json(view))
}

async fn confirm(
    AdminAuth(admin): AdminAuth,
    State(state): State<AppState>,
    Path(txn_id): Path<String>,
) -> Result<Json<Value>> {
    reconciliation::confirm(&state.pool, &txn_id, &admin.username).await?;

    Ok(Json(json!({ "message": "Payment confirmed successfully" })))
}

async fn reject(
    AdminAuth(admin): AdminAuth,
    State(state): State<AppState>,
    Path(txn_id): Path<String>,
) -> Result<Json<Value>> {
    reconciliation::reject(&state.pool, &txn_id, &admin.username).await?;

    Ok(Json(json!({ "message": "Payment rejected successfully" })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/payment/generate", post(generate))
        .route("/api/payment/status/:txn_id", get(status))
        .route("/api/payment/confirm/:txn_id", post(confirm))
        .route("/api/payment/reject/:txn_id", post(reject))
}
