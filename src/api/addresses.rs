use axum::{
    extract::{Path, State},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::middleware::auth::{AppState, SuperAdmin};
use crate::db;
use crate::error::{AppError, Result};
use crate::models::payment_address::PaymentAddress;

async fn list_addresses(
    SuperAdmin(_admin): SuperAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<PaymentAddress>>> {
    let addresses = PaymentAddress::list_all(&state.pool).await?;

    Ok(Json(addresses))
}

#[derive(Debug, Deserialize)]
struct CreateAddressRequest {
    upi_id: String,
}

async fn create_address(
    SuperAdmin(_admin): SuperAdmin,
    State(state): State<AppState>,
    Json(req): Json<CreateAddressRequest>,
) -> Result<Json<PaymentAddress>> {
    let upi_id = req.upi_id.trim();
    if upi_id.is_empty() {
        return Err(AppError::Validation("UPI ID is required".to_string()));
    }

    let address = PaymentAddress::create(&state.pool, upi_id)
        .await
        .map_err(|e| {
            if db::is_unique_violation(&e) {
                AppError::Conflict(format!("UPI ID {upi_id} already exists"))
            } else {
                e.into()
            }
        })?;

    tracing::info!(upi_id = %address.upi_id, "Created payment address");

    Ok(Json(address))
}

#[derive(Debug, Deserialize)]
struct BulkCreateRequest {
    upi_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
struct BulkItemResult {
    upi_id: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<PaymentAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct BulkCreateResponse {
    message: String,
    results: Vec<BulkItemResult>,
}

/// Best-effort batch creation: a failing entry is reported in its slot of
/// the results list and never aborts the rest of the batch.
async fn bulk_create_addresses(
    SuperAdmin(_admin): SuperAdmin,
    State(state): State<AppState>,
    Json(req): Json<BulkCreateRequest>,
) -> Result<Json<BulkCreateResponse>> {
    if req.upi_ids.is_empty() {
        return Err(AppError::Validation(
            "UPI IDs array is required".to_string(),
        ));
    }

    let mut results = Vec::with_capacity(req.upi_ids.len());
    for raw in req.upi_ids {
        let upi_id = raw.trim().to_string();
        let result = if upi_id.is_empty() {
            BulkItemResult {
                upi_id,
                status: "error",
                data: None,
                error: Some("UPI ID is required".to_string()),
            }
        } else {
            match PaymentAddress::create(&state.pool, &upi_id).await {
                Ok(address) => BulkItemResult {
                    upi_id,
                    status: "success",
                    data: Some(address),
                    error: None,
                },
                Err(e) => {
                    let error = if db::is_unique_violation(&e) {
                        "UPI ID already exists".to_string()
                    } else {
                        tracing::error!(upi_id = %upi_id, error = %e, "Bulk address creation failed");
                        "Database error".to_string()
                    };
                    BulkItemResult {
                        upi_id,
                        status: "error",
                        data: None,
                        error: Some(error),
                    }
                }
            }
        };
        results.push(result);
    }

    let created = results.iter().filter(|r| r.status == "success").count();
    tracing::info!(created, total = results.len(), "Bulk address creation completed");

    Ok(Json(BulkCreateResponse {
        message: "Bulk UPI ID creation completed".to_string(),
        results,
    }))
}

#[derive(Debug, Deserialize)]
struct ToggleRequest {
    active: bool,
}

async fn toggle_address(
    SuperAdmin(_admin): SuperAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ToggleRequest>,
) -> Result<Json<Value>> {
    let updated = PaymentAddress::set_active(&state.pool, id, req.active).await?;
    if !updated {
        return Err(AppError::NotFound(format!("UPI ID {id} not found")));
    }

    tracing::info!(address_id = %id, active = req.active, "Toggled payment address");

    Ok(Json(json!({ "message": "UPI ID status updated" })))
}

async fn delete_address(
    SuperAdmin(_admin): SuperAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    let deleted = PaymentAddress::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("UPI ID {id} not found")));
    }

    tracing::info!(address_id = %id, "Deleted payment address");

    Ok(Json(json!({ "message": "UPI ID deleted" })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin/upiids",
            get(list_addresses).post(create_address),
        )
        .route("/api/admin/upiids/bulk", post(bulk_create_addresses))
        .route("/api/admin/upiids/:id/toggle", patch(toggle_address))
        .route("/api/admin/upiids/:id", delete(delete_address))
}
