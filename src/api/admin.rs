use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::middleware::auth::{AdminAuth, AppState, SuperAdmin};
use crate::db;
use crate::error::{AppError, Result};
use crate::models::admin_user::{AdminRole, AdminUser};
use crate::models::transaction::{HistoryFilter, Transaction, TransactionStatus};
use crate::services::analytics::{self, Period};
use crate::services::password;

async fn stats(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
) -> Result<Json<analytics::Stats>> {
    let stats = analytics::stats(&state.pool).await?;

    Ok(Json(stats))
}

#[derive(Debug, Deserialize)]
struct AnalyticsQuery {
    period: Option<String>,
}

async fn analytics_summary(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<analytics::Summary>> {
    let period = Period::parse(query.period.as_deref().unwrap_or("7d"));
    let end = Utc::now();
    let summary = analytics::summarize(&state.pool, period.start_from(end), end).await?;

    Ok(Json(summary))
}

async fn list_transactions(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Transaction>>> {
    let transactions = Transaction::list_all(&state.pool).await?;

    Ok(Json(transactions))
}

async fn pending_transactions(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Transaction>>> {
    let transactions = Transaction::list_pending(&state.pool).await?;

    Ok(Json(transactions))
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    status: Option<TransactionStatus>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    limit: Option<i64>,
}

async fn transaction_history(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<Transaction>>> {
    let limit = query.limit.unwrap_or(50);
    if limit <= 0 {
        return Err(AppError::Validation(
            "limit must be a positive number".to_string(),
        ));
    }

    let transactions = Transaction::history(
        &state.pool,
        HistoryFilter {
            status: query.status,
            start_date: query.start_date,
            end_date: query.end_date,
            limit,
        },
    )
    .await?;

    Ok(Json(transactions))
}

#[derive(Debug, Deserialize)]
struct CreateSubAdminRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct CreateSubAdminResponse {
    id: Uuid,
    username: String,
    role: AdminRole,
    created_at: DateTime<Utc>,
}

/// Creates a sub-admin principal. The role is fixed here; there is no
/// endpoint that changes it later.
async fn create_subadmin(
    SuperAdmin(_admin): SuperAdmin,
    State(state): State<AppState>,
    Json(req): Json<CreateSubAdminRequest>,
) -> Result<Json<CreateSubAdminResponse>> {
    let username = req.username.trim();
    if username.is_empty() {
        return Err(AppError::Validation("Username is required".to_string()));
    }
    if req.password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }

    let hashed = password::hash(&req.password)?;

    let sub_admin = AdminUser::create(&state.pool, username, &hashed, AdminRole::SubAdmin)
        .await
        .map_err(|e| {
            if db::is_unique_violation(&e) {
                AppError::Conflict("Username already exists".to_string())
            } else {
                e.into()
            }
        })?;

    tracing::info!(username = %sub_admin.username, "Created sub-admin account");

    Ok(Json(CreateSubAdminResponse {
        id: sub_admin.id,
        username: sub_admin.username,
        role: sub_admin.role,
        created_at: sub_admin.created_at,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/stats", get(stats))
        .route("/api/admin/analytics", get(analytics_summary))
        .route("/api/admin/transactions", get(list_transactions))
        .route("/api/admin/transactions/pending", get(pending_transactions))
        .route("/api/admin/transactions/history", get(transaction_history))
        .route("/api/admin/subadmins", post(create_subadmin))
}
