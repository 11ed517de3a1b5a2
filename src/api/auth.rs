use axum::{extract::State, routing::post, Json, Router};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::middleware::auth::AppState;
use crate::api::middleware::token;
use crate::db;
use crate::error::{AppError, Result};
use crate::models::admin_user::{AdminRole, AdminUser};
use crate::models::payment_address::PaymentAddress;
use crate::services::password;

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct AdminSummary {
    id: Uuid,
    username: String,
    role: AdminRole,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
    user: AdminSummary,
}

/// Exchanges credentials for a bearer token. Unknown usernames and wrong
/// passwords are indistinguishable to the caller.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let admin = AdminUser::find_active_by_username(&state.pool, &req.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !password::verify(&req.password, &admin.password_hash) {
        tracing::warn!(username = %req.username, "Failed login attempt");
        return Err(AppError::Unauthorized);
    }

    AdminUser::touch_last_login(&state.pool, admin.id).await?;

    let token = token::issue(state.config.jwt_secret.expose_secret().as_bytes(), &admin)
        .map_err(|e| AppError::Internal(e.into()))?;

    tracing::info!(username = %admin.username, role = ?admin.role, "Admin logged in");

    Ok(Json(LoginResponse {
        token,
        user: AdminSummary {
            id: admin.id,
            username: admin.username,
            role: admin.role,
        },
    }))
}

const SEED_ADMINS: [(&str, AdminRole); 2] = [
    ("superadmin", AdminRole::SuperAdmin),
    ("subadmin", AdminRole::SubAdmin),
];

const SEED_ADDRESSES: [&str; 4] = ["demo@ybl", "merchant@paytm", "shop@phonepe", "store@gpay"];

/// Demo bootstrap: two admin accounts (password "123456") and a handful of
/// pool addresses. Safe to call repeatedly; existing rows are left alone.
async fn seed(State(state): State<AppState>) -> Result<Json<Value>> {
    for (username, role) in SEED_ADMINS {
        let hashed = password::hash("123456")?;
        match AdminUser::create(&state.pool, username, &hashed, role).await {
            Ok(_) => tracing::info!(username, "Seeded admin account"),
            Err(e) if db::is_unique_violation(&e) => {}
            Err(e) => return Err(e.into()),
        }
    }

    for upi_id in SEED_ADDRESSES {
        match PaymentAddress::create(&state.pool, upi_id).await {
            Ok(_) => tracing::info!(upi_id, "Seeded payment address"),
            Err(e) if db::is_unique_violation(&e) => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(Json(json!({ "message": "Seed data created successfully" })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/login", post(login))
        .route("/api/seed", post(seed))
}
