use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::api::middleware::token;
use crate::config::Config;
use crate::error::AppError;
use crate::models::admin_user::{AdminRole, AdminUser};

/// Application state shared by every router
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> PgPool {
        state.pool.clone()
    }
}

/// Extractor that authenticates an admin request: parses the bearer token,
/// validates the claims and re-fetches the active principal row. Either
/// role passes; use [`SuperAdmin`] where the route needs more.
pub struct AdminAuth(pub AdminUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let raw_token = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let claims = token::decode_claims(
            state.config.jwt_secret.expose_secret().as_bytes(),
            raw_token,
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::Unauthorized
        })?;

        let admin = AdminUser::find_active_by_username(&state.pool, &claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(AdminAuth(admin))
    }
}

/// Extractor for routes restricted to super admins. Insufficient role is a
/// distinct failure (403) from a missing or invalid token (401).
pub struct SuperAdmin(pub AdminUser);

#[async_trait]
impl FromRequestParts<AppState> for SuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AdminAuth(admin) = AdminAuth::from_request_parts(parts, state).await?;

        if admin.role != AdminRole::SuperAdmin {
            return Err(AppError::Forbidden);
        }

        Ok(SuperAdmin(admin))
    }
}
