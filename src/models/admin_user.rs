use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "admin_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    SuperAdmin,
    SubAdmin,
}

/// An administrator account. Roles are fixed at creation time; there is no
/// promotion path.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminUser {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: AdminRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl AdminUser {
    /// Creates an administrator with an already-hashed password
    pub async fn create(
        pool: &PgPool,
        username: &str,
        password_hash: &str,
        role: AdminRole,
    ) -> Result<Self, sqlx::Error> {
        let admin = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO admin_users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .fetch_one(pool)
        .await?;

        Ok(admin)
    }

    /// Looks up an administrator by username, ignoring deactivated accounts
    pub async fn find_active_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let admin = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM admin_users
            WHERE username = $1 AND active = TRUE
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(admin)
    }

    /// Records a successful login
    pub async fn touch_last_login(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE admin_users
            SET last_login_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(())
    }
}
