use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::admin_user::{AdminRole, AdminUser};

const TOKEN_TTL_HOURS: i64 = 24;

/// Bearer-token claims. The principal is re-fetched from the database on
/// every request, so a deactivated admin is locked out even with a live
/// token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username
    pub role: AdminRole,
    pub iat: i64,
    pub exp: i64,
}

pub fn issue(secret: &[u8], admin: &AdminUser) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: admin.username.clone(),
        role: admin.role,
        iat: now.timestamp(),
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
}

pub fn decode_claims(secret: &[u8], token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.leeway = 10;
    validation.validate_exp = true;
    validation.algorithms = vec![Algorithm::HS256];

    decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_admin(role: AdminRole) -> AdminUser {
        AdminUser {
            id: Uuid::new_v4(),
            username: "superadmin".to_string(),
            password_hash: String::new(),
            role,
            active: true,
            created_at: Utc::now(),
            last_login_at: None,
        }
    }

    #[test]
    fn test_issue_then_decode_roundtrip() {
        let secret = b"test-secret";
        let token = issue(secret, &test_admin(AdminRole::SuperAdmin)).unwrap();

        let claims = decode_claims(secret, &token).unwrap();
        assert_eq!(claims.sub, "superadmin");
        assert_eq!(claims.role, AdminRole::SuperAdmin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_role_survives_roundtrip() {
        let secret = b"test-secret";
        let token = issue(secret, &test_admin(AdminRole::SubAdmin)).unwrap();

        let claims = decode_claims(secret, &token).unwrap();
        assert_eq!(claims.role, AdminRole::SubAdmin);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue(b"right-secret", &test_admin(AdminRole::SubAdmin)).unwrap();

        assert!(decode_claims(b"wrong-secret", &token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let secret = b"test-secret";
        let now = Utc::now();
        let claims = Claims {
            sub: "superadmin".to_string(),
            role: AdminRole::SuperAdmin,
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap();

        assert!(decode_claims(secret, &token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(decode_claims(b"test-secret", "not.a.jwt").is_err());
    }
}
