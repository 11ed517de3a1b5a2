use argon2::{
    password_hash::{PasswordHash, PasswordHasher, SaltString},
    Argon2, PasswordVerifier,
};

/// Hashes a password with a fresh random salt
pub fn hash(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hashed = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;

    Ok(hashed.to_string())
}

/// Verifies a password against a stored hash. An unparseable hash counts as
/// a failed verification rather than an error.
pub fn verify(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hashed = hash("s3cret-pass").unwrap();

        assert!(verify("s3cret-pass", &hashed));
        assert!(!verify("wrong-pass", &hashed));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash("same-password").unwrap();
        let b = hash("same-password").unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_fails_closed() {
        assert!(!verify("anything", "not-a-phc-string"));
    }
}
