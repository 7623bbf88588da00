//! Password hashing
//!
//! bcrypt is CPU-bound, so both directions run under `spawn_blocking`.

use super::AuthError;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Reject passwords shorter than [`MIN_PASSWORD_LEN`].
pub fn check_strength(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

pub async fn hash(password: &str, cost: u32) -> Result<String, AuthError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

/// Check `password` against a stored hash. Malformed hashes count as a mismatch.
pub async fn verify(password: &str, hash: &str) -> Result<bool, AuthError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    let ok = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false)).await?;
    Ok(ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the tests fast
    const TEST_COST: u32 = 4;

    #[tokio::test]
    async fn hash_and_verify() {
        let hashed = hash("admin123", TEST_COST).await.unwrap();
        assert_ne!(hashed, "admin123");
        assert!(verify("admin123", &hashed).await.unwrap());
        assert!(!verify("wrong", &hashed).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_hash_is_mismatch() {
        assert!(!verify("admin123", "not-a-bcrypt-hash").await.unwrap());
    }

    #[test]
    fn short_passwords_rejected() {
        assert!(matches!(
            check_strength("abc"),
            Err(AuthError::WeakPassword { min: 6 })
        ));
        assert!(check_strength("visitor123").is_ok());
    }
}
