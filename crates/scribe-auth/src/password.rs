//! Argon2id password hashing

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(plain.as_bytes(), &salt)?
        .to_string())
}

/// Verify a plaintext password against a stored PHC-format hash.
///
/// An unparseable stored hash counts as a failed verification rather
/// than an error; callers only care whether the credentials match.
pub fn verify_password(stored: &str, plain: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("changeit").unwrap();
        assert!(verify_password(&hash, "changeit"));
        assert!(!verify_password(&hash, "changeit2"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("changeit").unwrap();
        let b = hash_password("changeit").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_stored_hash_fails_closed() {
        assert!(!verify_password("not-a-phc-string", "changeit"));
    }
}
