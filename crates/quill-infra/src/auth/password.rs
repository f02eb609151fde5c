//! Password hashing for stored user credentials.

use argon2::Argon2;
use argon2::password_hash::{
    Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    rand_core::OsRng,
};

use quill_core::ports::{AuthError, PasswordService};

/// Argon2id with the crate's default cost parameters. Hashes are PHC
/// strings, so the salt and parameters travel with the stored value.
#[derive(Default)]
pub struct Argon2PasswordService {
    hasher: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = self
            .hasher
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;
        Ok(phc.to_string())
    }

    /// `Ok(false)` only for a wrong password; an unreadable stored hash is
    /// an error, not a mismatch.
    fn verify(&self, password: &str, stored: &str) -> Result<bool, AuthError> {
        let phc = PasswordHash::new(stored).map_err(|e| AuthError::HashingError(e.to_string()))?;

        match self.hasher.verify_password(password.as_bytes(), &phc) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(e) => Err(AuthError::HashingError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_accepts_only_the_original_password() {
        let passwords = Argon2PasswordService::new();
        let stored = passwords.hash("correct horse battery").unwrap();

        assert!(stored.starts_with("$argon2id$"));
        assert!(passwords.verify("correct horse battery", &stored).unwrap());
        assert!(!passwords.verify("correct horse battery!", &stored).unwrap());
    }

    #[test]
    fn test_each_hash_is_salted() {
        let passwords = Argon2PasswordService::new();

        let first = passwords.hash("password123").unwrap();
        let second = passwords.hash("password123").unwrap();

        assert_ne!(first, second);
        assert!(passwords.verify("password123", &second).unwrap());
    }

    #[test]
    fn test_unreadable_stored_hash_is_an_error() {
        let passwords = Argon2PasswordService::new();

        let result = passwords.verify("password123", "not-a-phc-string");

        assert!(matches!(result, Err(AuthError::HashingError(_))));
    }
}
