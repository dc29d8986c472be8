//! Salted one-way password hashing (Argon2id, PHC string format).

use crate::types::{AppError, Result};
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Hashes and verifies passwords with Argon2id.
///
/// Every `hash` call draws a fresh random salt, so hashing the same input
/// twice never yields the same string. Construction performs one throwaway
/// hash: it validates the cost parameters up front and gives
/// [`verify_throwaway`](Self::verify_throwaway) a hash to burn cycles on.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
    dummy_hash: String,
}

impl PasswordHasher {
    /// Creates a hasher with the crate-default Argon2id cost parameters.
    pub fn new() -> Result<Self> {
        Self::with_params(Params::default())
    }

    /// Creates a hasher with explicit cost parameters.
    ///
    /// Rejected parameters (e.g. a memory cost below the Argon2 minimum)
    /// are a configuration fault and fail construction.
    pub fn tuned(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| AppError::Internal(format!("invalid Argon2 parameters: {}", e)))?;
        Self::with_params(params)
    }

    fn with_params(params: Params) -> Result<Self> {
        let mut hasher = Self {
            params,
            dummy_hash: String::new(),
        };
        // One real hash of a throwaway input; fails fast on bad parameters.
        hasher.dummy_hash = hasher.hash("throwaway")?;
        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a password, returning a PHC-formatted string.
    ///
    /// A hashing failure means the hasher itself is misconfigured and
    /// propagates; it is never mapped to a credential error.
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("failed to hash password: {}", e)))
    }

    /// Verifies a password against a stored PHC hash.
    ///
    /// A mismatch is `Ok(false)`, never an error. An unparseable stored
    /// hash means the store is corrupted and surfaces as an error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("stored password hash is invalid: {}", e)))?;

        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Runs a verification against a fixed throwaway hash and discards the
    /// result. Called when a login names an unknown account, so that path
    /// costs the same as checking a real password.
    pub fn verify_throwaway(&self, password: &str) {
        let _ = self.verify(password, &self.dummy_hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_produces_phc_string() {
        let hasher = PasswordHasher::new().expect("should build hasher");
        let password = "test_password_123";

        let hash = hasher.hash(password).expect("should hash password");

        // Hash should not equal the original password
        assert_ne!(hash, password);

        // Hash should be in PHC format (starts with $argon2)
        assert!(hash.starts_with("$argon2"), "hash should be in PHC format");
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let hasher = PasswordHasher::new().expect("should build hasher");

        let first = hasher.hash("repeated").expect("should hash");
        let second = hasher.hash("repeated").expect("should hash");

        assert_ne!(first, second, "fresh salt per call should change the hash");
    }

    #[test]
    fn test_verification_success() {
        let hasher = PasswordHasher::new().expect("should build hasher");
        let password = "secure_password_456";

        let hash = hasher.hash(password).expect("should hash password");
        let is_valid = hasher.verify(password, &hash).expect("should verify");

        assert!(is_valid, "correct password should verify successfully");
    }

    #[test]
    fn test_verification_failure_is_false_not_error() {
        let hasher = PasswordHasher::new().expect("should build hasher");

        let hash = hasher.hash("correct_password").expect("should hash");
        let is_valid = hasher
            .verify("wrong_password", &hash)
            .expect("mismatch should not be an error");

        assert!(!is_valid, "wrong password should fail verification");
    }

    #[test]
    fn test_corrupt_stored_hash_is_an_error() {
        let hasher = PasswordHasher::new().expect("should build hasher");

        let result = hasher.verify("anything", "not-a-phc-hash");

        assert!(result.is_err(), "garbage stored hash should surface");
    }

    #[test]
    fn test_rejected_cost_parameters_fail_construction() {
        // Memory cost below the Argon2 minimum.
        let result = PasswordHasher::tuned(1, 0, 0);

        assert!(result.is_err(), "bad parameters should fail construction");
    }

    #[test]
    fn test_throwaway_verification_runs() {
        let hasher = PasswordHasher::new().expect("should build hasher");
        hasher.verify_throwaway("whatever");
    }
}
