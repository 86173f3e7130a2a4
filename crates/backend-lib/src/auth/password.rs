// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use rand::{rngs::OsRng, TryRngCore};
use scrypt::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};
use zeroize::Zeroize;

use super::AuthError;

/// Default scrypt cost (`log_n`)
pub const DEFAULT_PASSWORD_COST: u8 = 17;

/// Lowest cost accepted from configuration
pub const MIN_PASSWORD_COST: u8 = 10;

const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;
const SCRYPT_OUTPUT_LEN: usize = 32;
const SALT_BYTES: usize = 16;

/// Salted one-way password digests
#[derive(Debug, Clone, Copy)]
pub struct PasswordCredential {
    cost: u8,
}

impl Default for PasswordCredential {
    fn default() -> Self {
        Self::new(DEFAULT_PASSWORD_COST)
    }
}

impl PasswordCredential {
    /// Create a hasher with the given scrypt `log_n`
    pub fn new(cost: u8) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u8 {
        self.cost
    }

    /// Hash a password into a PHC string with a fresh random salt
    pub fn hash(&self, plain: &str) -> Result<String, AuthError> {
        let params = Params::new(self.cost, SCRYPT_R, SCRYPT_P, SCRYPT_OUTPUT_LEN)
            .map_err(|e| AuthError::HashFailure(format!("invalid scrypt params: {e}")))?;

        let mut salt_bytes = [0u8; SALT_BYTES];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|e| AuthError::HashFailure(format!("salt generation: {e}")))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| AuthError::HashFailure(format!("salt encoding: {e}")))?;

        let hash = Scrypt
            .hash_password_customized(plain.as_bytes(), None, None, params, &salt)
            .map_err(|e| AuthError::HashFailure(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    /// Verify a password against a stored digest.
    ///
    /// The cost parameters are read from the digest, so hashes made at an
    /// older cost keep verifying. A digest that does not parse is treated as
    /// a mismatch.
    pub fn verify(&self, hash: &str, plain: &str) -> Result<(), AuthError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::CredentialMismatch)?;
        Scrypt
            .verify_password(plain.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::CredentialMismatch)
    }
}

/// Hash a password and zeroize the original
pub fn hash_password_secure(
    credential: &PasswordCredential,
    plain: &mut String,
) -> Result<String, AuthError> {
    let hash = credential.hash(plain);
    plain.zeroize();
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    // Cheap cost so the suite stays fast
    fn credential() -> PasswordCredential {
        PasswordCredential::new(MIN_PASSWORD_COST)
    }

    #[test]
    fn test_hash_then_verify() {
        let c = credential();
        let hash = c.hash("Thisismypassword").unwrap();

        assert!(c.verify(&hash, "Thisismypassword").is_ok());
        assert!(matches!(
            c.verify(&hash, "Thisismypasswordx"),
            Err(AuthError::CredentialMismatch)
        ));
    }

    #[test]
    fn test_digest_does_not_contain_plaintext() {
        let hash = credential().hash("hunter2hunter2").unwrap();
        assert_ne!(hash, "hunter2hunter2");
        assert!(!hash.contains("hunter2hunter2"));
        assert!(hash.starts_with("$scrypt$"));
    }

    #[test]
    fn test_salts_differ() {
        let c = credential();
        let a = c.hash("same password").unwrap();
        let b = c.hash("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_digest_is_mismatch() {
        let c = credential();
        assert!(matches!(
            c.verify("not-a-hash", "pw"),
            Err(AuthError::CredentialMismatch)
        ));
        assert!(matches!(c.verify("", "pw"), Err(AuthError::CredentialMismatch)));
    }

    #[test]
    fn test_verify_reads_cost_from_digest() {
        let hash = PasswordCredential::new(MIN_PASSWORD_COST + 1)
            .hash("correct horse")
            .unwrap();
        assert!(credential().verify(&hash, "correct horse").is_ok());
    }

    #[test]
    fn test_unsatisfiable_cost_is_hash_failure() {
        let err = PasswordCredential::new(64).hash("pw").unwrap_err();
        assert!(matches!(err, AuthError::HashFailure(_)));
    }

    #[test]
    fn test_secure_hash_wipes_input() {
        let mut plain = String::from("wipe me please");
        let hash = hash_password_secure(&credential(), &mut plain).unwrap();
        assert!(plain.is_empty());
        assert!(credential().verify(&hash, "wipe me please").is_ok());
    }
}
