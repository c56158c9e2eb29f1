//! Admin password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::config::PasswordConfig;
use crate::errors::Error;

/// Argon2 hashing parameters.
#[derive(Debug, Clone, Copy)]
pub struct Argon2Params {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Argon2Params {
    fn to_argon2(self) -> Result<Argon2<'static>, Error> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None).map_err(|e| Error::Internal {
            operation: format!("create argon2 params: {e}"),
        })?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 19456, // 19 MB
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl From<&PasswordConfig> for Argon2Params {
    fn from(config: &PasswordConfig) -> Self {
        Self {
            memory_kib: config.argon2_memory_kib,
            iterations: config.argon2_iterations,
            parallelism: config.argon2_parallelism,
        }
    }
}

/// Hash a password into an Argon2id PHC string.
pub fn hash_password_with_params(password: &str, params: Argon2Params) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = params.to_argon2()?;

    let hash = argon2.hash_password(password.as_bytes(), &salt).map_err(|e| Error::Internal {
        operation: format!("hash password: {e}"),
    })?;

    Ok(hash.to_string())
}

/// Hash a password with the default parameters.
pub fn hash_password(password: &str) -> Result<String, Error> {
    hash_password_with_params(password, Argon2Params::default())
}

/// Check a password against a stored PHC string.
///
/// Verification uses the parameters embedded in the hash, so hashes made with older settings
/// keep working after the configured cost changes.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, Error> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| Error::Internal {
        operation: format!("parse password hash: {e}"),
    })?;

    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Small cost so the tests stay fast
    const CHEAP: Argon2Params = Argon2Params {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    };

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password_with_params("hemligt-lösenord", CHEAP).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hemligt-lösenord", &hash).unwrap());
        assert!(!verify_password("fel-lösenord", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let first = hash_password_with_params("same_password", CHEAP).unwrap();
        let second = hash_password_with_params("same_password", CHEAP).unwrap();

        assert_ne!(first, second);
        assert!(verify_password("same_password", &first).unwrap());
        assert!(verify_password("same_password", &second).unwrap());
    }

    #[test]
    fn test_default_params_hash_verifies() {
        let hash = hash_password("password123").unwrap();
        assert!(hash.contains("m=19456,t=2,p=1"));
        assert!(verify_password("password123", &hash).unwrap());
    }

    #[test]
    fn test_params_from_config() {
        let params = Argon2Params::from(&PasswordConfig {
            argon2_memory_kib: 2048,
            argon2_iterations: 3,
            ..Default::default()
        });
        let hash = hash_password_with_params("x", params).unwrap();
        assert!(hash.contains("m=2048,t=3,p=1"));
    }

    #[test]
    fn test_plaintext_is_not_a_hash() {
        assert!(verify_password("password123", "password123").is_err());
    }
}
