//! Password Service
//!
//! Argon2id hashing and verification of user passwords. Digests are PHC
//! strings, so the salt and cost parameters travel with each hash.

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;

use crate::error::{PlatformError, Result};

const DUMMY_PASSWORD: &str = "convene-timing-equalizer";

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Config {
    /// Memory cost in KiB
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl From<cv_config::Argon2Settings> for Argon2Config {
    fn from(settings: cv_config::Argon2Settings) -> Self {
        Self {
            memory_kib: settings.memory_kib,
            iterations: settings.iterations,
            parallelism: settings.parallelism,
        }
    }
}

pub struct PasswordService {
    argon2: Argon2<'static>,
    dummy_hash: String,
}

impl PasswordService {
    pub fn new(config: Argon2Config) -> Result<Self> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| PlatformError::Configuration {
                message: format!("invalid Argon2 parameters: {}", e),
            })?;

        let mut service = Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            dummy_hash: String::new(),
        };
        service.dummy_hash = service.hash_password(DUMMY_PASSWORD)?;
        Ok(service)
    }

    /// Hash with a fresh random salt; equal inputs give different digests.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PlatformError::HashingFailure { message: e.to_string() })
    }

    /// `Ok(false)` on mismatch; `CorruptCredential` when the stored digest
    /// cannot be parsed or checked.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| PlatformError::CorruptCredential { message: e.to_string() })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PlatformError::CorruptCredential { message: e.to_string() }),
        }
    }

    /// Spend one verification on a throwaway hash. Used when the account
    /// does not exist so both login failures cost the same.
    pub fn verify_dummy(&self, password: &str) {
        let _ = self.verify_password(password, &self.dummy_hash);
    }
}
