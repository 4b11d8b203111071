//! services/taskflow/src/adapters/password.rs
//!
//! This module contains the Argon2 adapter for the `PasswordHasher` port.
//! Hashes are salted PHC strings (`$argon2id$v=19$...`), so the parameters used
//! travel with every stored hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use taskflow_core::ports::{PasswordHasher, PortError, PortResult};
use tracing::error;

/// An adapter that implements the `PasswordHasher` port using Argon2id.
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Creates a hasher with the library's recommended parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a hasher with explicit cost parameters.
    pub fn with_params(memory_kib: u32, iterations: u32, parallelism: u32) -> PortResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| PortError::Unexpected(format!("invalid argon2 parameters: {}", e)))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> PortResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                error!("Failed to hash password: {:?}", e);
                PortError::Unexpected("failed to hash password".to_string())
            })?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> PortResult<bool> {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return Ok(false);
        };
        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => {
                error!("Failed to verify password: {:?}", e);
                Err(PortError::Unexpected("failed to verify password".to_string()))
            }
        }
    }
}
