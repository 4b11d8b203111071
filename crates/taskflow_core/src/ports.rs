//! crates/taskflow_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete persistence medium and password scheme.

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the underlying medium (files, memory, ...).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Storage failure: {0}")]
    Storage(String),
    #[error("Malformed stored data: {0}")]
    Serialization(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// A synchronous string-keyed store of string values.
///
/// Every collection the application owns is one JSON document under one key.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value under `key`, or `None` when the key is absent.
    fn get(&self, key: &str) -> PortResult<Option<String>>;

    /// Overwrites the value under `key`.
    fn set(&self, key: &str, value: &str) -> PortResult<()>;

    /// Deletes `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> PortResult<()>;
}

pub trait PasswordHasher: Send + Sync {
    /// Produces a salted, self-describing hash of `password`.
    fn hash(&self, password: &str) -> PortResult<String>;

    /// Checks `password` against a hash produced by `hash`.
    /// A malformed stored hash yields `Ok(false)`.
    fn verify(&self, password: &str, hash: &str) -> PortResult<bool>;
}
