//! services/taskflow/src/state.rs
//!
//! Defines the application's shared state: every store, wired to one key-value
//! medium and one password hasher.

use crate::adapters::{Argon2PasswordHasher, FileStore, MemoryStore};
use crate::config::{Config, StorageBackend};
use crate::stores::{EventStore, FinanceStore, SessionStore, TaskStore};
use std::sync::Arc;
use taskflow_core::ports::{KeyValueStore, PasswordHasher, PortResult};
use tracing::info;

/// The shared application state, created once at startup and passed to all commands.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub tasks: TaskStore,
    pub events: EventStore,
    pub finance: FinanceStore,
}

impl AppState {
    /// Wires the stores to the backend named in the configuration.
    pub fn from_config(config: &Config) -> PortResult<Self> {
        let store: Arc<dyn KeyValueStore> = match config.storage {
            StorageBackend::File => {
                info!("Using file storage at {}", config.data_dir.display());
                Arc::new(FileStore::open(config.data_dir.clone())?)
            }
            StorageBackend::Memory => {
                info!("Using in-memory storage; nothing will be persisted");
                Arc::new(MemoryStore::new())
            }
        };
        Ok(Self::new(store, Arc::new(Argon2PasswordHasher::new())))
    }

    pub fn new(store: Arc<dyn KeyValueStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            sessions: SessionStore::new(store.clone(), hasher),
            tasks: TaskStore::new(store.clone()),
            events: EventStore::new(store.clone()),
            finance: FinanceStore::new(store),
        }
    }
}
