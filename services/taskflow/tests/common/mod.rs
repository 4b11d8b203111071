#![allow(dead_code)]

use std::sync::Arc;
use taskflow_core::ports::{KeyValueStore, PasswordHasher, PortError, PortResult};
use taskflow_lib::adapters::MemoryStore;

/// Reversible stand-in for a real password hash; keeps store tests fast.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> PortResult<String> {
        Ok(format!("plain${}", password))
    }

    fn verify(&self, password: &str, hash: &str) -> PortResult<bool> {
        Ok(hash.strip_prefix("plain$") == Some(password))
    }
}

/// Reads succeed as "absent"; every write or read error is injected.
pub struct BrokenStore {
    pub fail_reads: bool,
}

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> PortResult<Option<String>> {
        if self.fail_reads {
            Err(PortError::Storage("device unavailable".to_string()))
        } else {
            Ok(None)
        }
    }

    fn set(&self, _key: &str, _value: &str) -> PortResult<()> {
        Err(PortError::Storage("disk full".to_string()))
    }

    fn remove(&self, _key: &str) -> PortResult<()> {
        Err(PortError::Storage("disk full".to_string()))
    }
}

pub fn memory() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

/// A working in-memory store that refuses writes to one key.
pub struct KeyFailingStore {
    pub inner: MemoryStore,
    pub failing_key: &'static str,
}

impl KeyFailingStore {
    pub fn new(failing_key: &'static str) -> Self {
        Self {
            inner: MemoryStore::new(),
            failing_key,
        }
    }
}

impl KeyValueStore for KeyFailingStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        if key == self.failing_key {
            return Err(PortError::Storage("quota exceeded".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        self.inner.remove(key)
    }
}
