//! JSON document helpers shared by the stores.

use serde::{de::DeserializeOwned, Serialize};
use taskflow_core::ports::{KeyValueStore, PortError, PortResult};
use tracing::{error, warn};

/// Reads and decodes the document under `key`. An absent key is `Ok(None)`.
pub(crate) fn read<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> PortResult<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| PortError::Serialization(format!("{}: {}", key, e)))
}

/// Like `read`, but any failure is logged and replaced by the default value.
pub(crate) fn read_or_default<T: DeserializeOwned + Default>(
    store: &dyn KeyValueStore,
    key: &str,
) -> T {
    match read(store, key) {
        Ok(value) => value.unwrap_or_default(),
        Err(e) => {
            warn!(key, error = %e, "unreadable document, using an empty value");
            T::default()
        }
    }
}

/// Encodes and overwrites the document under `key`. Failures are logged and returned.
pub(crate) fn write<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> PortResult<()> {
    let encoded = serde_json::to_string(value)
        .map_err(|e| PortError::Serialization(format!("{}: {}", key, e)))?;
    store.set(key, &encoded).map_err(|e| {
        error!(key, error = %e, "failed to write document");
        e
    })
}
