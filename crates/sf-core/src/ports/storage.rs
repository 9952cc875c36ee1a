//! Browser-profile key-value storage port.

use super::errors::StorageError;

/// Synchronous string key-value storage scoped to one browser profile.
///
/// Used with a long-lived backing store for drafts and with a session-scoped
/// one for preview chrome state. Reads and writes never suspend.
pub trait KeyValueStoragePort: Send + Sync {
    /// Returns `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

