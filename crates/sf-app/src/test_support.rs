//! In-memory doubles shared by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use sf_core::ports::{ClockPort, KeyValueStoragePort, StorageError};

pub struct FixedClock(pub i64);

impl ClockPort for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
    failing: bool,
}

impl MemoryStorage {
    /// Storage whose every operation fails, like a disabled browser store.
    pub fn failing() -> Self {
        Self {
            values: Mutex::default(),
            failing: true,
        }
    }

    pub fn put(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

impl KeyValueStoragePort for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.failing {
            return Err(StorageError::Unavailable("disabled".to_string()));
        }
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failing {
            return Err(StorageError::Unavailable("disabled".to_string()));
        }
        self.put(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.failing {
            return Err(StorageError::Unavailable("disabled".to_string()));
        }
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}
