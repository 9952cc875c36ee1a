use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use sf_core::ports::{KeyValueStoragePort, StorageError};
use tracing::{debug, warn};

/// Key-value storage persisted as one JSON object on disk.
///
/// Values are held in memory and the whole map is rewritten on every change,
/// so the file always holds either the previous or the new complete state.
///
/// 以单个 JSON 对象持久化的键值存储；每次修改整体原子写入。
pub struct FileKeyValueStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileKeyValueStore {
    /// Open the store at `path`.
    ///
    /// A missing file starts empty. An unreadable JSON document is logged and
    /// also starts empty; draft values are validated on every read anyway.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(values) => values,
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "storage file is corrupt; starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("read storage file failed: {}", path.display()))
            }
        };
        debug!(path = %path.display(), entries = values.len(), "storage file opened");

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Every stored key, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn atomic_write(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("create storage dir failed: {}", dir.display()))?;
        }

        let content = serde_json::to_string_pretty(values).context("serialize storage failed")?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("write temp storage failed: {}", tmp_path.display()))?;

        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "rename temp storage to target failed: {} -> {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;
        Ok(())
    }

    /// Apply `change` to a copy, persist it, then commit it in memory.
    fn update(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StorageError> {
        let mut values = self.lock();
        let mut next = values.clone();
        change(&mut next);
        if next == *values {
            return Ok(());
        }
        self.atomic_write(&next)
            .map_err(|err| StorageError::Io(format!("{err:#}")))?;
        *values = next;
        Ok(())
    }
}

impl KeyValueStoragePort for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|values| {
            values.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|values| {
            values.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::open(dir.path().join("drafts.json")).unwrap();

        assert_eq!(store.get("draft.about").unwrap(), None);
        assert!(store.keys().is_empty());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("drafts.json");

        let store = FileKeyValueStore::open(&path).unwrap();
        store.set("draft.project.p1", r#"{"payload":{}}"#).unwrap();
        store.set("draft.about", "x").unwrap();
        store.remove("draft.about").unwrap();
        drop(store);

        let reopened = FileKeyValueStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("draft.project.p1").unwrap().as_deref(),
            Some(r#"{"payload":{}}"#)
        );
        assert_eq!(reopened.get("draft.about").unwrap(), None);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("drafts.json");
        fs::write(&path, "not json").unwrap();

        let store = FileKeyValueStore::open(&path).unwrap();

        assert!(store.keys().is_empty());
        store.set("k", "v").unwrap();
        assert_eq!(FileKeyValueStore::open(&path).unwrap().keys(), vec!["k"]);
    }

    #[test]
    fn failed_write_keeps_previous_state() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be makes the rename fail.
        let path = dir.path().join("drafts.json");
        fs::create_dir_all(path.join("occupied")).unwrap();
        let store = FileKeyValueStore {
            path: path.clone(),
            values: Mutex::new(BTreeMap::new()),
        };

        let result = store.set("k", "v");

        assert!(matches!(result, Err(StorageError::Io(_))));
        assert_eq!(store.get("k").unwrap(), None);
    }
}
