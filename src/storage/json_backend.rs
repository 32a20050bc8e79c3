use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::core::utils::{ensure_dir, write_atomic, PathResolver};

use super::{KeyValueStore, Result};

const BLOB_EXTENSION: &str = "json";

/// Key-value store writing one JSON file per key under `<base>/store`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
    store_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = PathResolver::resolve_base(root);
        ensure_dir(&root)?;
        let store_dir = PathResolver::store_dir_in(&root);
        ensure_dir(&store_dir)?;
        Ok(Self { root, store_dir })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn blob_path(&self, key: &str) -> PathBuf {
        self.store_dir
            .join(format!("{}.{}", canonical_key(key), BLOB_EXTENSION))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.blob_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.blob_path(key);
        write_atomic(&path, value)?;
        debug!(key, path = %path.display(), bytes = value.len(), "stored blob");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.blob_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Maps a storage key onto a safe file stem. Distinct keys that differ only
/// in punctuation collapse together, which the fixed key set never does.
fn canonical_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for ch in key.trim().chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_') {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    if out.is_empty() {
        out.push('_');
    }
    out
}
