// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! File-backed storage backend.
//!
//! The native analogue of browser local storage: a single JSON object of
//! string keys to string values. The file is re-read on every access so
//! that changes made by another process (another CLI invocation, say) are
//! observed on the next check.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{trace, warn};

use super::StorageBackend;
use crate::error::{StorageError, StorageResult};

/// A JSON-file key-value backend.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Creates a backend over `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StorageResult<BTreeMap<String, String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| StorageError::corrupt(&self.path, e.to_string()))
    }

    /// Loads the map for a write. A corrupt file is discarded so the write
    /// can replace it, and the flag is set; I/O errors still fail.
    fn load_for_write(&self) -> StorageResult<(BTreeMap<String, String>, bool)> {
        match self.load() {
            Ok(items) => Ok((items, false)),
            Err(StorageError::Corrupt { message, .. }) => {
                warn!(
                    path = %self.path.display(),
                    error = %message,
                    "Discarding corrupt storage file"
                );
                Ok((BTreeMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    /// Writes the map through a sibling temp file and a rename, so readers
    /// never observe a half-written file.
    fn save(&self, items: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
            }
        }

        let content = serde_json::to_string_pretty(items)
            .map_err(|e| StorageError::backend(e.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, content).map_err(|e| StorageError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StorageError::io(&self.path, e))?;

        trace!(path = %self.path.display(), keys = items.len(), "Storage file written");
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let (mut items, _) = self.load_for_write()?;
        items.insert(key.to_string(), value.to_string());
        self.save(&items)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let (mut items, discarded) = self.load_for_write()?;
        if items.remove(key).is_some() || discarded {
            self.save(&items)?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
