// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Storage backend trait.

use std::fmt::Debug;

use crate::error::StorageResult;

/// A string key-value store with browser local-storage semantics.
///
/// Each call is atomic at this boundary; the auth core runs single-threaded
/// and needs no further locking.
pub trait StorageBackend: Send + Sync + Debug {
    /// Returns `false` when the execution environment has no persistent
    /// storage at all. The token store then reads absent and ignores writes.
    fn is_available(&self) -> bool {
        true
    }

    /// Returns the value stored under `key`.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, overwriting any previous value.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`. Removing a missing key succeeds.
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

/// Backend for contexts without persistent storage, such as server
/// rendering before hydration.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStorage;

impl StorageBackend for UnavailableStorage {
    fn is_available(&self) -> bool {
        false
    }

    fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
        Ok(None)
    }

    fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Ok(())
    }

    fn remove_item(&self, _key: &str) -> StorageResult<()> {
        Ok(())
    }
}
