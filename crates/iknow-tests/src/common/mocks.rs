// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! # Mock Implementations
//!
//! Storage backends for exercising the token store in isolation.
//!
//! - [`CountingStorage`] records how often each operation ran
//! - [`FailingStorage`] fails selected operations on demand

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use iknow_auth::{MemoryStorage, StorageBackend, StorageError, StorageResult};

// =============================================================================
// Counting Storage
// =============================================================================

/// A memory backend that counts every call.
#[derive(Debug, Default)]
pub struct CountingStorage {
    inner: MemoryStorage,
    gets: AtomicU64,
    sets: AtomicU64,
    removes: AtomicU64,
}

impl CountingStorage {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `get_item` calls.
    pub fn get_count(&self) -> u64 {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of `set_item` calls.
    pub fn set_count(&self) -> u64 {
        self.sets.load(Ordering::SeqCst)
    }

    /// Number of `remove_item` calls.
    pub fn remove_count(&self) -> u64 {
        self.removes.load(Ordering::SeqCst)
    }

    /// Number of mutating calls.
    pub fn mutation_count(&self) -> u64 {
        self.set_count() + self.remove_count()
    }
}

impl StorageBackend for CountingStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove_item(key)
    }
}

// =============================================================================
// Failing Storage
// =============================================================================

/// A memory backend whose operations can be switched to fail.
#[derive(Debug, Default)]
pub struct FailingStorage {
    inner: MemoryStorage,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_removes: AtomicBool,
}

impl FailingStorage {
    /// Creates a backend that does not fail yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every read fail.
    pub fn fail_reads(&self, enabled: bool) {
        self.fail_reads.store(enabled, Ordering::SeqCst);
    }

    /// Makes every write fail.
    pub fn fail_writes(&self, enabled: bool) {
        self.fail_writes.store(enabled, Ordering::SeqCst);
    }

    /// Makes every removal fail.
    pub fn fail_removes(&self, enabled: bool) {
        self.fail_removes.store(enabled, Ordering::SeqCst);
    }

    /// Reads a key directly, bypassing the failure switches.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner.get_item(key).ok().flatten()
    }
}

impl StorageBackend for FailingStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::backend("simulated read failure"));
        }
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::backend("simulated write failure"));
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(StorageError::backend("simulated remove failure"));
        }
        self.inner.remove_item(key)
    }
}
