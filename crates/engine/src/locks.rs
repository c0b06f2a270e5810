// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-path async locks for serializing workspace initialization.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OwnedMutexGuard;

type LockMap = HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>;

/// Registry of locks keyed by path. Entries are dropped once nobody holds
/// or waits on them.
#[derive(Debug, Clone, Default)]
pub struct PathLocks {
    inner: Arc<Mutex<LockMap>>,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `path` within this process.
    pub async fn lock(&self, path: &Path) -> PathGuard {
        let lock = self.inner.lock().entry(path.to_path_buf()).or_default().clone();
        let guard = lock.lock_owned().await;
        PathGuard { locks: self.inner.clone(), path: path.to_path_buf(), guard: Some(guard) }
    }

    /// Number of paths with a live lock entry.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Held for the duration of one initialization.
pub struct PathGuard {
    locks: Arc<Mutex<LockMap>>,
    path: PathBuf,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for PathGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.locks.lock();
        if locks.get(&self.path).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(&self.path);
        }
    }
}

#[cfg(test)]
#[path = "locks_tests.rs"]
mod tests;
