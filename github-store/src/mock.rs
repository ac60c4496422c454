//! Mock user store for testing and local development.
//!
//! The `MockStore` holds the document in memory and enforces the same
//! sha check-and-swap contract as the GitHub contents API, allowing
//! tests to run without network access.
//!
//! # Example
//!
//! ```ignore
//! use github_store::{MockStore, UserStore};
//! use serde_json::json;
//!
//! let store = MockStore::with_document(json!([]), "abc123");
//! let document = store.read_users().await?;
//! let new_sha = store.write_users(&json!([{"name": "Alice"}]), &document.sha, "add alice").await?;
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::{Result, StoreError, UserDocument, UserStore};

/// Mock store that keeps the user list in memory.
///
/// Writes presenting a sha that no longer matches the current revision
/// fail with [`StoreError::RevisionMismatch`] and leave the document
/// untouched; the check and the swap happen under a single write lock,
/// so of two racing writers holding the same sha exactly one wins.
pub struct MockStore {
    state: RwLock<MockState>,
    read_calls: AtomicUsize,
    write_calls: AtomicUsize,
    next_sha: AtomicU64,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

struct MockState {
    users: Value,
    sha: String,
}

impl MockStore {
    /// Create a mock store holding an empty list.
    pub fn new() -> Self {
        Self::with_document(Value::Array(vec![]), "sha-0")
    }

    /// Create a mock store seeded with the given document and sha.
    pub fn with_document(users: Value, sha: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(MockState {
                users,
                sha: sha.into(),
            }),
            read_calls: AtomicUsize::new(0),
            write_calls: AtomicUsize::new(0),
            next_sha: AtomicU64::new(1),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Number of read calls the store has received.
    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    /// Number of write calls the store has received, including rejected ones.
    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    /// Snapshot of the currently stored document.
    pub fn current(&self) -> UserDocument {
        let state = self.state.read().unwrap();
        UserDocument {
            users: state.users.clone(),
            sha: state.sha.clone(),
        }
    }

    /// Make every subsequent read fail with a generic remote error.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail with a generic remote error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn generate_sha(&self) -> String {
        format!("mock-sha-{}", self.next_sha.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MockStore {
    async fn read_users(&self) -> Result<UserDocument> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Api {
                status: 500,
                message: "mock read failure".to_string(),
            });
        }

        Ok(self.current())
    }

    async fn write_users(&self, users: &Value, sha: &str, _message: &str) -> Result<String> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Api {
                status: 500,
                message: "mock write failure".to_string(),
            });
        }

        let mut state = self.state.write().unwrap();
        if state.sha != sha {
            return Err(StoreError::RevisionMismatch);
        }

        state.users = users.clone();
        state.sha = self.generate_sha();
        Ok(state.sha.clone())
    }
}
