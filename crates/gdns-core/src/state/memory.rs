// # Memory State Store
//
// In-memory implementation of StateStore.
//
// ## Purpose
//
// Keeps managed resources for the lifetime of the process only. Useful for
// tests and for one-shot runs where the identifier is not needed later.
//
// ## Crash Behavior
//
// - All state is lost on exit
// - The registrar's record sets are unaffected; a later `import` rebuilds
//   the state from the domain identifier

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::state_store::{StateRecord, StateStore};

/// In-memory state store implementation
///
/// # Example
///
/// ```rust,no_run
/// use gdns_core::state::MemoryStateStore;
/// use gdns_core::traits::{StateRecord, StateStore};
/// use gdns_core::ResourceData;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryStateStore::new();
///
///     store.put("example", &StateRecord::new(ResourceData::new("example.com"))).await?;
///
///     let record = store.get("example").await?;
///     assert!(record.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStateStore {
    inner: Arc<RwLock<HashMap<String, StateRecord>>>,
}

impl MemoryStateStore {
    /// Create a new empty memory state store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, name: &str) -> Result<Option<StateRecord>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get(name).cloned())
    }

    async fn put(&self, name: &str, record: &StateRecord) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.insert(name.to_string(), record.clone());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.remove(name);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.keys().cloned().collect())
    }

    async fn flush(&self) -> Result<(), Error> {
        // Nothing buffered
        Ok(())
    }
}
