// # State Store Trait
//
// Defines the interface for persisting managed resources between calls.
//
// ## Purpose
//
// The registrar owns the record set. What has to survive between lifecycle
// calls is the caller-side view of each managed resource:
// - The resource identifier (the registrar's domain ID)
// - The last known declarative state
// - When it was last written
//
// This makes import and later reads possible without re-declaring the
// domain.
//
// ## Usage
//
// ```rust,ignore
// use gdns_core::{ResourceData, StateRecord, StateStore};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let store = /* StateStore implementation */;
//
//     store.put("example", &StateRecord::new(ResourceData::new("example.com"))).await?;
//     let record = store.get("example").await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::desired::ResourceData;

/// Persisted state of one managed resource
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StateRecord {
    /// Declarative state, including the resource identifier
    pub data: ResourceData,
    /// Timestamp of the last write
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

impl StateRecord {
    /// Create a state record stamped with the current time
    pub fn new(data: ResourceData) -> Self {
        Self {
            data,
            last_updated: chrono::Utc::now(),
        }
    }

    /// Resource identifier, if one has been resolved
    pub fn id(&self) -> Option<&str> {
        self.data.id()
    }
}

/// Trait for state store implementations
///
/// All methods must be safe to call concurrently from multiple tasks.
///
/// # Implementation Guidelines
///
/// - **Async I/O only**: never block the runtime
/// - **Explicit flush**: `flush()` must persist all pending changes
/// - **No business logic**: the store never talks to the registrar
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Get the state of a resource
    ///
    /// # Returns
    ///
    /// - `Ok(Some(StateRecord))`: The stored state
    /// - `Ok(None)`: Resource not managed
    /// - `Err(Error)`: Storage error
    async fn get(&self, name: &str) -> Result<Option<StateRecord>, crate::Error>;

    /// Create or replace the state of a resource
    async fn put(&self, name: &str, record: &StateRecord) -> Result<(), crate::Error>;

    /// Forget a resource (no error if it was not stored)
    async fn delete(&self, name: &str) -> Result<(), crate::Error>;

    /// List all resource names in the store
    async fn list(&self) -> Result<Vec<String>, crate::Error>;

    /// Persist any pending changes
    async fn flush(&self) -> Result<(), crate::Error>;
}
