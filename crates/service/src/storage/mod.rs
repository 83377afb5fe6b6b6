//! Storage port for the record store.
//!
//! The whole store is one document; adapters only ever load it whole and
//! overwrite it whole.

pub mod json_file_store;
pub mod memory;

use async_trait::async_trait;
use models::StoreDocument;

use crate::errors::ServiceError;

pub use json_file_store::JsonFileStorage;
pub use memory::MemoryStorage;

#[async_trait]
pub trait StateStorage: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet; `ServiceError::Malformed`
    /// when something is stored but cannot be parsed.
    async fn load(&self) -> Result<Option<StoreDocument>, ServiceError>;

    /// Replace the stored document.
    async fn save(&self, doc: &StoreDocument) -> Result<(), ServiceError>;

    /// Move unreadable content out of the way. Returns a description of where
    /// it went, or `None` if there was nothing to move.
    async fn quarantine(&self) -> Result<Option<String>, ServiceError>;
}
