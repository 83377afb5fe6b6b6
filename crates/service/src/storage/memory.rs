use async_trait::async_trait;
use models::StoreDocument;
use tokio::sync::Mutex;

use super::StateStorage;
use crate::errors::ServiceError;

#[derive(Default)]
struct Inner {
    bytes: Option<Vec<u8>>,
    quarantined: Vec<Vec<u8>>,
    fail_writes: bool,
    saves: usize,
}

/// In-memory stand-in for the data file, used by tests.
///
/// Content is kept as serialized bytes so loads go through the same parsing
/// path as the file adapter.
#[derive(Default)]
pub struct MemoryStorage {
    inner: Mutex<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload raw content, e.g. a truncated document.
    pub fn with_raw(bytes: impl Into<Vec<u8>>) -> Self {
        Self { inner: Mutex::new(Inner { bytes: Some(bytes.into()), ..Inner::default() }) }
    }

    pub fn with_document(doc: &StoreDocument) -> Result<Self, ServiceError> {
        Ok(Self::with_raw(doc.to_pretty_json()?))
    }

    /// Make every subsequent `save` fail.
    pub async fn set_fail_writes(&self, fail: bool) {
        self.inner.lock().await.fail_writes = fail;
    }

    pub async fn save_count(&self) -> usize {
        self.inner.lock().await.saves
    }

    pub async fn quarantined_count(&self) -> usize {
        self.inner.lock().await.quarantined.len()
    }

    /// The currently stored document, if any and if it parses.
    pub async fn stored(&self) -> Option<StoreDocument> {
        let inner = self.inner.lock().await;
        inner.bytes.as_deref().and_then(|b| StoreDocument::from_json_slice(b).ok())
    }
}

#[async_trait]
impl StateStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<StoreDocument>, ServiceError> {
        let inner = self.inner.lock().await;
        match inner.bytes.as_deref() {
            None => Ok(None),
            Some(b) => StoreDocument::from_json_slice(b)
                .map(Some)
                .map_err(|e| ServiceError::Malformed(e.to_string())),
        }
    }

    async fn save(&self, doc: &StoreDocument) -> Result<(), ServiceError> {
        let mut inner = self.inner.lock().await;
        if inner.fail_writes {
            return Err(ServiceError::Storage("simulated write failure".into()));
        }
        inner.bytes = Some(doc.to_pretty_json()?);
        inner.saves += 1;
        Ok(())
    }

    async fn quarantine(&self) -> Result<Option<String>, ServiceError> {
        let mut inner = self.inner.lock().await;
        match inner.bytes.take() {
            Some(b) => {
                inner.quarantined.push(b);
                Ok(Some(format!("memory://quarantine/{}", inner.quarantined.len())))
            }
            None => Ok(None),
        }
    }
}
