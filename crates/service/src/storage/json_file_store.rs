use std::{
    ffi::OsString,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use models::StoreDocument;
use tokio::fs;
use tracing::debug;

use super::StateStorage;
use crate::errors::ServiceError;

/// Store document persisted as a single pretty-printed JSON file.
///
/// Writes go to a sibling `.tmp` file first and are renamed over the target,
/// so readers never observe a half-written document.
#[derive(Clone, Debug)]
pub struct JsonFileStorage {
    file_path: PathBuf,
}

impl JsonFileStorage {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name: OsString = self.file_path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }
}

#[async_trait]
impl StateStorage for JsonFileStorage {
    async fn load(&self) -> Result<Option<StoreDocument>, ServiceError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ServiceError::Malformed(format!(
                    "cannot read {}: {e}",
                    self.file_path.display()
                )))
            }
        };
        StoreDocument::from_json_slice(&bytes)
            .map(Some)
            .map_err(|e| ServiceError::Malformed(format!("{}: {e}", self.file_path.display())))
    }

    async fn save(&self, doc: &StoreDocument) -> Result<(), ServiceError> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ServiceError::storage("create data dir", e))?;
            }
        }
        let data = doc.to_pretty_json()?;
        let tmp = self.sibling(".tmp");
        fs::write(&tmp, &data)
            .await
            .map_err(|e| ServiceError::storage("write temp file", e))?;
        fs::rename(&tmp, &self.file_path)
            .await
            .map_err(|e| ServiceError::storage("replace data file", e))?;
        debug!(path = %self.file_path.display(), bytes = data.len(), "store persisted");
        Ok(())
    }

    async fn quarantine(&self) -> Result<Option<String>, ServiceError> {
        if fs::metadata(&self.file_path).await.is_err() {
            return Ok(None);
        }
        let target = self.sibling(&format!(".corrupt-{}", models::candidate::now_millis()));
        fs::rename(&self.file_path, &target)
            .await
            .map_err(|e| ServiceError::storage("quarantine data file", e))?;
        Ok(Some(target.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::CandidateAccount;

    fn temp_file() -> PathBuf {
        std::env::temp_dir()
            .join(format!("academy_store_{}", uuid::Uuid::new_v4()))
            .join("database.json")
    }

    #[tokio::test]
    async fn missing_file_loads_as_none() -> Result<(), anyhow::Error> {
        let storage = JsonFileStorage::new(temp_file());
        assert!(storage.load().await?.is_none());
        assert!(storage.quarantine().await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn save_then_load_reproduces_document() -> Result<(), anyhow::Error> {
        let path = temp_file();
        let storage = JsonFileStorage::new(&path);

        let mut doc = StoreDocument::seeded();
        let mut c = CandidateAccount::new("u_1".into(), "A100", "p1", 1);
        c.completed_techniques.push(serde_json::json!({"technique": "fade", "score": 9}));
        c.customer_sessions.push(serde_json::json!({"video": "AAAA"}));
        doc.users.push(c);
        storage.save(&doc).await?;

        let text = fs::read_to_string(&path).await?;
        assert!(text.contains("\n  \"admins\""), "expected pretty JSON, got {text}");
        assert!(fs::metadata(storage.sibling(".tmp")).await.is_err());

        let reloaded = JsonFileStorage::new(&path).load().await?;
        assert_eq!(reloaded, Some(doc));

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn garbage_is_malformed_and_can_be_quarantined() -> Result<(), anyhow::Error> {
        let path = temp_file();
        fs::create_dir_all(path.parent().unwrap()).await?;
        fs::write(&path, b"{\"admins\": [").await?;
        let storage = JsonFileStorage::new(&path);

        assert!(matches!(storage.load().await, Err(ServiceError::Malformed(_))));

        let moved = storage.quarantine().await?.expect("file moved");
        assert!(moved.contains(".corrupt-"));
        assert_eq!(fs::read(&moved).await?, b"{\"admins\": [");
        assert!(storage.load().await?.is_none());

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }
}
