use thiserror::Error;

/// Storage-level failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Stored content exists but cannot be read back as a store document.
    #[error("malformed persisted state: {0}")]
    Malformed(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn storage(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Storage(format!("{context}: {err}"))
    }
}
