use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("encode error: {0}")]
    Encode(String),
    #[error("duplicate admin id `{0}`")]
    DuplicateAdminId(String),
    #[error("duplicate candidate id `{0}`")]
    DuplicateCandidateId(String),
    #[error("duplicate application number `{0}`")]
    DuplicateApplicationNumber(String),
}
