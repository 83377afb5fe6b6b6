use thiserror::Error;

use super::domain::Role;
use crate::errors::ServiceError;

/// Business errors of the record store.
#[derive(Debug, Error)]
pub enum AcademyError {
    #[error("Invalid {} credentials", title(.0))]
    InvalidCredentials(Role),
    #[error("{}", duplicate_message(.0))]
    DuplicateKey(Role),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("malformed persisted state: {0}")]
    MalformedPersistedState(String),
    #[error("persistence failed: {0}")]
    Persistence(#[from] ServiceError),
}

fn title(role: &Role) -> &'static str {
    match role {
        Role::Admin => "Admin",
        Role::Candidate => "Candidate",
    }
}

fn duplicate_message(role: &Role) -> &'static str {
    match role {
        Role::Admin => "Admin ID already exists",
        Role::Candidate => "Application number already registered",
    }
}

impl AcademyError {
    pub fn admin_not_found() -> Self { Self::NotFound("Admin ID not found") }
    pub fn candidate_not_found() -> Self { Self::NotFound("Candidate not found") }
    pub fn user_not_found() -> Self { Self::NotFound("User not found") }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AcademyError::InvalidCredentials(_) => 2001,
            AcademyError::DuplicateKey(_) => 2002,
            AcademyError::NotFound(_) => 2003,
            AcademyError::MalformedPersistedState(_) => 2101,
            AcademyError::Persistence(_) => 2102,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_client_expectations() {
        assert_eq!(AcademyError::InvalidCredentials(Role::Admin).to_string(), "Invalid Admin credentials");
        assert_eq!(
            AcademyError::InvalidCredentials(Role::Candidate).to_string(),
            "Invalid Candidate credentials"
        );
        assert_eq!(AcademyError::DuplicateKey(Role::Admin).to_string(), "Admin ID already exists");
        assert_eq!(
            AcademyError::DuplicateKey(Role::Candidate).to_string(),
            "Application number already registered"
        );
        assert_eq!(AcademyError::user_not_found().to_string(), "User not found");
        assert_eq!(AcademyError::user_not_found().code(), 2003);
    }
}
