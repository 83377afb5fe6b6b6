use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::admin::AdminAccount;
use crate::candidate::CandidateAccount;
use crate::errors::ModelError;

/// The whole persisted state: one JSON document with `admins` and `users`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub admins: Vec<AdminAccount>,
    #[serde(default)]
    pub users: Vec<CandidateAccount>,
}

impl StoreDocument {
    /// Fresh store: one seeded admin, no candidates.
    pub fn seeded() -> Self {
        Self { admins: vec![AdminAccount::seed()], users: Vec::new() }
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        serde_json::from_slice(bytes).map_err(|e| ModelError::Parse(e.to_string()))
    }

    /// Pretty-printed so the file stays readable by hand.
    pub fn to_pretty_json(&self) -> Result<Vec<u8>, ModelError> {
        serde_json::to_vec_pretty(self).map_err(|e| ModelError::Encode(e.to_string()))
    }

    /// Checks the uniqueness invariants on admin ids, candidate ids and
    /// application numbers.
    pub fn check_unique_keys(&self) -> Result<(), ModelError> {
        let mut admin_ids = HashSet::new();
        for a in &self.admins {
            if !admin_ids.insert(a.id.as_str()) {
                return Err(ModelError::DuplicateAdminId(a.id.clone()));
            }
        }
        let mut ids = HashSet::new();
        let mut numbers = HashSet::new();
        for u in &self.users {
            if !ids.insert(u.id.as_str()) {
                return Err(ModelError::DuplicateCandidateId(u.id.clone()));
            }
            if !numbers.insert(u.application_number.as_str()) {
                return Err(ModelError::DuplicateApplicationNumber(u.application_number.clone()));
            }
        }
        Ok(())
    }
}
