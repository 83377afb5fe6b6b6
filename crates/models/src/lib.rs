//! Persisted entity shapes for the academy record store.
//!
//! Field names follow the JSON document the store writes to disk, so these
//! types double as the on-disk schema.

pub mod errors;
pub mod admin;
pub mod candidate;
pub mod store;

pub use admin::AdminAccount;
pub use candidate::CandidateAccount;
pub use store::StoreDocument;
