//! Service layer for the academy record store.
//! - `storage`: the persistence port and its file / in-memory adapters.
//! - `academy`: accounts, login, registration and progress logging on top of it.
//! - `runtime`: startup environment checks.

pub mod errors;
pub mod storage;
pub mod academy;
pub mod runtime;
