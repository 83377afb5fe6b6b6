//! Academy record store: admin and candidate accounts plus the per-candidate
//! technique and session logs, mirrored to storage after every change.
//!
//! Split like the rest of the service crate: `domain` (inputs and public
//! views), `errors`, `state` (in-memory indices) and `service`.

pub mod domain;
pub mod errors;
mod state;
pub mod service;

pub use errors::AcademyError;
pub use service::AcademyService;
