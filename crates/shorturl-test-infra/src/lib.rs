//! Test fixtures for exercising admin clients against a live HTTP backend.

pub mod backend;
pub mod error;
mod routes;

pub use backend::{BackendConfig, FakeBackend, RecordedRequest};
pub use error::{Result, TestInfraError};
