//! client-core: shared infrastructure for the security dashboard clients.
pub mod config;
pub mod error;
pub mod observability;

pub use error::CoreError;
