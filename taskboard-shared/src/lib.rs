//! # Taskboard Shared Library
//!
//! This crate contains the domain model, persistence and business rules used
//! by the Taskboard API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `store`: Entity store abstraction (PostgreSQL and in-memory)
//! - `auth`: Authentication and authorization utilities
//! - `services`: Task lifecycle, membership and account operations
//! - `db`: Connection pooling and migrations
//! - `error`: Service error type

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
