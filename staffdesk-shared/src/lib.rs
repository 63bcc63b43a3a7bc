//! # StaffDesk Shared Library
//!
//! This crate contains the data-access layer and shared business logic used
//! by the StaffDesk API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models, overview queries, and mutations
//! - `auth`: Password verification and session payload types
//! - `db`: PostgreSQL connection pool
//! - `export`: CSV rendering for the overview exports
//! - `import`: Spreadsheet parsing and validation for the employee import

pub mod auth;
pub mod db;
pub mod export;
pub mod import;
pub mod models;

/// Current version of the StaffDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
