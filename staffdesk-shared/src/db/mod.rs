//! Database access layer
//!
//! Provides the PostgreSQL connection pool used by all models.

pub mod pool;

pub use pool::{create_pool, health_check, DatabaseConfig};
