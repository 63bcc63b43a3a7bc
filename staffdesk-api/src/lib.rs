//! # StaffDesk API Server Library
//!
//! Role-gated HTTP service over the company personnel/project database.
//!
//! ## Modules
//!
//! - `app`: Application state, router, and session middleware
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `flash`: One-shot flash message cookie helpers
//! - `routes`: Route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod flash;
pub mod routes;
