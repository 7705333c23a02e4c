//! Shared types, errors, and configuration for Untether.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for users and round-up records
//! - Limit/offset paging for history endpoints
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::AppError;
