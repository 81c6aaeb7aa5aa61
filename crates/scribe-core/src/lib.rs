//! # scribe-core
//!
//! Core types and utilities shared across the Scribe crates:
//! - Common error types
//! - Configuration loading
//! - Pagination types
//! - Cache abstraction

pub mod cache;
pub mod config;
pub mod error;
pub mod pagination;

pub use cache::{Cache, JsonCache, MemoryCache};
pub use config::{AppConfig, AuthConfig, DatabaseConfig, ServerConfig};
pub use error::{CoreError, CoreResult};
pub use pagination::PaginationParams;
