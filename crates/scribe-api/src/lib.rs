//! # scribe-api
//!
//! HTTP surface: the three request gates, DTO validation, handlers and
//! the `{message, data}` / `{message, status}` response envelopes.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;

pub use extractors::AppState;
pub use routes::router;
