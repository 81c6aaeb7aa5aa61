//! # scribe-models
//!
//! Domain entities for Scribe. These types carry no persistence logic;
//! row mapping lives in `scribe-db`.

pub mod api_key;
pub mod blog;
pub mod keystore;
pub mod message;
pub mod role;
pub mod user;

pub use api_key::ApiKey;
pub use blog::{Blog, BlogSummary};
pub use keystore::Keystore;
pub use message::Message;
pub use role::{Role, RoleCode};
pub use user::User;
