//! # scribe-db
//!
//! PostgreSQL data access for Scribe using SQLx:
//!
//! - Connection pool management
//! - Store traits consumed by the auth and API layers
//! - Repository implementations per table
//!
//! ## Example
//!
//! ```ignore
//! use scribe_core::config::DatabaseConfig;
//! use scribe_db::{Database, KeystoreRepository, SessionStore};
//!
//! let db = Database::connect(&config).await?;
//! let sessions = KeystoreRepository::new(db.pool().clone());
//! let live = sessions.find_active(user_id, jti).await?;
//! ```

pub mod api_keys;
pub mod blogs;
pub mod keystore;
pub mod messages;
pub mod pool;
pub mod repository;
pub mod users;

pub use api_keys::ApiKeyRepository;
pub use blogs::BlogRepository;
pub use keystore::KeystoreRepository;
pub use messages::MessageRepository;
pub use pool::Database;
pub use users::UserRepository;
pub use repository::{
    ApiKeyStore, BlogStore, MessageStore, NewBlog, NewUser, RepositoryError, RepositoryResult,
    SessionStore, UserStore,
};
