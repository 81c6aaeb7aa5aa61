//! Application state and request extractors
//!
//! Authenticated identity travels as request extensions set by the
//! authentication gate; the extractors here give handlers typed access
//! to it and reject requests on routes that skipped the gate.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

use scribe_auth::AuthService;
use scribe_core::cache::JsonCache;
use scribe_db::repository::{BlogStore, MessageStore, UserStore};
use scribe_models::{Blog, Keystore, User};

use crate::error::ApiError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub users: Arc<dyn UserStore>,
    pub blogs: Arc<dyn BlogStore>,
    pub messages: Arc<dyn MessageStore>,
    pub blog_cache: JsonCache<Blog>,
}

/// The authenticated user, attached by the authentication gate.
pub struct CurrentUser(pub Arc<User>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Arc<User>>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| ApiError::unauthorized("authentication required"))
    }
}

impl std::ops::Deref for CurrentUser {
    type Target = User;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The session row backing the presented access token.
pub struct CurrentKeystore(pub Arc<Keystore>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentKeystore {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Arc<Keystore>>()
            .cloned()
            .map(CurrentKeystore)
            .ok_or_else(|| ApiError::unauthorized("authentication required"))
    }
}

impl std::ops::Deref for CurrentKeystore {
    type Target = Keystore;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
