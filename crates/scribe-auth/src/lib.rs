//! Token-based authentication: RS256 token pairs, keystore-backed
//! sessions with one-time refresh rotation, and password credentials.

pub mod claims;
pub mod password;
pub mod service;

pub use claims::{extract_bearer_token, TokenClaims, TokenCodec, TokenError};
pub use service::{AuthError, AuthService, SignUp, TokenConfig, TokenPair};
