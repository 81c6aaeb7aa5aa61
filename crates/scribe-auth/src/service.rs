//! Authentication service
//!
//! Owns the token lifecycle: issuing access/refresh pairs bound to a
//! keystore session row, verifying presented tokens, rotating pairs on
//! refresh, and revoking sessions on signout. Also carries the
//! credential flows (signup/signin) so handlers stay thin.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use scribe_core::AuthConfig;
use scribe_db::repository::{
    ApiKeyStore, NewUser, RepositoryError, SessionStore, UserStore,
};
use scribe_models::{ApiKey, Keystore, RoleCode, User};

use crate::claims::{TokenClaims, TokenCodec, TokenError};
use crate::password;

/// Token issuance parameters, derived from [`AuthConfig`].
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub issuer: String,
    pub audience: String,
    pub access_validity: Duration,
    pub refresh_validity: Duration,
}

impl TokenConfig {
    pub fn from_auth_config(config: &AuthConfig) -> Self {
        Self {
            issuer: config.token_issuer.clone(),
            audience: config.token_audience.clone(),
            access_validity: Duration::seconds(config.access_token_validity_secs),
            refresh_validity: Duration::seconds(config.refresh_token_validity_secs),
        }
    }
}

/// An access/refresh token pair as returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Authentication and credential errors.
///
/// The display strings are the client-facing messages; the API layer
/// maps variants onto status codes.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("invalid access token")]
    InvalidAccessClaims,

    #[error("invalid refresh token")]
    InvalidRefreshClaims,

    #[error("access and refresh tokens do not belong to the same user")]
    SubjectMismatch,

    #[error("invalid claims subject")]
    InvalidSubject,

    #[error("claims subject does not exist")]
    UnknownSubject,

    #[error("session not found")]
    SessionNotFound,

    #[error("session already rotated")]
    Replay,

    #[error("user already registered")]
    AlreadyRegistered,

    #[error("user not registered")]
    NotRegistered,

    #[error("wrong password")]
    WrongPassword,

    #[error("default role is not provisioned")]
    RoleMissing,

    #[error("password hashing failed: {0}")]
    Password(String),

    #[error(transparent)]
    Store(#[from] RepositoryError),
}

/// Parameters for the basic signup flow.
#[derive(Debug, Clone)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub name: String,
    pub profile_pic_url: Option<String>,
}

const SESSION_KEY_LEN: usize = 64;
const SESSION_KEY_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Random alphanumeric key used as a token jti and keystore column.
fn generate_key() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    (0..SESSION_KEY_LEN)
        .map(|_| {
            let idx = rng.random_range(0..SESSION_KEY_CHARSET.len());
            SESSION_KEY_CHARSET[idx] as char
        })
        .collect()
}

pub struct AuthService {
    codec: TokenCodec,
    config: TokenConfig,
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserStore>,
    api_keys: Arc<dyn ApiKeyStore>,
}

impl AuthService {
    pub fn new(
        codec: TokenCodec,
        config: TokenConfig,
        sessions: Arc<dyn SessionStore>,
        users: Arc<dyn UserStore>,
        api_keys: Arc<dyn ApiKeyStore>,
    ) -> Self {
        Self {
            codec,
            config,
            sessions,
            users,
            api_keys,
        }
    }

    fn claims_for(&self, user_id: Uuid, jti: &str, validity: Duration) -> TokenClaims {
        let now = Utc::now();
        TokenClaims {
            iss: self.config.issuer.clone(),
            sub: user_id.to_string(),
            aud: vec![self.config.audience.clone()],
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + validity).timestamp(),
            jti: jti.to_string(),
        }
    }

    /// Semantic claim validation, applied after (or instead of)
    /// cryptographic verification. Checks issuer, audience membership,
    /// subject shape, time claims being set, and jti presence.
    pub fn validate_claims(&self, claims: &TokenClaims) -> bool {
        claims.iss == self.config.issuer
            && !claims.sub.is_empty()
            && Uuid::parse_str(&claims.sub).is_ok()
            && claims.aud.iter().any(|aud| aud == &self.config.audience)
            && claims.nbf != 0
            && claims.exp != 0
            && !claims.jti.is_empty()
    }

    /// Create a fresh session row and sign a token pair against it.
    pub async fn issue_token_pair(&self, user: &User) -> Result<TokenPair, AuthError> {
        let primary_key = generate_key();
        let secondary_key = generate_key();
        self.sessions
            .create(user.id, &primary_key, &secondary_key)
            .await?;

        let access_token = self.codec.sign(&self.claims_for(
            user.id,
            &primary_key,
            self.config.access_validity,
        ))?;
        let refresh_token = self.codec.sign(&self.claims_for(
            user.id,
            &secondary_key,
            self.config.refresh_validity,
        ))?;

        tracing::debug!(user_id = %user.id, "issued token pair");
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Verify an access token cryptographically and semantically.
    pub fn verify_access_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let claims = self.codec.verify(token)?;
        if !self.validate_claims(&claims) {
            return Err(AuthError::InvalidAccessClaims);
        }
        Ok(claims)
    }

    /// Resolve the claims subject to a stored user.
    pub async fn resolve_subject(&self, claims: &TokenClaims) -> Result<User, AuthError> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidSubject)?;
        self.users
            .fetch_by_id(user_id)
            .await?
            .ok_or(AuthError::UnknownSubject)
    }

    /// Active session for the user's access-token jti.
    pub async fn fetch_keystore(
        &self,
        user: &User,
        primary_key: &str,
    ) -> Result<Option<Keystore>, AuthError> {
        Ok(self.sessions.find_active(user.id, primary_key).await?)
    }

    pub async fn fetch_api_key(&self, key: &str) -> Result<Option<ApiKey>, AuthError> {
        Ok(self.api_keys.find_active_by_key(key).await?)
    }

    // Bootstrap/fixture helpers, not on any request path.
    pub async fn create_api_key(
        &self,
        key: &str,
        version: i32,
        permissions: &[String],
        comments: &[String],
    ) -> Result<ApiKey, AuthError> {
        Ok(self
            .api_keys
            .create_key(key, version, permissions, comments)
            .await?)
    }

    pub async fn delete_api_key(&self, id: Uuid) -> Result<bool, AuthError> {
        Ok(self.api_keys.delete_key(id).await?)
    }

    /// Rotate a token pair.
    ///
    /// The access token only has to decode and carry valid claims; it
    /// may be expired, which is the normal reason to refresh. The
    /// refresh token must verify fully. Both must name the same
    /// subject and match a live session on both jtis. The old session
    /// is deleted before the new pair is issued; losing the delete
    /// race means another caller already rotated this pair and the
    /// request is treated as a replay.
    pub async fn refresh_token_pair(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<TokenPair, AuthError> {
        let access_claims = self.codec.decode(access_token)?;
        if !self.validate_claims(&access_claims) {
            return Err(AuthError::InvalidAccessClaims);
        }

        let refresh_claims = self.codec.verify(refresh_token)?;
        if !self.validate_claims(&refresh_claims) {
            return Err(AuthError::InvalidRefreshClaims);
        }

        if access_claims.sub != refresh_claims.sub {
            return Err(AuthError::SubjectMismatch);
        }

        let user = self.resolve_subject(&refresh_claims).await?;
        let keystore = self
            .sessions
            .find_for_refresh(user.id, &access_claims.jti, &refresh_claims.jti)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if !self.sessions.delete(keystore.id).await? {
            tracing::warn!(user_id = %user.id, "refresh lost rotation race");
            return Err(AuthError::Replay);
        }

        self.issue_token_pair(&user).await
    }

    /// Revoke a session. Deleting an already-deleted row is fine; the
    /// end state is identical either way.
    pub async fn signout(&self, keystore: &Keystore) -> Result<(), AuthError> {
        self.sessions.delete(keystore.id).await?;
        tracing::debug!(user_id = %keystore.user_id, "signed out");
        Ok(())
    }

    /// Register a new user with the default role and sign them in.
    pub async fn sign_up(&self, signup: SignUp) -> Result<(User, TokenPair), AuthError> {
        if self.users.email_exists(&signup.email).await? {
            return Err(AuthError::AlreadyRegistered);
        }

        let role = self
            .users
            .fetch_role_by_code(RoleCode::Learner)
            .await?
            .ok_or(AuthError::RoleMissing)?;

        let password_hash = password::hash_password(&signup.password)
            .map_err(|e| AuthError::Password(e.to_string()))?;

        let user = self
            .users
            .create_user(NewUser {
                email: signup.email,
                password_hash,
                name: signup.name,
                profile_pic_url: signup.profile_pic_url,
                roles: vec![role],
            })
            .await
            .map_err(|err| match err {
                // a concurrent signup won the insert between the
                // existence check and ours
                RepositoryError::Conflict(_) => AuthError::AlreadyRegistered,
                other => other.into(),
            })?;

        let pair = self.issue_token_pair(&user).await?;
        tracing::info!(user_id = %user.id, "new user registered");
        Ok((user, pair))
    }

    /// Authenticate by email and password and issue a fresh pair.
    pub async fn sign_in(&self, email: &str, plain: &str) -> Result<(User, TokenPair), AuthError> {
        let user = self
            .users
            .fetch_by_email(email)
            .await?
            .ok_or(AuthError::NotRegistered)?;

        let stored = user.password.as_deref().ok_or(AuthError::WrongPassword)?;
        if !password::verify_password(stored, plain) {
            return Err(AuthError::WrongPassword);
        }

        let pair = self.issue_token_pair(&user).await?;
        Ok((user, pair))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use scribe_db::repository::RepositoryResult;
    use scribe_models::Role;

    const PRIVATE_PEM: &[u8] = include_bytes!("../testdata/rsa_test_private.pem");
    const PUBLIC_PEM: &[u8] = include_bytes!("../testdata/rsa_test_public.pem");

    #[derive(Default)]
    struct MemorySessions {
        rows: Mutex<HashMap<Uuid, Keystore>>,
    }

    impl MemorySessions {
        fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SessionStore for MemorySessions {
        async fn create(
            &self,
            user_id: Uuid,
            primary_key: &str,
            secondary_key: &str,
        ) -> RepositoryResult<Keystore> {
            let now = Utc::now();
            let row = Keystore {
                id: Uuid::new_v4(),
                user_id,
                primary_key: primary_key.to_string(),
                secondary_key: secondary_key.to_string(),
                status: true,
                created_at: now,
                updated_at: now,
            };
            self.rows.lock().unwrap().insert(row.id, row.clone());
            Ok(row)
        }

        async fn find_active(
            &self,
            user_id: Uuid,
            primary_key: &str,
        ) -> RepositoryResult<Option<Keystore>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .find(|k| k.status && k.user_id == user_id && k.primary_key == primary_key)
                .cloned())
        }

        async fn find_for_refresh(
            &self,
            user_id: Uuid,
            primary_key: &str,
            secondary_key: &str,
        ) -> RepositoryResult<Option<Keystore>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .find(|k| {
                    k.status
                        && k.user_id == user_id
                        && k.primary_key == primary_key
                        && k.secondary_key == secondary_key
                })
                .cloned())
        }

        async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
            Ok(self.rows.lock().unwrap().remove(&id).is_some())
        }
    }

    #[derive(Default)]
    struct MemoryUsers {
        users: Mutex<HashMap<Uuid, User>>,
        roles: Mutex<HashMap<RoleCode, Role>>,
    }

    impl MemoryUsers {
        fn with_default_role() -> Self {
            let store = Self::default();
            let now = Utc::now();
            store.roles.lock().unwrap().insert(
                RoleCode::Learner,
                Role {
                    id: Uuid::new_v4(),
                    code: RoleCode::Learner,
                    status: true,
                    created_at: now,
                    updated_at: now,
                },
            );
            store
        }
    }

    #[async_trait]
    impl UserStore for MemoryUsers {
        async fn fetch_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
            Ok(self.users.lock().unwrap().get(&id).cloned())
        }

        async fn fetch_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn email_exists(&self, email: &str) -> RepositoryResult<bool> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .any(|u| u.email == email))
        }

        async fn create_user(&self, new_user: NewUser) -> RepositoryResult<User> {
            let now = Utc::now();
            let user = User {
                id: Uuid::new_v4(),
                email: new_user.email,
                name: new_user.name,
                password: Some(new_user.password_hash),
                profile_pic_url: new_user.profile_pic_url,
                roles: new_user.roles,
                verified: false,
                status: true,
                created_at: now,
                updated_at: now,
            };
            self.users.lock().unwrap().insert(user.id, user.clone());
            Ok(user)
        }

        async fn fetch_role_by_code(&self, code: RoleCode) -> RepositoryResult<Option<Role>> {
            Ok(self.roles.lock().unwrap().get(&code).cloned())
        }

        async fn create_role(&self, code: RoleCode) -> RepositoryResult<Role> {
            let now = Utc::now();
            let role = Role {
                id: Uuid::new_v4(),
                code,
                status: true,
                created_at: now,
                updated_at: now,
            };
            self.roles.lock().unwrap().insert(code, role.clone());
            Ok(role)
        }

        async fn delete_role(&self, id: Uuid) -> RepositoryResult<bool> {
            let mut roles = self.roles.lock().unwrap();
            let code = roles
                .iter()
                .find(|(_, role)| role.id == id)
                .map(|(code, _)| *code);
            Ok(code.and_then(|c| roles.remove(&c)).is_some())
        }

        async fn remove_by_email(&self, email: &str) -> RepositoryResult<bool> {
            let mut users = self.users.lock().unwrap();
            let id = users.values().find(|u| u.email == email).map(|u| u.id);
            Ok(id.and_then(|id| users.remove(&id)).is_some())
        }
    }

    /// Reports every email as free but enforces uniqueness on insert,
    /// the way a concurrent signup slipping past the existence check
    /// hits the database constraint.
    struct RacingUsers {
        inner: MemoryUsers,
    }

    #[async_trait]
    impl UserStore for RacingUsers {
        async fn fetch_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
            self.inner.fetch_by_id(id).await
        }

        async fn fetch_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
            self.inner.fetch_by_email(email).await
        }

        async fn email_exists(&self, _email: &str) -> RepositoryResult<bool> {
            Ok(false)
        }

        async fn create_user(&self, new_user: NewUser) -> RepositoryResult<User> {
            if self.inner.email_exists(&new_user.email).await? {
                return Err(RepositoryError::Conflict("user already registered".into()));
            }
            self.inner.create_user(new_user).await
        }

        async fn fetch_role_by_code(&self, code: RoleCode) -> RepositoryResult<Option<Role>> {
            self.inner.fetch_role_by_code(code).await
        }

        async fn create_role(&self, code: RoleCode) -> RepositoryResult<Role> {
            self.inner.create_role(code).await
        }

        async fn delete_role(&self, id: Uuid) -> RepositoryResult<bool> {
            self.inner.delete_role(id).await
        }

        async fn remove_by_email(&self, email: &str) -> RepositoryResult<bool> {
            self.inner.remove_by_email(email).await
        }
    }

    #[derive(Default)]
    struct MemoryApiKeys {
        keys: Mutex<Vec<ApiKey>>,
    }

    #[async_trait]
    impl ApiKeyStore for MemoryApiKeys {
        async fn find_active_by_key(&self, key: &str) -> RepositoryResult<Option<ApiKey>> {
            Ok(self
                .keys
                .lock()
                .unwrap()
                .iter()
                .find(|k| k.status && k.key == key)
                .cloned())
        }

        async fn create_key(
            &self,
            key: &str,
            version: i32,
            permissions: &[String],
            comments: &[String],
        ) -> RepositoryResult<ApiKey> {
            let now = Utc::now();
            let api_key = ApiKey {
                id: Uuid::new_v4(),
                key: key.to_string(),
                version,
                permissions: permissions.to_vec(),
                comments: comments.to_vec(),
                status: true,
                created_at: now,
                updated_at: now,
            };
            self.keys.lock().unwrap().push(api_key.clone());
            Ok(api_key)
        }

        async fn delete_key(&self, id: Uuid) -> RepositoryResult<bool> {
            let mut keys = self.keys.lock().unwrap();
            let before = keys.len();
            keys.retain(|k| k.id != id);
            Ok(keys.len() < before)
        }
    }

    struct Harness {
        service: Arc<AuthService>,
        sessions: Arc<MemorySessions>,
        users: Arc<MemoryUsers>,
    }

    fn harness() -> Harness {
        harness_with_validity(Duration::hours(1))
    }

    fn harness_with_validity(access_validity: Duration) -> Harness {
        let sessions = Arc::new(MemorySessions::default());
        let users = Arc::new(MemoryUsers::with_default_role());
        let service = Arc::new(AuthService::new(
            TokenCodec::from_rsa_pem(PRIVATE_PEM, PUBLIC_PEM).unwrap(),
            TokenConfig {
                issuer: "api.test".into(),
                audience: "test".into(),
                access_validity,
                refresh_validity: Duration::days(30),
            },
            sessions.clone(),
            users.clone(),
            Arc::new(MemoryApiKeys::default()),
        ));
        Harness {
            service,
            sessions,
            users,
        }
    }

    async fn signed_up(h: &Harness) -> (User, TokenPair) {
        h.service
            .sign_up(SignUp {
                email: "ada@example.com".into(),
                password: "changeit".into(),
                name: "Ada".into(),
                profile_pic_url: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_sign_up_issues_verifiable_pair() {
        let h = harness();
        let (user, pair) = signed_up(&h).await;

        assert!(user.has_any_role(&[RoleCode::Learner]));
        let claims = h.service.verify_access_token(&pair.access_token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());

        let keystore = h.service.fetch_keystore(&user, &claims.jti).await.unwrap();
        assert!(keystore.is_some());
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email() {
        let h = harness();
        signed_up(&h).await;

        let err = h
            .service
            .sign_up(SignUp {
                email: "ada@example.com".into(),
                password: "other".into(),
                name: "Ada Again".into(),
                profile_pic_url: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AlreadyRegistered));
    }

    #[tokio::test]
    async fn test_sign_up_insert_race_maps_to_already_registered() {
        let service = Arc::new(AuthService::new(
            TokenCodec::from_rsa_pem(PRIVATE_PEM, PUBLIC_PEM).unwrap(),
            TokenConfig {
                issuer: "api.test".into(),
                audience: "test".into(),
                access_validity: Duration::hours(1),
                refresh_validity: Duration::days(30),
            },
            Arc::new(MemorySessions::default()),
            Arc::new(RacingUsers {
                inner: MemoryUsers::with_default_role(),
            }),
            Arc::new(MemoryApiKeys::default()),
        ));

        let signup = || SignUp {
            email: "ada@example.com".into(),
            password: "changeit".into(),
            name: "Ada".into(),
            profile_pic_url: None,
        };
        service.sign_up(signup()).await.unwrap();

        // the existence check saw nothing; the insert still conflicts
        let err = service.sign_up(signup()).await.unwrap_err();
        assert!(matches!(err, AuthError::AlreadyRegistered));
    }

    #[tokio::test]
    async fn test_sign_up_without_default_role() {
        let h = harness();
        h.users.roles.lock().unwrap().clear();

        let err = h
            .service
            .sign_up(SignUp {
                email: "ada@example.com".into(),
                password: "changeit".into(),
                name: "Ada".into(),
                profile_pic_url: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::RoleMissing));
    }

    #[tokio::test]
    async fn test_sign_in() {
        let h = harness();
        let (user, _) = signed_up(&h).await;

        let (signed_in, pair) = h
            .service
            .sign_in("ada@example.com", "changeit")
            .await
            .unwrap();
        assert_eq!(signed_in.id, user.id);
        assert!(h.service.verify_access_token(&pair.access_token).is_ok());

        let err = h
            .service
            .sign_in("ada@example.com", "nope")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::WrongPassword));

        let err = h
            .service
            .sign_in("nobody@example.com", "changeit")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotRegistered));
    }

    #[tokio::test]
    async fn test_refresh_rotates_session() {
        let h = harness();
        let (_, pair) = signed_up(&h).await;
        assert_eq!(h.sessions.len(), 1);

        let rotated = h
            .service
            .refresh_token_pair(&pair.access_token, &pair.refresh_token)
            .await
            .unwrap();
        assert_eq!(h.sessions.len(), 1);
        assert_ne!(rotated.access_token, pair.access_token);
        assert!(h.service.verify_access_token(&rotated.access_token).is_ok());

        // the consumed pair can never be used again
        let err = h
            .service
            .refresh_token_pair(&pair.access_token, &pair.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::SessionNotFound));
    }

    #[tokio::test]
    async fn test_refresh_accepts_expired_access_token() {
        let h = harness_with_validity(Duration::hours(-1));
        let (_, pair) = signed_up(&h).await;

        // the access token is already past its exp
        assert!(matches!(
            h.service.verify_access_token(&pair.access_token),
            Err(AuthError::Token(TokenError::Expired))
        ));

        assert!(h
            .service
            .refresh_token_pair(&pair.access_token, &pair.refresh_token)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_refresh_subject_mismatch() {
        let h = harness();
        let (_, ada_pair) = signed_up(&h).await;
        let (_, bob_pair) = h
            .service
            .sign_up(SignUp {
                email: "bob@example.com".into(),
                password: "changeit".into(),
                name: "Bob".into(),
                profile_pic_url: None,
            })
            .await
            .unwrap();

        let err = h
            .service
            .refresh_token_pair(&ada_pair.access_token, &bob_pair.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::SubjectMismatch));
    }

    #[tokio::test]
    async fn test_refresh_after_user_removed() {
        let h = harness();
        let (_, pair) = signed_up(&h).await;
        h.users.remove_by_email("ada@example.com").await.unwrap();

        let err = h
            .service
            .refresh_token_pair(&pair.access_token, &pair.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UnknownSubject));
    }

    #[tokio::test]
    async fn test_concurrent_refresh_single_winner() {
        let h = harness();
        let (_, pair) = signed_up(&h).await;

        let a = {
            let service = h.service.clone();
            let pair = pair.clone();
            tokio::spawn(async move {
                service
                    .refresh_token_pair(&pair.access_token, &pair.refresh_token)
                    .await
            })
        };
        let b = {
            let service = h.service.clone();
            let pair = pair.clone();
            tokio::spawn(async move {
                service
                    .refresh_token_pair(&pair.access_token, &pair.refresh_token)
                    .await
            })
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        assert_eq!(h.sessions.len(), 1);
        for result in results {
            if let Err(err) = result {
                assert!(matches!(
                    err,
                    AuthError::Replay | AuthError::SessionNotFound
                ));
            }
        }
    }

    #[tokio::test]
    async fn test_signout_is_idempotent() {
        let h = harness();
        let (user, pair) = signed_up(&h).await;

        let claims = h.service.verify_access_token(&pair.access_token).unwrap();
        let keystore = h
            .service
            .fetch_keystore(&user, &claims.jti)
            .await
            .unwrap()
            .unwrap();

        h.service.signout(&keystore).await.unwrap();
        assert_eq!(h.sessions.len(), 0);
        h.service.signout(&keystore).await.unwrap();

        // the pair is dead for refresh once the row is gone
        let err = h
            .service
            .refresh_token_pair(&pair.access_token, &pair.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::SessionNotFound));
    }

    #[tokio::test]
    async fn test_validate_claims_semantics() {
        let h = harness();
        let user_id = Uuid::new_v4();
        let base = h
            .service
            .claims_for(user_id, "jti-1", Duration::hours(1));
        assert!(h.service.validate_claims(&base));

        let mut wrong_issuer = base.clone();
        wrong_issuer.iss = "someone.else".into();
        assert!(!h.service.validate_claims(&wrong_issuer));

        let mut wrong_audience = base.clone();
        wrong_audience.aud = vec!["other".into()];
        assert!(!h.service.validate_claims(&wrong_audience));

        let mut bad_subject = base.clone();
        bad_subject.sub = "not-a-uuid".into();
        assert!(!h.service.validate_claims(&bad_subject));

        let mut no_jti = base.clone();
        no_jti.jti.clear();
        assert!(!h.service.validate_claims(&no_jti));

        let mut unset_exp = base.clone();
        unset_exp.exp = 0;
        assert!(!h.service.validate_claims(&unset_exp));
    }
}
