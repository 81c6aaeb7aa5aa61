//! Request gates
//!
//! Every protected route passes, in order: the API-key gate, the
//! authentication gate and the authorization gate. Each gate either
//! attaches its result to the request extensions or terminates the
//! request; later gates and handlers read those extensions.
//!
//! Store failures inside a gate always fail closed, and a not-found
//! from a lookup is reported as Unauthorized so that gate responses
//! never confirm whether an entity exists.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use scribe_auth::{extract_bearer_token, AuthError};
use scribe_models::{ApiKey, RoleCode, User};

use crate::error::ApiError;
use crate::extractors::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Gate-level error conversion: entity existence is never leaked.
fn deny(err: AuthError) -> ApiError {
    match ApiError::from(err) {
        ApiError::NotFound(msg) => ApiError::Unauthorized(msg),
        other => other,
    }
}

/// First gate: the request must carry a registered, active API key.
pub async fn api_key_gate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::unauthorized("x-api-key header is required"))?
        .to_string();

    let api_key: ApiKey = state
        .auth
        .fetch_api_key(&key)
        .await
        .map_err(deny)?
        .ok_or_else(|| {
            tracing::debug!("rejected unknown api key");
            ApiError::forbidden("permission denied")
        })?;

    req.extensions_mut().insert(api_key);
    Ok(next.run(req).await)
}

/// Second gate: bearer token → claims → user → live session.
///
/// A cryptographically valid token is still rejected when its session
/// row is gone; the keystore lookup is the revocation check.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer_token)
        .ok_or_else(|| ApiError::unauthorized("missing or invalid Authorization header"))?
        .to_string();

    let claims = match state.auth.verify_access_token(&token) {
        Ok(claims) => claims,
        Err(AuthError::InvalidAccessClaims) => {
            return Err(ApiError::unauthorized("invalid claims"));
        }
        Err(err) => {
            tracing::debug!(%err, "access token rejected");
            return Err(deny(err));
        }
    };

    let user = state.auth.resolve_subject(&claims).await.map_err(deny)?;

    let keystore = state
        .auth
        .fetch_keystore(&user, &claims.jti)
        .await
        .map_err(deny)?
        .ok_or_else(|| {
            tracing::debug!(user_id = %user.id, "access token has no live session");
            ApiError::unauthorized("invalid access token")
        })?;

    req.extensions_mut().insert(Arc::new(user));
    req.extensions_mut().insert(Arc::new(keystore));
    Ok(next.run(req).await)
}

/// Third gate: the authenticated user must hold at least one of the
/// required roles. An empty role set is a route misconfiguration and
/// denies everything.
pub async fn authorize(
    required: &'static [RoleCode],
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if required.is_empty() {
        return Err(ApiError::forbidden("role missing"));
    }

    let user = req
        .extensions()
        .get::<Arc<User>>()
        .ok_or_else(|| ApiError::unauthorized("authentication required"))?;

    if !user.has_any_role(required) {
        tracing::debug!(user_id = %user.id, ?required, "insufficient role");
        return Err(ApiError::forbidden("insufficient role"));
    }

    Ok(next.run(req).await)
}
