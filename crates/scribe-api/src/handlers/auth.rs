//! Authentication handlers
//!
//! POST /auth/signup/basic, POST /auth/signin/basic,
//! POST /auth/token/refresh, DELETE /auth/signout

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    response::IntoResponse,
};
use axum::Json;
use validator::Validate;

use scribe_auth::{extract_bearer_token, SignUp};

use crate::dto::{AuthData, SignInBasic, SignUpBasic, TokenRefresh};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, CurrentKeystore};
use crate::response;

/// Register a new user with the default role and sign them in.
pub async fn signup_basic(
    State(state): State<AppState>,
    Json(payload): Json<SignUpBasic>,
) -> ApiResult<impl IntoResponse> {
    payload.validate().map_err(ApiError::validation)?;

    let (user, tokens) = state
        .auth
        .sign_up(SignUp {
            email: payload.email,
            password: payload.password,
            name: payload.name,
            profile_pic_url: payload.profile_pic_url,
        })
        .await?;

    Ok(response::ok("signup successful", AuthData { user, tokens }))
}

/// Authenticate with email and password.
pub async fn signin_basic(
    State(state): State<AppState>,
    Json(payload): Json<SignInBasic>,
) -> ApiResult<impl IntoResponse> {
    payload.validate().map_err(ApiError::validation)?;

    let (user, tokens) = state.auth.sign_in(&payload.email, &payload.password).await?;

    Ok(response::ok("signin successful", AuthData { user, tokens }))
}

/// Rotate a token pair. The presented access token rides in the
/// Authorization header and is allowed to be expired; the refresh
/// token comes in the body and must verify fully.
pub async fn token_refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<TokenRefresh>,
) -> ApiResult<impl IntoResponse> {
    payload.validate().map_err(ApiError::validation)?;

    let access_token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer_token)
        .ok_or_else(|| ApiError::unauthorized("missing or invalid Authorization header"))?;

    let tokens = state
        .auth
        .refresh_token_pair(access_token, &payload.refresh_token)
        .await?;

    Ok(response::ok("token issued", tokens))
}

/// Revoke the current session.
pub async fn signout(
    State(state): State<AppState>,
    keystore: CurrentKeystore,
) -> ApiResult<impl IntoResponse> {
    state.auth.signout(&keystore).await?;
    Ok(response::message("signout successful"))
}
